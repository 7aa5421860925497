use std::collections::BTreeMap;

use serde::Serialize;

use crate::node::TocNode;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TocStats {
    pub total_entries: usize,
    /// Depth of the deepest branch, counting top-level entries as 1.
    pub max_depth: usize,
    /// Entry count keyed by each node's `level`.
    pub entries_per_level: BTreeMap<usize, usize>,
}

impl TocStats {
    pub fn collect(nodes: &[TocNode]) -> Self {
        let mut stats = Self::default();
        stats.visit(nodes, 1);
        stats
    }

    fn visit(&mut self, nodes: &[TocNode], depth: usize) {
        for node in nodes {
            self.total_entries += 1;
            self.max_depth = self.max_depth.max(depth);
            *self.entries_per_level.entry(node.level).or_default() += 1;
            self.visit(&node.children, depth + 1);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub href: String,
    pub level: usize,
    /// Titles from the top-level ancestor down to the hit itself.
    pub path: Vec<String>,
}

impl SearchHit {
    pub fn breadcrumb(&self) -> String {
        self.path.join(" > ")
    }
}

/// Finds every node whose title contains `query`, in document order.
pub fn search(nodes: &[TocNode], query: &str, case_sensitive: bool) -> Vec<SearchHit> {
    let needle = if case_sensitive {
        query.to_owned()
    } else {
        query.to_lowercase()
    };
    let mut hits = Vec::new();
    let mut trail = Vec::new();
    search_into(nodes, &needle, case_sensitive, &mut trail, &mut hits);
    hits
}

fn search_into<'a>(
    nodes: &'a [TocNode],
    needle: &str,
    case_sensitive: bool,
    trail: &mut Vec<&'a str>,
    hits: &mut Vec<SearchHit>,
) {
    for node in nodes {
        trail.push(&node.title);
        let matched = if case_sensitive {
            node.title.contains(needle)
        } else {
            node.title.to_lowercase().contains(needle)
        };
        if matched {
            hits.push(SearchHit {
                title: node.title.clone(),
                href: node.href.clone(),
                level: node.level,
                path: trail.iter().map(|title| (*title).to_owned()).collect(),
            });
        }
        search_into(&node.children, needle, case_sensitive, trail, hits);
        trail.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> Vec<TocNode> {
        vec![
            TocNode::new("Preface", "preface.xhtml", 0),
            TocNode::new("Part I", "part1.xhtml", 0).with_children(vec![
                TocNode::new("Chapter 1", "ch1.xhtml", 1).with_children(vec![
                    TocNode::new("Chapter 1 notes", "ch1.xhtml#notes", 2),
                ]),
                TocNode::new("Chapter 2", "ch2.xhtml", 1),
            ]),
        ]
    }

    #[test]
    fn counts_entries_depth_and_levels() {
        let stats = TocStats::collect(&book());
        assert_eq!(stats.total_entries, 5);
        assert_eq!(stats.max_depth, 3);
        assert_eq!(
            stats.entries_per_level,
            BTreeMap::from([(0, 2), (1, 2), (2, 1)])
        );
    }

    #[test]
    fn empty_toc_has_zero_stats() {
        assert_eq!(TocStats::collect(&[]), TocStats::default());
    }

    #[test]
    fn search_reports_breadcrumbs_in_document_order() {
        let hits = search(&book(), "chapter 1", false);
        let crumbs = hits.iter().map(SearchHit::breadcrumb).collect::<Vec<_>>();
        assert_eq!(
            crumbs,
            [
                "Part I > Chapter 1",
                "Part I > Chapter 1 > Chapter 1 notes"
            ]
        );
        assert_eq!(hits[1].href, "ch1.xhtml#notes");
    }

    #[test]
    fn case_sensitive_search_respects_case() {
        assert!(search(&book(), "chapter", true).is_empty());
        assert_eq!(search(&book(), "Chapter", true).len(), 3);
    }
}
