use std::collections::HashSet;

use crate::error::{Result, TocError};
use crate::node::TocNode;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Non-empty root, non-blank title/href, strictly deepening children.
    #[default]
    Standard,
    /// `Standard` plus no repeated titles or hrefs anywhere in the tree.
    Strict,
}

pub fn validate(nodes: &[TocNode]) -> Result<()> {
    validate_with(nodes, ValidationMode::Standard)
}

pub fn validate_with(nodes: &[TocNode], mode: ValidationMode) -> Result<()> {
    if nodes.is_empty() {
        return Err(TocError::validation("TOC cannot be empty"));
    }

    for (idx, node) in nodes.iter().enumerate() {
        validate_node(node, &format!("item[{idx}]"))?;
    }

    if mode == ValidationMode::Strict {
        let mut titles = HashSet::new();
        let mut hrefs = HashSet::new();
        for (idx, node) in nodes.iter().enumerate() {
            check_unique(node, &format!("item[{idx}]"), &mut titles, &mut hrefs)?;
        }
    }

    Ok(())
}

fn validate_node(node: &TocNode, path: &str) -> Result<()> {
    if node.title.trim().is_empty() {
        return Err(TocError::validation(format!("{path}: Empty title")));
    }
    if node.href.trim().is_empty() {
        return Err(TocError::validation(format!("{path}: Empty href")));
    }

    for (idx, child) in node.children.iter().enumerate() {
        let child_path = format!("{path}->child[{idx}]");
        validate_node(child, &child_path)?;
        if child.level <= node.level {
            return Err(TocError::validation(format!(
                "{child_path}: Child level must be greater than parent level"
            )));
        }
    }
    Ok(())
}

fn check_unique<'a>(
    node: &'a TocNode,
    path: &str,
    titles: &mut HashSet<&'a str>,
    hrefs: &mut HashSet<&'a str>,
) -> Result<()> {
    if !titles.insert(node.title.trim()) {
        return Err(TocError::validation(format!(
            "{path}: Duplicate title: {}",
            node.title.trim()
        )));
    }
    if !hrefs.insert(node.href.trim()) {
        return Err(TocError::validation(format!(
            "{path}: Duplicate href: {}",
            node.href.trim()
        )));
    }
    for (idx, child) in node.children.iter().enumerate() {
        check_unique(child, &format!("{path}->child[{idx}]"), titles, hrefs)?;
    }
    Ok(())
}
