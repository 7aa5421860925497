use std::path::Path;

use roxmltree::Node;

use crate::archive::{EpubArchive, parse_xml, resolve_member_path};
use crate::backend::ExtractionBackend;
use crate::backend::opf::OPF_NS;
use crate::error::{Result, TocError};
use crate::hierarchy::{FlatTocEntry, build_tree};
use crate::node::TocNode;

pub const NAME: &str = "metadata";

const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";
const OPS_NS: &str = "http://www.idpf.org/2007/ops";

/// Book metadata as reported by a metadata reader. Only the TOC is used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpubMetadata {
    pub toc: Vec<FlatTocEntry>,
}

/// A metadata library that lists the TOC as flat, level-tagged entries.
pub trait MetadataReader {
    fn read_metadata(&self, path: &Path) -> Result<EpubMetadata>;
}

pub struct MetadataBackend {
    reader: Box<dyn MetadataReader>,
}

impl MetadataBackend {
    pub fn new(reader: impl MetadataReader + 'static) -> Self {
        Self {
            reader: Box::new(reader),
        }
    }
}

impl ExtractionBackend for MetadataBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    fn extract(&self, archive: &EpubArchive) -> Result<Option<Vec<TocNode>>> {
        let metadata = self.reader.read_metadata(archive.path())?;
        if metadata.toc.is_empty() {
            tracing::debug!("no toc in metadata");
            return Ok(None);
        }
        tracing::debug!(entries = metadata.toc.len(), "metadata toc entries");
        Ok(Some(build_tree(metadata.toc)))
    }
}

/// Reads the EPUB 3 navigation document declared in the package manifest.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavDocumentReader;

impl MetadataReader for NavDocumentReader {
    fn read_metadata(&self, path: &Path) -> Result<EpubMetadata> {
        let archive = EpubArchive::open(path)?;
        let Some(package_path) = archive.package_paths().first() else {
            return Ok(EpubMetadata::default());
        };
        if !archive.has_member(package_path)? {
            return Ok(EpubMetadata::default());
        }

        let package = archive.read_member(package_path)?;
        let Some(nav_href) = find_nav_href(&package)? else {
            return Ok(EpubMetadata::default());
        };
        let nav_path = resolve_member_path(package_path, &nav_href);
        if !archive.has_member(&nav_path)? {
            tracing::debug!(%nav_path, "navigation document missing from archive");
            return Ok(EpubMetadata::default());
        }

        let nav = archive.read_member(&nav_path)?;
        Ok(EpubMetadata {
            toc: parse_nav_entries(&nav)?,
        })
    }
}

fn find_nav_href(package: &str) -> Result<Option<String>> {
    let doc = parse_xml(package).map_err(|err| TocError::Parsing(err.to_string()))?;
    let href = doc
        .descendants()
        .filter(|n| n.has_tag_name((OPF_NS, "item")))
        .find(|n| {
            n.attribute("properties")
                .is_some_and(|p| p.split_whitespace().any(|prop| prop == "nav"))
        })
        .and_then(|n| n.attribute("href"))
        .map(str::to_owned);
    Ok(href)
}

/// Flattens `nav > ol > li` into level-tagged entries in document order.
///
/// Prefers the `nav` marked `epub:type="toc"`, falling back to the first
/// `nav` with a list. An `li` without a label is dropped with its sublist.
pub(crate) fn parse_nav_entries(xhtml: &str) -> Result<Vec<FlatTocEntry>> {
    let doc = parse_xml(xhtml).map_err(|err| TocError::Parsing(err.to_string()))?;

    let navs = doc
        .descendants()
        .filter(|n| n.has_tag_name((XHTML_NS, "nav")))
        .collect::<Vec<_>>();
    let toc_nav = navs
        .iter()
        .find(|nav| {
            nav.attribute((OPS_NS, "type"))
                .is_some_and(|t| t.split_whitespace().any(|token| token == "toc"))
        })
        .or_else(|| navs.iter().find(|nav| first_child(**nav, "ol").is_some()));

    let mut entries = Vec::new();
    if let Some(list) = toc_nav.and_then(|nav| first_child(*nav, "ol")) {
        collect_list(list, 0, &mut entries);
    }
    Ok(entries)
}

fn collect_list(list: Node, level: usize, entries: &mut Vec<FlatTocEntry>) {
    for item in list.children().filter(|n| n.has_tag_name((XHTML_NS, "li"))) {
        let label = first_child(item, "a").or_else(|| first_child(item, "span"));
        let Some(label) = label else {
            continue;
        };
        let title = normalize_whitespace(&text_content(label));
        if title.is_empty() {
            continue;
        }
        let src = label.attribute("href").unwrap_or_default();
        entries.push(FlatTocEntry::new(level, title, src));

        if let Some(sublist) = first_child(item, "ol") {
            collect_list(sublist, level + 1, entries);
        }
    }
}

fn first_child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name((XHTML_NS, name)))
}

fn text_content(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
