use roxmltree::Node;

use crate::archive::{EpubArchive, parse_xml};
use crate::backend::ExtractionBackend;
use crate::error::{Result, TocError};
use crate::node::TocNode;

pub const NAME: &str = "ncx";
pub const NCX_NS: &str = "http://www.daisy.org/z3986/2005/ncx/";

/// Reads the EPUB 2 navigation control file (`*.ncx`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NcxBackend;

impl ExtractionBackend for NcxBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    fn extract(&self, archive: &EpubArchive) -> Result<Option<Vec<TocNode>>> {
        let Some(ncx_path) = archive.first_member_with_suffix(".ncx")? else {
            tracing::debug!("no ncx member in archive");
            return Ok(None);
        };
        tracing::debug!(%ncx_path, "found ncx");

        let ncx = archive.read_member(&ncx_path)?;
        let nodes = parse_ncx(&ncx)?;
        if nodes.is_empty() {
            tracing::debug!(%ncx_path, "no labelled navigation points");
            return Ok(None);
        }
        Ok(Some(nodes))
    }
}

/// Walks `ncx > navMap > navPoint` recursively.
///
/// A navPoint without label text is dropped together with its descendants.
pub fn parse_ncx(xml: &str) -> Result<Vec<TocNode>> {
    let doc = parse_xml(xml).map_err(|err| TocError::Parsing(err.to_string()))?;

    let Some(nav_map) = ncx_child(doc.root_element(), "navMap").next() else {
        return Ok(Vec::new());
    };
    Ok(ncx_child(nav_map, "navPoint")
        .filter_map(|point| nav_point(point, 0))
        .collect())
}

fn nav_point(point: Node, level: usize) -> Option<TocNode> {
    let title = ncx_child(point, "navLabel")
        .next()
        .and_then(|label| ncx_child(label, "text").next())
        .and_then(|text| text.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())?;

    let href = ncx_child(point, "content")
        .next()
        .and_then(|content| content.attribute("src"))
        .unwrap_or_default();

    let children = ncx_child(point, "navPoint")
        .filter_map(|child| nav_point(child, level + 1))
        .collect();

    Some(TocNode::new(title, href, level).with_children(children))
}

fn ncx_child<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |n| n.has_tag_name((NCX_NS, name)))
}
