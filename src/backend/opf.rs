use std::collections::HashMap;

use crate::archive::{EpubArchive, parse_xml};
use crate::backend::ExtractionBackend;
use crate::error::{Result, TocError};
use crate::node::TocNode;

pub const NAME: &str = "opf";
pub const OPF_NS: &str = "http://www.idpf.org/2007/opf";

/// Coarse fallback: one flat entry per spine item of the package document.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpfBackend;

impl ExtractionBackend for OpfBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    fn extract(&self, archive: &EpubArchive) -> Result<Option<Vec<TocNode>>> {
        let Some(opf_path) = archive.first_member_with_suffix(".opf")? else {
            tracing::debug!("no opf member in archive");
            return Ok(None);
        };
        tracing::debug!(%opf_path, "found opf");

        let opf = archive.read_member(&opf_path)?;
        let nodes = spine_entries(&opf)?.filter(|nodes| !nodes.is_empty());
        if nodes.is_none() {
            tracing::debug!(%opf_path, "no resolvable spine items");
        }
        Ok(nodes)
    }
}

/// Returns `None` when the package has no spine or no manifest.
///
/// Titles use the 1-based position of the itemref within the spine, so an
/// itemref that does not resolve leaves a gap in the numbering.
pub fn spine_entries(xml: &str) -> Result<Option<Vec<TocNode>>> {
    let doc = parse_xml(xml).map_err(|err| TocError::Parsing(err.to_string()))?;

    let spine = doc.descendants().find(|n| n.has_tag_name((OPF_NS, "spine")));
    let manifest = doc
        .descendants()
        .find(|n| n.has_tag_name((OPF_NS, "manifest")));
    let (Some(spine), Some(manifest)) = (spine, manifest) else {
        return Ok(None);
    };

    let id_to_href = manifest
        .descendants()
        .filter(|n| n.has_tag_name((OPF_NS, "item")))
        .filter_map(|item| {
            let id = item.attribute("id").filter(|id| !id.is_empty())?;
            let href = item.attribute("href").filter(|href| !href.is_empty())?;
            Some((id, href))
        })
        .collect::<HashMap<_, _>>();

    let nodes = spine
        .descendants()
        .filter(|n| n.has_tag_name((OPF_NS, "itemref")))
        .enumerate()
        .filter_map(|(idx, itemref)| {
            let href = itemref
                .attribute("idref")
                .and_then(|idref| id_to_href.get(idref))?;
            Some(TocNode::new(format!("Chapter {}", idx + 1), *href, 0))
        })
        .collect();
    Ok(Some(nodes))
}
