use std::path::Path;

use epub::doc::{EpubDoc, NavPoint};

use crate::archive::EpubArchive;
use crate::backend::ExtractionBackend;
use crate::error::{Result, TocError};
use crate::node::TocNode;

pub const NAME: &str = "library";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryLink {
    pub title: String,
    pub href: String,
}

impl LibraryLink {
    pub fn new(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
        }
    }
}

/// The TOC shape exposed by full e-book libraries: plain links mixed with
/// sections that carry their own sub-entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryTocEntry {
    Link(LibraryLink),
    Section(LibraryLink, Vec<LibraryTocEntry>),
}

pub trait TocLibrary {
    fn read_toc(&self, path: &Path) -> Result<Vec<LibraryTocEntry>>;
}

pub struct LibraryBackend {
    library: Box<dyn TocLibrary>,
}

impl LibraryBackend {
    pub fn new(library: impl TocLibrary + 'static) -> Self {
        Self {
            library: Box::new(library),
        }
    }
}

impl ExtractionBackend for LibraryBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    fn extract(&self, archive: &EpubArchive) -> Result<Option<Vec<TocNode>>> {
        let entries = self.library.read_toc(archive.path())?;
        if entries.is_empty() {
            tracing::debug!("library reported no toc");
            return Ok(None);
        }
        Ok(Some(flatten(&entries, 0)))
    }
}

pub fn flatten(entries: &[LibraryTocEntry], level: usize) -> Vec<TocNode> {
    entries
        .iter()
        .map(|entry| match entry {
            LibraryTocEntry::Link(link) => TocNode::new(&link.title, &link.href, level),
            LibraryTocEntry::Section(section, items) => {
                TocNode::new(&section.title, &section.href, level)
                    .with_children(flatten(items, level + 1))
            }
        })
        .collect()
}

/// Backed by the `epub` crate's parsed navigation points.
#[derive(Debug, Clone, Copy, Default)]
pub struct EpubDocLibrary;

impl TocLibrary for EpubDocLibrary {
    fn read_toc(&self, path: &Path) -> Result<Vec<LibraryTocEntry>> {
        let doc = EpubDoc::new(path)
            .map_err(|err| TocError::Parsing(format!("open epub with library: {err}")))?;
        Ok(doc.toc.iter().map(entry_from_nav_point).collect())
    }
}

fn entry_from_nav_point(point: &NavPoint) -> LibraryTocEntry {
    let link = LibraryLink::new(
        point.label.trim(),
        point.content.to_string_lossy().replace('\\', "/"),
    );
    if point.children.is_empty() {
        LibraryTocEntry::Link(link)
    } else {
        LibraryTocEntry::Section(
            link,
            point.children.iter().map(entry_from_nav_point).collect(),
        )
    }
}
