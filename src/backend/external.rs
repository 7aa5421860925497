use std::ffi::OsStr;

use crate::archive::EpubArchive;
use crate::backend::ExtractionBackend;
use crate::backend::command::run_capture;
use crate::error::Result;
use crate::hierarchy::{FlatTocEntry, build_tree};
use crate::node::TocNode;

pub const NAME: &str = "external";

/// Asks a command-line e-book tool (calibre's `ebook-meta` by default) for
/// the TOC and parses its indented `title -> href` listing.
#[derive(Debug, Clone)]
pub struct ExternalToolBackend {
    bin: String,
}

impl ExternalToolBackend {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

impl ExtractionBackend for ExternalToolBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    fn extract(&self, archive: &EpubArchive) -> Result<Option<Vec<TocNode>>> {
        tracing::info!(bin = %self.bin, "run external toc tool");
        let stdout = run_capture(&self.bin, [archive.path().as_os_str(), OsStr::new("--get-toc")])?;
        if stdout.trim().is_empty() {
            return Ok(None);
        }

        let nodes = build_tree(parse_listing(&stdout));
        Ok((!nodes.is_empty()).then_some(nodes))
    }
}

/// Level is the number of leading whitespace characters on each line.
pub fn parse_listing(text: &str) -> Vec<FlatTocEntry> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let content = line.trim_start();
            let level = line[..line.len() - content.len()].chars().count();
            let (title, href) = content
                .trim_end()
                .split_once(" -> ")
                .unwrap_or((content.trim_end(), ""));
            FlatTocEntry::new(level, title.trim(), href.trim())
        })
        .collect()
}
