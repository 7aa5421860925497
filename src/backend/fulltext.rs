use std::ffi::OsStr;
use std::path::Path;

use serde_json::Value;

use crate::archive::EpubArchive;
use crate::backend::ExtractionBackend;
use crate::backend::command::run_capture;
use crate::error::{Result, TocError};
use crate::node::TocNode;

pub const NAME: &str = "fulltext";

/// A content/metadata extraction engine.
///
/// Implementations return the parsed document as JSON, shaped
/// `{"metadata": {"toc": [{"title", "href", "children": [...]}, ...]}}`.
pub trait TextExtractor {
    fn from_file(&self, path: &Path) -> Result<Value>;
}

pub struct FullTextBackend {
    extractor: Box<dyn TextExtractor>,
}

impl FullTextBackend {
    pub fn new(extractor: impl TextExtractor + 'static) -> Self {
        Self {
            extractor: Box::new(extractor),
        }
    }
}

impl ExtractionBackend for FullTextBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    fn extract(&self, archive: &EpubArchive) -> Result<Option<Vec<TocNode>>> {
        let parsed = self.extractor.from_file(archive.path())?;
        let nodes = nodes_from_parsed(&parsed)?.filter(|nodes| !nodes.is_empty());
        if nodes.is_none() {
            tracing::debug!("no toc in extracted metadata");
        }
        Ok(nodes)
    }
}

/// Runs an Apache Tika style command line: `<bin> --json <path>`.
///
/// A JSON list on stdout (one metadata object per embedded document) is
/// reduced to its first element, which is treated as the metadata mapping.
#[derive(Debug, Clone)]
pub struct TikaCommand {
    bin: String,
}

impl TikaCommand {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

impl TextExtractor for TikaCommand {
    fn from_file(&self, path: &Path) -> Result<Value> {
        tracing::info!(bin = %self.bin, "run text extractor");
        let stdout = run_capture(&self.bin, [OsStr::new("--json"), path.as_os_str()])?;
        let value: Value = serde_json::from_str(&stdout)
            .map_err(|err| TocError::Conversion(format!("parse {} output: {err}", self.bin)))?;

        Ok(match value {
            Value::Array(mut documents) if !documents.is_empty() => {
                serde_json::json!({ "metadata": documents.swap_remove(0) })
            }
            other => other,
        })
    }
}

pub fn nodes_from_parsed(parsed: &Value) -> Result<Option<Vec<TocNode>>> {
    let Some(toc) = parsed.get("metadata").and_then(|m| m.get("toc")) else {
        return Ok(None);
    };
    let items = toc
        .as_array()
        .ok_or_else(|| TocError::Conversion("metadata toc is not a list".to_owned()))?;
    convert_items(items, 0, "toc").map(Some)
}

fn convert_items(items: &[Value], level: usize, path: &str) -> Result<Vec<TocNode>> {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| convert_item(item, level, &format!("{path}[{idx}]")))
        .collect()
}

fn convert_item(item: &Value, level: usize, path: &str) -> Result<TocNode> {
    let map = item
        .as_object()
        .ok_or_else(|| TocError::Conversion(format!("{path} is not a mapping")))?;

    let text = |key: &str| map.get(key).and_then(Value::as_str).unwrap_or_default();
    let children = match map.get("children") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(children)) => {
            convert_items(children, level + 1, &format!("{path}.children"))?
        }
        Some(_) => {
            return Err(TocError::Conversion(format!(
                "{path}.children is not a list"
            )));
        }
    };

    Ok(TocNode::new(text("title"), text("href"), level).with_children(children))
}
