use serde::{Deserialize, Serialize};

use crate::error::{Result, TocError};

const REQUIRED_FIELDS: [&str; 3] = ["title", "href", "level"];

/// One entry of a table of contents.
///
/// `level` is the nesting depth (0 = top level). Children are kept in
/// document order and must each sit strictly deeper than their parent; see
/// [`crate::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocNode {
    pub title: String,
    pub href: String,
    pub level: usize,
    #[serde(default)]
    pub children: Vec<TocNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TocNode {
    pub fn new(title: impl Into<String>, href: impl Into<String>, level: usize) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
            level,
            children: Vec::new(),
            description: None,
        }
    }

    pub fn with_children(mut self, children: Vec<TocNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Converts the node (and its subtree) into a nested JSON mapping.
    pub fn to_mapping(&self) -> serde_json::Value {
        // String keys and plain fields only; serialization cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Rebuilds a node from the mapping produced by [`TocNode::to_mapping`].
    pub fn from_mapping(value: &serde_json::Value) -> Result<Self> {
        check_required_fields(value, "root")?;
        let node = TocNode::deserialize(value)
            .map_err(|err| TocError::validation(format!("Invalid TOC item: {err}")))?;
        check_titles(&node, "root")?;
        Ok(node)
    }
}

fn check_required_fields(value: &serde_json::Value, path: &str) -> Result<()> {
    let Some(map) = value.as_object() else {
        return Err(TocError::validation(format!(
            "{path}: TOC item must be a mapping"
        )));
    };

    let missing = REQUIRED_FIELDS
        .iter()
        .filter(|field| !map.contains_key(**field))
        .copied()
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(TocError::validation(format!(
            "{path}: Missing required fields: {}",
            missing.join(", ")
        )));
    }

    if let Some(children) = map.get("children").and_then(|c| c.as_array()) {
        for (idx, child) in children.iter().enumerate() {
            check_required_fields(child, &format!("{path}->child[{idx}]"))?;
        }
    }
    Ok(())
}

fn check_titles(node: &TocNode, path: &str) -> Result<()> {
    if node.title.is_empty() {
        return Err(TocError::validation(format!(
            "{path}: Title must be a non-empty string"
        )));
    }
    for (idx, child) in node.children.iter().enumerate() {
        check_titles(child, &format!("{path}->child[{idx}]"))?;
    }
    Ok(())
}
