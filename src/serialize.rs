use std::io::Write as _;
use std::path::Path;

use crate::error::{Result, TocError};
use crate::node::TocNode;
use crate::validate::validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    /// Picks the format from a file extension (`.json`, `.yaml`, `.yml`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// JSON is pretty-printed with two-space indentation and non-ASCII text kept
/// as-is.
pub fn render(nodes: &[TocNode], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(nodes)
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(|err| TocError::Output(format!("serialize toc json: {err}"))),
        OutputFormat::Yaml => serde_yaml::to_string(nodes)
            .map_err(|err| TocError::Output(format!("serialize toc yaml: {err}"))),
    }
}

/// Writes through a temp file in the destination directory, then renames it
/// into place.
pub fn write_toc(path: &Path, nodes: &[TocNode], format: OutputFormat) -> Result<()> {
    let rendered = render(nodes, format)?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)
        .map_err(|err| output_error("create output dir", parent, err))?;

    let mut file = tempfile::NamedTempFile::new_in(parent)
        .map_err(|err| output_error("create temp file", parent, err))?;
    file.write_all(rendered.as_bytes())
        .map_err(|err| output_error("write toc", path, err))?;
    file.persist(path)
        .map_err(|err| output_error("persist toc", path, err.error))?;

    tracing::info!(path = %path.display(), ?format, "saved toc");
    Ok(())
}

/// Reads a TOC written by [`write_toc`] and validates it.
///
/// The format follows the file extension; anything other than `.yaml`/`.yml`
/// is read as JSON.
pub fn load_toc(path: &Path) -> Result<Vec<TocNode>> {
    let text = std::fs::read_to_string(path)?;
    let value: serde_json::Value = match OutputFormat::from_path(path).unwrap_or_default() {
        OutputFormat::Json => serde_json::from_str(&text)
            .map_err(|err| TocError::Parsing(format!("{}: {err}", path.display())))?,
        OutputFormat::Yaml => serde_yaml::from_str(&text)
            .map_err(|err| TocError::Parsing(format!("{}: {err}", path.display())))?,
    };

    let items = value
        .as_array()
        .ok_or_else(|| TocError::validation("TOC file must contain a list of items"))?;
    let nodes = items
        .iter()
        .map(TocNode::from_mapping)
        .collect::<Result<Vec<_>>>()?;
    validate(&nodes)?;
    Ok(nodes)
}

/// One `- title` line per node, indented two spaces per depth.
pub fn render_outline(nodes: &[TocNode]) -> String {
    let mut out = String::new();
    push_outline(&mut out, nodes, 0);
    out
}

fn push_outline(out: &mut String, nodes: &[TocNode], depth: usize) {
    for node in nodes {
        out.push_str(&"  ".repeat(depth));
        out.push_str("- ");
        out.push_str(&node.title);
        out.push('\n');
        push_outline(out, &node.children, depth + 1);
    }
}

fn output_error(action: &str, path: &Path, err: std::io::Error) -> TocError {
    TocError::Output(format!("{action}: {}: {err}", path.display()))
}
