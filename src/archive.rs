use std::fs::File;
use std::io::{BufReader, Read as _};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::error::{Result, TocError};

pub const CONTAINER_PATH: &str = "META-INF/container.xml";
pub const CONTAINER_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:container";

/// A local EPUB that passed the minimal structural checks.
///
/// Only the path and the container's rootfile declarations are kept. Every
/// member read reopens the ZIP and drops it before returning.
#[derive(Debug, Clone)]
pub struct EpubArchive {
    path: PathBuf,
    package_paths: Vec<String>,
}

impl EpubArchive {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(TocError::validation("File not found"));
        }
        if path.is_dir() {
            return Err(TocError::validation("Path points to a directory"));
        }
        let is_epub = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("epub"));
        if !is_epub {
            return Err(TocError::validation("Not an EPUB file"));
        }

        let mut zip = open_zip(&path)
            .map_err(|_| TocError::structure("File is not a valid ZIP archive"))?;

        if zip.by_name(CONTAINER_PATH).is_err() {
            return Err(TocError::structure(format!(
                "Missing required files: {CONTAINER_PATH}"
            )));
        }
        let container = read_zip_member(&mut zip, CONTAINER_PATH)
            .map_err(|err| TocError::structure(format!("Invalid EPUB structure: {err}")))?;
        let package_paths = parse_rootfiles(&container)?;
        if package_paths.is_empty() {
            return Err(TocError::structure("No rootfiles found in container.xml"));
        }

        tracing::debug!(path = %path.display(), ?package_paths, "epub structure ok");
        Ok(Self {
            path,
            package_paths,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Package documents declared by `META-INF/container.xml`, in order.
    pub fn package_paths(&self) -> &[String] {
        &self.package_paths
    }

    /// Member names in central-directory order.
    pub fn member_names(&self) -> Result<Vec<String>> {
        let mut zip = self.zip()?;
        let mut names = Vec::with_capacity(zip.len());
        for idx in 0..zip.len() {
            let member = zip
                .by_index(idx)
                .map_err(|err| TocError::Parsing(format!("read member #{idx}: {err}")))?;
            names.push(member.name().to_owned());
        }
        Ok(names)
    }

    pub fn first_member_with_suffix(&self, suffix: &str) -> Result<Option<String>> {
        Ok(self
            .member_names()?
            .into_iter()
            .find(|name| name.ends_with(suffix)))
    }

    pub fn read_member(&self, name: &str) -> Result<String> {
        let mut zip = self.zip()?;
        read_zip_member(&mut zip, name)
    }

    pub fn has_member(&self, name: &str) -> Result<bool> {
        let mut zip = self.zip()?;
        Ok(zip.by_name(name).is_ok())
    }

    fn zip(&self) -> Result<ZipArchive<BufReader<File>>> {
        open_zip(&self.path).map_err(|err| {
            TocError::structure(format!(
                "reopen archive {}: {err}",
                self.path.display()
            ))
        })
    }
}

fn open_zip(path: &Path) -> std::result::Result<ZipArchive<BufReader<File>>, zip::result::ZipError> {
    let file = File::open(path)?;
    ZipArchive::new(BufReader::new(file))
}

fn read_zip_member(zip: &mut ZipArchive<BufReader<File>>, name: &str) -> Result<String> {
    let mut member = zip
        .by_name(name)
        .map_err(|err| TocError::Parsing(format!("read member {name}: {err}")))?;
    let mut bytes = Vec::new();
    member.read_to_end(&mut bytes)?;
    String::from_utf8(bytes)
        .map_err(|err| TocError::Parsing(format!("member {name} is not UTF-8: {err}")))
}

/// Parses an XML member. EPUB navigation files routinely carry a DOCTYPE and
/// sometimes a byte-order mark, so both are accepted.
pub fn parse_xml(text: &str) -> std::result::Result<roxmltree::Document<'_>, roxmltree::Error> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    roxmltree::Document::parse_with_options(text.trim_start_matches('\u{feff}'), options)
}

fn parse_rootfiles(container: &str) -> Result<Vec<String>> {
    let doc = parse_xml(container)
        .map_err(|err| TocError::structure(format!("Invalid EPUB structure: {err}")))?;

    Ok(doc
        .descendants()
        .filter(|n| n.has_tag_name((CONTAINER_NS, "rootfile")))
        .filter_map(|n| n.attribute("full-path"))
        .map(str::to_owned)
        .collect())
}

/// Resolves `href` relative to the directory of the member `base`.
pub fn resolve_member_path(base: &str, href: &str) -> String {
    let href = href.split('#').next().unwrap_or(href);
    let mut parts = match base.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').map(str::to_owned).collect::<Vec<_>>(),
        None => Vec::new(),
    };
    for segment in href.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other.to_owned()),
        }
    }
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_namespaced_rootfiles() {
        let xml = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
    <rootfile full-path="alt/other.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;
        assert_eq!(
            parse_rootfiles(xml).expect("parse"),
            ["OEBPS/content.opf", "alt/other.opf"]
        );
    }

    #[test]
    fn rootfiles_outside_container_namespace_are_ignored() {
        let xml = r#"<container><rootfiles><rootfile full-path="a.opf"/></rootfiles></container>"#;
        assert!(parse_rootfiles(xml).expect("parse").is_empty());
    }

    #[test]
    fn malformed_container_is_a_structure_error() {
        let err = parse_rootfiles("<container>").expect_err("malformed");
        assert!(matches!(err, TocError::Structure(_)));
        assert!(err.to_string().starts_with("Invalid EPUB structure"));
    }

    #[test]
    fn resolves_hrefs_against_member_directory() {
        assert_eq!(resolve_member_path("OEBPS/content.opf", "nav.xhtml"), "OEBPS/nav.xhtml");
        assert_eq!(
            resolve_member_path("OEBPS/text/nav.xhtml", "../images/a.png#x"),
            "OEBPS/images/a.png"
        );
        assert_eq!(resolve_member_path("content.opf", "./nav.xhtml"), "nav.xhtml");
    }
}
