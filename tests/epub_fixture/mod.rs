#![allow(dead_code)]

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;

pub const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

pub const EMPTY_CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles/>
</container>"#;

pub const NCX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head><meta name="dtb:uid" content="urn:uuid:fixture"/></head>
  <docTitle><text>Fixture</text></docTitle>
  <navMap>
    <navPoint id="p1" playOrder="1">
      <navLabel><text>Ch1</text></navLabel>
      <content src="ch1.xhtml"/>
      <navPoint id="p2" playOrder="2">
        <navLabel><text>S1.1</text></navLabel>
        <content src="ch1.xhtml#s1"/>
      </navPoint>
    </navPoint>
    <navPoint id="p3" playOrder="3">
      <navLabel><text>Ch2</text></navLabel>
      <content src="ch2.xhtml"/>
    </navPoint>
  </navMap>
</ncx>"#;

pub const NAV_XHTML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<head><title>Contents</title></head>
<body>
  <nav epub:type="toc">
    <ol>
      <li><a href="ch1.xhtml">Opening</a>
        <ol><li><a href="ch1.xhtml#s1">First steps</a></li></ol>
      </li>
      <li><a href="ch2.xhtml">Closing</a></li>
    </ol>
  </nav>
</body>
</html>"#;

/// Package document with three spine items and optional NCX / nav entries.
pub fn package_opf(with_ncx: bool, with_nav: bool, with_spine: bool) -> String {
    let mut manifest = String::new();
    for idx in 1..=3 {
        manifest.push_str(&format!(
            r#"    <item id="c{idx}" href="ch{idx}.xhtml" media-type="application/xhtml+xml"/>
"#
        ));
    }
    if with_ncx {
        manifest.push_str(
            r#"    <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
"#,
        );
    }
    if with_nav {
        manifest.push_str(
            r#"    <item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>
"#,
        );
    }

    let spine = if with_spine {
        let toc_attr = if with_ncx { r#" toc="ncx""# } else { "" };
        format!(
            r#"  <spine{toc_attr}>
    <itemref idref="c1"/>
    <itemref idref="c2"/>
    <itemref idref="c3"/>
  </spine>
"#
        )
    } else {
        String::new()
    };

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="uid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="uid">urn:uuid:fixture</dc:identifier>
    <dc:title>Fixture</dc:title>
    <dc:language>en</dc:language>
  </metadata>
  <manifest>
{manifest}  </manifest>
{spine}</package>"#
    )
}

pub fn chapter_xhtml(title: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml"><head><title>{title}</title></head>
<body><h1>{title}</h1><p id="s1">Text.</p></body></html>"#
    )
}

/// In-memory list of archive members written out as a ZIP file.
#[derive(Debug, Clone, Default)]
pub struct EpubFixture {
    members: Vec<(String, Vec<u8>)>,
}

impl EpubFixture {
    /// Only the `mimetype` member.
    pub fn new() -> Self {
        Self::default().member("mimetype", "application/epub+zip")
    }

    pub fn member(mut self, name: &str, content: impl AsRef<[u8]>) -> Self {
        self.members
            .push((name.to_owned(), content.as_ref().to_vec()));
        self
    }

    fn with_chapters(self) -> Self {
        (1..=3).fold(self, |fixture, idx| {
            fixture.member(
                &format!("OEBPS/ch{idx}.xhtml"),
                chapter_xhtml(&format!("Chapter {idx}")),
            )
        })
    }

    /// EPUB 2 layout: package document plus `toc.ncx`, no nav document.
    pub fn ncx_book() -> Self {
        Self::new()
            .member("META-INF/container.xml", CONTAINER_XML)
            .member("OEBPS/content.opf", package_opf(true, false, true))
            .member("OEBPS/toc.ncx", NCX)
            .with_chapters()
    }

    /// EPUB 3 layout: nav document and NCX with different labels.
    pub fn nav_book() -> Self {
        Self::new()
            .member("META-INF/container.xml", CONTAINER_XML)
            .member("OEBPS/content.opf", package_opf(true, true, true))
            .member("OEBPS/nav.xhtml", NAV_XHTML)
            .member("OEBPS/toc.ncx", NCX)
            .with_chapters()
    }

    /// Package document only: no NCX, no nav document.
    pub fn spine_only_book() -> Self {
        Self::new()
            .member("META-INF/container.xml", CONTAINER_XML)
            .member("OEBPS/content.opf", package_opf(false, false, true))
            .with_chapters()
    }

    /// Valid container but nothing any file-based backend can use.
    pub fn bare_book() -> Self {
        Self::new()
            .member("META-INF/container.xml", CONTAINER_XML)
            .member("OEBPS/content.opf", package_opf(false, false, false))
    }

    pub fn write(&self, path: &Path) -> PathBuf {
        let file = fs::File::create(path).expect("create fixture epub");
        let mut zip = zip::ZipWriter::new(file);

        let stored = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored)
            .unix_permissions(0o644);
        let deflated = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .unix_permissions(0o644);

        for (name, content) in &self.members {
            let options = if name == "mimetype" { stored } else { deflated };
            zip.start_file(name.as_str(), options)
                .expect("start fixture member");
            zip.write_all(content).expect("write fixture member");
        }
        zip.finish().expect("finish fixture epub");
        path.to_path_buf()
    }

    /// Writes into `dir` under `file_name`.
    pub fn write_in(&self, dir: &Path, file_name: &str) -> PathBuf {
        self.write(&dir.join(file_name))
    }
}

/// Writes an executable shell script; used to stand in for external tools.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt as _;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    let mut perms = fs::metadata(&path).expect("script metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod script");
    path
}
