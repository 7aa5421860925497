use crate::archive::EpubArchive;
use crate::config::ExtractorConfig;
use crate::error::{Result, TocError};
use crate::node::TocNode;

mod command;
pub mod external;
pub mod fulltext;
pub mod library;
pub mod metadata;
pub mod ncx;
pub mod opf;

pub use external::ExternalToolBackend;
pub use fulltext::{FullTextBackend, TextExtractor, TikaCommand};
pub use library::{EpubDocLibrary, LibraryBackend, LibraryLink, LibraryTocEntry, TocLibrary};
pub use metadata::{EpubMetadata, MetadataBackend, MetadataReader, NavDocumentReader};
pub use ncx::NcxBackend;
pub use opf::OpfBackend;

/// `Ok(None)` means the archive lacks this source. Neither that nor `Err`
/// aborts a session; the extractor records the reason and moves on.
pub trait ExtractionBackend {
    /// Identifier used in method selection and failure reports.
    fn name(&self) -> &'static str;

    fn extract(&self, archive: &EpubArchive) -> Result<Option<Vec<TocNode>>>;
}

/// The built-in strategies, in default priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Metadata,
    Ncx,
    Opf,
    Library,
    FullText,
    External,
}

impl BackendKind {
    pub const ALL: [BackendKind; 6] = [
        BackendKind::Metadata,
        BackendKind::Ncx,
        BackendKind::Opf,
        BackendKind::Library,
        BackendKind::FullText,
        BackendKind::External,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Metadata => metadata::NAME,
            BackendKind::Ncx => ncx::NAME,
            BackendKind::Opf => opf::NAME,
            BackendKind::Library => library::NAME,
            BackendKind::FullText => fulltext::NAME,
            BackendKind::External => external::NAME,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn backend(self, config: &ExtractorConfig) -> Box<dyn ExtractionBackend> {
        match self {
            BackendKind::Metadata => Box::new(MetadataBackend::new(NavDocumentReader)),
            BackendKind::Ncx => Box::new(NcxBackend),
            BackendKind::Opf => Box::new(OpfBackend),
            BackendKind::Library => Box::new(LibraryBackend::new(EpubDocLibrary)),
            BackendKind::FullText => {
                Box::new(FullTextBackend::new(TikaCommand::new(&config.tika_bin)))
            }
            BackendKind::External => Box::new(ExternalToolBackend::new(&config.external_bin)),
        }
    }
}

/// Resolves a user-supplied method list to built-in backends.
///
/// `None` selects every backend in default order. Otherwise backends run in
/// the order listed, repeats collapse to the first mention, and unknown
/// names are ignored as long as at least one name is recognized.
pub fn select_backends<S: AsRef<str>>(methods: Option<&[S]>) -> Result<Vec<BackendKind>> {
    let Some(methods) = methods else {
        return Ok(BackendKind::ALL.to_vec());
    };
    if methods.is_empty() {
        return Err(TocError::validation("No extraction methods specified"));
    }

    let mut selected = Vec::new();
    for kind in methods.iter().filter_map(|m| BackendKind::from_name(m.as_ref())) {
        if !selected.contains(&kind) {
            selected.push(kind);
        }
    }
    if selected.is_empty() {
        let names = methods.iter().map(|m| m.as_ref()).collect::<Vec<_>>();
        return Err(TocError::validation(format!(
            "No valid extraction methods found in: {names:?}"
        )));
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in BackendKind::ALL {
            assert_eq!(BackendKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(BackendKind::from_name("bogus"), None);
    }

    #[test]
    fn none_selects_all_in_priority_order() {
        let selected = select_backends::<&str>(None).expect("select");
        assert_eq!(selected, BackendKind::ALL);
    }

    #[test]
    fn subset_runs_in_listed_order() {
        let selected = select_backends(Some(&["opf", "ncx"][..])).expect("select");
        assert_eq!(selected, [BackendKind::Opf, BackendKind::Ncx]);
    }

    #[test]
    fn repeated_names_keep_first_position() {
        let selected =
            select_backends(Some(&["external", "ncx", "external"][..])).expect("select");
        assert_eq!(selected, [BackendKind::External, BackendKind::Ncx]);
    }

    #[test]
    fn unknown_names_are_dropped_when_others_match() {
        let selected = select_backends(Some(&["bogus", "external"][..])).expect("select");
        assert_eq!(selected, [BackendKind::External]);
    }

    #[test]
    fn empty_or_unrecognized_selection_is_rejected() {
        let err = select_backends::<&str>(Some(&[][..])).expect_err("empty");
        assert!(matches!(err, TocError::Validation(_)));
        assert_eq!(err.to_string(), "No extraction methods specified");

        let err = select_backends(Some(&["bogus"][..])).expect_err("bogus");
        assert!(matches!(err, TocError::Validation(_)));
        assert!(err.to_string().contains("bogus"));
    }
}
