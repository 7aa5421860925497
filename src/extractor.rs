use std::path::Path;

use crate::archive::EpubArchive;
use crate::backend::{ExtractionBackend, select_backends};
use crate::config::ExtractorConfig;
use crate::error::{BackendFailure, Result, TocError};
use crate::node::TocNode;
use crate::serialize::{OutputFormat, render_outline, write_toc};
use crate::validate::{ValidationMode, validate_with};

const NOT_FOUND: &str = "no table of contents found";
const NOT_EXTRACTED: &str = "TOC not extracted";

pub struct TocExtractor {
    archive: EpubArchive,
    backends: Vec<Box<dyn ExtractionBackend>>,
    validation: ValidationMode,
    toc: Option<Vec<TocNode>>,
    method: Option<&'static str>,
    attempts: Vec<BackendFailure>,
}

impl std::fmt::Debug for TocExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TocExtractor")
            .field("archive", &self.archive)
            .field("backends", &self.backend_names())
            .field("validation", &self.validation)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

impl TocExtractor {
    /// Opens `path` with every built-in backend.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_config(path, &ExtractorConfig::default())
    }

    /// Opens `path` with the named backends (`None` for all of them).
    ///
    /// The method list is checked before the archive is touched.
    pub fn new<S: AsRef<str>>(path: impl AsRef<Path>, methods: Option<&[S]>) -> Result<Self> {
        let config = ExtractorConfig {
            methods: methods.map(|m| m.iter().map(|s| s.as_ref().to_owned()).collect()),
            ..ExtractorConfig::default()
        };
        Self::from_config(path, &config)
    }

    pub fn from_config(path: impl AsRef<Path>, config: &ExtractorConfig) -> Result<Self> {
        let kinds = select_backends(config.methods.as_deref())?;
        let backends = kinds.into_iter().map(|kind| kind.backend(config)).collect();
        Ok(Self::with_backends(path, backends)?.with_validation(config.validation))
    }

    /// Uses caller-supplied backends, tried in the given order.
    pub fn with_backends(
        path: impl AsRef<Path>,
        backends: Vec<Box<dyn ExtractionBackend>>,
    ) -> Result<Self> {
        let archive = EpubArchive::open(path)?;
        Ok(Self {
            archive,
            backends,
            validation: ValidationMode::Standard,
            toc: None,
            method: None,
            attempts: Vec::new(),
        })
    }

    pub fn with_validation(mut self, mode: ValidationMode) -> Self {
        self.validation = mode;
        self
    }

    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Returns the TOC, running the backends on the first call only.
    pub fn extract(&mut self) -> Result<&[TocNode]> {
        let toc = match self.toc.take() {
            Some(toc) => toc,
            None => self.run_backends()?,
        };
        let toc: &[TocNode] = self.toc.insert(toc);
        Ok(toc)
    }

    /// Drops the cached TOC so the next [`TocExtractor::extract`] starts over.
    pub fn reset(&mut self) {
        self.toc = None;
        self.method = None;
        self.attempts.clear();
    }

    pub fn toc(&self) -> Option<&[TocNode]> {
        self.toc.as_deref()
    }

    /// Name of the backend whose result was accepted.
    pub fn method(&self) -> Option<&'static str> {
        self.method
    }

    /// Backends that were tried and rejected during the last extraction.
    pub fn attempts(&self) -> &[BackendFailure] {
        &self.attempts
    }

    pub fn save(&self, path: impl AsRef<Path>, format: OutputFormat) -> Result<()> {
        write_toc(path.as_ref(), self.extracted()?, format)
    }

    pub fn outline(&self) -> Result<String> {
        Ok(render_outline(self.extracted()?))
    }

    fn extracted(&self) -> Result<&[TocNode]> {
        self.toc
            .as_deref()
            .ok_or_else(|| TocError::validation(NOT_EXTRACTED))
    }

    fn run_backends(&mut self) -> Result<Vec<TocNode>> {
        self.attempts.clear();
        self.method = None;

        for backend in &self.backends {
            let name = backend.name();
            tracing::info!(backend = name, "trying extraction backend");

            let reason = match backend.extract(&self.archive) {
                Ok(Some(nodes)) => match validate_with(&nodes, self.validation) {
                    Ok(()) => {
                        tracing::info!(backend = name, entries = nodes.len(), "extracted toc");
                        self.method = Some(name);
                        return Ok(nodes);
                    }
                    Err(err) => format!("invalid TOC: {err}"),
                },
                Ok(None) => NOT_FOUND.to_owned(),
                Err(err) => err.to_string(),
            };

            tracing::warn!(backend = name, %reason, "extraction backend failed");
            self.attempts.push(BackendFailure {
                backend: name,
                reason,
            });
        }

        Err(TocError::Extraction {
            attempts: self.attempts.clone(),
        })
    }
}
