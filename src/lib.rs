#![forbid(unsafe_code)]

pub mod archive;
pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod extractor;
pub mod hierarchy;
pub mod logging;
pub mod node;
pub mod serialize;
pub mod stats;
pub mod validate;

pub use archive::EpubArchive;
pub use backend::{BackendKind, ExtractionBackend};
pub use config::ExtractorConfig;
pub use error::{BackendFailure, Result, TocError};
pub use extractor::TocExtractor;
pub use hierarchy::FlatTocEntry;
pub use node::TocNode;
pub use serialize::{OutputFormat, load_toc, render_outline};
pub use stats::{SearchHit, TocStats, search};
pub use validate::{ValidationMode, validate, validate_with};
