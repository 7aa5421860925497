use crate::validate::ValidationMode;

pub const EXTERNAL_BIN_ENV: &str = "EPUB_TOC_EXTERNAL_BIN";
pub const TIKA_BIN_ENV: &str = "EPUB_TOC_TIKA_BIN";
pub const STRICT_ENV: &str = "EPUB_TOC_STRICT";

/// Settings for a [`crate::TocExtractor`] built from the default backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Backend names to try; `None` tries all of them.
    pub methods: Option<Vec<String>>,
    /// Command used by the `external` backend.
    pub external_bin: String,
    /// Command used by the `fulltext` backend.
    pub tika_bin: String,
    pub validation: ValidationMode,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            methods: None,
            external_bin: "ebook-meta".to_owned(),
            tika_bin: "tika".to_owned(),
            validation: ValidationMode::Standard,
        }
    }
}

impl ExtractorConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let external_bin = std::env::var(EXTERNAL_BIN_ENV).unwrap_or(defaults.external_bin);
        let tika_bin = std::env::var(TIKA_BIN_ENV).unwrap_or(defaults.tika_bin);
        let validation = match std::env::var(STRICT_ENV) {
            Ok(value) if parse_flag(&value) => ValidationMode::Strict,
            _ => ValidationMode::Standard,
        };
        Self {
            methods: None,
            external_bin,
            tika_bin,
            validation,
        }
    }

    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = Some(methods.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_validation(mut self, mode: ValidationMode) -> Self {
        self.validation = mode;
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tries_every_backend_with_standard_validation() {
        let config = ExtractorConfig::default();
        assert!(config.methods.is_none());
        assert_eq!(config.external_bin, "ebook-meta");
        assert_eq!(config.tika_bin, "tika");
        assert_eq!(config.validation, ValidationMode::Standard);
    }

    #[test]
    fn strict_flag_accepts_common_spellings() {
        for value in ["1", "true", "TRUE", " yes ", "on"] {
            assert!(parse_flag(value), "{value}");
        }
        for value in ["", "0", "false", "strict"] {
            assert!(!parse_flag(value), "{value}");
        }
    }

    #[test]
    fn builders_override_fields() {
        let config = ExtractorConfig::default()
            .with_methods(["ncx", "opf"])
            .with_validation(ValidationMode::Strict);
        assert_eq!(
            config.methods.as_deref(),
            Some(&["ncx".to_owned(), "opf".to_owned()][..])
        );
        assert_eq!(config.validation, ValidationMode::Strict);
    }
}
