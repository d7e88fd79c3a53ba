use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by a provider's extraction heuristics.
///
/// Unmatched optional patterns are not errors; these variants cover a
/// document that cannot be decoded at all, or a field every downstream
/// computation depends on.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("open pdf {path}: {source}")]
    PdfOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("extract pdf text from {path}: {reason}")]
    PdfText { path: PathBuf, reason: String },

    #[error("{provider}: failed to parse {field}")]
    MissingField {
        provider: &'static str,
        field: &'static str,
    },
}

/// Bootstrap-time registry violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("register called with empty provider key")]
    EmptyKey,

    #[error("register({0:?}) called without a primary extractor")]
    MissingExtractor(String),

    #[error("register called twice for provider key {0:?}")]
    Duplicate(String),
}
