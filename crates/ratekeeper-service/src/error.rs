use std::path::PathBuf;

use ratekeeper_core::ExtractError;
use ratekeeper_fetch::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RatesError {
    #[error("unknown provider: {0} (no parser registered)")]
    UnknownProvider(String),

    #[error("no PDF path configured for {0}")]
    NoDocumentPath(String),

    #[error("no source URL configured for {0}")]
    NoSourceUrl(String),

    #[error("{provider} PDF not found at {}", path.display())]
    DocumentNotFound { provider: String, path: PathBuf },

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("extractor for {0} returned no rates")]
    EmptyResult(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("extractor for {0} panicked")]
    ExtractorPanicked(String),
}

/// Coarse error taxonomy for callers that map failures onto responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Unknown provider or missing path/URL configuration.
    Configuration,
    /// The authoritative document could not be reached.
    SourceUnavailable,
    /// The document was reached but could not be turned into rates.
    Extraction,
}

impl RatesError {
    /// The provider's document does not exist on disk.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DocumentNotFound { .. })
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::UnknownProvider(_) | Self::NoDocumentPath(_) | Self::NoSourceUrl(_) => {
                ErrorClass::Configuration
            }
            Self::Fetch(FetchError::Url(_) | FetchError::NoLandingUrl(_) | FetchError::NoDefaultPath(_)) => {
                ErrorClass::Configuration
            }
            Self::DocumentNotFound { .. } | Self::Fetch(_) => ErrorClass::SourceUnavailable,
            Self::Extract(_) | Self::EmptyResult(_) | Self::ExtractorPanicked(_) => {
                ErrorClass::Extraction
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes() {
        assert_eq!(
            RatesError::UnknownProvider("x".into()).class(),
            ErrorClass::Configuration
        );
        assert_eq!(
            RatesError::Fetch(FetchError::Status {
                status: 502,
                url: "https://x".into()
            })
            .class(),
            ErrorClass::SourceUnavailable
        );
        assert_eq!(
            RatesError::Extract(ExtractError::MissingField {
                provider: "whud",
                field: "water use rate"
            })
            .class(),
            ErrorClass::Extraction
        );
    }

    #[test]
    fn not_found_is_distinguishable() {
        let err = RatesError::DocumentNotFound {
            provider: "cemc".into(),
            path: PathBuf::from("/data/cemc_rates.pdf"),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "cemc PDF not found at /data/cemc_rates.pdf");
        assert!(!RatesError::NoDocumentPath("cemc".into()).is_not_found());
    }
}
