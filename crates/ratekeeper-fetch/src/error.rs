use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status { status: u16, url: String },

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("no PDF links found on {url}")]
    NoPdfLinks { url: String },

    #[error("provider {0} has no landing URL")]
    NoLandingUrl(String),

    #[error("provider {0} has no default PDF path configured")]
    NoDefaultPath(String),

    #[error("write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
