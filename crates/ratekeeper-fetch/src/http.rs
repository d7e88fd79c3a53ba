//! HTTP client for provider landing pages and rate documents.

use std::time::Duration;

use async_trait::async_trait;
use ratekeeper_core::Transport;
use tracing::{info, warn};

use crate::FetchError;

/// Upper bound on a single request, connect through body.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of remote documents. The services and discovery only talk to this
/// trait, so tests swap in fakes.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// GET `url` and return the body. Non-2xx responses are errors.
    async fn fetch(&self, url: &str, transport: Transport) -> Result<Vec<u8>, FetchError>;

    /// GET `url` as text, replacing invalid UTF-8.
    async fn fetch_html(&self, url: &str, transport: Transport) -> Result<String, FetchError> {
        let body = self.fetch(url, transport).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// `reqwest`-backed fetcher holding one client per [`Transport`].
pub struct HttpFetcher {
    standard: reqwest::Client,
    relaxed: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            standard: builder().build()?,
            relaxed: builder().danger_accept_invalid_certs(true).build()?,
        })
    }

    fn client(&self, transport: Transport) -> &reqwest::Client {
        match transport {
            Transport::Standard => &self.standard,
            Transport::Relaxed => &self.relaxed,
        }
    }
}

fn builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .user_agent(concat!("ratekeeper/", env!("CARGO_PKG_VERSION")))
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, transport: Transport) -> Result<Vec<u8>, FetchError> {
        if transport == Transport::Relaxed {
            warn!(url = %url, "fetching without certificate verification");
        }
        info!(url = %url, "fetching document");
        let resp = self.client(transport).get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp.bytes().await?;
        info!(url = %url, bytes = body.len(), "fetched document");
        Ok(body.to_vec())
    }
}
