//! Outbound I/O: landing pages, rate documents, and PDF discovery.

pub mod discovery;
mod error;
mod http;

pub use discovery::{discover_pdf_url, discover_pdf_url_from_html, download_pdf, write_atomically};
pub use error::FetchError;
pub use http::{DocumentFetcher, FETCH_TIMEOUT, HttpFetcher};
