//! Find the residential rate PDF linked from a provider's landing page and
//! download it to the provider's default document path.
//!
//! Candidate links are scored on their text and href; the best score wins,
//! ties prefer `https://` links and then lexical order.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use ratekeeper_core::{ProviderDescriptor, Transport};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};
use url::Url;

use crate::{DocumentFetcher, FetchError};

static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static ANY_HREF: LazyLock<Selector> = LazyLock::new(|| selector("[href]"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e}"))
}

#[derive(Debug)]
struct Candidate {
    href: String,
    score: u32,
}

fn score(href: &str, text: &str) -> u32 {
    let href = href.to_lowercase();
    let text = text.to_lowercase();
    let mut score = 0;
    if text.contains("residential") {
        score += 5;
    }
    if text.contains("rate") || text.contains("schedule") {
        score += 3;
    }
    if href.contains("residential") {
        score += 3;
    }
    if href.contains("rates") || href.contains("rs") {
        score += 2;
    }
    if text.contains("current") || href.contains("2025") {
        score += 1;
    }
    score
}

/// The element's `href` when it points at a PDF.
fn pdf_href<'a>(element: &ElementRef<'a>) -> Option<&'a str> {
    let href = element.value().attr("href")?.trim();
    href.to_ascii_lowercase().ends_with(".pdf").then_some(href)
}

fn is_https(href: &str) -> bool {
    href.to_ascii_lowercase().starts_with("https://")
}

/// Pick the best PDF link in `html` and resolve it against `base_url`.
pub fn discover_pdf_url_from_html(base_url: &str, html: &str) -> Result<Url, FetchError> {
    let base = Url::parse(base_url)?;
    let document = Html::parse_document(html);

    let mut candidates: Vec<Candidate> = document
        .select(&ANCHOR)
        .filter_map(|a| {
            let href = pdf_href(&a)?;
            let text = a.text().collect::<String>();
            Some(Candidate {
                href: href.to_string(),
                score: score(href, text.trim()),
            })
        })
        .collect();

    if candidates.is_empty() {
        candidates = document
            .select(&ANY_HREF)
            .filter_map(|el| {
                let href = pdf_href(&el)?;
                Some(Candidate {
                    href: href.to_string(),
                    score: score(href, ""),
                })
            })
            .collect();
    }

    candidates.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| is_https(&b.href).cmp(&is_https(&a.href)))
            .then_with(|| a.href.cmp(&b.href))
    });
    debug!(base = %base, candidates = candidates.len(), "scored pdf links");

    let best = candidates.first().ok_or_else(|| FetchError::NoPdfLinks {
        url: base_url.to_string(),
    })?;
    Ok(base.join(&best.href)?)
}

/// Fetch the provider's landing page and pick its best PDF link.
pub async fn discover_pdf_url(
    fetcher: &dyn DocumentFetcher,
    provider: &ProviderDescriptor,
) -> Result<Url, FetchError> {
    if provider.landing_url.is_empty() {
        return Err(FetchError::NoLandingUrl(provider.key.clone()));
    }
    let html = fetcher
        .fetch_html(&provider.landing_url, Transport::Standard)
        .await?;
    let url = discover_pdf_url_from_html(&provider.landing_url, &html)?;
    info!(provider = %provider.key, url = %url, "discovered rate pdf");
    Ok(url)
}

/// Discover the provider's PDF, download it, and replace the file at
/// `provider.default_pdf_path`. Returns the URL it came from and the path
/// written.
pub async fn download_pdf(
    fetcher: &dyn DocumentFetcher,
    provider: &ProviderDescriptor,
) -> Result<(Url, PathBuf), FetchError> {
    if provider.default_pdf_path.is_empty() {
        return Err(FetchError::NoDefaultPath(provider.key.clone()));
    }
    let url = discover_pdf_url(fetcher, provider).await?;
    let body = fetcher.fetch(url.as_str(), Transport::Standard).await?;

    let path = PathBuf::from(&provider.default_pdf_path);
    let target = path.clone();
    tokio::task::spawn_blocking(move || write_atomically(&target, &body))
        .await
        .map_err(|e| FetchError::Write {
            path: path.clone(),
            source: std::io::Error::other(e),
        })??;
    info!(provider = %provider.key, path = %path.display(), "downloaded rate pdf");
    Ok((url, path))
}

/// Write `bytes` to a temporary file next to `path`, then rename it into
/// place. Readers see either the old file or the complete new one.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), FetchError> {
    use std::io::Write;

    let wrap = |source| FetchError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(wrap)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".tmp-")
        .tempfile_in(dir)
        .map_err(wrap)?;
    tmp.write_all(bytes).map_err(wrap)?;
    tmp.as_file().sync_all().map_err(wrap)?;
    tmp.persist(path).map_err(|e| wrap(e.error))?;
    Ok(())
}
