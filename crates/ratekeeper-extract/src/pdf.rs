//! PDF text layer.

use std::path::Path;
use std::sync::Arc;

use ratekeeper_core::{ExtractError, ParserConfig, RatesResponse};
use tracing::debug;

/// Read a PDF from disk and decode its text layer.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path).map_err(|source| ExtractError::PdfOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| ExtractError::PdfText {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    debug!(path = %path.display(), chars = text.len(), "decoded pdf text");
    Ok(text)
}

/// Register a text heuristic as both the from-text extractor and, behind
/// [`extract_text`], the PDF-path extractor.
pub fn parser_config<F>(key: &str, name: &str, parse_text: F) -> ParserConfig
where
    F: Fn(&str) -> Result<RatesResponse, ExtractError> + Send + Sync + 'static,
{
    let parse_text = Arc::new(parse_text);
    let from_pdf = Arc::clone(&parse_text);
    ParserConfig::new(key, name)
        .with_pdf(move |path: &Path| {
            let text = extract_text(path)?;
            from_pdf(text.as_str())
        })
        .with_text(move |text: &str| parse_text(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratekeeper_core::ResidentialStandard;

    fn echo(text: &str) -> Result<RatesResponse, ExtractError> {
        Ok(RatesResponse::residential(
            "T",
            "test",
            "",
            ResidentialStandard::from_dollars(0.0, 0.0, 0.0, text),
        ))
    }

    #[test]
    fn missing_file_is_open_error() {
        let err = extract_text(Path::new("/nonexistent/rates.pdf")).unwrap_err();
        assert!(matches!(err, ExtractError::PdfOpen { .. }));
    }

    #[test]
    fn garbage_bytes_are_text_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();
        let err = extract_text(&path).unwrap_err();
        assert!(matches!(err, ExtractError::PdfText { .. }));
    }

    #[test]
    fn parser_config_wires_text_extractor() {
        let cfg = parser_config("t", "Test", echo);
        let parse_text = cfg.parse_text.as_ref().unwrap();
        let resp = parse_text("Customer Charge: $1").unwrap();
        assert_eq!(
            resp.rates.residential_standard.raw_section.as_deref(),
            Some("Customer Charge: $1")
        );
    }

    #[test]
    fn parser_config_pdf_path_surfaces_open_error() {
        let cfg = parser_config("t", "Test", echo);
        let parse_pdf = cfg.parse_pdf.as_ref().unwrap();
        assert!(matches!(
            parse_pdf(Path::new("/nonexistent/t.pdf")),
            Err(ExtractError::PdfOpen { .. })
        ));
    }
}
