//! Template loading.
//!
//! The console keeps the blank form templates as static assets that may live at more than one
//! place (a bundled copy, a path configured by the station, a web server). Sources are tried in
//! order and the first one that yields a PDF wins; only total failure is an error.

use crate::FormError;
use log::{debug, warn};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Where a template's bytes come from.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateSource {
    File(PathBuf),
    Bytes(Vec<u8>),
    /// HTTP(S) location; requires the `fetch` feature.
    Url(String),
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TemplateSource::File(path) => write!(f, "file {}", path.display()),
            TemplateSource::Bytes(bytes) => write!(f, "{} in-memory bytes", bytes.len()),
            TemplateSource::Url(url) => write!(f, "url {}", url),
        }
    }
}

/// Whether `bytes` carry a PDF header. Readers tolerate leading junk, so the first kilobyte is
/// searched rather than only the start.
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    head.windows(5).any(|window| window == b"%PDF-")
}

/// Loads one template source.
pub fn load_template(source: &TemplateSource) -> Result<Vec<u8>, FormError> {
    let bytes = match source {
        TemplateSource::File(path) => fs::read(path).map_err(|e| FormError::TemplateError {
            message: format!("cannot read template: {}", e),
            source_name: Some(path.display().to_string()),
            suggestion: "Check the template path and its read permissions".to_string(),
        })?,
        TemplateSource::Bytes(bytes) => bytes.clone(),
        TemplateSource::Url(url) => fetch_template(url)?,
    };

    if !looks_like_pdf(&bytes) {
        return Err(FormError::TemplateError {
            message: "template does not look like a PDF".to_string(),
            source_name: Some(source.to_string()),
            suggestion: "Point to the blank form PDF, not a rendered copy or an HTML error page"
                .to_string(),
        });
    }
    debug!("loaded template from {} ({} bytes)", source, bytes.len());
    Ok(bytes)
}

fn fetch_template(url: &str) -> Result<Vec<u8>, FormError> {
    #[cfg(feature = "fetch")]
    {
        let client = reqwest::blocking::Client::new();
        let response = client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| FormError::TemplateError {
                message: format!("download failed: {}", e),
                source_name: Some(url.to_string()),
                suggestion: "Check the URL and network connectivity".to_string(),
            })?;

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| FormError::template_error(format!("failed to read response: {}", e)))
    }

    #[cfg(not(feature = "fetch"))]
    {
        Err(FormError::TemplateError {
            message: "loading templates over HTTP requires the 'fetch' feature".to_string(),
            source_name: Some(url.to_string()),
            suggestion: "Rebuild with --features fetch or download the template first".to_string(),
        })
    }
}

/// Tries each source in order and returns the first template that loads.
pub fn load_first_available(sources: &[TemplateSource]) -> Result<Vec<u8>, FormError> {
    let mut failures = Vec::new();
    for source in sources {
        match load_template(source) {
            Ok(bytes) => return Ok(bytes),
            Err(e) => {
                warn!("template source {} unusable: {}", source, e);
                failures.push(source.to_string());
            }
        }
    }
    Err(FormError::TemplateError {
        message: if failures.is_empty() {
            "no template source given".to_string()
        } else {
            format!("no template could be loaded (tried {})", failures.join(", "))
        },
        source_name: None,
        suggestion: "Pass --template with the path of the blank form PDF".to_string(),
    })
}
