use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure fetching a single listing page.
///
/// The pagination loop treats these as a stopping condition, not as a fatal error.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("invalid request header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },
}

/// Fatal errors that abort a report run.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid configuration for '{field}': {reason}")]
    Config { field: &'static str, reason: String },
    #[error("no alerts were extracted from the source ({pages_attempted} page(s) attempted)")]
    EmptyResult { pages_attempted: u32 },
    #[error("template file not found: {}", path.display())]
    TemplateNotFound { path: PathBuf },
    #[error("spreadsheet error on {}: {reason}", path.display())]
    Spreadsheet { path: PathBuf, reason: String },
    #[error("could not build the HTTP client: {0}")]
    Client(#[from] FetchError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("configuration file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReportError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        ReportError::Config {
            field,
            reason: reason.into(),
        }
    }
}

/// Non-fatal problems while embedding the logo image
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageWarning {
    #[error("image not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("could not decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("cannot resize a {width}x{height} image to width {target}")]
    InvalidSize { width: u32, height: u32, target: u32 },
    #[error("could not encode resized image: {0}")]
    Encode(String),
    #[error("invalid cell range '{0}'")]
    InvalidRange(String),
}
