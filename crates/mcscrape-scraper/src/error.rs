use std::time::Duration;

use thiserror::Error;

/// Failures of the browser capability itself.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("navigation to {url} timed out after {timeout:?}")]
    NavigationTimeout { url: String, timeout: Duration },

    #[error("selector {selector} did not appear within {timeout:?}")]
    SelectorTimeout { selector: String, timeout: Duration },

    #[error("no element matches {selector}")]
    ElementNotFound { selector: String },

    #[error("page query {query} failed: {reason}")]
    Evaluate { query: String, reason: String },

    #[error("page query {query} returned an unexpected shape: {source}")]
    Decode {
        query: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("browser protocol error: {0}")]
    Protocol(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<chromiumoxide::error::CdpError> for PageError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        PageError::Protocol(err.to_string())
    }
}

/// Why one extraction stage came back empty.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("section {selector} not present on page")]
    SectionMissing { selector: &'static str },

    #[error(transparent)]
    Page(#[from] PageError),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Page(#[from] PageError),

    #[error("search returned no organic result for {target}")]
    NoResult { target: String },

    #[error("search failed for {target} after {attempts} attempts: {last}")]
    Exhausted {
        target: String,
        attempts: u32,
        #[source]
        last: Box<ResolveError>,
    },
}

/// Outbound HTTP delivery failure. Logged by the sink, never propagated.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("delivery endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write report {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
