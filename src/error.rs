//! error.rs — typed failure taxonomy for one acquisition attempt.
//!
//! Two observable kinds: the call itself failed (transport / non-success
//! status) or the response text did not yield a well-formed report. The
//! binary collapses both into one generic failure notice; tests and
//! callers can still tell them apart.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AcquireError {
    /// The HTTP call failed before a response body was available
    /// (connect, TLS, DNS, broken transfer).
    #[error("generation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status (auth, quota, 5xx).
    #[error("generation API returned HTTP {status}")]
    Api { status: u16 },

    /// The response text could not be parsed into a report, either because
    /// no JSON payload was found or because the payload was malformed.
    #[error("failed to parse response format")]
    Parse(#[source] serde_json::Error),
}

impl AcquireError {
    pub fn is_parse(&self) -> bool {
        matches!(self, AcquireError::Parse(_))
    }
}
