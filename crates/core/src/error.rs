use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PollError>;

/// Failure raised by a [`crate::Session`] operation.
///
/// Adapters must fail observably: the executor tells success from failure only
/// through these values. Resolution failures are pure lookups with no side
/// effect, so retrying them is always safe.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("element not found: {locator}")]
    NotFound { locator: String },

    /// The session was closed out from under us. Every subsequent operation
    /// fails with this; the executor treats it like any other resolution
    /// failure and keeps retrying until the deadline runs out.
    #[error("session is closed")]
    Closed,

    #[error("action failed on {locator}: {message}")]
    Action { locator: String, message: String },

    /// Transport or backend failure from the automation library underneath
    /// a [`crate::Session`] implementation.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Error surfaced by the polling executor and the interaction helpers.
#[derive(Debug, Error)]
pub enum PollError {
    /// The deadline elapsed before any attempt succeeded. Carries the last
    /// underlying failure as its source.
    #[error("timeout after {}ms ({attempts} attempts) waiting for: {what}", elapsed.as_millis())]
    Timeout {
        /// Description of what was being waited on, usually the locator query.
        what: String,
        /// Wall-clock time spent polling, measured from the first attempt.
        elapsed: Duration,
        /// Number of attempts made, including the final failing one.
        attempts: u64,
        #[source]
        last: SessionError,
    },

    /// A session operation outside the retry loop failed.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl PollError {
    /// True when this error is a deadline exhaustion rather than a hard
    /// session failure.
    pub fn is_timeout(&self) -> bool {
        matches!(self, PollError::Timeout { .. })
    }
}
