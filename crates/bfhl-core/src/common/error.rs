//! Error types for the bfhl dispatch service.
//!
//! This module defines the central `Error` enum, which captures every
//! rejection and failure the dispatcher can report. Each variant knows the HTTP
//! status it maps to and the message a client is allowed to see, so the server
//! never leaks internal detail in a response body.
//!
//! ## Error Cases
//! - `KeyCount`, `UnknownKey`, `MalformedBody`: the request envelope is wrong.
//! - `InvalidFibonacci`, `PrimeExpectsArray`, `LcmExpectsIntegers`,
//!   `HcfExpectsIntegers`, `AiExpectsString`: the operation value has the
//!   wrong shape.
//! - `Overflow`: an arithmetic reduction left the 64-bit range.
//! - `Generation`: the text generator failed or timed out.
//! - `Task`: a blocking computation did not complete.

use axum::http::StatusCode;

pub type Result<T> = core::result::Result<T, Error>;

/// Message returned for every 5xx response.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Unified error type for the dispatch service.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The body did not contain exactly one key.
    #[error("Exactly one key is required")]
    KeyCount,

    /// The single key does not name a known operation.
    #[error("Invalid key")]
    UnknownKey,

    /// The body could not be parsed as JSON.
    #[error("Invalid JSON body")]
    MalformedBody,

    #[error("Invalid fibonacci input")]
    InvalidFibonacci,

    #[error("Prime expects array")]
    PrimeExpectsArray,

    #[error("LCM expects integer array")]
    LcmExpectsIntegers,

    #[error("HCF expects integer array")]
    HcfExpectsIntegers,

    #[error("AI expects string")]
    AiExpectsString,

    /// A reduction overflowed `i64`.
    #[error("Arithmetic overflow in {operation}")]
    Overflow { operation: &'static str },

    /// The text generator failed, timed out, or returned an unusable shape.
    #[error("Text generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// A blocking computation panicked or was cancelled.
    #[error("Blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    /// HTTP status code this error is reported with.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Overflow { .. } | Self::Generation(_) | Self::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Returns `true` if the error was caused by the client's request.
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }

    /// Message placed in the failure envelope.
    ///
    /// Client errors carry their descriptive message; internal errors collapse
    /// to [`INTERNAL_ERROR_MESSAGE`].
    pub fn public_message(&self) -> String {
        if self.is_client_error() {
            self.to_string()
        } else {
            INTERNAL_ERROR_MESSAGE.to_string()
        }
    }
}

/// Failure reported by a [`TextGenerator`](crate::dispatch::TextGenerator).
#[derive(thiserror::Error, Debug)]
pub enum GenerationError {
    /// No provider credential was configured.
    #[error("missing provider credential")]
    MissingCredential,

    /// The request could not be sent or the provider answered with an error
    /// status.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn core::error::Error + Send + Sync>),

    /// The provider answered, but not with a candidate text.
    #[error("unexpected response shape")]
    UnexpectedShape,

    /// The provider did not answer within the configured timeout.
    #[error("timed out after {0:?}")]
    Timeout(core::time::Duration),
}
