//! # Response Envelope Types
//!
//! Every response produced by the service, success or failure, is wrapped in
//! the same [`Envelope`]:
//!
//! ```json
//! { "is_success": true, "official_email": "ops@example.com", "data": [0, 1, 1] }
//! { "is_success": false, "official_email": "ops@example.com", "message": "Invalid key" }
//! ```
//!
//! `data` is only serialized on success and `message` only on failure. The
//! constructors on [`Envelope`] are the only way to build one, which keeps that
//! invariant out of the hands of callers.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::Error;

/// Computed result of a single operation, serialized as the envelope's `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OperationOutput {
    /// `fibonacci`: the first `n` terms.
    Sequence(Vec<u64>),
    /// `prime`: the integer elements that are prime, in input order.
    Integers(Vec<i64>),
    /// `lcm` and `hcf`: the reduced value.
    Integer(i64),
    /// `AI`: the extracted word.
    Text(String),
}

/// Fixed-shape response wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    is_success: bool,
    official_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<OperationOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl Envelope {
    /// Success envelope carrying `data`.
    pub fn success(official_email: impl Into<String>, data: OperationOutput) -> Self {
        Self {
            is_success: true,
            official_email: official_email.into(),
            data: Some(data),
            message: None,
        }
    }

    /// Success envelope without `data`, used by the health probe.
    pub fn healthy(official_email: impl Into<String>) -> Self {
        Self {
            is_success: true,
            official_email: official_email.into(),
            data: None,
            message: None,
        }
    }

    /// Failure envelope carrying `message`.
    pub fn failure(official_email: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            official_email: official_email.into(),
            data: None,
            message: Some(message.into()),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.is_success
    }

    pub fn data(&self) -> Option<&OperationOutput> {
        self.data.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// An [`Envelope`] paired with the HTTP status it is sent with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: StatusCode,
    pub envelope: Envelope,
}

impl Reply {
    pub fn ok(envelope: Envelope) -> Self {
        Self {
            status: StatusCode::OK,
            envelope,
        }
    }

    /// Builds the failure reply for `err`, hiding internal detail.
    pub fn from_error(official_email: impl Into<String>, err: &Error) -> Self {
        Self {
            status: err.status(),
            envelope: Envelope::failure(official_email, err.public_message()),
        }
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}
