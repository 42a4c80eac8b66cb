//! Error Normalization
//!
//! Every API call can fail three ways: the request never got a response, the
//! server answered with a failing status, or the server answered normally but
//! its envelope reports `success: false`. Views only ever see the result of
//! folding those into one [`NormalizedError`].

use serde_json::Value;
use std::fmt;
use thiserror::Error;

use super::decode::{decode, DecodeError};
use super::envelope::Envelope;

/// Message used when a transport failure carries no description
pub const GENERIC_TRANSPORT_MESSAGE: &str = "Network Error";

/// Message used when a `success: false` envelope carries no `error`
pub const GENERIC_APPLICATION_MESSAGE: &str = "Request was unsuccessful";

/// Which layer a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No response was received
    TransportFailure,
    /// A response with a failing status and no structured error
    HttpFailure,
    /// The server reported the failure itself
    ApplicationFailure,
}

/// A failure reduced to something a view can print
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedError {
    pub message: String,
    pub kind: ErrorKind,
}

impl NormalizedError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for NormalizedError {}

/// Raw outcome of a failed call, before normalization
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CallFailure {
    #[error("{}", .description.as_deref().unwrap_or(GENERIC_TRANSPORT_MESSAGE))]
    Transport { description: Option<String> },

    #[error("Request failed with status code {status}")]
    Http { status: u16, body: Option<String> },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl CallFailure {
    pub fn transport(description: impl Into<String>) -> Self {
        let description = description.into();
        Self::Transport {
            description: (!description.trim().is_empty()).then_some(description),
        }
    }
}

/// Fold a failed call into a [`NormalizedError`].
///
/// A failing response whose body decodes to an object with a usable `error`
/// field is an application failure. Any other non-empty body is reported
/// verbatim as an HTTP failure.
pub fn normalize_failure(failure: &CallFailure) -> NormalizedError {
    match failure {
        CallFailure::Http {
            body: Some(body), ..
        } if !body.trim().is_empty() => match decode(body).ok().as_ref().and_then(error_field) {
            Some(message) => NormalizedError::new(ErrorKind::ApplicationFailure, message),
            None => NormalizedError::new(ErrorKind::HttpFailure, body.clone()),
        },
        CallFailure::Http { .. } => {
            NormalizedError::new(ErrorKind::HttpFailure, failure.to_string())
        }
        CallFailure::Transport { .. } => {
            NormalizedError::new(ErrorKind::TransportFailure, failure.to_string())
        }
        CallFailure::Decode(err) => {
            NormalizedError::new(ErrorKind::ApplicationFailure, err.to_string())
        }
    }
}

/// Unwrap a transport-level success, turning `success: false` into an
/// application failure
pub fn normalize_envelope<T>(envelope: Envelope<T>) -> Result<T, NormalizedError> {
    if !envelope.success {
        let message = envelope
            .error
            .as_ref()
            .and_then(message_of)
            .unwrap_or_else(|| GENERIC_APPLICATION_MESSAGE.to_string());
        return Err(NormalizedError::new(ErrorKind::ApplicationFailure, message));
    }

    envelope.data.ok_or_else(|| {
        NormalizedError::new(ErrorKind::ApplicationFailure, "Response is missing data")
    })
}

/// Normalize the full outcome of an enveloped call
pub fn normalize<T>(outcome: Result<Envelope<T>, CallFailure>) -> Result<T, NormalizedError> {
    match outcome {
        Ok(envelope) => normalize_envelope(envelope),
        Err(failure) => Err(normalize_failure(&failure)),
    }
}

fn error_field(body: &Value) -> Option<String> {
    body.as_object()?.get("error").and_then(message_of)
}

fn message_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
