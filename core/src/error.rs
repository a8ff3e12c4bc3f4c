//! Error types for the Smartwaiver client.
//!
//! # Design
//! Failures fall into four families. `Validation` means a payload could not
//! be turned into a domain object. `Protocol` means the response envelope
//! itself broke the contract (bad JSON, missing envelope field, unknown type,
//! unexpected status) and carries the raw response. `Known` is an error the
//! API reported on purpose, with its status code and the parsed envelope.
//! `Transport` is whatever the transport raised, untouched.
//!
//! Nothing here is retried. Every variant ends the call that produced it.

use serde_json::{Map, Value};

use crate::http::{HttpResponse, TransportError};
use crate::validate::ValidationError;

/// Errors returned by `SmartwaiverClient` and the envelope processor.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A payload could not be turned into a domain object.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The response envelope is structurally invalid.
    #[error("{message}")]
    Protocol {
        message: String,
        response: HttpResponse,
    },

    /// The API answered with a known error status and a message.
    #[error("{message}")]
    Known {
        message: String,
        status: u16,
        envelope: Map<String, Value>,
    },

    /// The transport failed before an HTTP response was received.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The client configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ApiError {
    pub(crate) fn protocol(message: impl Into<String>, response: HttpResponse) -> Self {
        ApiError::Protocol {
            message: message.into(),
            response,
        }
    }

    /// HTTP status of the response behind this error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Protocol { response, .. } => Some(response.status),
            ApiError::Known { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Envelope `version` of an API-reported error.
    pub fn api_version(&self) -> Option<i64> {
        self.envelope_field("version").and_then(Value::as_i64)
    }

    /// Envelope `id` of an API-reported error, useful in support requests.
    pub fn request_id(&self) -> Option<&str> {
        self.envelope_field("id").and_then(Value::as_str)
    }

    /// Envelope `ts` of an API-reported error.
    pub fn timestamp(&self) -> Option<&str> {
        self.envelope_field("ts").and_then(Value::as_str)
    }

    fn envelope_field(&self, key: &str) -> Option<&Value> {
        match self {
            ApiError::Known { envelope, .. } => envelope.get(key),
            _ => None,
        }
    }
}
