//! Error types for the admin API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `HttpError` with the raw
//! status code and body for debugging. `Transport` covers failures where no
//! response arrived at all.
//!
//! Controllers never show these messages to the user; they log them and
//! surface a static, resource-specific notification instead.

use thiserror::Error;

/// Errors produced while building, sending or parsing admin API requests.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The server returned 404, the requested resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The transport could not complete the round-trip.
    #[error("transport failed: {0}")]
    Transport(String),
}
