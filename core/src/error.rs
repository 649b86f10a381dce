//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `HttpError` with the raw
//! status code and body. Codec and network failures keep the underlying
//! error as their source so callers can downcast to it.

use thiserror::Error;

/// Boxed error produced by a transport.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The single failure type returned by every client operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(#[source] serde_json::Error),

    /// The request never produced a response (connection refused, DNS, TLS,
    /// reset, timeout).
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),
}

impl ApiError {
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        ApiError::Transport(err.into())
    }
}
