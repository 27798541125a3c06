//! Error types for the collection sync client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource is already gone" from "the server returned an unexpected
//! status." All other non-2xx responses land in `Status` with the raw status
//! code and body. Variants group into three kinds (see [`ErrorKind`]) so a UI
//! can decide how to present a failure without matching every variant.

use thiserror::Error;

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Non-2xx status or the request never completed.
    Network,
    /// The body was not the JSON / HAL shape we expected.
    Parse,
    /// The request could not be built from local data.
    Request,
}

/// Errors returned by `CollectionClient` and the `Reconciler`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found (HTTP 404)")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP error! status: {status}")]
    Status { status: u16, body: String },

    /// The host failed to execute the request at all.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The item carries neither a self link nor a numeric id.
    #[error("item has no self link to target")]
    MissingLink,

    /// The self link could not be parsed as a URL or path.
    #[error("invalid link reference: {0}")]
    InvalidLink(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotFound | ApiError::Status { .. } | ApiError::Transport(_) => {
                ErrorKind::Network
            }
            ApiError::Deserialization(_) => ErrorKind::Parse,
            ApiError::Serialization(_) | ApiError::MissingLink | ApiError::InvalidLink(_) => {
                ErrorKind::Request
            }
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
