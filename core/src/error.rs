//! Error types for the task API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because get-by-id and delete turn a
//! 404 into an absence sentinel rather than a failure. All other non-2xx
//! responses land in `Http` with the raw status code and body for debugging.
//! `EmptyBody` is separate from `Deserialization` so a `200 OK` with nothing
//! in it can be told apart from a garbled payload.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The exchange did not complete: connection refused, DNS, TLS or timeout.
    #[error("transport failure talking to {base_url}: {source}")]
    Transport {
        base_url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A success response carried no value where a task was required.
    #[error("response body was empty")]
    EmptyBody,

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("could not build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}
