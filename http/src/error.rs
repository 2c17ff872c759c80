//! # Error
//!
//! Module dedicated to HTTP errors. It contains an [`Error`] enum
//! based on [`thiserror::Error`] and a type alias [`Result`].

use thiserror::Error;

/// The global `Result` alias of the library.
pub type Result<T> = std::result::Result<T, Error>;

/// The global `Error` enum of the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot serialize JSON body for {1}")]
    SerializeBodyError(#[source] serde_json::Error, String),
    #[error("cannot deserialize JSON response from {1}")]
    DeserializeBodyError(#[source] serde_json::Error, String),
    #[error("cannot read response body from {1}")]
    ReadBodyError(#[source] ureq::Error, String),
    #[error("error while sending POST request to {1}")]
    SendPostRequestError(#[source] ureq::Error, String),
    #[error("error while sending DELETE request to {1}")]
    SendDeleteRequestError(#[source] ureq::Error, String),
    #[error("error while requesting {1}: server responded {0}: {2}")]
    ResponseStatusError(ureq::http::StatusCode, String, String),

    #[cfg(feature = "tokio")]
    #[error(transparent)]
    JoinError(#[from] tokio::task::JoinError),
}
