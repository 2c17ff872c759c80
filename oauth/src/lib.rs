#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
//! Asynchronous helpers for OAuth consent flows.
//!
//! The library builds consent URLs and catches the authorization
//! code sent back by the authorization server. Exchanging the code
//! for tokens is left to the caller, which usually delegates it to
//! a backend.

pub mod v2_0;

use std::result;
use thiserror::Error;

#[cfg(any(
    all(feature = "tokio", feature = "async-std"),
    not(any(feature = "tokio", feature = "async-std"))
))]
compile_error!("Either feature `tokio` or `async-std` must be enabled for this crate.");

/// The global `Result` alias of the library.
pub type Result<T> = result::Result<T, Error>;

/// The global `Error` enum of the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    V2_0Error(#[from] v2_0::Error),
}
