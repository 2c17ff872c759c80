//! # Error
//!
//! Module dedicated to import assistant errors. It contains an
//! [`Error`] enum based on [`thiserror::Error`] and a type alias
//! [`Result`].

use std::{error, result};

use thiserror::Error;

use crate::{api, validation::PayloadError, ImportType};

/// The global `Result` alias of the library.
pub type Result<T> = result::Result<T, Error>;

/// Boxed error returned by collaborators implemented outside of the
/// library, like address keys or event managers.
pub type AnyBoxedError = Box<dyn error::Error + Send + Sync + 'static>;

/// The global `Error` enum of the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot open import assistant: no address found")]
    NoAddressError,
    #[error("cannot parse oauth provider from code {0}")]
    ParseProviderError(u8),
    #[error("cannot parse address status from code {0}")]
    ParseAddressStatusError(u8),

    #[error("cannot build oauth client")]
    BuildOAuthClientError(#[source] oauth::v2_0::Error),
    #[error("cannot wait for oauth redirection")]
    WaitForOAuthRedirectionError(#[source] oauth::v2_0::Error),

    #[error("cannot create import token")]
    CreateTokenError(#[source] api::Error),
    #[error("cannot import from {0}: provider granted no product")]
    EmptyTokenScopeError(String),
    #[error("cannot create {1} importer")]
    CreateImporterError(#[source] api::Error, ImportType),
    #[error("cannot create any importer for {0}")]
    NoImporterCreatedError(String),

    #[error("cannot create calendars: no valid address found")]
    NoActiveAddressError,
    #[error("cannot get keys of address {1}")]
    GetAddressKeysError(#[source] AnyBoxedError, String),
    #[error("cannot create calendars: primary key of address {0} is not decrypted")]
    PrimaryAddressKeyNotDecryptedError(String),
    #[error("cannot create calendar {1}")]
    CreateCalendarError(#[source] api::Error, String),
    #[error("cannot generate key of calendar {1}")]
    GenerateCalendarKeyError(#[source] AnyBoxedError, String),
    #[error("cannot set up key of calendar {1}")]
    SetupCalendarKeyError(#[source] api::Error, String),

    #[error("cannot submit import: no product selected")]
    NoProductSelectedError,
    #[error("cannot submit import: invalid payload {0:?}")]
    InvalidPayloadError(Vec<PayloadError>),
    #[error("cannot start import task")]
    StartImportTaskError(#[source] api::Error),
    #[error("cannot refresh events")]
    RefreshEventsError(#[source] AnyBoxedError),
}
