use oauth2::url::{ParseError, Url};
use thiserror::Error;

/// The global `Result` alias of the module.
pub type Result<T> = std::result::Result<T, Error>;

/// The global `Error` enum of the module.
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot build auth url")]
    BuildAuthUrlError(#[source] ParseError),
    #[error("cannot build redirect url")]
    BuildRedirectUrlError(#[source] ParseError),
    #[error("cannot find available port on {0}")]
    GetAvailablePortError(String),
    #[error("cannot bind redirect server")]
    BindRedirectServerError(String, u16, #[source] std::io::Error),
    #[error("cannot accept redirect server connections")]
    AcceptRedirectServerError(#[source] std::io::Error),
    #[error("cannot read redirect request")]
    ReadRedirectRequestError(#[source] std::io::Error),
    #[error("cannot write redirect response")]
    WriteRedirectResponseError(#[source] std::io::Error),
    #[error("invalid state {0}: expected {1}")]
    InvalidStateError(String, String),
    #[error("missing redirect url from {0}")]
    MissingRedirectUrlError(String),
    #[error("cannot parse redirect url {1}")]
    ParseRedirectUrlError(#[source] ParseError, String),
    #[error("cannot find code from redirect url {0}")]
    FindCodeInRedirectUrlError(Url),
    #[error("cannot find state from redirect url {0}")]
    FindStateInRedirectUrlError(Url),
}
