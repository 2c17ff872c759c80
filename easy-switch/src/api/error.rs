use thiserror::Error;

/// The `Result` alias of the import API.
pub type Result<T> = std::result::Result<T, Error>;

/// The `Error` enum of the import API.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot send request to import api")]
    HttpError(#[from] http::Error),
    #[error("cannot find {1} in response of {0}")]
    MissingResponseFieldError(String, &'static str),
    #[error("cannot parse {2} from response of {1}")]
    ParseResponseError(#[source] serde_json::Error, String, &'static str),
    #[error("import api rejected request {1} with code {0}: {2}")]
    RejectedError(i64, String, String),
}
