#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
//! High-level, asynchronous JSON API client.
//!
//! The [`Client`] wraps a blocking [`ureq`] agent and runs every
//! request inside a blocking task of the selected async runtime. It
//! also holds a base URL and a set of headers sent along with every
//! request, which is what authenticated REST APIs usually need.

mod error;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, trace};
pub use ureq;
use ureq::{
    config::Config,
    http::{Response, StatusCode},
    tls::{RootCerts, TlsConfig, TlsProvider},
    Agent, Body,
};

#[doc(inline)]
pub use crate::error::{Error, Result};

#[cfg(any(
    all(feature = "tokio", feature = "async-std"),
    not(any(feature = "tokio", feature = "async-std"))
))]
compile_error!("Either feature `tokio` or `async-std` must be enabled for this crate.");

#[cfg(any(
    all(feature = "rustls", feature = "native-tls"),
    not(any(feature = "rustls", feature = "native-tls"))
))]
compile_error!("Either feature `rustls` or `native-tls` must be enabled for this crate.");

/// The HTTP client structure.
///
/// This structure wraps a HTTP agent, a base URL and default
/// headers. Paths given to the JSON helpers are joined to the base
/// URL.
#[derive(Clone, Debug)]
pub struct Client {
    /// The HTTP agent used to perform calls.
    agent: Agent,

    /// The URL every relative path is joined to.
    base_url: String,

    /// Headers sent along with every request.
    headers: Vec<(String, String)>,
}

impl Client {
    /// Creates a new HTTP client with sane defaults.
    pub fn new(base_url: impl ToString) -> Self {
        let tls = TlsConfig::builder()
            .root_certs(RootCerts::PlatformVerifier)
            .provider(
                #[cfg(feature = "native-tls")]
                TlsProvider::NativeTls,
                #[cfg(feature = "rustls")]
                TlsProvider::Rustls,
            );

        let config = Config::builder()
            .tls_config(tls.build())
            .http_status_as_error(false)
            .build();
        let agent = config.new_agent();

        Self {
            agent,
            base_url: base_url.to_string().trim_end_matches('/').to_owned(),
            headers: Vec::new(),
        }
    }

    /// Adds a header sent along with every request.
    pub fn with_header(mut self, key: impl ToString, val: impl ToString) -> Self {
        self.headers.push((key.to_string(), val.to_string()));
        self
    }

    /// Returns the base URL of the client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins the given path to the base URL.
    pub fn url(&self, path: impl AsRef<str>) -> String {
        format!("{}/{}", self.base_url, path.as_ref().trim_start_matches('/'))
    }

    /// Sends a POST request with the given JSON body, then parses
    /// the JSON response.
    ///
    /// Error responses carrying a JSON body are parsed like any other
    /// response, so that callers can read the error envelope of the
    /// API.
    pub async fn post_json<B, T>(&self, path: impl AsRef<str>, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(url, "sending POST request");

        let body =
            serde_json::to_vec(body).map_err(|err| Error::SerializeBodyError(err, url.clone()))?;
        trace!(body = %String::from_utf8_lossy(&body), "request body");

        let headers = self.headers.clone();
        let request_url = url.clone();

        let (status, body) = self
            .run(move |agent| {
                let mut request = agent
                    .post(&request_url)
                    .header("Content-Type", "application/json");

                for (key, val) in &headers {
                    request = request.header(key.as_str(), val.as_str());
                }

                let response = request
                    .send(body)
                    .map_err(|err| Error::SendPostRequestError(err, request_url.clone()))?;

                read_body(response, &request_url)
            })
            .await??;

        parse_json(status, &body, url)
    }

    /// Sends a DELETE request, then parses the JSON response.
    pub async fn delete_json<T: DeserializeOwned>(&self, path: impl AsRef<str>) -> Result<T> {
        let url = self.url(path);
        debug!(url, "sending DELETE request");

        let headers = self.headers.clone();
        let request_url = url.clone();

        let (status, body) = self
            .run(move |agent| {
                let mut request = agent.delete(&request_url);

                for (key, val) in &headers {
                    request = request.header(key.as_str(), val.as_str());
                }

                let response = request
                    .call()
                    .map_err(|err| Error::SendDeleteRequestError(err, request_url.clone()))?;

                read_body(response, &request_url)
            })
            .await??;

        parse_json(status, &body, url)
    }

    async fn run<T: Send + 'static>(
        &self,
        f: impl FnOnce(&Agent) -> T + Send + 'static,
    ) -> Result<T> {
        let agent = self.agent.clone();
        spawn_blocking(move || f(&agent)).await
    }
}

/// Reads the status and the whole body of the response.
fn read_body(response: Response<Body>, url: &str) -> Result<(StatusCode, Vec<u8>)> {
    let status = response.status();
    let body = response
        .into_body()
        .read_to_vec()
        .map_err(|err| Error::ReadBodyError(err, url.to_owned()))?;

    Ok((status, body))
}

/// Parses the response body as JSON. Unparsable error responses
/// fail with their status.
fn parse_json<T: DeserializeOwned>(status: StatusCode, body: &[u8], url: String) -> Result<T> {
    let body_str = String::from_utf8_lossy(body);
    trace!(%status, body = %body_str, "response body");

    match serde_json::from_slice(body) {
        Ok(res) => Ok(res),
        Err(_) if !status.is_success() => {
            Err(Error::ResponseStatusError(status, url, body_str.into_owned()))
        }
        Err(err) => Err(Error::DeserializeBodyError(err, url)),
    }
}

/// Spawns a blocking task using [`async_std`].
#[cfg(feature = "async-std")]
async fn spawn_blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    Ok(async_std::task::spawn_blocking(f).await)
}

/// Spawns a blocking task using [`tokio`].
#[cfg(feature = "tokio")]
async fn spawn_blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await?)
}
