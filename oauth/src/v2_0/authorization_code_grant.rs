//! Authorization Code Grant consent helper, as defined in the
//! [RFC6749](https://datatracker.ietf.org/doc/html/rfc6749#section-4.1)
//!
//! Only the first half of the flow lives here: building the consent
//! URL, then catching the authorization code sent back to the
//! redirect URL.

#[cfg(feature = "async-std")]
use async_std::{
    io::{prelude::BufReadExt, BufReader, WriteExt},
    net::TcpListener,
};
use oauth2::{url::Url, CsrfToken, Scope};
#[cfg(feature = "tokio")]
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::TcpListener,
};
use tracing::{debug, trace};

use super::{Client, Error, Result};

/// Outcome of the redirection sent by the authorization server.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Redirection {
    /// The resource owner granted access. Holds the authorization
    /// code.
    Authorized(String),

    /// The resource owner (or the server) refused access. Holds the
    /// error code returned by the authorization server, for example
    /// `access_denied`.
    Denied(String),
}

/// OAuth 2.0 Authorization Code Grant consent builder.
///
/// The first step (once the builder is configured) is to get the
/// consent URL by calling [`AuthorizationCodeGrant::get_redirect_url`].
///
/// The last step is to spawn a redirect server and wait for the user
/// to complete the consent by calling
/// [`AuthorizationCodeGrant::wait_for_redirection`].
#[derive(Clone, Debug, Default)]
pub struct AuthorizationCodeGrant {
    pub scopes: Vec<Scope>,
    pub extra_params: Vec<(String, String)>,
}

impl AuthorizationCodeGrant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scope(mut self, scope: impl ToString) -> Self {
        self.scopes.push(Scope::new(scope.to_string()));
        self
    }

    pub fn with_scopes(mut self, scopes: impl IntoIterator<Item = impl ToString>) -> Self {
        for scope in scopes {
            self = self.with_scope(scope);
        }
        self
    }

    /// Adds a provider-specific query parameter to the consent URL,
    /// like `access_type=offline` for Google.
    pub fn with_extra_param(mut self, key: impl ToString, val: impl ToString) -> Self {
        self.extra_params.push((key.to_string(), val.to_string()));
        self
    }

    /// Generate the consent URL using the given client.
    pub fn get_redirect_url(&self, client: &Client) -> (Url, CsrfToken) {
        let mut url_builder = client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(self.scopes.clone());

        for (key, val) in &self.extra_params {
            url_builder = url_builder.add_extra_param(key.clone(), val.clone());
        }

        url_builder.url()
    }

    /// Wait for the user to complete the consent started from the URL
    /// generated by [`AuthorizationCodeGrant::get_redirect_url`], then
    /// extract the authorization code from the redirection.
    pub async fn wait_for_redirection(
        &self,
        client: &Client,
        csrf_state: CsrfToken,
    ) -> Result<Redirection> {
        let host = client.redirect_host.clone();
        let port = client.redirect_port;

        debug!(host, port, "waiting for oauth redirection");

        // listen for one single connection
        let (mut stream, _) = TcpListener::bind((host.as_str(), port))
            .await
            .map_err(|err| Error::BindRedirectServerError(host.clone(), port, err))?
            .accept()
            .await
            .map_err(Error::AcceptRedirectServerError)?;

        let mut request_line = String::new();
        BufReader::new(&mut stream)
            .read_line(&mut request_line)
            .await
            .map_err(Error::ReadRedirectRequestError)?;
        trace!(request_line, "received redirect request");

        let redirection = parse_redirection(&request_line, &csrf_state);

        // write a basic http response in plain text
        let res = match &redirection {
            Ok(Redirection::Authorized(_)) => "Authorization successful! You can close this page.",
            Ok(Redirection::Denied(_)) => "Authorization denied. You can close this page.",
            Err(_) => "Authorization failed. You can close this page.",
        };
        let res = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\n\r\n{}",
            res.len(),
            res
        );
        stream
            .write_all(res.as_bytes())
            .await
            .map_err(Error::WriteRedirectResponseError)?;

        redirection
    }
}

/// Extracts the outcome of the consent from the request line of the
/// redirection, for example `GET /?state=abc&code=xyz HTTP/1.1`.
///
/// The state is checked before anything else, so that a forged
/// redirection cannot even cancel the flow.
pub fn parse_redirection(request_line: &str, csrf_state: &CsrfToken) -> Result<Redirection> {
    let redirect_url = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| Error::MissingRedirectUrlError(request_line.to_owned()))?;
    let redirect_url = format!("http://localhost{redirect_url}");
    let redirect_url = Url::parse(&redirect_url)
        .map_err(|err| Error::ParseRedirectUrlError(err, redirect_url.clone()))?;

    let find_param = |name: &str| {
        redirect_url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, val)| val.into_owned())
    };

    let state = find_param("state")
        .ok_or_else(|| Error::FindStateInRedirectUrlError(redirect_url.clone()))?;

    if &state != csrf_state.secret() {
        return Err(Error::InvalidStateError(
            state,
            csrf_state.secret().to_owned(),
        ));
    }

    if let Some(err) = find_param("error") {
        debug!(err, "authorization server refused access");
        return Ok(Redirection::Denied(err));
    }

    let code = find_param("code")
        .ok_or_else(|| Error::FindCodeInRedirectUrlError(redirect_url.clone()))?;

    Ok(Redirection::Authorized(code))
}
