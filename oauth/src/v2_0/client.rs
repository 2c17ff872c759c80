//! Client builder, used by the consent flow to build authorization
//! URLs and to know where the redirect server should listen.

use std::ops::Deref;

use oauth2::{AuthUrl, ClientId, EndpointNotSet, EndpointSet, RedirectUrl};

use super::{Error, Result};

type BasicClient = oauth2::basic::BasicClient<
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
>;

/// Client builder, used by the consent flow to build authorization
/// URLs.
///
/// Only the authorization endpoint is set: the token exchange is
/// performed by whoever receives the authorization code.
#[derive(Clone, Debug)]
pub struct Client {
    inner: BasicClient,

    /// Full URL of the client's redirection endpoint.
    pub redirect_url: String,

    /// Hostname of the client's redirection endpoint.
    pub redirect_host: String,

    /// Port of the client's redirection endpoint.
    pub redirect_port: u16,
}

impl Client {
    pub fn new(
        client_id: impl ToString,
        auth_url: impl ToString,
        redirect_scheme: impl ToString,
        redirect_host: impl ToString,
        redirect_port: impl Into<u16>,
    ) -> Result<Self> {
        let redirect_host = redirect_host.to_string();
        let redirect_port = redirect_port.into();
        let redirect_url = format!(
            "{}://{redirect_host}:{redirect_port}",
            redirect_scheme.to_string()
        );

        let client = oauth2::basic::BasicClient::new(ClientId::new(client_id.to_string()))
            .set_auth_uri(AuthUrl::new(auth_url.to_string()).map_err(Error::BuildAuthUrlError)?)
            .set_redirect_uri(
                RedirectUrl::new(redirect_url.clone()).map_err(Error::BuildRedirectUrlError)?,
            );

        Ok(Self {
            inner: client,
            redirect_url,
            redirect_host,
            redirect_port,
        })
    }
}

impl Deref for Client {
    type Target = BasicClient;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
