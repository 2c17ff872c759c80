//! Module dedicated to OAuth 2.0 consent configuration.

use std::net::TcpListener;

use tracing::debug;

use super::{Client, Error, Result};

/// The OAuth 2.0 consent configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub struct OAuthConfig {
    /// Client identifier issued to the client during the registration process described by
    /// [Section 2.2](https://datatracker.ietf.org/doc/html/rfc6749#section-2.2).
    pub client_id: String,

    /// URL of the authorization server's authorization endpoint.
    #[cfg_attr(feature = "derive", serde(default))]
    pub auth_url: String,

    pub redirect_scheme: Option<String>,
    pub redirect_host: Option<String>,
    pub redirect_port: Option<u16>,
}

impl OAuthConfig {
    pub const LOCALHOST: &'static str = "localhost";

    /// Return the first available port on [`Self::LOCALHOST`].
    pub fn get_first_available_port() -> Result<u16> {
        (49_152..65_535)
            .find(|port| TcpListener::bind((Self::LOCALHOST, *port)).is_ok())
            .ok_or_else(|| Error::GetAvailablePortError(Self::LOCALHOST.to_owned()))
    }

    /// Builds the consent client, falling back to `http`, to
    /// [`Self::LOCALHOST`] and to the first available port when the
    /// redirection is not fully configured.
    pub fn build_client(&self) -> Result<Client> {
        let redirect_scheme = match self.redirect_scheme.as_ref() {
            Some(scheme) => scheme.clone(),
            None => "http".into(),
        };

        let redirect_host = match self.redirect_host.as_ref() {
            Some(host) => host.clone(),
            None => Self::LOCALHOST.to_owned(),
        };

        let redirect_port = match self.redirect_port {
            Some(port) => port,
            None => Self::get_first_available_port()?,
        };

        debug!(redirect_scheme, redirect_host, redirect_port, "building oauth client");

        Client::new(
            &self.client_id,
            &self.auth_url,
            redirect_scheme,
            redirect_host,
            redirect_port,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::OAuthConfig;

    #[test]
    fn build_client_with_defaults() {
        let config = OAuthConfig {
            client_id: "client-id".into(),
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".into(),
            redirect_port: Some(9999),
            ..Default::default()
        };

        let client = config.build_client().unwrap();
        assert_eq!(client.redirect_host, "localhost");
        assert_eq!(client.redirect_port, 9999);
        assert_eq!(client.redirect_url, "http://localhost:9999");
    }

    #[test]
    fn reject_invalid_auth_url() {
        let config = OAuthConfig {
            client_id: "client-id".into(),
            auth_url: "not a url".into(),
            redirect_port: Some(9999),
            ..Default::default()
        };

        assert!(config.build_client().is_err());
    }
}
