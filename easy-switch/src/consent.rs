//! # Consent
//!
//! Module dedicated to the consent screen of the external provider.
//! The [`OAuthPopup`] trait hides how the consent screen is shown;
//! [`RedirectServerPopup`] shows it through a URL opener and catches
//! the authorization code with a local redirect server.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use oauth::v2_0::{AuthorizationCodeGrant, OAuthConfig, Redirection};
use tracing::{debug, trace};

use crate::{provider::OAuthProvider, CheckedProducts, Error, Result};

/// What the consent screen gives back: everything the backend needs
/// to create the import token.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OAuthProps {
    pub code: String,
    pub provider: OAuthProvider,
    pub redirect_uri: String,
}

/// Builds the space-separated scope requested on the consent screen:
/// the default scopes of the provider plus the scopes of every checked
/// product.
pub fn requested_scope(provider: OAuthProvider, checked: &CheckedProducts) -> String {
    let product_scopes = checked
        .selected()
        .into_iter()
        .flat_map(|kind| provider.product_scopes(kind).iter());

    provider
        .default_scopes()
        .iter()
        .chain(product_scopes)
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Shows the consent screen of the provider.
#[async_trait]
pub trait OAuthPopup: Send + Sync {
    /// Asks the user to grant the given scope.
    ///
    /// Returns `None` when the user cancelled the consent.
    async fn authorize(&self, provider: OAuthProvider, scope: &str) -> Result<Option<OAuthProps>>;
}

/// Callback opening the consent URL, usually in a browser.
pub type UrlOpener = Arc<dyn Fn(&str) + Send + Sync>;

/// Consent screen opened through a [`UrlOpener`], with the
/// authorization code caught by a one-shot local redirect server.
#[derive(Clone)]
pub struct RedirectServerPopup {
    config: OAuthConfig,
    opener: UrlOpener,
}

impl RedirectServerPopup {
    pub fn new(config: OAuthConfig, opener: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self {
            config,
            opener: Arc::new(opener),
        }
    }
}

impl fmt::Debug for RedirectServerPopup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedirectServerPopup")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl OAuthPopup for RedirectServerPopup {
    async fn authorize(&self, provider: OAuthProvider, scope: &str) -> Result<Option<OAuthProps>> {
        let mut config = self.config.clone();
        if config.auth_url.is_empty() {
            config.auth_url = provider.auth_url().to_owned();
        }

        let client = config.build_client().map_err(Error::BuildOAuthClientError)?;

        let grant = provider.consent_params().iter().fold(
            AuthorizationCodeGrant::new().with_scopes(scope.split_whitespace()),
            |grant, (key, val)| grant.with_extra_param(key, val),
        );

        let (url, state) = grant.get_redirect_url(&client);
        debug!(?provider, scope, "opening consent screen");
        trace!(url = url.as_str(), "consent url");
        (self.opener)(url.as_str());

        let redirection = grant
            .wait_for_redirection(&client, state)
            .await
            .map_err(Error::WaitForOAuthRedirectionError)?;

        match redirection {
            Redirection::Authorized(code) => Ok(Some(OAuthProps {
                code,
                provider,
                redirect_uri: client.redirect_url.clone(),
            })),
            Redirection::Denied(reason) => {
                debug!(reason, "consent denied by user");
                Ok(None)
            }
        }
    }
}
