//! # Config
//!
//! Configuration of the import assistant: where the backend lives,
//! which session talks to it and how the consent screen is reached.

use oauth::v2_0::OAuthConfig;

use crate::{
    api::HttpImportApi, consent::RedirectServerPopup, provider::DEFAULT_IMAP_PORT, AddressKeys,
    ImportContext,
};

/// The import assistant configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub struct ImportAssistantConfig {
    /// Base URL of the backend API.
    pub api_url: String,

    /// Identifier of the authenticated session.
    pub uid: String,

    /// Access token of the authenticated session.
    pub access_token: String,

    /// Version announced to the backend, like `web-mail@5.0.0`.
    pub app_version: Option<String>,

    /// Consent screen configuration.
    pub oauth: OAuthConfig,

    /// IMAP port mail importers connect to. Defaults to
    /// [`DEFAULT_IMAP_PORT`].
    pub imap_port: Option<u16>,
}

impl ImportAssistantConfig {
    pub fn imap_port(&self) -> u16 {
        self.imap_port.unwrap_or(DEFAULT_IMAP_PORT)
    }

    /// Builds the HTTP import API authenticated with the configured
    /// session.
    pub fn build_http_api(&self) -> HttpImportApi {
        let api = HttpImportApi::new(&self.api_url, &self.uid, &self.access_token);

        match &self.app_version {
            Some(version) => api.with_app_version(version),
            None => api,
        }
    }

    /// Builds the consent popup, opening consent URLs with the given
    /// callback.
    pub fn build_popup(
        &self,
        opener: impl Fn(&str) + Send + Sync + 'static,
    ) -> RedirectServerPopup {
        RedirectServerPopup::new(self.oauth.clone(), opener)
    }

    /// Builds a context talking to the backend over HTTP.
    pub fn build_context(
        &self,
        keys: impl AddressKeys + 'static,
        opener: impl Fn(&str) + Send + Sync + 'static,
    ) -> ImportContext {
        ImportContext::new(self.build_http_api(), keys, self.build_popup(opener))
    }
}

#[cfg(test)]
mod tests {
    use super::ImportAssistantConfig;

    #[test]
    fn build_http_api() {
        let config = ImportAssistantConfig {
            api_url: "https://mail.example.com/api/".into(),
            uid: "uid".into(),
            access_token: "token".into(),
            ..Default::default()
        };

        assert_eq!(config.imap_port(), 993);
        assert_eq!(config.build_http_api().base_url(), "https://mail.example.com/api");
    }
}
