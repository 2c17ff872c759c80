//! # Provider
//!
//! External providers data can be imported from.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, ImportType};

/// IMAP port used by mail importers.
pub const DEFAULT_IMAP_PORT: u16 = 993;

/// The external OAuth provider.
///
/// The backend identifies providers by number.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum OAuthProvider {
    #[default]
    Google,
}

impl OAuthProvider {
    /// Authorization endpoint of the provider's consent screen.
    pub fn auth_url(&self) -> &'static str {
        match self {
            Self::Google => "https://accounts.google.com/o/oauth2/v2/auth",
        }
    }

    /// Scopes requested whatever the selected products.
    pub fn default_scopes(&self) -> &'static [&'static str] {
        match self {
            Self::Google => &["email", "openid"],
        }
    }

    /// Scopes needed to import the given product.
    pub fn product_scopes(&self, kind: ImportType) -> &'static [&'static str] {
        match (self, kind) {
            (Self::Google, ImportType::Mail) => &["https://mail.google.com/"],
            (Self::Google, ImportType::Calendar) => {
                &["https://www.googleapis.com/auth/calendar.readonly"]
            }
            (Self::Google, ImportType::Contacts) => {
                &["https://www.googleapis.com/auth/contacts.readonly"]
            }
        }
    }

    /// Extra query parameters of the consent URL. Google only returns
    /// a refresh token to the backend with an offline access type.
    pub fn consent_params(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Google => &[("access_type", "offline"), ("prompt", "consent")],
        }
    }

    /// IMAP server the mail importer connects to.
    pub fn imap_host(&self) -> &'static str {
        match self {
            Self::Google => "imap.gmail.com",
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::Google => 1,
        }
    }
}

impl TryFrom<u8> for OAuthProvider {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Google),
            code => Err(Error::ParseProviderError(code)),
        }
    }
}

impl Serialize for OAuthProvider {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for OAuthProvider {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u8::deserialize(deserializer)?;
        Self::try_from(code).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::OAuthProvider;

    #[test]
    fn serialize_provider_as_code() {
        assert_eq!(serde_json::to_string(&OAuthProvider::Google).unwrap(), "1");
        assert_eq!(
            serde_json::from_str::<OAuthProvider>("1").unwrap(),
            OAuthProvider::Google
        );
        assert!(serde_json::from_str::<OAuthProvider>("42").is_err());
    }
}
