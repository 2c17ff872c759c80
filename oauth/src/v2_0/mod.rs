//! This module provides helpers to simplify OAuth 2.0 consent flows,
//! based on the [RFC6749](https://datatracker.ietf.org/doc/html/rfc6749).
//!
//! ```rust,ignore
//! let config = OAuthConfig {
//!     client_id: "client-id".into(),
//!     auth_url: "https://accounts.google.com/o/oauth2/v2/auth".into(),
//!     ..Default::default()
//! };
//!
//! let client = config.build_client()?;
//! let grant = AuthorizationCodeGrant::new()
//!     .with_scopes(["email", "openid"])
//!     .with_extra_param("access_type", "offline");
//!
//! let (url, state) = grant.get_redirect_url(&client);
//! println!("Go to: {url}");
//!
//! match grant.wait_for_redirection(&client, state).await? {
//!     Redirection::Authorized(code) => println!("code: {code}"),
//!     Redirection::Denied(reason) => println!("denied: {reason}"),
//! }
//! ```

pub mod authorization_code_grant;
pub mod client;
pub mod config;
mod error;

pub use authorization_code_grant::{AuthorizationCodeGrant, Redirection};
pub use client::Client;
pub use config::OAuthConfig;
#[doc(inline)]
pub use error::{Error, Result};
