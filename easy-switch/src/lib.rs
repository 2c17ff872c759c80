#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
//! Rust library driving OAuth-based imports of mail, calendars and
//! contacts from an external provider.
//!
//! The main entry point is the [`ImportAssistant`], a three-step
//! wizard:
//!
//! 1. the user selects products, then gives their consent on the
//!    provider's consent screen ([`consent::OAuthPopup`]);
//! 2. the backend creates one importer per granted product, and the
//!    user customizes what gets imported;
//! 3. missing calendars are created, then the import task starts.
//!
//! Every collaborator (backend API, address keys, consent screen,
//! event manager, error handler) is given through an
//! [`ImportContext`].
//!
//! See examples in the /tests folder.

pub mod api;
pub mod calendar;
pub mod color;
pub mod config;
pub mod consent;
pub mod contacts;
pub mod context;
mod error;
pub mod keys;
pub mod mail;
pub mod model;
pub mod product;
pub mod provider;
pub mod summary;
pub mod validation;
pub mod wizard;

#[doc(inline)]
pub use self::{
    config::ImportAssistantConfig,
    context::ImportContext,
    error::{AnyBoxedError, Error, Result},
    keys::AddressKeys,
    product::{CheckedProducts, ImportType},
    wizard::ImportAssistant,
};
