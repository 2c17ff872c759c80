//! # API
//!
//! Module dedicated to the backend import API. The [`ImportApi`]
//! trait lists every call the import assistant needs, and
//! [`HttpImportApi`] implements it over HTTP.
//!
//! Every wire structure follows the backend naming: PascalCase fields
//! and uppercase `ID` suffixes.

pub mod client;
mod error;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[doc(inline)]
pub use self::{
    client::HttpImportApi,
    error::{Error, Result},
};
use crate::{
    calendar::ImportedCalendar, mail::ImportedMailFolder, model::LaunchImportPayload,
    provider::OAuthProvider, ImportType,
};

/// Body of the token creation request: exchanges the authorization
/// code against an import token.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateTokenRequest {
    pub provider: OAuthProvider,
    pub code: String,
    pub redirect_uri: String,
}

/// The import token, owned by the backend.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImportToken {
    #[serde(rename = "ID")]
    pub id: String,
    /// Address of the imported account.
    pub account: String,
    /// Products granted by the user on the consent screen.
    pub products: Vec<ImportType>,
}

/// SASL mechanism used by the mail importer to log in.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum SaslMechanism {
    #[default]
    #[serde(rename = "XOAUTH2")]
    XOAuth2,
}

/// Body of the mail importer creation request.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateMailImporterRequest {
    #[serde(rename = "TokenID")]
    pub token_id: String,
    pub imap_host: String,
    pub imap_port: u16,
    pub sasl: SaslMechanism,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MailImporter {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default)]
    pub folders: Vec<ImportedMailFolder>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CalendarImporter {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default)]
    pub calendars: Vec<ImportedCalendar>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContactsImporter {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default)]
    pub num_contacts: u64,
    #[serde(default)]
    pub num_groups: u64,
}

/// Body of the calendar creation request.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateCalendarRequest {
    pub name: String,
    pub color: String,
    pub description: String,
    /// `1` to display the calendar, `0` to hide it.
    pub display: u8,
    #[serde(rename = "AddressID")]
    pub address_id: String,
}

/// A calendar of the destination account.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Calendar {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Armored key material of a calendar, as produced by
/// [`crate::AddressKeys::generate_calendar_key`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CalendarKeyPayload {
    #[serde(rename = "AddressID")]
    pub address_id: String,
    pub signature: String,
    pub private_key: String,
    pub passphrase: CalendarPassphrase,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CalendarPassphrase {
    pub data_packet: String,
    pub key_packet: String,
}

/// Calls of the backend import API.
#[async_trait]
pub trait ImportApi: Send + Sync {
    async fn create_token(&self, req: &CreateTokenRequest) -> Result<ImportToken>;

    async fn create_mail_importer(&self, req: &CreateMailImporterRequest)
        -> Result<MailImporter>;

    async fn create_calendar_importer(&self, token_id: &str) -> Result<CalendarImporter>;

    async fn create_contacts_importer(&self, token_id: &str) -> Result<ContactsImporter>;

    async fn start_import_task(&self, payload: &LaunchImportPayload) -> Result<()>;

    async fn create_calendar(&self, req: &CreateCalendarRequest) -> Result<Calendar>;

    async fn create_calendar_key(
        &self,
        calendar_id: &str,
        payload: &CalendarKeyPayload,
    ) -> Result<()>;

    async fn remove_calendar(&self, calendar_id: &str) -> Result<()>;
}
