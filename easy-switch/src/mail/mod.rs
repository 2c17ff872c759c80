//! # Mail
//!
//! Module dedicated to mail imports: folders discovered on the
//! provider side, the mapping of these folders to the destination
//! account and the payload submitted to the backend.

pub mod mapping;

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

/// Bit set in [`MailImporterPayload::custom_fields`] when the user
/// customized the folder mapping.
pub const CUSTOM_FIELD_MAPPING: u8 = 1;

/// Bit set in [`MailImporterPayload::custom_fields`] when the user
/// customized the import label.
pub const CUSTOM_FIELD_LABEL: u8 = 2;

/// Bit set in [`MailImporterPayload::custom_fields`] when the user
/// customized the import period.
pub const CUSTOM_FIELD_PERIOD: u8 = 4;

/// A folder (or a label) of the external account.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImportedMailFolder {
    /// Full path of the folder on the provider side.
    pub source: String,
    /// Hierarchy separator used in [`Self::source`].
    #[serde(default)]
    pub separator: String,
    /// Number of messages.
    #[serde(default)]
    pub size: u64,
    /// IMAP flags of the folder, like `\Noselect`.
    #[serde(default)]
    pub flags: Vec<String>,
    /// System folder this folder maps to, like `Inbox` or `Sent`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_folder: Option<String>,
}

impl ImportedMailFolder {
    /// Whether the folder can hold messages.
    pub fn is_selectable(&self) -> bool {
        !self
            .flags
            .iter()
            .any(|flag| flag.eq_ignore_ascii_case("\\Noselect"))
    }
}

/// A label of the destination account, created if missing.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImportLabel {
    pub name: String,
    pub color: String,
}

/// Where messages of a source folder land.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MailImportDestinations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<ImportLabel>,
}

/// Mapping of a source folder to its destinations.
///
/// The `checked` flag only lives client side: it never reaches the
/// backend.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MailImportMapping {
    pub source: String,
    pub destinations: MailImportDestinations,
    #[serde(skip_serializing, default)]
    pub checked: bool,
}

/// The mail part of the launch payload.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MailImporterPayload {
    #[serde(rename = "AddressID")]
    pub address_id: String,
    pub mapping: Vec<MailImportMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_label: Option<ImportLabel>,
    #[serde(
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<DateTime<Utc>>,
    pub custom_fields: u8,
}

impl MailImporterPayload {
    /// Computes the custom fields bitmap of this payload, compared to
    /// the default one.
    pub fn custom_fields(&self, initial: &MailImporterPayload, period: TimePeriod) -> u8 {
        let mut custom_fields = 0;

        if self.mapping != initial.mapping {
            custom_fields |= CUSTOM_FIELD_MAPPING;
        }

        if self.import_label != initial.import_label {
            custom_fields |= CUSTOM_FIELD_LABEL;
        }

        if period != TimePeriod::default() {
            custom_fields |= CUSTOM_FIELD_PERIOD;
        }

        custom_fields
    }

    /// Returns the payload sent to the backend: unchecked rows are
    /// stripped and the start time is derived from the period.
    pub fn into_submission(mut self, period: TimePeriod, now: DateTime<Utc>) -> Self {
        self.mapping.retain(|mapping| mapping.checked);
        self.start_time = period.start_time(now);
        self
    }
}

/// How far back messages are imported.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum TimePeriod {
    /// Since the creation of the external account.
    #[default]
    BigBang,
    LastYear,
    Last3Months,
    LastMonth,
}

impl TimePeriod {
    /// Converts the period into the date of the oldest message to
    /// import. [`TimePeriod::BigBang`] has no such date.
    pub fn start_time(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let months = match self {
            Self::BigBang => return None,
            Self::LastYear => 12,
            Self::Last3Months => 3,
            Self::LastMonth => 1,
        };

        now.checked_sub_months(Months::new(months))
    }
}
