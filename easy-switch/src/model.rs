//! # Model
//!
//! State of the import assistant: the current step, what was
//! discovered on the provider side and the payload being built.

use serde::{Deserialize, Serialize};

use crate::{
    api::{CalendarImporter, ContactsImporter, MailImporter},
    calendar::{CalendarImporterPayload, ImportedCalendar},
    consent::OAuthProps,
    contacts::{ContactsData, ContactsImporterPayload},
    mail::{ImportedMailFolder, MailImporterPayload, TimePeriod},
    ImportType,
};

/// Step of the import assistant.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ImportStep {
    /// Products are being selected, before the consent screen.
    #[default]
    Authentication,
    /// Importers exist, the payload is being customized.
    SelectImportType,
    /// The import task started.
    Success,
}

/// What the mail importer found on the provider side.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MailData {
    pub importer_id: String,
    pub selected_period: TimePeriod,
    pub provider_folders: Vec<ImportedMailFolder>,
}

/// What the calendar importer found on the provider side.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CalendarData {
    pub importer_id: String,
    pub provider_calendars: Vec<ImportedCalendar>,
}

/// Per-product data discovered on the provider side.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ImportData {
    pub mail: MailData,
    pub calendar: CalendarData,
    pub contacts: ContactsData,
}

impl ImportData {
    pub fn importer_id(&self, kind: ImportType) -> &str {
        match kind {
            ImportType::Mail => &self.mail.importer_id,
            ImportType::Calendar => &self.calendar.importer_id,
            ImportType::Contacts => &self.contacts.importer_id,
        }
    }

    /// Records the given importer.
    pub fn apply(&mut self, importer: CreatedImporter) {
        match importer {
            CreatedImporter::Mail(importer) => {
                self.mail.importer_id = importer.id;
                self.mail.provider_folders = importer.folders;
            }
            CreatedImporter::Calendar(importer) => {
                self.calendar.importer_id = importer.id;
                self.calendar.provider_calendars = importer.calendars;
            }
            CreatedImporter::Contacts(importer) => {
                self.contacts.importer_id = importer.id;
                self.contacts.num_contacts = importer.num_contacts;
                self.contacts.num_contact_groups = importer.num_groups;
            }
        }
    }
}

/// An importer created on the backend, tagged by product.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CreatedImporter {
    Mail(MailImporter),
    Calendar(CalendarImporter),
    Contacts(ContactsImporter),
}

impl CreatedImporter {
    pub fn kind(&self) -> ImportType {
        match self {
            Self::Mail(_) => ImportType::Mail,
            Self::Calendar(_) => ImportType::Calendar,
            Self::Contacts(_) => ImportType::Contacts,
        }
    }
}

/// The payload starting the import task.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LaunchImportPayload {
    #[serde(rename = "ImporterID")]
    pub importer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail: Option<MailImporterPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar: Option<CalendarImporterPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<ContactsImporterPayload>,
}

impl LaunchImportPayload {
    pub fn has(&self, kind: ImportType) -> bool {
        match kind {
            ImportType::Mail => self.mail.is_some(),
            ImportType::Calendar => self.calendar.is_some(),
            ImportType::Contacts => self.contacts.is_some(),
        }
    }
}

/// The whole state of the import assistant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportModel {
    pub step: ImportStep,
    /// Address messages are imported to.
    pub address_id: String,
    /// Address of the imported account, as reported by the token.
    pub imported_email: String,
    pub data: ImportData,
    pub payload: LaunchImportPayload,
    /// The default payload, used to detect user customizations.
    pub initial_payload: LaunchImportPayload,
    pub oauth_props: Option<OAuthProps>,
    /// Products granted on the consent screen.
    pub token_scope: Vec<ImportType>,
    pub is_payload_invalid: bool,
}

impl ImportModel {
    pub fn new(address_id: impl ToString) -> Self {
        Self {
            address_id: address_id.to_string(),
            ..Default::default()
        }
    }
}

/// What the import assistant is waiting for.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LoadingState {
    pub oauth: bool,
    pub create_calendars: bool,
    pub start_import_task: bool,
    pub calendars_to_be_created: usize,
    pub created_calendars: usize,
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        self.oauth || self.create_calendars || self.start_import_task
    }
}
