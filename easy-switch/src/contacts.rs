//! # Contacts
//!
//! Contacts imports need no customization: the payload is empty and
//! the provider side only reports counts.

use serde::{Deserialize, Serialize};

/// The contacts part of the launch payload.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ContactsImporterPayload {}

/// What the contacts importer found on the provider side.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ContactsData {
    pub importer_id: String,
    pub num_contacts: u64,
    pub num_contact_groups: u64,
}
