//! # Product
//!
//! Products that can be imported from an external account, and the
//! map of products the user wants to import.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of data imported from the external account.
///
/// Serialized the way the backend names products (`Mail`,
/// `Calendar`, `Contacts`).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum ImportType {
    Mail,
    Calendar,
    Contacts,
}

impl ImportType {
    /// Every product, in display order.
    pub const ALL: [ImportType; 3] = [Self::Mail, Self::Calendar, Self::Contacts];
}

impl fmt::Display for ImportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mail => write!(f, "mail"),
            Self::Calendar => write!(f, "calendar"),
            Self::Contacts => write!(f, "contacts"),
        }
    }
}

/// Map of products the user wants to import.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CheckedProducts {
    pub mail: bool,
    pub calendar: bool,
    pub contacts: bool,
}

impl CheckedProducts {
    /// Builds the map from the products checked by default.
    pub fn from_defaults(defaults: impl IntoIterator<Item = ImportType>) -> Self {
        let mut checked = Self::default();
        for kind in defaults {
            checked.set(kind, true);
        }
        checked
    }

    pub fn is_checked(&self, kind: ImportType) -> bool {
        match kind {
            ImportType::Mail => self.mail,
            ImportType::Calendar => self.calendar,
            ImportType::Contacts => self.contacts,
        }
    }

    pub fn set(&mut self, kind: ImportType, checked: bool) {
        match kind {
            ImportType::Mail => self.mail = checked,
            ImportType::Calendar => self.calendar = checked,
            ImportType::Contacts => self.contacts = checked,
        }
    }

    pub fn toggle(&mut self, kind: ImportType) {
        self.set(kind, !self.is_checked(kind))
    }

    /// Returns the checked products, in display order.
    pub fn selected(&self) -> Vec<ImportType> {
        ImportType::ALL
            .into_iter()
            .filter(|kind| self.is_checked(*kind))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        !(self.mail || self.calendar || self.contacts)
    }
}

#[cfg(test)]
mod tests {
    use super::{CheckedProducts, ImportType};

    #[test]
    fn toggle_products() {
        let mut checked = CheckedProducts::from_defaults([ImportType::Calendar]);
        assert_eq!(checked.selected(), vec![ImportType::Calendar]);

        checked.toggle(ImportType::Contacts);
        checked.toggle(ImportType::Mail);
        assert_eq!(checked.selected(), ImportType::ALL.to_vec());

        checked.toggle(ImportType::Mail);
        checked.toggle(ImportType::Calendar);
        checked.toggle(ImportType::Contacts);
        assert!(checked.is_empty());
    }

    #[test]
    fn serialize_like_backend() {
        let json = serde_json::to_string(&ImportType::ALL).unwrap();
        assert_eq!(json, r#"["Mail","Calendar","Contacts"]"#);
    }
}
