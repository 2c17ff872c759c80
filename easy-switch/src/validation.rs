//! # Validation
//!
//! Checks run against the payload before the import can be
//! submitted. Errors are collected rather than returned early, so
//! that every conflict can be shown at once.

use serde::{Deserialize, Serialize};

use crate::{calendar::CalendarImportMapping, mail::MailImportMapping};

/// Maximum number of checked folders of a mail import.
pub const MAX_FOLDERS: usize = 500;

/// Maximum length of a folder path segment or of a label name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum number of calendars a user can own.
pub const MAX_CALENDARS_PER_USER: usize = 10;

/// Names reserved by system folders of the destination account.
pub const RESERVED_NAMES: [&str; 13] = [
    "inbox",
    "drafts",
    "outbox",
    "sent",
    "starred",
    "archive",
    "spam",
    "trash",
    "all mail",
    "all drafts",
    "all sent",
    "snoozed",
    "scheduled",
];

/// A conflict preventing the payload from being submitted.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayloadError {
    MaxFoldersLimitReached,
    FolderNamesTooLong,
    LabelNamesTooLong,
    UnavailableNames,
    MaxCalendarsLimitReached,
}

/// Whether the given name is reserved, ignoring case and surrounding
/// whitespace.
pub fn is_reserved_name(name: &str) -> bool {
    let name = name.trim().to_lowercase();
    RESERVED_NAMES.contains(&name.as_str())
}

/// Validates the checked rows of a mail mapping.
pub fn mail_mapping_errors(mapping: &[MailImportMapping]) -> Vec<PayloadError> {
    let checked: Vec<_> = mapping.iter().filter(|row| row.checked).collect();
    let mut errors = Vec::new();

    if checked.len() > MAX_FOLDERS {
        errors.push(PayloadError::MaxFoldersLimitReached);
    }

    let folder_too_long = checked.iter().any(|row| {
        row.destinations
            .folder_path
            .as_deref()
            .map(|path| path.split('/').any(|seg| seg.chars().count() > MAX_NAME_LENGTH))
            .unwrap_or_default()
    });

    if folder_too_long {
        errors.push(PayloadError::FolderNamesTooLong);
    }

    let labels = || checked.iter().flat_map(|row| row.destinations.labels.iter());

    if labels().any(|label| label.name.chars().count() > MAX_NAME_LENGTH) {
        errors.push(PayloadError::LabelNamesTooLong);
    }

    if labels().any(|label| is_reserved_name(&label.name)) {
        errors.push(PayloadError::UnavailableNames);
    }

    errors
}

/// Validates a calendar mapping against the calendars the user
/// already owns.
pub fn calendar_errors(
    mapping: &[CalendarImportMapping],
    existing_calendars_count: usize,
) -> Vec<PayloadError> {
    let to_be_created = mapping
        .iter()
        .filter(|entry| entry.destination.is_to_be_created())
        .count();

    if to_be_created + existing_calendars_count > MAX_CALENDARS_PER_USER {
        vec![PayloadError::MaxCalendarsLimitReached]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        calendar::{CalendarDestination, CalendarImportMapping},
        mail::{ImportLabel, MailImportDestinations, MailImportMapping},
    };

    use super::{calendar_errors, mail_mapping_errors, PayloadError, MAX_FOLDERS};

    fn label_row(name: &str, checked: bool) -> MailImportMapping {
        MailImportMapping {
            source: name.into(),
            destinations: MailImportDestinations {
                labels: vec![ImportLabel {
                    name: name.into(),
                    color: "#8080FF".into(),
                }],
                ..Default::default()
            },
            checked,
        }
    }

    fn folder_row(path: &str) -> MailImportMapping {
        MailImportMapping {
            source: path.into(),
            destinations: MailImportDestinations {
                folder_path: Some(path.into()),
                ..Default::default()
            },
            checked: true,
        }
    }

    #[test]
    fn valid_mail_mapping() {
        let mapping = [label_row("Work", true), folder_row("Inbox")];
        assert!(mail_mapping_errors(&mapping).is_empty());
    }

    #[test]
    fn too_many_folders() {
        let mut mapping: Vec<_> = (0..MAX_FOLDERS)
            .map(|i| label_row(&format!("label {i}"), true))
            .collect();
        mapping.push(label_row("unchecked", false));
        assert!(mail_mapping_errors(&mapping).is_empty());

        mapping.push(label_row("one more", true));
        assert_eq!(
            mail_mapping_errors(&mapping),
            vec![PayloadError::MaxFoldersLimitReached]
        );
    }

    #[test]
    fn names_too_long() {
        let long = "a".repeat(101);

        let mapping = [folder_row(&format!("Parent/{long}"))];
        assert_eq!(
            mail_mapping_errors(&mapping),
            vec![PayloadError::FolderNamesTooLong]
        );

        let mapping = [label_row(&long, true)];
        assert_eq!(
            mail_mapping_errors(&mapping),
            vec![PayloadError::LabelNamesTooLong]
        );

        let mapping = [label_row(&long, false)];
        assert!(mail_mapping_errors(&mapping).is_empty());
    }

    #[test]
    fn reserved_label_names() {
        let mapping = [label_row("All Mail", true)];
        assert_eq!(
            mail_mapping_errors(&mapping),
            vec![PayloadError::UnavailableNames]
        );

        let mapping = [label_row(" INBOX ", true)];
        assert_eq!(
            mail_mapping_errors(&mapping),
            vec![PayloadError::UnavailableNames]
        );
    }

    #[test]
    fn calendar_limit() {
        let mapping: Vec<_> = (0..3)
            .map(|i| CalendarImportMapping {
                source: format!("source-{i}"),
                destination: CalendarDestination::ToBeCreated(format!("cal {i}")),
            })
            .chain([CalendarImportMapping {
                source: "merged".into(),
                destination: CalendarDestination::Existing("existing".into()),
            }])
            .collect();

        assert!(calendar_errors(&mapping, 7).is_empty());
        assert_eq!(
            calendar_errors(&mapping, 8),
            vec![PayloadError::MaxCalendarsLimitReached]
        );
    }
}
