//! Default mail mapping and import label, built from the folders
//! discovered on the provider side.

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::color::random_color;

use super::{ImportLabel, ImportedMailFolder, MailImportDestinations, MailImportMapping};

/// Builds the default mapping: one checked row per selectable
/// provider folder.
///
/// System folders keep their system destination, every other folder
/// becomes a label named after its provider path.
pub fn default_mapping(folders: &[ImportedMailFolder]) -> Vec<MailImportMapping> {
    folders
        .iter()
        .filter(|folder| {
            let selectable = folder.is_selectable();
            if !selectable {
                trace!(source = folder.source, "skipping non selectable folder");
            }
            selectable
        })
        .map(|folder| {
            let destinations = match &folder.destination_folder {
                Some(path) => MailImportDestinations {
                    folder_path: Some(path.clone()),
                    labels: Vec::new(),
                },
                None => MailImportDestinations {
                    folder_path: None,
                    labels: vec![ImportLabel {
                        name: folder.source.clone(),
                        color: random_color().to_owned(),
                    }],
                },
            };

            MailImportMapping {
                source: folder.source.clone(),
                destinations,
                checked: true,
            }
        })
        .collect()
}

/// Builds the label added to every imported message, named after the
/// domain of the imported account and the current date.
pub fn default_import_label(imported_email: &str, now: DateTime<Utc>) -> ImportLabel {
    let domain = imported_email
        .rsplit_once('@')
        .map(|(_, domain)| domain)
        .unwrap_or(imported_email);

    ImportLabel {
        name: format!("{domain} {}", now.format("%d-%m-%Y %H:%M")),
        color: random_color().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::{color::LABEL_COLORS, mail::ImportedMailFolder};

    use super::{default_import_label, default_mapping};

    #[test]
    fn build_default_mapping() {
        let folders = [
            ImportedMailFolder {
                source: "INBOX".into(),
                destination_folder: Some("Inbox".into()),
                ..Default::default()
            },
            ImportedMailFolder {
                source: "[Gmail]".into(),
                flags: vec!["\\Noselect".into()],
                ..Default::default()
            },
            ImportedMailFolder {
                source: "Work/Projects".into(),
                separator: "/".into(),
                ..Default::default()
            },
        ];

        let mapping = default_mapping(&folders);
        assert_eq!(mapping.len(), 2);
        assert!(mapping.iter().all(|row| row.checked));

        assert_eq!(mapping[0].source, "INBOX");
        assert_eq!(
            mapping[0].destinations.folder_path.as_deref(),
            Some("Inbox")
        );
        assert!(mapping[0].destinations.labels.is_empty());

        assert_eq!(mapping[1].source, "Work/Projects");
        assert_eq!(mapping[1].destinations.folder_path, None);
        assert_eq!(mapping[1].destinations.labels[0].name, "Work/Projects");
        assert!(LABEL_COLORS.contains(&mapping[1].destinations.labels[0].color.as_str()));
    }

    #[test]
    fn build_default_import_label() {
        let now = Utc.with_ymd_and_hms(2022, 3, 7, 9, 5, 0).unwrap();

        let label = default_import_label("john@gmail.com", now);
        assert_eq!(label.name, "gmail.com 07-03-2022 09:05");

        let label = default_import_label("john", now);
        assert_eq!(label.name, "john 07-03-2022 09:05");
    }
}
