//! # Calendar
//!
//! Module dedicated to calendar imports: calendars discovered on the
//! provider side, their mapping to calendars of the destination
//! account and the provisioning of calendars that do not exist yet.

pub mod provision;

use std::fmt;

use serde::{Deserialize, Serialize};

#[doc(inline)]
pub use self::provision::CalendarProvisioner;

/// Prefix marking, on the wire, a destination calendar that still
/// needs to be created.
pub const CALENDAR_TO_BE_CREATED_PREFIX: &str = "###TO_BE_CREATED###";

/// A calendar of the external account.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImportedCalendar {
    #[serde(rename = "ID")]
    pub id: String,
    /// Name of the calendar on the provider side.
    pub source: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub primary: bool,
}

/// Where events of a provider calendar land.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CalendarDestination {
    /// An existing calendar, by id.
    Existing(String),
    /// A calendar to create, by name.
    ToBeCreated(String),
}

impl CalendarDestination {
    pub fn is_to_be_created(&self) -> bool {
        matches!(self, Self::ToBeCreated(_))
    }
}

impl From<String> for CalendarDestination {
    fn from(destination: String) -> Self {
        match destination.strip_prefix(CALENDAR_TO_BE_CREATED_PREFIX) {
            Some(name) => Self::ToBeCreated(name.to_owned()),
            None => Self::Existing(destination),
        }
    }
}

impl From<CalendarDestination> for String {
    fn from(destination: CalendarDestination) -> Self {
        destination.to_string()
    }
}

impl fmt::Display for CalendarDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Existing(id) => write!(f, "{id}"),
            Self::ToBeCreated(name) => write!(f, "{CALENDAR_TO_BE_CREATED_PREFIX}{name}"),
        }
    }
}

/// Mapping of a provider calendar (by id) to its destination.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CalendarImportMapping {
    pub source: String,
    pub destination: CalendarDestination,
}

/// The calendar part of the launch payload.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CalendarImporterPayload {
    pub mapping: Vec<CalendarImportMapping>,
}

impl CalendarImporterPayload {
    /// Builds the default payload: every provider calendar goes to a
    /// new calendar of the same name.
    pub fn from_provider_calendars(calendars: &[ImportedCalendar]) -> Self {
        let mapping = calendars
            .iter()
            .map(|calendar| CalendarImportMapping {
                source: calendar.id.clone(),
                destination: CalendarDestination::ToBeCreated(calendar.source.clone()),
            })
            .collect();

        Self { mapping }
    }

    /// Returns the entries whose destination still needs to be
    /// created.
    pub fn to_be_created(&self) -> Vec<&CalendarImportMapping> {
        self.mapping
            .iter()
            .filter(|entry| entry.destination.is_to_be_created())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{CalendarDestination, CalendarImporterPayload, ImportedCalendar};

    #[test]
    fn destination_wire_format() {
        let destination = CalendarDestination::ToBeCreated("Family".into());
        assert_eq!(
            serde_json::to_string(&destination).unwrap(),
            r####""###TO_BE_CREATED###Family""####
        );

        let destination: CalendarDestination = serde_json::from_str(r#""cal-id""#).unwrap();
        assert_eq!(destination, CalendarDestination::Existing("cal-id".into()));

        let destination: CalendarDestination =
            serde_json::from_str(r####""###TO_BE_CREATED###Work""####).unwrap();
        assert_eq!(destination, CalendarDestination::ToBeCreated("Work".into()));
    }

    #[test]
    fn build_default_payload() {
        let calendars = [
            ImportedCalendar {
                id: "g-1".into(),
                source: "john@gmail.com".into(),
                primary: true,
                ..Default::default()
            },
            ImportedCalendar {
                id: "g-2".into(),
                source: "Holidays".into(),
                ..Default::default()
            },
        ];

        let payload = CalendarImporterPayload::from_provider_calendars(&calendars);
        assert_eq!(payload.to_be_created().len(), 2);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["Mapping"][1]["Source"], "g-2");
        assert_eq!(json["Mapping"][1]["Destination"], "###TO_BE_CREATED###Holidays");
    }
}
