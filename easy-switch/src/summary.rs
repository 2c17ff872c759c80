//! # Summary
//!
//! Plain-text summaries of what is about to be imported, one per
//! product.

use crate::{
    calendar::CalendarImporterPayload,
    contacts::ContactsData,
    mail::{MailImporterPayload, TimePeriod},
    model::{CalendarData, MailData},
};

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

fn period_fragment(period: TimePeriod) -> &'static str {
    match period {
        TimePeriod::BigBang => "account creation date",
        TimePeriod::LastYear => "the last 12 months",
        TimePeriod::Last3Months => "the last 3 months",
        TimePeriod::LastMonth => "the last month",
    }
}

pub fn mail_summary(data: &MailData, payload: &MailImporterPayload) -> String {
    let total = data.provider_folders.len();
    let selected = payload.mapping.iter().filter(|row| row.checked).count();

    let messages = if total == selected {
        format!("Import all messages from {total} labels")
    } else {
        format!("Import all messages from {selected} out of {total} labels")
    };

    let period = period_fragment(data.selected_period);
    let label = payload
        .import_label
        .as_ref()
        .map(|label| label.name.as_str())
        .unwrap_or_default();

    format!("{messages} since {period} and label them as {label}")
}

pub fn calendar_summary(data: &CalendarData, payload: &CalendarImporterPayload) -> String {
    let total = data.provider_calendars.len();
    let selected = payload.mapping.len();
    let to_be_created = payload.to_be_created().len();
    let to_be_merged = selected - to_be_created;

    let calendars = if total == 1 {
        format!("Import {selected} of {total} calendar")
    } else {
        format!("Import {selected} of {total} calendars")
    };

    let mut fragments = Vec::new();

    if to_be_created > 0 {
        let created = plural(to_be_created, "new calendar", "new calendars");
        fragments.push(format!("Create {created}"));
    }

    if to_be_merged > 0 {
        fragments.push(plural(to_be_merged, "merged calendar", "merged calendars"));
    }

    if fragments.is_empty() {
        return calendars;
    }

    format!("{calendars}: {}", fragments.join(" and "))
}

pub fn contacts_summary(data: &ContactsData) -> String {
    let contacts = plural(data.num_contacts as usize, "contact", "contacts");
    let groups = plural(
        data.num_contact_groups as usize,
        "contact group",
        "contact groups",
    );

    format!("Import {contacts} and {groups}")
}
