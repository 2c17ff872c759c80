//! Creation of the destination calendars a mapping refers to by name.

use std::sync::Arc;

use futures::{stream::FuturesUnordered, StreamExt};
use tracing::{debug, warn};

use super::{CalendarDestination, CalendarImportMapping};
use crate::{
    api::{CreateCalendarRequest, ImportApi},
    color::random_color,
    keys::{active_addresses, primary_key, Address, AddressKey, AddressKeys},
    Error, Result,
};

/// Outcome of the creation of one calendar. The id is set as soon
/// as the calendar exists on the backend, even if its key could not
/// be set up.
type Creation = std::result::Result<CalendarImportMapping, (Error, Option<String>)>;

/// Creates calendars for mapping entries with a
/// [`CalendarDestination::ToBeCreated`] destination.
#[derive(Clone)]
pub struct CalendarProvisioner {
    api: Arc<dyn ImportApi>,
    keys: Arc<dyn AddressKeys>,
}

impl CalendarProvisioner {
    pub fn new(api: Arc<dyn ImportApi>, keys: Arc<dyn AddressKeys>) -> Self {
        Self { api, keys }
    }

    /// Creates one calendar per given entry, owned by the first
    /// active address, and sets up its key.
    ///
    /// Returns the entries with a to-be-created destination, resolved
    /// to the id of the new calendar. Other entries are ignored. If
    /// any creation fails, calendars created by this call are removed
    /// before the error is returned.
    pub async fn create_calendars(
        &self,
        addresses: &[Address],
        entries: &[CalendarImportMapping],
    ) -> Result<Vec<CalendarImportMapping>> {
        let address = *active_addresses(addresses)
            .first()
            .ok_or(Error::NoActiveAddressError)?;

        let keys = self
            .keys
            .get_address_keys(&address.id)
            .await
            .map_err(|err| Error::GetAddressKeysError(err, address.id.clone()))?;

        let primary_key = primary_key(&keys)
            .filter(|key| key.decrypted)
            .ok_or_else(|| Error::PrimaryAddressKeyNotDecryptedError(address.id.clone()))?;

        let entries: Vec<_> = entries
            .iter()
            .filter_map(|entry| match &entry.destination {
                CalendarDestination::ToBeCreated(name) => {
                    Some((entry.source.as_str(), name.as_str()))
                }
                CalendarDestination::Existing(_) => None,
            })
            .collect();

        debug!(count = entries.len(), address_id = address.id, "creating calendars");

        let creations: Vec<Creation> = FuturesUnordered::from_iter(
            entries
                .into_iter()
                .map(|(source, name)| self.create_calendar(address, primary_key, source, name)),
        )
        .collect()
        .await;

        let mut created_ids = Vec::new();
        let mut mapping = Vec::new();
        let mut first_err = None;

        for creation in creations {
            match creation {
                Ok(entry) => {
                    created_ids.push(entry.destination.to_string());
                    mapping.push(entry);
                }
                Err((err, id)) => {
                    created_ids.extend(id);
                    first_err.get_or_insert(err);
                }
            }
        }

        match first_err {
            None => Ok(mapping),
            Some(err) => {
                self.remove_calendars(&created_ids).await;
                Err(err)
            }
        }
    }

    async fn create_calendar(
        &self,
        address: &Address,
        primary_key: &AddressKey,
        source: &str,
        name: &str,
    ) -> Creation {
        let req = CreateCalendarRequest {
            name: name.to_owned(),
            color: random_color().to_owned(),
            description: String::new(),
            display: 1,
            address_id: address.id.clone(),
        };

        let calendar = self
            .api
            .create_calendar(&req)
            .await
            .map_err(|err| (Error::CreateCalendarError(err, name.to_owned()), None))?;

        let id = calendar.id;
        debug!(calendar_id = id, name, "calendar created");

        let key = self
            .keys
            .generate_calendar_key(&id, address, primary_key)
            .await
            .map_err(|err| {
                let err = Error::GenerateCalendarKeyError(err, name.to_owned());
                (err, Some(id.clone()))
            })?;

        self.api
            .create_calendar_key(&id, &key)
            .await
            .map_err(|err| {
                let err = Error::SetupCalendarKeyError(err, name.to_owned());
                (err, Some(id.clone()))
            })?;

        Ok(CalendarImportMapping {
            source: source.to_owned(),
            destination: CalendarDestination::Existing(id),
        })
    }

    /// Removes the given calendars, logging failures.
    pub async fn remove_calendars(&self, ids: &[String]) {
        if ids.is_empty() {
            return;
        }

        debug!(count = ids.len(), "removing created calendars");

        FuturesUnordered::from_iter(ids.iter().map(|id| async move {
            (id, self.api.remove_calendar(id).await)
        }))
        .for_each(|(id, res)| async move {
            if let Err(err) = res {
                warn!(calendar_id = id.as_str(), ?err, "cannot remove calendar, skipping it");
            }
        })
        .await
    }
}

/// Replaces entries of the mapping by their resolved version, matched
/// by source, preserving the order of the mapping.
pub fn resolve_mapping(
    mapping: &[CalendarImportMapping],
    resolved: &[CalendarImportMapping],
) -> Vec<CalendarImportMapping> {
    mapping
        .iter()
        .map(|entry| {
            if !entry.destination.is_to_be_created() {
                return entry.clone();
            }

            resolved
                .iter()
                .find(|resolved| resolved.source == entry.source)
                .cloned()
                .unwrap_or_else(|| entry.clone())
        })
        .collect()
}
