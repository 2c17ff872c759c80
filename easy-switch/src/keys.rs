//! # Keys
//!
//! Addresses of the destination account and access to their keys.
//! Key material itself never goes through this library: the
//! [`AddressKeys`] implementation owns the cryptography.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{api::CalendarKeyPayload, AnyBoxedError, Error};

/// Status of an address of the destination account.
///
/// The backend identifies statuses by number.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum AddressStatus {
    Disabled,
    #[default]
    Enabled,
    Deleting,
}

impl AddressStatus {
    pub fn code(&self) -> u8 {
        match self {
            Self::Disabled => 0,
            Self::Enabled => 1,
            Self::Deleting => 2,
        }
    }
}

impl TryFrom<u8> for AddressStatus {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Disabled),
            1 => Ok(Self::Enabled),
            2 => Ok(Self::Deleting),
            code => Err(Error::ParseAddressStatusError(code)),
        }
    }
}

impl Serialize for AddressStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for AddressStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u8::deserialize(deserializer)?;
        Self::try_from(code).map_err(serde::de::Error::custom)
    }
}

/// An address of the destination account.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Address {
    #[serde(rename = "ID")]
    pub id: String,
    pub email: String,
    pub status: AddressStatus,
    /// Whether the address can receive messages, `0` or `1` on the
    /// wire.
    #[serde(serialize_with = "bool_to_int", deserialize_with = "int_to_bool")]
    pub receive: bool,
}

fn bool_to_int<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*flag))
}

fn int_to_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(u8::deserialize(deserializer)? != 0)
}

impl Address {
    /// An address is active when it is enabled and can receive.
    pub fn is_active(&self) -> bool {
        self.status == AddressStatus::Enabled && self.receive
    }
}

/// Returns the active addresses, preserving their order.
pub fn active_addresses(addresses: &[Address]) -> Vec<&Address> {
    addresses.iter().filter(|addr| addr.is_active()).collect()
}

/// A key of an address, as seen by the import assistant.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AddressKey {
    pub id: String,
    pub primary: bool,
    /// Whether the private key could be decrypted in this session.
    pub decrypted: bool,
}

/// Returns the primary key among the given ones, falling back to the
/// first key when none is flagged as primary.
pub fn primary_key(keys: &[AddressKey]) -> Option<&AddressKey> {
    keys.iter().find(|key| key.primary).or_else(|| keys.first())
}

/// Access to address keys and to the cryptography needed to set up
/// the key of a freshly created calendar.
#[async_trait]
pub trait AddressKeys: Send + Sync {
    /// Lists the keys of the given address.
    async fn get_address_keys(
        &self,
        address_id: &str,
    ) -> Result<Vec<AddressKey>, AnyBoxedError>;

    /// Generates the key of the given calendar, encrypted and signed
    /// with the given primary address key.
    async fn generate_calendar_key(
        &self,
        calendar_id: &str,
        address: &Address,
        primary_key: &AddressKey,
    ) -> Result<CalendarKeyPayload, AnyBoxedError>;
}

#[cfg(test)]
mod tests {
    use super::{active_addresses, primary_key, Address, AddressKey, AddressStatus};

    #[test]
    fn parse_backend_address() {
        let json = r#"{"ID":"addr","Email":"john@proton.me","Status":1,"Receive":1}"#;
        let address: Address = serde_json::from_str(json).unwrap();
        assert_eq!(address.status, AddressStatus::Enabled);
        assert!(address.receive);
        assert!(address.is_active());

        let json = r#"{"ID":"addr","Email":"old@proton.me","Status":0,"Receive":0}"#;
        let address: Address = serde_json::from_str(json).unwrap();
        assert_eq!(address.status, AddressStatus::Disabled);
        assert!(!address.receive);
        assert_eq!(
            serde_json::to_string(&address).unwrap(),
            r#"{"ID":"addr","Email":"old@proton.me","Status":0,"Receive":0}"#
        );

        let json = r#"{"ID":"addr","Email":"x@proton.me","Status":7,"Receive":1}"#;
        assert!(serde_json::from_str::<Address>(json).is_err());
    }

    #[test]
    fn filter_active_addresses() {
        let addresses = [
            Address {
                id: "disabled".into(),
                status: AddressStatus::Disabled,
                receive: true,
                ..Default::default()
            },
            Address {
                id: "no-receive".into(),
                receive: false,
                ..Default::default()
            },
            Address {
                id: "active".into(),
                receive: true,
                ..Default::default()
            },
        ];

        let active = active_addresses(&addresses);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "active");
    }

    #[test]
    fn find_primary_key() {
        assert_eq!(primary_key(&[]), None);

        let keys = [
            AddressKey {
                id: "a".into(),
                ..Default::default()
            },
            AddressKey {
                id: "b".into(),
                primary: true,
                ..Default::default()
            },
        ];
        assert_eq!(primary_key(&keys).unwrap().id, "b");
        assert_eq!(primary_key(&keys[..1]).unwrap().id, "a");
    }
}
