use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::AddressBookError;
use super::location::Coordinates;

/// Identity of the caller, resolved upstream and passed into every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub user_id: Uuid,
}

impl CurrentUser {
    pub fn new(user_id: Uuid) -> Self { Self { user_id } }
}

/// A saved address as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub phone: String,
    pub province: String,
    pub city: String,
    pub county: String,
    pub address: String,
    pub tag: Option<String>,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
    #[serde(with = "default_flag")]
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressBookUpsert {
    pub name: String,
    pub phone: String,
    pub province: String,
    pub city: String,
    pub county: String,
    pub address: String,
    #[serde(default)]
    pub tag: Option<String>,
    /// `"longitude,latitude"`; geocoded from the full address when absent.
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, with = "default_flag")]
    pub is_default: bool,
}

impl AddressBookUpsert {
    /// Province, city, county and street text concatenated as-is.
    pub fn full_address(&self) -> String {
        format!("{}{}{}{}", self.province, self.city, self.county, self.address)
    }

    pub fn validate(&self) -> Result<(), AddressBookError> {
        let required = [
            ("name", &self.name),
            ("phone", &self.phone),
            ("province", &self.province),
            ("city", &self.city),
            ("county", &self.county),
            ("address", &self.address),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(AddressBookError::Validation(format!("{field} required")));
            }
        }
        Ok(())
    }

    /// Caller-supplied location, `None` when missing or blank.
    pub fn supplied_location(&self) -> Option<&str> {
        self.location.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Values for a new row. The store assigns `id` and timestamps.
#[derive(Debug, Clone, Default)]
pub struct NewAddressEntry {
    pub user_id: Uuid,
    pub name: String,
    pub phone: String,
    pub province: String,
    pub city: String,
    pub county: String,
    pub address: String,
    pub tag: Option<String>,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
    pub is_default: bool,
}

impl NewAddressEntry {
    pub fn from_upsert(user_id: Uuid, input: AddressBookUpsert, coords: Option<Coordinates>) -> Self {
        Self {
            user_id,
            name: input.name,
            phone: input.phone,
            province: input.province,
            city: input.city,
            county: input.county,
            address: input.address,
            tag: input.tag,
            lon: coords.map(|c| c.lon),
            lat: coords.map(|c| c.lat),
            is_default: input.is_default,
        }
    }
}

/// Update by id: only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub address: Option<String>,
    pub tag: Option<String>,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
    pub is_default: Option<bool>,
}

impl AddressPatch {
    pub fn from_upsert(input: AddressBookUpsert, coords: Option<Coordinates>) -> Self {
        Self {
            name: Some(input.name),
            phone: Some(input.phone),
            province: Some(input.province),
            city: Some(input.city),
            county: Some(input.county),
            address: Some(input.address),
            tag: input.tag,
            lon: coords.map(|c| c.lon),
            lat: coords.map(|c| c.lat),
            is_default: Some(input.is_default),
        }
    }

    pub fn default_flag(flag: bool) -> Self {
        Self { is_default: Some(flag), ..Self::default() }
    }

    /// Apply onto an existing entry; used by the in-memory store.
    pub fn apply_to(self, entry: &mut AddressEntry) {
        if let Some(v) = self.name { entry.name = v; }
        if let Some(v) = self.phone { entry.phone = v; }
        if let Some(v) = self.province { entry.province = v; }
        if let Some(v) = self.city { entry.city = v; }
        if let Some(v) = self.county { entry.county = v; }
        if let Some(v) = self.address { entry.address = v; }
        if let Some(v) = self.tag { entry.tag = Some(v); }
        if let Some(v) = self.lon { entry.lon = Some(v); }
        if let Some(v) = self.lat { entry.lat = Some(v); }
        if let Some(v) = self.is_default { entry.is_default = v; }
    }
}

impl From<models::address_book::Model> for AddressEntry {
    fn from(m: models::address_book::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            name: m.name,
            phone: m.phone,
            province: m.province,
            city: m.city,
            county: m.county,
            address: m.address,
            tag: m.tag,
            lon: m.lon,
            lat: m.lat,
            is_default: m.is_default,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

/// The default flag travels as `0` / `1` on the wire.
pub mod default_flag {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(flag: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(u8::from(*flag))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        match u8::deserialize(d)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(de::Error::custom(format!("default flag must be 0 or 1, got {other}"))),
        }
    }
}
