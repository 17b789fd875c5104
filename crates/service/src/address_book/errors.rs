use thiserror::Error;

use models::errors::ModelError;

use crate::geocoder::GeocodeError;

/// Business errors for address book workflows
#[derive(Debug, Error)]
pub enum AddressBookError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("invalid location {0}")]
    InvalidLocation(String),
    #[error("address not found")]
    NotFound,
    #[error("geocoding failed: {0}")]
    Geocode(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AddressBookError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AddressBookError::Validation(_) => 2001,
            AddressBookError::InvalidLocation(_) => 2002,
            AddressBookError::NotFound => 2003,
            AddressBookError::Geocode(_) => 2101,
            AddressBookError::Repository(_) => 2200,
        }
    }
}

impl From<ModelError> for AddressBookError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => AddressBookError::Validation(msg),
            ModelError::Db(msg) => AddressBookError::Repository(msg),
        }
    }
}

impl From<GeocodeError> for AddressBookError {
    fn from(e: GeocodeError) -> Self { AddressBookError::Geocode(e.to_string()) }
}

impl From<sea_orm::DbErr> for AddressBookError {
    fn from(e: sea_orm::DbErr) -> Self { AddressBookError::Repository(e.to_string()) }
}
