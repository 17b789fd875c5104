//! Geocoding: turn a free-text address into a `"longitude,latitude"` string.

pub mod amap;

use async_trait::async_trait;
use thiserror::Error;

pub use amap::AmapGeocoder;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("network error: {0}")]
    Network(String),
    #[error("provider error (status {status}): {info}")]
    Provider { status: String, info: String },
    #[error("parse error: {0}")]
    Parse(String),
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the provider knows no location for the address.
    async fn resolve(&self, address: &str) -> Result<Option<String>, GeocodeError>;
}

/// Canned geocoder for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct StaticGeocoder {
        answers: HashMap<String, String>,
        fallback: Option<String>,
        fail: bool,
        calls: Mutex<Vec<String>>,
    }

    impl StaticGeocoder {
        /// Answer every address with `location`.
        pub fn always(location: &str) -> Self {
            Self { fallback: Some(location.to_string()), ..Self::default() }
        }

        /// Know nothing about any address.
        pub fn empty() -> Self { Self::default() }

        /// Fail every call with a network error.
        pub fn failing() -> Self {
            Self { fail: true, ..Self::default() }
        }

        pub fn with_answer(mut self, address: &str, location: &str) -> Self {
            self.answers.insert(address.to_string(), location.to_string());
            self
        }

        /// Addresses passed to `resolve`, in call order.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl Geocoder for StaticGeocoder {
        async fn resolve(&self, address: &str) -> Result<Option<String>, GeocodeError> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(address.to_string());
            }
            if self.fail {
                return Err(GeocodeError::Network("geocoder unavailable".into()));
            }
            Ok(self.answers.get(address).cloned().or_else(|| self.fallback.clone()))
        }
    }
}
