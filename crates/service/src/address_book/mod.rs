//! Address book: domain types, repository abstraction, and the business service.

pub mod domain;
pub mod errors;
pub mod location;
pub mod repository;
pub mod repo;
pub mod service;

pub use domain::{AddressEntry, AddressBookUpsert, CurrentUser};
pub use errors::AddressBookError;
pub use service::AddressBookService;
