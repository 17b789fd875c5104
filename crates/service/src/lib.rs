//! Service layer for the customer address book.
//! - Business rules (single default per user, coordinate derivation) live here.
//! - Persistence sits behind `AddressBookRepository`; geocoding behind `Geocoder`.
//! - Reuses entity definitions and row helpers from the `models` crate.

pub mod address_book;
pub mod geocoder;
pub mod pagination;
#[cfg(test)]
pub mod test_support;

pub use address_book::AddressBookService;
