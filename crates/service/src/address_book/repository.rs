use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{AddressEntry, AddressPatch, NewAddressEntry};
use super::errors::AddressBookError;

/// Repository abstraction for address book persistence.
///
/// Reads go straight to the store. Writes go through an [`AddressBookUnit`]
/// obtained from [`AddressBookRepository::begin`], so that clearing the old
/// default and writing the new one commit or roll back together.
#[async_trait]
pub trait AddressBookRepository: Send + Sync {
    async fn list_by_user_and_city(&self, user_id: Uuid, city: &str) -> Result<Vec<AddressEntry>, AddressBookError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AddressEntry>, AddressBookError>;
    async fn find_default(&self, user_id: Uuid) -> Result<Option<AddressEntry>, AddressBookError>;
    /// 0-based `page_idx`; returns the page and the total row count for the user.
    async fn page_by_user(&self, user_id: Uuid, page_idx: u64, per_page: u64) -> Result<(Vec<AddressEntry>, u64), AddressBookError>;

    async fn begin(&self) -> Result<Box<dyn AddressBookUnit>, AddressBookError>;
}

/// Write side of one transaction. Dropping it without `commit` rolls back.
#[async_trait]
pub trait AddressBookUnit: Send {
    /// Clear the default flag on all of `user_id`'s rows; returns rows changed.
    async fn clear_default(&mut self, user_id: Uuid) -> Result<u64, AddressBookError>;
    async fn insert(&mut self, entry: NewAddressEntry) -> Result<AddressEntry, AddressBookError>;
    /// `Ok(None)` when no row has this id.
    async fn update_by_id(&mut self, id: Uuid, patch: AddressPatch) -> Result<Option<AddressEntry>, AddressBookError>;
    async fn commit(self: Box<Self>) -> Result<(), AddressBookError>;
}
