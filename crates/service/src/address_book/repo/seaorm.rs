use sea_orm::{DatabaseConnection, DatabaseTransaction, EntityTrait, TransactionTrait};
use uuid::Uuid;

use models::address_book::{self, AddressBookChanges, NewAddressBook};

use crate::address_book::domain::{AddressEntry, AddressPatch, NewAddressEntry};
use crate::address_book::errors::AddressBookError;
use crate::address_book::repository::{AddressBookRepository, AddressBookUnit};

/// PostgreSQL-backed store over the `address_book` table.
#[derive(Clone)]
pub struct SeaOrmAddressBookRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAddressBookRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl AddressBookRepository for SeaOrmAddressBookRepository {
    async fn list_by_user_and_city(&self, user_id: Uuid, city: &str) -> Result<Vec<AddressEntry>, AddressBookError> {
        let rows = address_book::find_by_user_and_city(&self.db, user_id, city).await?;
        Ok(rows.into_iter().map(AddressEntry::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AddressEntry>, AddressBookError> {
        let row = address_book::Entity::find_by_id(id).one(&self.db).await?;
        Ok(row.map(AddressEntry::from))
    }

    async fn find_default(&self, user_id: Uuid) -> Result<Option<AddressEntry>, AddressBookError> {
        let row = address_book::find_default(&self.db, user_id).await?;
        Ok(row.map(AddressEntry::from))
    }

    async fn page_by_user(&self, user_id: Uuid, page_idx: u64, per_page: u64) -> Result<(Vec<AddressEntry>, u64), AddressBookError> {
        let (rows, total) = address_book::page_by_user(&self.db, user_id, page_idx, per_page).await?;
        Ok((rows.into_iter().map(AddressEntry::from).collect(), total))
    }

    async fn begin(&self) -> Result<Box<dyn AddressBookUnit>, AddressBookError> {
        let txn = self.db.begin().await?;
        Ok(Box::new(SeaOrmAddressBookUnit { txn }))
    }
}

/// Wraps a `DatabaseTransaction`; sea-orm rolls back on drop if not committed.
pub struct SeaOrmAddressBookUnit {
    txn: DatabaseTransaction,
}

#[async_trait::async_trait]
impl AddressBookUnit for SeaOrmAddressBookUnit {
    async fn clear_default(&mut self, user_id: Uuid) -> Result<u64, AddressBookError> {
        Ok(address_book::clear_default(&self.txn, user_id).await?)
    }

    async fn insert(&mut self, entry: NewAddressEntry) -> Result<AddressEntry, AddressBookError> {
        let new = NewAddressBook {
            user_id: entry.user_id,
            name: entry.name,
            phone: entry.phone,
            province: entry.province,
            city: entry.city,
            county: entry.county,
            address: entry.address,
            tag: entry.tag,
            lon: entry.lon,
            lat: entry.lat,
            is_default: entry.is_default,
        };
        let created = address_book::create(&self.txn, new).await?;
        Ok(created.into())
    }

    async fn update_by_id(&mut self, id: Uuid, patch: AddressPatch) -> Result<Option<AddressEntry>, AddressBookError> {
        let changes = AddressBookChanges {
            name: patch.name,
            phone: patch.phone,
            province: patch.province,
            city: patch.city,
            county: patch.county,
            address: patch.address,
            tag: patch.tag,
            lon: patch.lon,
            lat: patch.lat,
            is_default: patch.is_default,
        };
        let updated = address_book::update_by_id(&self.txn, id, changes).await?;
        Ok(updated.map(AddressEntry::from))
    }

    async fn commit(self: Box<Self>) -> Result<(), AddressBookError> {
        self.txn.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn entry(user_id: Uuid, is_default: bool) -> NewAddressEntry {
        NewAddressEntry {
            user_id,
            name: "Wang".into(),
            phone: "13700000000".into(),
            province: "Shanghai".into(),
            city: "021".into(),
            county: "Pudong".into(),
            address: "88 Century Ave".into(),
            is_default,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn uncommitted_unit_rolls_back() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let Ok(db) = get_db().await else { return Ok(()) };
        let repo = SeaOrmAddressBookRepository::new(db);
        let user_id = Uuid::new_v4();

        let mut unit = repo.begin().await?;
        let a = unit.insert(entry(user_id, true)).await?;
        unit.commit().await?;

        let mut unit = repo.begin().await?;
        unit.clear_default(user_id).await?;
        unit.insert(entry(user_id, true)).await?;
        drop(unit);

        let default = repo.find_default(user_id).await?.unwrap();
        assert_eq!(default.id, a.id);
        let page = repo.page_by_user(user_id, 0, 10).await?;
        assert_eq!(page.1, 1);

        address_book::Entity::delete_by_id(a.id).exec(&repo.db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn committed_unit_moves_default() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let Ok(db) = get_db().await else { return Ok(()) };
        let repo = SeaOrmAddressBookRepository::new(db);
        let user_id = Uuid::new_v4();

        let mut unit = repo.begin().await?;
        let a = unit.insert(entry(user_id, true)).await?;
        let b = unit.insert(entry(user_id, false)).await?;
        unit.commit().await?;

        let mut unit = repo.begin().await?;
        assert_eq!(unit.clear_default(user_id).await?, 1);
        unit.update_by_id(b.id, AddressPatch::default_flag(true)).await?.unwrap();
        unit.commit().await?;

        assert_eq!(repo.find_default(user_id).await?.unwrap().id, b.id);
        assert!(!repo.find_by_id(a.id).await?.unwrap().is_default);
        assert_eq!(repo.list_by_user_and_city(user_id, "021").await?.len(), 2);

        address_book::Entity::delete_by_id(a.id).exec(&repo.db).await?;
        address_book::Entity::delete_by_id(b.id).exec(&repo.db).await?;
        Ok(())
    }
}
