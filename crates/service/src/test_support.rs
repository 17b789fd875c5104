#![cfg(test)]
use std::sync::Arc;

use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::connect;

use crate::address_book::repo::memory::MemoryAddressBookRepository;
use crate::address_book::{AddressBookService, AddressBookUpsert};
use crate::geocoder::mock::StaticGeocoder;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Fresh PostgreSQL connection with migrations applied.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    MIGRATED
        .get_or_try_init(|| async {
            let db = connect().await?;
            migration::Migrator::up(&db, None).await?;
            Ok::<(), anyhow::Error>(())
        })
        .await?;
    connect().await
}

/// Service over a fresh in-memory store; the store handle is returned for assertions.
pub fn service_with(geocoder: Arc<StaticGeocoder>) -> (AddressBookService, MemoryAddressBookRepository) {
    let repo = MemoryAddressBookRepository::new();
    let svc = AddressBookService::new(Arc::new(repo.clone()), geocoder);
    (svc, repo)
}

pub fn sample_upsert(city: &str, is_default: bool) -> AddressBookUpsert {
    AddressBookUpsert {
        name: "Li Lei".into(),
        phone: "13800000000".into(),
        province: "Beijing".into(),
        city: city.into(),
        county: "Chaoyang".into(),
        address: "1 Jianguo Rd".into(),
        tag: None,
        location: None,
        is_default,
    }
}
