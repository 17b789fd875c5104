//! Migrator for the address book schema.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20230706_000001_create_address_book;
mod m20230706_000002_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20230706_000001_create_address_book::Migration),
            // Indexes should always be applied last
            Box::new(m20230706_000002_add_indexes::Migration),
        ]
    }
}
