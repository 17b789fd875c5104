//! Create `address_book` table.
//!
//! One row per saved address; `user_id` is owned by the customer service
//! and carries no foreign key here.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AddressBook::Table)
                    .if_not_exists()
                    .col(uuid(AddressBook::Id).primary_key())
                    .col(uuid(AddressBook::UserId).not_null())
                    .col(string_len(AddressBook::Name, 64).not_null())
                    .col(string_len(AddressBook::Phone, 32).not_null())
                    .col(string_len(AddressBook::Province, 64).not_null())
                    .col(string_len(AddressBook::City, 64).not_null())
                    .col(string_len(AddressBook::County, 64).not_null())
                    .col(string_len(AddressBook::Address, 255).not_null())
                    .col(ColumnDef::new(AddressBook::Tag).string_len(32).null())
                    .col(ColumnDef::new(AddressBook::Lon).double().null())
                    .col(ColumnDef::new(AddressBook::Lat).double().null())
                    .col(boolean(AddressBook::IsDefault).not_null().default(false))
                    .col(timestamp_with_time_zone(AddressBook::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(AddressBook::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(AddressBook::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum AddressBook {
    Table,
    Id,
    UserId,
    Name,
    Phone,
    Province,
    City,
    County,
    Address,
    Tag,
    Lon,
    Lat,
    IsDefault,
    CreatedAt,
    UpdatedAt,
}
