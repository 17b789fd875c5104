use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Lookup by owner and city
        manager
            .create_index(
                Index::create()
                    .name("idx_address_book_user_city")
                    .table(AddressBook::Table)
                    .col(AddressBook::UserId)
                    .col(AddressBook::City)
                    .to_owned(),
            )
            .await?;

        // At most one default address per user
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uniq_address_book_user_default \
                 ON address_book (user_id) WHERE is_default",
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS uniq_address_book_user_default")
            .await?;
        manager
            .drop_index(Index::drop().name("idx_address_book_user_city").table(AddressBook::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AddressBook { Table, UserId, City }
