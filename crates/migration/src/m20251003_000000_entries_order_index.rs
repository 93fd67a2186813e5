use sea_orm_migration::prelude::*;

use super::m20251001_000000_household_entries::HouseholdEntries;

const INDEX_NAME: &str = "idx-household_entries-sort-created_at";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name(INDEX_NAME)
                    .table(HouseholdEntries::Table)
                    .col(HouseholdEntries::Sort)
                    .col(HouseholdEntries::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(INDEX_NAME)
                    .table(HouseholdEntries::Table)
                    .to_owned(),
            )
            .await
    }
}
