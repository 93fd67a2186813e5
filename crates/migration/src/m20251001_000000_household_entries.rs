use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HouseholdEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HouseholdEntries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HouseholdEntries::Kind).string().not_null())
                    .col(ColumnDef::new(HouseholdEntries::Title).string().not_null())
                    .col(ColumnDef::new(HouseholdEntries::Amount).big_integer())
                    .col(ColumnDef::new(HouseholdEntries::Person).string().not_null())
                    .col(ColumnDef::new(HouseholdEntries::Category).string())
                    .col(
                        ColumnDef::new(HouseholdEntries::Temporary)
                            .boolean()
                            .default(false),
                    )
                    .col(ColumnDef::new(HouseholdEntries::Sort).big_integer())
                    .col(
                        ColumnDef::new(HouseholdEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HouseholdEntries::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum HouseholdEntries {
    Table,
    Id,
    Kind,
    Title,
    Amount,
    Person,
    Category,
    Temporary,
    Sort,
    CreatedAt,
}
