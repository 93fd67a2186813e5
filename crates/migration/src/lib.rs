pub use sea_orm_migration::prelude::*;

mod m20251001_000000_household_entries;
mod m20251003_000000_entries_order_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251001_000000_household_entries::Migration),
            Box::new(m20251003_000000_entries_order_index::Migration),
        ]
    }
}
