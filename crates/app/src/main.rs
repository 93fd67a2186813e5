use clap::Parser;
use engine::{EntryStore, JsonFileStorage};
use migration::{Migrator, MigratorTrait};

use crate::{cli::Cli, error::Result};

mod cli;
mod commands;
mod error;
mod report;
mod settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = settings::Settings::new(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "hemkassa={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let url = cli
        .database_url
        .clone()
        .unwrap_or_else(|| settings.database.url());
    let db = match parse_database(&url).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!("failed to initialize database: {err}");
            return Err(err);
        }
    };

    let store = match EntryStore::builder().database(db).build().await {
        Ok(store) => store,
        Err(err) => {
            tracing::error!("failed to load entries from database: {err}");
            return Err(err.into());
        }
    };

    let ctx = commands::Context {
        store,
        storage: JsonFileStorage::new(&settings.preferences.dir),
        names: settings.person_names(),
    };

    match commands::run(&ctx, cli.command).await {
        Ok(output) => {
            print!("{output}");
            Ok(())
        }
        Err(err) => {
            tracing::error!("{err}");
            Err(err)
        }
    }
}

async fn parse_database(url: &str) -> Result<sea_orm::DatabaseConnection> {
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
