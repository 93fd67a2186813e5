//! Handles settings for the application. Configuration is read from
//! `settings.toml` (optional) and `HEMKASSA__*` environment variables.
//!
//! ```toml
//! [app]
//! level = "info"
//!
//! [database]
//! sqlite = "hemkassa.db"
//!
//! [household]
//! person_a = "Alex"
//! person_b = "Sam"
//!
//! [preferences]
//! dir = ".hemkassa"
//! ```
use config::{Config, Environment, File};
use engine::views::PersonNames;
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite("hemkassa.db".to_string())
    }
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Self::Memory => String::from("sqlite::memory:"),
            Self::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Household {
    pub person_a: String,
    pub person_b: String,
}

impl Default for Household {
    fn default() -> Self {
        let names = PersonNames::default();
        Self {
            person_a: names.a,
            person_b: names.b,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Directory holding the stored view preferences.
    pub dir: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            dir: ".hemkassa".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub database: Database,
    pub household: Household,
    pub preferences: Preferences,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("HEMKASSA").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn person_names(&self) -> PersonNames {
        PersonNames {
            a: self.household.person_a.clone(),
            b: self.household.person_b.clone(),
        }
    }
}
