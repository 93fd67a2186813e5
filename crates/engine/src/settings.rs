//! View preferences for the cost and net charts.
//!
//! The preferences are a plain struct handed to the aggregation functions.
//! Persistence goes through an injected [`SettingsStorage`], keyed by
//! [`SETTINGS_KEY`]; the stored blob is a flat camelCase JSON object.

use std::{
    collections::HashMap,
    fmt, fs,
    path::PathBuf,
    str::FromStr,
    sync::Mutex,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{EngineError, ResultEngine};

/// Versioned storage key of the preference blob.
pub const SETTINGS_KEY: &str = "budget.settings.v6";

/// Granularity of the cost chart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostView {
    Total,
    #[default]
    Grouped,
    Detailed,
}

impl CostView {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Total => "total",
            Self::Grouped => "grouped",
            Self::Detailed => "detailed",
        }
    }
}

impl fmt::Display for CostView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CostView {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "total" => Ok(Self::Total),
            "grouped" => Ok(Self::Grouped),
            "detailed" => Ok(Self::Detailed),
            other => Err(EngineError::Settings(format!("unknown cost view: {other}"))),
        }
    }
}

/// Which entries count towards an aggregate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFilter {
    /// Count entries flagged as temporary.
    pub include_temporary: bool,
    /// Count loan amortization as a cost.
    pub include_amortization_as_expense: bool,
    /// Count the savings group as a cost.
    pub include_savings_as_expense: bool,
}

impl EntryFilter {
    pub fn with_temporary(self, include_temporary: bool) -> Self {
        Self {
            include_temporary,
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostSettings {
    pub view: CostView,
    pub filter: EntryFilter,
}

/// Every persisted preference: the cost chart and the net ("total") chart
/// are toggled independently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSettings {
    pub cost: CostSettings,
    pub total: EntryFilter,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredSettings {
    cost_view: CostView,
    cost_include_temporary: bool,
    cost_include_savings_as_expense: bool,
    cost_include_amortization_as_expense: bool,
    total_include_temporary: bool,
    total_include_savings_as_expense: bool,
    total_include_amortization_as_expense: bool,
}

impl From<&BudgetSettings> for StoredSettings {
    fn from(settings: &BudgetSettings) -> Self {
        Self {
            cost_view: settings.cost.view,
            cost_include_temporary: settings.cost.filter.include_temporary,
            cost_include_savings_as_expense: settings.cost.filter.include_savings_as_expense,
            cost_include_amortization_as_expense: settings
                .cost
                .filter
                .include_amortization_as_expense,
            total_include_temporary: settings.total.include_temporary,
            total_include_savings_as_expense: settings.total.include_savings_as_expense,
            total_include_amortization_as_expense: settings.total.include_amortization_as_expense,
        }
    }
}

impl BudgetSettings {
    /// Reads a stored blob. Each field is applied only when present and of
    /// the right type; anything else keeps its default.
    pub fn from_json_lenient(raw: &str) -> Self {
        let mut settings = Self::default();
        let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw) else {
            tracing::debug!("ignoring unreadable settings blob");
            return settings;
        };

        if let Some(view) = map
            .get("costView")
            .and_then(Value::as_str)
            .and_then(|v| v.parse().ok())
        {
            settings.cost.view = view;
        }

        let flags: [(&str, &mut bool); 6] = [
            (
                "costIncludeTemporary",
                &mut settings.cost.filter.include_temporary,
            ),
            (
                "costIncludeSavingsAsExpense",
                &mut settings.cost.filter.include_savings_as_expense,
            ),
            (
                "costIncludeAmortizationAsExpense",
                &mut settings.cost.filter.include_amortization_as_expense,
            ),
            (
                "totalIncludeTemporary",
                &mut settings.total.include_temporary,
            ),
            (
                "totalIncludeSavingsAsExpense",
                &mut settings.total.include_savings_as_expense,
            ),
            (
                "totalIncludeAmortizationAsExpense",
                &mut settings.total.include_amortization_as_expense,
            ),
        ];
        for (key, slot) in flags {
            if let Some(value) = map.get(key).and_then(Value::as_bool) {
                *slot = value;
            }
        }

        settings
    }

    pub fn to_json(&self) -> ResultEngine<String> {
        Ok(serde_json::to_string(&StoredSettings::from(self))?)
    }

    /// Loads the preferences, falling back to defaults when nothing is
    /// stored yet.
    pub fn load(storage: &impl SettingsStorage) -> ResultEngine<Self> {
        Ok(storage
            .load(SETTINGS_KEY)?
            .map(|raw| Self::from_json_lenient(&raw))
            .unwrap_or_default())
    }

    pub fn save(&self, storage: &impl SettingsStorage) -> ResultEngine<()> {
        storage.save(SETTINGS_KEY, &self.to_json()?)
    }
}

/// Key/value persistence for the preference blob.
pub trait SettingsStorage {
    fn load(&self, key: &str) -> ResultEngine<Option<String>>;
    fn save(&self, key: &str, value: &str) -> ResultEngine<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Clone, Debug)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SettingsStorage for JsonFileStorage {
    fn load(&self, key: &str) -> ResultEngine<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> ResultEngine<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, value)?;
        Ok(())
    }
}

/// In-process storage, handy for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl SettingsStorage for MemoryStorage {
    fn load(&self, key: &str) -> ResultEngine<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| EngineError::Settings("settings storage poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> ResultEngine<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| EngineError::Settings("settings storage poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_grouped_view_and_exclude_everything() {
        let settings = BudgetSettings::default();
        assert_eq!(settings.cost.view, CostView::Grouped);
        assert_eq!(settings.cost.filter, EntryFilter::default());
        assert!(!settings.total.include_temporary);
    }

    #[test]
    fn save_then_load_through_storage() {
        let storage = MemoryStorage::default();
        let mut settings = BudgetSettings::default();
        settings.cost.view = CostView::Detailed;
        settings.cost.filter.include_savings_as_expense = true;
        settings.total.include_temporary = true;
        settings.save(&storage).unwrap();

        assert_eq!(BudgetSettings::load(&storage).unwrap(), settings);
        let raw = storage.load(SETTINGS_KEY).unwrap().unwrap();
        assert!(raw.contains("\"costView\":\"detailed\""));
        assert!(raw.contains("\"totalIncludeTemporary\":true"));
    }

    #[test]
    fn mistyped_fields_keep_defaults() {
        let settings = BudgetSettings::from_json_lenient(
            r#"{"costView":"sideways","costIncludeTemporary":"yes","totalIncludeSavingsAsExpense":true}"#,
        );
        assert_eq!(settings.cost.view, CostView::Grouped);
        assert!(!settings.cost.filter.include_temporary);
        assert!(settings.total.include_savings_as_expense);
    }

    #[test]
    fn corrupt_blob_yields_defaults() {
        assert_eq!(
            BudgetSettings::from_json_lenient("{not json"),
            BudgetSettings::default()
        );
        assert_eq!(
            BudgetSettings::from_json_lenient("[1,2]"),
            BudgetSettings::default()
        );
    }

    #[test]
    fn missing_storage_entry_loads_defaults() {
        let storage = MemoryStorage::default();
        assert_eq!(
            BudgetSettings::load(&storage).unwrap(),
            BudgetSettings::default()
        );
    }

    #[test]
    fn file_storage_round_trips() {
        let dir = std::env::temp_dir().join(format!("hemkassa-settings-{}", uuid::Uuid::new_v4()));
        let storage = JsonFileStorage::new(&dir);
        assert_eq!(storage.load(SETTINGS_KEY).unwrap(), None);

        storage.save(SETTINGS_KEY, "{}").unwrap();
        assert_eq!(storage.load(SETTINGS_KEY).unwrap().as_deref(), Some("{}"));
        std::fs::remove_dir_all(dir).unwrap();
    }
}
