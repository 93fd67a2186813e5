pub use aggregate::{
    Bucket, BucketKey, CategorySlice, CostBreakdown, DETAIL_THRESHOLD, DetailedCosts, DonutMode,
    DonutOptions, GROUP_THRESHOLD, GroupDrillDown, GroupItem, GroupPreset, GroupedCosts,
    IncomeSummary, NetComparison, NetSummary, PersonAmounts, aggregate_costs, category_slices,
    compare_net, cost_totals, income_summary, net_summary,
};
pub use category::{Category, CategoryGroup, GENERIC_ICON, TopGroup, category_groups};
pub use entry::{DefaultReason, Entry, EntryKind, EntryPatch, NewEntry, Person, ReadOutcome};
pub use error::EngineError;
pub use money::MoneyCents;
pub use rows::{BudgetRow, RowDraft, RowTotals, find_row, merge_rows, row_totals};
pub use settings::{
    BudgetSettings, CostSettings, CostView, EntryFilter, JsonFileStorage, MemoryStorage,
    SETTINGS_KEY, SettingsStorage,
};
pub use snapshot::EntrySnapshot;
pub use store::{EntryStore, EntryStoreBuilder};

pub mod aggregate;
mod category;
pub mod entry;
mod error;
mod money;
mod rows;
mod settings;
mod snapshot;
mod store;
mod util;
pub mod views;

pub type ResultEngine<T> = Result<T, EngineError>;
