use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{Category, CostView, EntryKind, GroupPreset, MoneyCents, Person};

use crate::settings::DEFAULT_CONFIG_PATH;

#[derive(Debug, Parser)]
#[command(name = "hemkassa")]
#[command(about = "Shared household budget for two")]
pub struct Cli {
    /// Config file path, without extension.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,
    /// Override the configured database connection string.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a single entry.
    Add(AddArgs),
    /// Change fields of an entry; omitted fields are kept.
    Update(UpdateArgs),
    /// Delete an entry.
    Remove { id: String },
    /// Show the table of merged rows.
    List {
        #[arg(long, value_enum, default_value_t = KindArg::Cost)]
        kind: KindArg,
    },
    /// Create or edit a row for both persons at once.
    SaveRow(SaveRowArgs),
    /// Delete both entries of a row.
    DeleteRow {
        #[arg(long, value_enum, default_value_t = KindArg::Cost)]
        kind: KindArg,
        #[arg(long)]
        title: String,
    },
    /// Move a row to a new position.
    Reorder {
        #[arg(long, value_enum, default_value_t = KindArg::Cost)]
        kind: KindArg,
        #[arg(long)]
        from: usize,
        #[arg(long)]
        to: usize,
    },
    /// Cost chart in the stored (or given) view.
    Costs {
        #[arg(long, value_enum)]
        view: Option<ViewArg>,
        /// Print the items behind a bar.
        #[arg(long)]
        drill: Option<String>,
    },
    /// Income minus cost per person.
    Net,
    /// Income per person.
    Income,
    /// Categories available for a kind of entry.
    Categories {
        #[arg(long, value_enum, default_value_t = KindArg::Cost)]
        kind: KindArg,
    },
    /// Cost per category, or per group with a preset.
    Donut {
        #[arg(long, value_enum)]
        preset: Option<PresetArg>,
        #[arg(long)]
        exclude_temporary: bool,
    },
    /// Stored view preferences.
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long, value_enum, default_value_t = KindArg::Cost)]
    pub kind: KindArg,
    #[arg(long)]
    pub title: String,
    #[arg(long, value_parser = parse_amount)]
    pub amount: MoneyCents,
    #[arg(long, value_enum)]
    pub person: PersonArg,
    /// Category key, e.g. `housing.rent`.
    #[arg(long, value_parser = parse_category)]
    pub category: Option<Category>,
    #[arg(long)]
    pub temporary: bool,
    #[arg(long)]
    pub sort: Option<i64>,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub id: String,
    #[arg(long, value_enum)]
    pub kind: Option<KindArg>,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, value_parser = parse_amount)]
    pub amount: Option<MoneyCents>,
    #[arg(long, value_enum)]
    pub person: Option<PersonArg>,
    #[arg(long, value_parser = parse_category)]
    pub category: Option<Category>,
    #[arg(long)]
    pub temporary: Option<bool>,
    #[arg(long)]
    pub sort: Option<i64>,
}

#[derive(Debug, Args)]
pub struct SaveRowArgs {
    #[arg(long, value_enum, default_value_t = KindArg::Cost)]
    pub kind: KindArg,
    /// Title of the row; an existing row with the same title is edited.
    #[arg(long)]
    pub title: String,
    /// Rename the row when editing.
    #[arg(long)]
    pub rename: Option<String>,
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    pub amount_a: MoneyCents,
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    pub amount_b: MoneyCents,
    #[arg(long, value_parser = parse_category)]
    pub category: Option<Category>,
    #[arg(long)]
    pub temporary: bool,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    Show,
    /// Select the cost chart view.
    View {
        #[arg(value_enum)]
        view: ViewArg,
    },
    /// Flip (or set) one inclusion toggle.
    Toggle {
        #[arg(value_enum)]
        chart: ChartArg,
        #[arg(value_enum)]
        flag: FlagArg,
        #[arg(long)]
        value: Option<bool>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Cost,
    Income,
}

impl From<KindArg> for EntryKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Cost => EntryKind::Cost,
            KindArg::Income => EntryKind::Income,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PersonArg {
    A,
    B,
}

impl From<PersonArg> for Person {
    fn from(value: PersonArg) -> Self {
        match value {
            PersonArg::A => Person::A,
            PersonArg::B => Person::B,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    Total,
    Grouped,
    Detailed,
}

impl From<ViewArg> for CostView {
    fn from(value: ViewArg) -> Self {
        match value {
            ViewArg::Total => CostView::Total,
            ViewArg::Grouped => CostView::Grouped,
            ViewArg::Detailed => CostView::Detailed,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PresetArg {
    Combined,
    Separate,
    All,
}

impl From<PresetArg> for GroupPreset {
    fn from(value: PresetArg) -> Self {
        match value {
            PresetArg::Combined => GroupPreset::Combined,
            PresetArg::Separate => GroupPreset::Separate,
            PresetArg::All => GroupPreset::All,
        }
    }
}

/// Which chart's toggles to change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ChartArg {
    Cost,
    Total,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FlagArg {
    Temporary,
    Amortization,
    Savings,
}

fn parse_amount(raw: &str) -> Result<MoneyCents, String> {
    raw.parse().map_err(|err: engine::EngineError| err.to_string())
}

fn parse_category(raw: &str) -> Result<Category, String> {
    raw.parse().map_err(|err: engine::EngineError| err.to_string())
}
