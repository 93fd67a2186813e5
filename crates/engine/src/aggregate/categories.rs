//! Cost per category for the donut chart.

use std::{collections::HashMap, fmt, str::FromStr};

use serde::Serialize;

use crate::{Category, EngineError, Entry, MoneyCents, TopGroup};

/// Display name used by [`GroupPreset::Combined`] for housing and food.
pub const HOUSING_AND_FOOD: &str = "Housing & food";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum DonutMode {
    /// One slice per leaf category.
    #[default]
    Detailed,
    /// One slice per (aliased) top-group label.
    Grouped,
}

/// Ready-made group selections for the grouped donut.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum GroupPreset {
    /// Housing and food merged into one slice, plus transport and savings.
    #[default]
    Combined,
    /// Housing, food, transport and savings as separate slices.
    Separate,
    /// Every group.
    All,
}

impl GroupPreset {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Combined => "combined",
            Self::Separate => "separate",
            Self::All => "all",
        }
    }

    /// Grouped donut options for this preset. Savings always count.
    pub fn options(self, include_temporary: bool) -> DonutOptions {
        let label = |group: TopGroup| group.label().to_string();
        let (aliases, groups) = match self {
            Self::Combined => (
                HashMap::from([
                    (label(TopGroup::Housing), HOUSING_AND_FOOD.to_string()),
                    (label(TopGroup::Food), HOUSING_AND_FOOD.to_string()),
                ]),
                Some(vec![
                    HOUSING_AND_FOOD.to_string(),
                    label(TopGroup::Transport),
                    label(TopGroup::Savings),
                ]),
            ),
            Self::Separate => (
                HashMap::new(),
                Some(vec![
                    label(TopGroup::Housing),
                    label(TopGroup::Food),
                    label(TopGroup::Transport),
                    label(TopGroup::Savings),
                ]),
            ),
            Self::All => (HashMap::new(), None),
        };
        DonutOptions {
            mode: DonutMode::Grouped,
            include_temporary,
            include_savings_as_expense: true,
            categories: None,
            aliases,
            groups,
        }
    }
}

impl fmt::Display for GroupPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupPreset {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "combined" => Ok(Self::Combined),
            "separate" => Ok(Self::Separate),
            "all" => Ok(Self::All),
            other => Err(EngineError::Settings(format!("unknown preset: {other}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DonutOptions {
    pub mode: DonutMode,
    pub include_temporary: bool,
    pub include_savings_as_expense: bool,
    /// Restricts and orders the categories counted, when set.
    pub categories: Option<Vec<Category>>,
    /// Maps a group label to the name it is shown under.
    pub aliases: HashMap<String, String>,
    /// Display names allowed in grouped mode, when set.
    pub groups: Option<Vec<String>>,
}

impl Default for DonutOptions {
    fn default() -> Self {
        Self {
            mode: DonutMode::Detailed,
            include_temporary: true,
            include_savings_as_expense: true,
            categories: None,
            aliases: HashMap::new(),
            groups: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategorySlice {
    pub label: String,
    pub amount: MoneyCents,
}

fn allowed<T: PartialEq>(list: Option<&[T]>, value: &T) -> bool {
    list.is_none_or(|list| list.is_empty() || list.contains(value))
}

/// Positive cost slices, in taxonomy order or the order of
/// `options.categories`. Slices never include income categories.
pub fn category_slices(entries: &[Entry], options: &DonutOptions) -> Vec<CategorySlice> {
    let categories = options.categories.as_deref();
    let mut by_category: HashMap<Category, MoneyCents> = HashMap::new();
    for entry in entries {
        if !entry.is_cost() || entry.category.top_group() == TopGroup::Income {
            continue;
        }
        if entry.temporary && !options.include_temporary {
            continue;
        }
        if entry.category.is_savings() && !options.include_savings_as_expense {
            continue;
        }
        if !allowed(categories, &entry.category) {
            continue;
        }
        *by_category.entry(entry.category).or_default() += entry.amount;
    }

    let order: &[Category] = match categories {
        Some(list) if !list.is_empty() => list,
        _ => Category::ALL,
    };
    let positive = order.iter().filter_map(|category| {
        by_category
            .get(category)
            .filter(|amount| amount.is_positive())
            .map(|amount| (*category, *amount))
    });

    match options.mode {
        DonutMode::Detailed => positive
            .map(|(category, amount)| CategorySlice {
                label: category.label().to_string(),
                amount,
            })
            .collect(),
        DonutMode::Grouped => {
            let mut slices: Vec<CategorySlice> = Vec::new();
            for (category, amount) in positive {
                let original = category.top_group().label();
                let label = options
                    .aliases
                    .get(original)
                    .map_or(original, String::as_str);
                if !allowed(options.groups.as_deref(), &label.to_string()) {
                    continue;
                }
                match slices.iter_mut().find(|slice| slice.label == label) {
                    Some(slice) => slice.amount += amount,
                    None => slices.push(CategorySlice {
                        label: label.to_string(),
                        amount,
                    }),
                }
            }
            slices
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Person,
        aggregate::tests::{cost, income, temporary},
    };

    fn household() -> Vec<Entry> {
        vec![
            cost("Rent", Person::A, 800_000, Category::Rent),
            cost("Power", Person::B, 60_000, Category::Electricity),
            cost("Food", Person::A, 300_000, Category::Groceries),
            cost("Bus", Person::B, 90_000, Category::PublicTransport),
            cost("Buffer", Person::A, 100_000, Category::SavingsBuffer),
            cost("Cinema", Person::B, 20_000, Category::Entertainment),
            temporary(cost("Trip", Person::A, 400_000, Category::Travel)),
            income("Salary", Person::A, 3_000_000),
        ]
    }

    fn labels(slices: &[CategorySlice]) -> Vec<&str> {
        slices.iter().map(|slice| slice.label.as_str()).collect()
    }

    #[test]
    fn detailed_follows_taxonomy_order() {
        let slices = category_slices(&household(), &DonutOptions::default());
        assert_eq!(
            labels(&slices),
            [
                "Rent & fees",
                "Electricity",
                "Groceries",
                "Public transport",
                "Buffer",
                "Entertainment",
                "Travel & holiday",
            ]
        );
    }

    #[test]
    fn temporary_and_savings_can_be_excluded() {
        let options = DonutOptions {
            include_temporary: false,
            include_savings_as_expense: false,
            ..DonutOptions::default()
        };
        let slices = category_slices(&household(), &options);
        assert!(!labels(&slices).contains(&"Travel & holiday"));
        assert!(!labels(&slices).contains(&"Buffer"));
    }

    #[test]
    fn category_allow_list_sets_order() {
        let options = DonutOptions {
            categories: Some(vec![Category::Groceries, Category::Rent]),
            ..DonutOptions::default()
        };
        let slices = category_slices(&household(), &options);
        assert_eq!(labels(&slices), ["Groceries", "Rent & fees"]);
    }

    #[test]
    fn combined_preset_merges_housing_and_food() {
        let slices = category_slices(&household(), &GroupPreset::Combined.options(false));
        assert_eq!(labels(&slices), [HOUSING_AND_FOOD, "Transport", "Savings"]);
        assert_eq!(slices[0].amount, MoneyCents::new(1_160_000));
    }

    #[test]
    fn separate_preset_keeps_groups_apart() {
        let slices = category_slices(&household(), &GroupPreset::Separate.options(false));
        assert_eq!(
            labels(&slices),
            ["Housing & utilities", "Food & household", "Transport", "Savings"]
        );
    }

    #[test]
    fn all_preset_shows_every_group() {
        let slices = category_slices(&household(), &GroupPreset::All.options(true));
        assert_eq!(
            labels(&slices),
            [
                "Housing & utilities",
                "Food & household",
                "Transport",
                "Savings",
                "Other",
            ]
        );
        assert_eq!(slices[4].amount, MoneyCents::new(420_000));
    }

    #[test]
    fn preset_parses_from_str() {
        assert_eq!("separate".parse::<GroupPreset>().unwrap(), GroupPreset::Separate);
        assert!("pie".parse::<GroupPreset>().is_err());
    }
}
