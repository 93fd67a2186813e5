//! Aggregation of entry snapshots into chart and table figures.
//!
//! Every function here is pure: it takes the current entries and an
//! explicit filter/config and recomputes from scratch. All sums stay in
//! [`MoneyCents`]; conversion to crowns is left to the view adapters.

use std::{
    collections::BTreeMap,
    ops::{Add, AddAssign},
};

use serde::Serialize;

use crate::{
    CostSettings, CostView, Entry, EntryFilter, MoneyCents, Person, TopGroup,
    util::{compare_titles, display_title, normalize_title},
};

mod categories;
mod detailed;
mod grouped;
mod net;

pub use categories::{CategorySlice, DonutMode, DonutOptions, GroupPreset, category_slices};
pub use detailed::{DETAIL_THRESHOLD, DetailedCosts, detailed_costs};
pub use grouped::{GROUP_THRESHOLD, GroupDrillDown, GroupedCosts, grouped_costs};
pub use net::{IncomeSummary, NetComparison, NetSummary, compare_net, income_summary, net_summary};

/// A pair of amounts, one per household member.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct PersonAmounts {
    pub a: MoneyCents,
    pub b: MoneyCents,
}

impl PersonAmounts {
    pub const ZERO: PersonAmounts = PersonAmounts {
        a: MoneyCents::ZERO,
        b: MoneyCents::ZERO,
    };

    pub fn new(a: MoneyCents, b: MoneyCents) -> Self {
        Self { a, b }
    }

    pub fn get(&self, person: Person) -> MoneyCents {
        match person {
            Person::A => self.a,
            Person::B => self.b,
        }
    }

    pub fn set(&mut self, person: Person, amount: MoneyCents) {
        match person {
            Person::A => self.a = amount,
            Person::B => self.b = amount,
        }
    }

    pub fn add_for(&mut self, person: Person, amount: MoneyCents) {
        match person {
            Person::A => self.a += amount,
            Person::B => self.b += amount,
        }
    }

    /// Combined amount of both persons.
    pub fn total(&self) -> MoneyCents {
        self.a + self.b
    }

    pub fn is_zero(&self) -> bool {
        self.a.is_zero() && self.b.is_zero()
    }
}

impl Add for PersonAmounts {
    type Output = PersonAmounts;

    fn add(self, rhs: PersonAmounts) -> Self::Output {
        PersonAmounts::new(self.a + rhs.a, self.b + rhs.b)
    }
}

impl AddAssign for PersonAmounts {
    fn add_assign(&mut self, rhs: PersonAmounts) {
        self.a += rhs.a;
        self.b += rhs.b;
    }
}

/// Identity of a chart bucket.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum BucketKey {
    /// A top-group, including the group `Other` that absorbs small groups.
    Group(TopGroup),
    /// A normalized entry title.
    Title(String),
    /// The synthesized roll-up of small per-person title amounts.
    Other,
}

/// One bar of a grouped or detailed cost chart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub key: BucketKey,
    pub label: String,
    pub amounts: PersonAmounts,
}

/// A title-level line kept behind a bucket for drill-down.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupItem {
    pub title: String,
    pub amounts: PersonAmounts,
}

/// Sorts drill-down items largest first, then by title.
pub(crate) fn sort_items(items: &mut [GroupItem]) {
    items.sort_by(|left, right| {
        right
            .amounts
            .total()
            .cmp(&left.amounts.total())
            .then_with(|| compare_titles(&left.title, &right.title))
    });
}

/// Per-title sums keyed by normalized title; the first seen spelling is
/// kept for display.
#[derive(Clone, Debug, Default)]
pub(crate) struct TitleBuckets {
    titles: BTreeMap<String, GroupItem>,
}

impl TitleBuckets {
    pub(crate) fn add(&mut self, entry: &Entry) {
        self.add_amount(&entry.title, entry.person, entry.amount);
    }

    fn add_amount(&mut self, title: &str, person: Person, amount: MoneyCents) {
        let display = display_title(title);
        let item = self
            .titles
            .entry(normalize_title(display))
            .or_insert_with(|| GroupItem {
                title: display.to_string(),
                amounts: PersonAmounts::ZERO,
            });
        item.amounts.add_for(person, amount);
    }

    /// Moves every title of `other` into `self`, merging equal titles.
    pub(crate) fn absorb(&mut self, other: TitleBuckets) {
        for (key, item) in other.titles {
            self.titles
                .entry(key)
                .and_modify(|existing| existing.amounts += item.amounts)
                .or_insert(item);
        }
    }

    pub(crate) fn sum(&self) -> PersonAmounts {
        self.titles
            .values()
            .fold(PersonAmounts::ZERO, |acc, item| acc + item.amounts)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut GroupItem)> {
        self.titles.iter_mut()
    }

    pub(crate) fn into_items(self) -> impl Iterator<Item = (String, GroupItem)> {
        self.titles.into_iter()
    }

    /// Items with a positive combined amount, largest first.
    pub(crate) fn sorted_items(&self) -> Vec<GroupItem> {
        let mut items: Vec<GroupItem> = self
            .titles
            .values()
            .filter(|item| item.amounts.total().is_positive())
            .cloned()
            .collect();
        sort_items(&mut items);
        items
    }
}

/// Whether `entry` counts as a cost under `filter`.
pub fn counts_as_cost(entry: &Entry, filter: &EntryFilter) -> bool {
    if !entry.is_cost() {
        return false;
    }
    if entry.temporary && !filter.include_temporary {
        return false;
    }
    if entry.category.is_amortization() && !filter.include_amortization_as_expense {
        return false;
    }
    if entry.category.is_savings() && !filter.include_savings_as_expense {
        return false;
    }
    true
}

/// Whether `entry` counts as income under `filter`. Only the temporary
/// toggle applies to incomes.
pub fn counts_as_income(entry: &Entry, filter: &EntryFilter) -> bool {
    entry.is_income() && (filter.include_temporary || !entry.temporary)
}

/// Total cost per person under `filter`.
pub fn cost_totals(entries: &[Entry], filter: &EntryFilter) -> PersonAmounts {
    sum_by_person(entries.iter().filter(|entry| counts_as_cost(entry, filter)))
}

pub(crate) fn sum_by_person<'a>(entries: impl Iterator<Item = &'a Entry>) -> PersonAmounts {
    entries.fold(PersonAmounts::ZERO, |mut acc, entry| {
        acc.add_for(entry.person, entry.amount);
        acc
    })
}

/// Output of the cost chart for the selected view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum CostBreakdown {
    Total(PersonAmounts),
    Grouped(GroupedCosts),
    Detailed(DetailedCosts),
}

impl CostBreakdown {
    /// Drill-down items behind a clicked bucket label.
    ///
    /// Every grouped bucket can be opened; in the detailed view only the
    /// synthesized "Other" bucket has hidden items.
    pub fn items_for(&self, label: &str) -> Option<&[GroupItem]> {
        match self {
            Self::Total(_) => None,
            Self::Grouped(grouped) => grouped.items_for(label),
            Self::Detailed(detailed) => {
                (label == detailed.others_label && !detailed.others.is_empty())
                    .then_some(detailed.others.as_slice())
            }
        }
    }
}

/// Computes the cost chart for the configured view.
pub fn aggregate_costs(entries: &[Entry], settings: &CostSettings) -> CostBreakdown {
    match settings.view {
        CostView::Total => CostBreakdown::Total(cost_totals(entries, &settings.filter)),
        CostView::Grouped => CostBreakdown::Grouped(grouped_costs(entries, &settings.filter)),
        CostView::Detailed => CostBreakdown::Detailed(detailed_costs(entries, &settings.filter)),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::{Category, EntryKind};

    pub(crate) fn cost(title: &str, person: Person, amount: i64, category: Category) -> Entry {
        Entry {
            id: format!("{title}-{}", person.as_str()),
            kind: EntryKind::Cost,
            title: title.to_string(),
            amount: MoneyCents::new(amount),
            person,
            category,
            temporary: false,
            sort: None,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    pub(crate) fn income(title: &str, person: Person, amount: i64) -> Entry {
        Entry {
            kind: EntryKind::Income,
            ..cost(title, person, amount, Category::Salary)
        }
    }

    pub(crate) fn temporary(mut entry: Entry) -> Entry {
        entry.temporary = true;
        entry
    }

    fn rent_pair() -> Vec<Entry> {
        vec![
            cost("Rent", Person::A, 800_000, Category::Rent),
            cost("Rent", Person::B, 700_000, Category::Rent),
        ]
    }

    #[test]
    fn total_view_sums_per_person() {
        let totals = cost_totals(&rent_pair(), &EntryFilter::default());
        assert_eq!(totals.a.to_major(), 8000.0);
        assert_eq!(totals.b.to_major(), 7000.0);
        assert_eq!(totals.total().to_major(), 15000.0);
    }

    #[test]
    fn person_amounts_accumulate_per_side() {
        let mut amounts = PersonAmounts::ZERO;
        amounts.add_for(Person::A, MoneyCents::new(150));
        amounts.add_for(Person::B, MoneyCents::new(50));
        amounts.add_for(Person::A, MoneyCents::new(25));
        assert_eq!(amounts.a, MoneyCents::new(175));
        assert_eq!(amounts.b, MoneyCents::new(50));

        let doubled = amounts + amounts;
        assert_eq!(doubled.total(), MoneyCents::new(450));
    }

    #[test]
    fn total_view_is_additive() {
        let entries = vec![
            cost("Rent", Person::A, 800_000, Category::Rent),
            cost("Food", Person::B, 12_345, Category::Groceries),
            cost("Bus", Person::A, 9_900, Category::PublicTransport),
            income("Salary", Person::B, 3_000_000),
        ];
        let totals = cost_totals(&entries, &EntryFilter::default());
        let all: MoneyCents = entries.iter().filter(|e| e.is_cost()).map(|e| e.amount).sum();
        assert_eq!(totals.a + totals.b, all);
    }

    #[test]
    fn filter_excludes_temporary_amortization_and_savings_by_default() {
        let entries = vec![
            cost("Rent", Person::A, 100, Category::Rent),
            temporary(cost("Sofa", Person::A, 200, Category::Furniture)),
            cost("Mortgage", Person::A, 400, Category::LoanAmortization),
            cost("Buffer", Person::A, 800, Category::SavingsBuffer),
        ];
        let none = EntryFilter::default();
        assert_eq!(cost_totals(&entries, &none).a, MoneyCents::new(100));

        let all = EntryFilter {
            include_temporary: true,
            include_amortization_as_expense: true,
            include_savings_as_expense: true,
        };
        assert_eq!(cost_totals(&entries, &all).a, MoneyCents::new(1_500));
    }

    #[test]
    fn temporary_toggle_only_adds_temporary_entries() {
        let entries = vec![
            cost("Rent", Person::A, 100, Category::Rent),
            temporary(cost("Sofa", Person::B, 200, Category::Furniture)),
        ];
        let without = cost_totals(&entries, &EntryFilter::default());
        let with = cost_totals(&entries, &EntryFilter::default().with_temporary(true));
        assert_eq!(with.a, without.a);
        assert_eq!(with.b - without.b, MoneyCents::new(200));
    }

    #[test]
    fn aggregate_costs_dispatches_on_view() {
        let entries = rent_pair();
        let mut settings = CostSettings::default();
        settings.view = CostView::Total;
        assert!(matches!(
            aggregate_costs(&entries, &settings),
            CostBreakdown::Total(_)
        ));
        settings.view = CostView::Detailed;
        assert!(matches!(
            aggregate_costs(&entries, &settings),
            CostBreakdown::Detailed(_)
        ));
    }

    #[test]
    fn title_buckets_merge_case_insensitively() {
        let mut buckets = TitleBuckets::default();
        buckets.add(&cost("Rent", Person::A, 1, Category::Rent));
        buckets.add(&cost(" rent ", Person::B, 2, Category::Rent));
        buckets.add(&cost("", Person::B, 5, Category::Rent));
        let items = buckets.sorted_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, crate::util::UNTITLED);
        assert_eq!(items[1].title, "Rent");
        assert_eq!(
            items[1].amounts,
            PersonAmounts::new(MoneyCents::new(1), MoneyCents::new(2))
        );
    }
}
