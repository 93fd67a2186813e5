use serde::Serialize;

use super::{PersonAmounts, counts_as_cost, counts_as_income, sum_by_person};
use crate::{Entry, EntryFilter};

/// Income and cost per person under one filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NetSummary {
    pub income: PersonAmounts,
    pub cost: PersonAmounts,
}

impl NetSummary {
    /// Income minus cost, per person.
    pub fn net(&self) -> PersonAmounts {
        PersonAmounts::new(self.income.a - self.cost.a, self.income.b - self.cost.b)
    }
}

pub fn net_summary(entries: &[Entry], filter: &EntryFilter) -> NetSummary {
    NetSummary {
        income: sum_by_person(entries.iter().filter(|e| counts_as_income(e, filter))),
        cost: sum_by_person(entries.iter().filter(|e| counts_as_cost(e, filter))),
    }
}

/// The net chart renders a baseline without temporary entries and,
/// when enabled, the same figures with them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct NetComparison {
    pub base: NetSummary,
    pub with_temporary: NetSummary,
    pub show_temporary: bool,
}

/// Computes both variants; the amortization and savings toggles of
/// `filter` apply to each, its temporary toggle only selects whether the
/// second series is shown.
pub fn compare_net(entries: &[Entry], filter: &EntryFilter) -> NetComparison {
    NetComparison {
        base: net_summary(entries, &filter.with_temporary(false)),
        with_temporary: net_summary(entries, &filter.with_temporary(true)),
        show_temporary: filter.include_temporary,
    }
}

/// Income per person: ordinary entries only, and every entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IncomeSummary {
    pub ordinary: PersonAmounts,
    pub all: PersonAmounts,
}

pub fn income_summary(entries: &[Entry]) -> IncomeSummary {
    let incomes = || entries.iter().filter(|entry| entry.is_income());
    IncomeSummary {
        ordinary: sum_by_person(incomes().filter(|entry| !entry.temporary)),
        all: sum_by_person(incomes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Category, MoneyCents, Person,
        aggregate::tests::{cost, income, temporary},
    };

    fn household() -> Vec<Entry> {
        vec![
            income("Salary", Person::A, 3_000_000),
            income("Salary", Person::B, 2_800_000),
            temporary(income("Bonus", Person::B, 500_000)),
            cost("Rent", Person::A, 800_000, Category::Rent),
            cost("Rent", Person::B, 700_000, Category::Rent),
            cost("Mortgage", Person::A, 200_000, Category::LoanAmortization),
            cost("Pension", Person::B, 100_000, Category::SavingsPension),
            temporary(cost("Trip", Person::A, 400_000, Category::Travel)),
        ]
    }

    #[test]
    fn net_is_income_minus_cost() {
        let summary = net_summary(&household(), &EntryFilter::default());
        assert_eq!(summary.net().a, MoneyCents::new(2_200_000));
        assert_eq!(summary.net().b, MoneyCents::new(2_100_000));
        assert_eq!(summary.net().total(), MoneyCents::new(4_300_000));
    }

    #[test]
    fn toggles_apply_to_both_variants() {
        let filter = EntryFilter {
            include_temporary: true,
            include_amortization_as_expense: true,
            include_savings_as_expense: true,
        };
        let comparison = compare_net(&household(), &filter);
        assert!(comparison.show_temporary);
        assert_eq!(comparison.base.net().a, MoneyCents::new(2_000_000));
        assert_eq!(comparison.base.net().b, MoneyCents::new(2_000_000));
        assert_eq!(comparison.with_temporary.net().a, MoneyCents::new(1_600_000));
        assert_eq!(comparison.with_temporary.net().b, MoneyCents::new(2_500_000));
    }

    #[test]
    fn temporary_toggle_changes_only_temporary_contributions() {
        let entries = household();
        let without = net_summary(&entries, &EntryFilter::default());
        let with = net_summary(&entries, &EntryFilter::default().with_temporary(true));
        assert_eq!(with.income.a, without.income.a);
        assert_eq!(with.income.b - without.income.b, MoneyCents::new(500_000));
        assert_eq!(with.cost.a - without.cost.a, MoneyCents::new(400_000));
        assert_eq!(with.cost.b, without.cost.b);
    }

    #[test]
    fn income_summary_splits_ordinary_and_all() {
        let summary = income_summary(&household());
        assert_eq!(summary.ordinary.b, MoneyCents::new(2_800_000));
        assert_eq!(summary.all.b, MoneyCents::new(3_300_000));
        assert_eq!(summary.ordinary.a, summary.all.a);
    }

    #[test]
    fn empty_household_nets_to_zero() {
        let comparison = compare_net(&[], &EntryFilter::default());
        assert!(comparison.base.net().is_zero());
        assert!(!comparison.show_temporary);
    }
}
