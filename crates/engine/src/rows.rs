//! Table rows: entries of both persons merged per title.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    Category, Entry, EntryKind, MoneyCents, Person,
    aggregate::PersonAmounts,
    util::{compare_sort, compare_titles, normalize_title},
};

/// One table line, combining at most one entry per person.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BudgetRow {
    pub title: String,
    pub id_a: Option<String>,
    pub id_b: Option<String>,
    pub amounts: PersonAmounts,
    pub category: Category,
    pub temporary: bool,
    pub sort: Option<i64>,
}

impl BudgetRow {
    fn new(entry: &Entry) -> Self {
        Self {
            title: entry.title.clone(),
            id_a: None,
            id_b: None,
            amounts: PersonAmounts::ZERO,
            category: entry.category,
            temporary: false,
            sort: None,
        }
    }

    pub fn id_for(&self, person: Person) -> Option<&str> {
        match person {
            Person::A => self.id_a.as_deref(),
            Person::B => self.id_b.as_deref(),
        }
    }

    fn set_id(&mut self, person: Person, id: String) {
        match person {
            Person::A => self.id_a = Some(id),
            Person::B => self.id_b = Some(id),
        }
    }

    /// Ids of the entries behind this row.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        Person::BOTH
            .into_iter()
            .filter_map(|person| self.id_for(person))
    }

    pub fn total(&self) -> MoneyCents {
        self.amounts.total()
    }
}

/// Edited values of a row, as entered in the add/edit form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RowDraft {
    pub title: String,
    pub category: Category,
    pub amounts: PersonAmounts,
    pub temporary: bool,
}

/// Merges the entries of `kind` into rows keyed by normalized title.
///
/// A later entry for the same person replaces the earlier amount and id.
/// Cost rows keep the category of the last entry seen, income rows the
/// first. Rows are ordered by `sort` (missing last), then by title.
pub fn merge_rows(entries: &[Entry], kind: EntryKind) -> Vec<BudgetRow> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<BudgetRow> = Vec::new();

    for entry in entries.iter().filter(|entry| entry.kind == kind) {
        let key = normalize_title(&entry.title);
        let position = *index.entry(key).or_insert_with(|| {
            rows.push(BudgetRow::new(entry));
            rows.len() - 1
        });
        let row = &mut rows[position];

        row.set_id(entry.person, entry.id.clone());
        row.amounts.set(entry.person, entry.amount);
        if kind == EntryKind::Cost {
            row.category = entry.category;
        }
        row.temporary |= entry.temporary;
        row.sort = match (row.sort, entry.sort) {
            (Some(current), Some(sort)) => Some(current.min(sort)),
            (current, sort) => current.or(sort),
        };
    }

    rows.sort_by(|left, right| {
        compare_sort(left.sort, right.sort).then_with(|| compare_titles(&left.title, &right.title))
    });
    rows
}

/// Row whose title matches `title` the way rows are merged.
pub fn find_row<'a>(rows: &'a [BudgetRow], title: &str) -> Option<&'a BudgetRow> {
    let key = normalize_title(title);
    rows.iter().find(|row| normalize_title(&row.title) == key)
}

/// Column sums of a table, ignoring temporary rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RowTotals {
    pub amounts: PersonAmounts,
}

impl RowTotals {
    pub fn total(&self) -> MoneyCents {
        self.amounts.total()
    }
}

pub fn row_totals(rows: &[BudgetRow]) -> RowTotals {
    RowTotals {
        amounts: rows
            .iter()
            .filter(|row| !row.temporary)
            .fold(PersonAmounts::ZERO, |acc, row| acc + row.amounts),
    }
}
