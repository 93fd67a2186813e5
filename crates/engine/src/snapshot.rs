use std::sync::Arc;

use crate::{Entry, EntryKind, MoneyCents, Person, util::compare_sort};

/// Immutable, ordered view of every entry in the store.
///
/// Entries are ordered by `sort` (missing last) then by creation time.
/// Cloning is cheap; the entries are shared.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntrySnapshot {
    entries: Arc<[Entry]>,
}

impl EntrySnapshot {
    pub fn new(mut entries: Vec<Entry>) -> Self {
        entries.sort_by(|left, right| {
            compare_sort(left.sort, right.sort).then_with(|| left.created_at.cmp(&right.created_at))
        });
        Self {
            entries: entries.into(),
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn costs(&self) -> impl Iterator<Item = &Entry> {
        self.of_kind(EntryKind::Cost)
    }

    pub fn incomes(&self) -> impl Iterator<Item = &Entry> {
        self.of_kind(EntryKind::Income)
    }

    pub fn of_kind(&self, kind: EntryKind) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(move |entry| entry.kind == kind)
    }

    /// Sum of every entry of `kind`, optionally restricted to one person.
    /// Temporary entries are included.
    pub fn total_for(&self, kind: EntryKind, person: Option<Person>) -> MoneyCents {
        self.of_kind(kind)
            .filter(|entry| person.is_none_or(|p| entry.person == p))
            .map(|entry| entry.amount)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};

    use super::*;
    use crate::Category;

    fn entry(id: &str, kind: EntryKind, person: Person, amount: i64, sort: Option<i64>) -> Entry {
        Entry {
            id: id.to_string(),
            kind,
            title: id.to_string(),
            amount: MoneyCents::new(amount),
            person,
            category: Category::Other,
            temporary: false,
            sort,
            created_at: DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(id.len() as i64),
        }
    }

    #[test]
    fn orders_by_sort_with_missing_last() {
        let snapshot = EntrySnapshot::new(vec![
            entry("late", EntryKind::Cost, Person::A, 1, None),
            entry("b", EntryKind::Cost, Person::A, 1, Some(200)),
            entry("a", EntryKind::Cost, Person::A, 1, Some(100)),
        ]);
        let ids: Vec<&str> = snapshot.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "late"]);
    }

    #[test]
    fn ties_break_on_creation_time() {
        let snapshot = EntrySnapshot::new(vec![
            entry("second", EntryKind::Cost, Person::A, 1, Some(1)),
            entry("one", EntryKind::Cost, Person::A, 1, Some(1)),
        ]);
        assert_eq!(snapshot.entries()[0].id, "one");
    }

    #[test]
    fn totals_split_by_kind_and_person() {
        let snapshot = EntrySnapshot::new(vec![
            entry("r1", EntryKind::Cost, Person::A, 100, None),
            entry("r2", EntryKind::Cost, Person::B, 250, None),
            entry("s1", EntryKind::Income, Person::A, 1_000, None),
        ]);
        assert_eq!(snapshot.total_for(EntryKind::Cost, None), MoneyCents::new(350));
        assert_eq!(
            snapshot.total_for(EntryKind::Cost, Some(Person::B)),
            MoneyCents::new(250)
        );
        assert_eq!(
            snapshot.total_for(EntryKind::Income, Some(Person::B)),
            MoneyCents::ZERO
        );
        assert_eq!(snapshot.costs().count(), 2);
        assert_eq!(snapshot.incomes().count(), 1);
    }
}
