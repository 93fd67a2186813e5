//! The module contains the `Entry` type, a single household ledger line.
//!
//! Both costs and incomes are represented by `Entry`; the persisted record is
//! the sea-orm [`Model`] for the `household_entries` table.
use core::fmt;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Category, EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Cost,
    Income,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cost => "cost",
            Self::Income => "income",
        }
    }
}

impl TryFrom<&str> for EntryKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "cost" => Ok(Self::Cost),
            "income" => Ok(Self::Income),
            other => Err(EngineError::InvalidEntry(format!(
                "invalid entry kind: {other}"
            ))),
        }
    }
}

/// One of the two tracked household members.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Person {
    A,
    B,
}

impl Person {
    pub const BOTH: [Person; 2] = [Person::A, Person::B];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }
}

impl TryFrom<&str> for Person {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "A" | "a" => Ok(Self::A),
            "B" | "b" => Ok(Self::B),
            other => Err(EngineError::InvalidEntry(format!("invalid person: {other}"))),
        }
    }
}

/// A ledger line as seen by the aggregation layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub kind: EntryKind,
    pub title: String,
    pub amount: MoneyCents,
    pub person: Person,
    pub category: Category,
    pub temporary: bool,
    pub sort: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Entry {
    pub fn is_cost(&self) -> bool {
        self.kind == EntryKind::Cost
    }

    pub fn is_income(&self) -> bool {
        self.kind == EntryKind::Income
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}] {} {}",
            self.amount,
            self.title,
            self.category.key(),
            self.person.as_str(),
            self.kind.as_str()
        )
    }
}

/// Why a persisted record needed a fallback value to become an [`Entry`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DefaultReason {
    MissingCategory,
    UnknownCategory(String),
    MissingAmount,
}

impl fmt::Display for DefaultReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCategory => f.write_str("missing category"),
            Self::UnknownCategory(key) => write!(f, "unknown category '{key}'"),
            Self::MissingAmount => f.write_str("missing amount"),
        }
    }
}

/// Result of reading a persisted record permissively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    Valid(Entry),
    Defaulted(Entry, Vec<DefaultReason>),
}

impl ReadOutcome {
    pub fn entry(&self) -> &Entry {
        match self {
            Self::Valid(entry) | Self::Defaulted(entry, _) => entry,
        }
    }

    pub fn into_entry(self) -> Entry {
        match self {
            Self::Valid(entry) | Self::Defaulted(entry, _) => entry,
        }
    }
}

/// Input for creating an entry. `sort` defaults to the creation time in
/// epoch milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub kind: EntryKind,
    pub title: String,
    pub amount: MoneyCents,
    pub person: Person,
    pub category: Category,
    pub temporary: Option<bool>,
    pub sort: Option<i64>,
}

/// Partial update. Fields left as `None` are never written.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPatch {
    pub kind: Option<EntryKind>,
    pub title: Option<String>,
    pub amount: Option<MoneyCents>,
    pub person: Option<Person>,
    pub category: Option<Category>,
    pub temporary: Option<bool>,
    pub sort: Option<i64>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn sort(sort: i64) -> Self {
        Self {
            sort: Some(sort),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "household_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub title: String,
    pub amount: Option<i64>,
    pub person: String,
    pub category: Option<String>,
    pub temporary: Option<bool>,
    pub sort: Option<i64>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// Builds an insert model. Unset optionals stay `NotSet` so the column
    /// default applies.
    pub(crate) fn for_insert(entry: &NewEntry, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: ActiveValue::Set(id.to_string()),
            kind: ActiveValue::Set(entry.kind.as_str().to_string()),
            title: ActiveValue::Set(entry.title.trim().to_string()),
            amount: ActiveValue::Set(Some(entry.amount.cents())),
            person: ActiveValue::Set(entry.person.as_str().to_string()),
            category: ActiveValue::Set(Some(entry.category.key().to_string())),
            temporary: entry
                .temporary
                .map_or(ActiveValue::NotSet, |t| ActiveValue::Set(Some(t))),
            sort: ActiveValue::Set(Some(entry.sort.unwrap_or(now.timestamp_millis()))),
            created_at: ActiveValue::Set(now),
        }
    }

    /// Builds an update model touching only the fields present in `patch`.
    /// The primary key is left unset; callers filter on it.
    pub(crate) fn for_patch(patch: &EntryPatch) -> Self {
        fn set<T, V>(value: Option<T>, map: impl FnOnce(T) -> V) -> ActiveValue<V>
        where
            V: Into<sea_orm::Value>,
        {
            value.map_or(ActiveValue::NotSet, |v| ActiveValue::Set(map(v)))
        }

        Self {
            id: ActiveValue::NotSet,
            kind: set(patch.kind, |k| k.as_str().to_string()),
            title: set(patch.title.as_deref(), |t| t.trim().to_string()),
            amount: set(patch.amount, |a| Some(a.cents())),
            person: set(patch.person, |p| p.as_str().to_string()),
            category: set(patch.category, |c| Some(c.key().to_string())),
            temporary: set(patch.temporary, Some),
            sort: set(patch.sort, Some),
            created_at: ActiveValue::NotSet,
        }
    }
}

impl Model {
    /// Reads a stored record, absorbing missing or unknown category and
    /// missing amount with defaults.
    ///
    /// Records whose `kind` or `person` cannot be read are rejected because
    /// no view could place them.
    pub fn read(self) -> ResultEngine<ReadOutcome> {
        let kind = EntryKind::try_from(self.kind.as_str())?;
        let person = Person::try_from(self.person.as_str())?;
        let mut reasons = Vec::new();

        let category = match self.category.as_deref().map(str::trim) {
            None | Some("") => {
                reasons.push(DefaultReason::MissingCategory);
                Category::Other
            }
            Some(key) => key.parse().unwrap_or_else(|_| {
                reasons.push(DefaultReason::UnknownCategory(key.to_string()));
                Category::Other
            }),
        };
        let amount = match self.amount {
            Some(amount) => MoneyCents::new(amount),
            None => {
                reasons.push(DefaultReason::MissingAmount);
                MoneyCents::ZERO
            }
        };

        let entry = Entry {
            id: self.id,
            kind,
            title: self.title,
            amount,
            person,
            category,
            temporary: self.temporary.unwrap_or(false),
            sort: self.sort,
            created_at: self.created_at,
        };

        Ok(if reasons.is_empty() {
            ReadOutcome::Valid(entry)
        } else {
            ReadOutcome::Defaulted(entry, reasons)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(category: Option<&str>, amount: Option<i64>) -> Model {
        Model {
            id: "e1".to_string(),
            kind: "cost".to_string(),
            title: "Rent".to_string(),
            amount,
            person: "A".to_string(),
            category: category.map(ToString::to_string),
            temporary: None,
            sort: None,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn complete_record_reads_as_valid() {
        let outcome = model(Some("housing.rent"), Some(800_000)).read().unwrap();
        let ReadOutcome::Valid(entry) = outcome else {
            panic!("expected valid entry");
        };
        assert_eq!(entry.category, Category::Rent);
        assert_eq!(entry.amount, MoneyCents::new(800_000));
        assert!(!entry.temporary);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let outcome = model(None, None).read().unwrap();
        assert_eq!(outcome.entry().category, Category::Other);
        assert_eq!(outcome.entry().amount, MoneyCents::ZERO);
        assert!(matches!(
            outcome,
            ReadOutcome::Defaulted(_, ref reasons)
                if reasons == &[DefaultReason::MissingCategory, DefaultReason::MissingAmount]
        ));
    }

    #[test]
    fn unknown_category_defaults_to_other() {
        let outcome = model(Some("garage.tools"), Some(1)).read().unwrap();
        assert_eq!(outcome.entry().category.top_group(), crate::TopGroup::Other);
        assert!(matches!(
            outcome,
            ReadOutcome::Defaulted(_, ref reasons)
                if reasons == &[DefaultReason::UnknownCategory("garage.tools".to_string())]
        ));
    }

    #[test]
    fn unreadable_person_is_rejected() {
        let mut bad = model(Some("housing.rent"), Some(1));
        bad.person = "C".to_string();
        assert_eq!(
            bad.read(),
            Err(EngineError::InvalidEntry("invalid person: C".to_string()))
        );
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(EntryPatch::default().is_empty());
        assert!(!EntryPatch::sort(100).is_empty());
    }
}
