use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, QueryFilter, QueryOrder, prelude::*};
use tokio::sync::watch;
use uuid::Uuid;

use crate::{
    BudgetRow, EngineError, EntryKind, EntryPatch, EntrySnapshot, NewEntry, Person, ReadOutcome,
    ResultEngine, RowDraft, entry,
};

/// Spacing of the sort values written by [`EntryStore::reorder_rows`].
const SORT_STEP: i64 = 100;

/// Persistent entry collection with a live snapshot.
///
/// Every successful mutation re-reads the table and publishes a full
/// [`EntrySnapshot`] to all subscribers. Mutations are independent: there
/// is no locking and the last write wins.
#[derive(Debug)]
pub struct EntryStore {
    database: DatabaseConnection,
    snapshot: watch::Sender<EntrySnapshot>,
}

impl EntryStore {
    /// Return a builder for `EntryStore`.
    pub fn builder() -> EntryStoreBuilder {
        EntryStoreBuilder::default()
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> EntrySnapshot {
        self.snapshot.borrow().clone()
    }

    /// Receives a full snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<EntrySnapshot> {
        self.snapshot.subscribe()
    }

    /// Re-reads every entry and publishes the result.
    pub async fn refresh(&self) -> ResultEngine<EntrySnapshot> {
        let snapshot = load_snapshot(&self.database).await?;
        tracing::debug!("publishing snapshot with {} entries", snapshot.len());
        self.snapshot.send_replace(snapshot.clone());
        Ok(snapshot)
    }

    /// Add an entry and return its id.
    pub async fn add(&self, new_entry: &NewEntry) -> ResultEngine<String> {
        let id = self.insert(new_entry).await?;
        self.refresh().await?;
        Ok(id)
    }

    /// Apply `patch` to the entry `id`; fields left as `None` are kept.
    pub async fn update(&self, id: &str, patch: &EntryPatch) -> ResultEngine<()> {
        if patch.is_empty() {
            return match entry::Entity::find_by_id(id).one(&self.database).await? {
                Some(_) => Ok(()),
                None => Err(EngineError::KeyNotFound(id.to_string())),
            };
        }
        self.patch(id, patch).await?;
        self.refresh().await?;
        Ok(())
    }

    /// Delete the entry `id`.
    pub async fn remove(&self, id: &str) -> ResultEngine<()> {
        self.delete(id).await?;
        self.refresh().await?;
        Ok(())
    }

    /// Save a table row as one entry per person.
    ///
    /// Persons with an entry in `existing` are updated. A missing entry is
    /// only created for a positive amount, or for both persons when a new
    /// row has no amounts at all.
    pub async fn save_row(
        &self,
        kind: EntryKind,
        draft: &RowDraft,
        existing: Option<&BudgetRow>,
    ) -> ResultEngine<()> {
        let allow_zero = existing.is_none() && draft.amounts.is_zero();

        for person in Person::BOTH {
            let amount = draft.amounts.get(person);
            match existing.and_then(|row| row.id_for(person)) {
                Some(id) => {
                    let patch = EntryPatch {
                        kind: Some(kind),
                        title: Some(draft.title.clone()),
                        amount: Some(amount),
                        person: Some(person),
                        category: Some(draft.category),
                        temporary: Some(draft.temporary),
                        sort: None,
                    };
                    self.patch(id, &patch).await?;
                }
                None if amount.is_positive() || allow_zero => {
                    let new_entry = NewEntry {
                        kind,
                        title: draft.title.clone(),
                        amount,
                        person,
                        category: draft.category,
                        temporary: Some(draft.temporary),
                        sort: None,
                    };
                    self.insert(&new_entry).await?;
                }
                None => {}
            }
        }

        self.refresh().await?;
        Ok(())
    }

    /// Delete every entry behind a table row.
    pub async fn delete_row(&self, row: &BudgetRow) -> ResultEngine<()> {
        for id in row.ids() {
            self.delete(id).await?;
        }
        self.refresh().await?;
        Ok(())
    }

    /// Move the row at `from` to `to` and renumber every row.
    ///
    /// Rows get `sort = 100, 200, ...` in their new order, written to the
    /// entries of both persons.
    pub async fn reorder_rows(&self, rows: &[BudgetRow], from: usize, to: usize) -> ResultEngine<()> {
        if from >= rows.len() || to >= rows.len() {
            return Err(EngineError::InvalidEntry(format!(
                "row index out of range: {from} -> {to} of {}",
                rows.len()
            )));
        }

        let mut ordered: Vec<&BudgetRow> = rows.iter().collect();
        let moved = ordered.remove(from);
        ordered.insert(to, moved);

        for (idx, row) in ordered.into_iter().enumerate() {
            let sort = SORT_STEP + idx as i64 * SORT_STEP;
            for id in row.ids() {
                self.patch(id, &EntryPatch::sort(sort)).await?;
            }
        }

        self.refresh().await?;
        Ok(())
    }

    async fn insert(&self, new_entry: &NewEntry) -> ResultEngine<String> {
        let id = Uuid::new_v4();
        let model = entry::ActiveModel::for_insert(new_entry, id, Utc::now());
        model.insert(&self.database).await?;
        tracing::info!(
            "added {} entry '{}' for {}",
            new_entry.kind.as_str(),
            new_entry.title.trim(),
            new_entry.person.as_str()
        );
        Ok(id.to_string())
    }

    async fn patch(&self, id: &str, patch: &EntryPatch) -> ResultEngine<()> {
        let result = entry::Entity::update_many()
            .set(entry::ActiveModel::for_patch(patch))
            .filter(entry::Column::Id.eq(id))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(id.to_string()));
        }
        tracing::info!("updated entry {id}");
        Ok(())
    }

    async fn delete(&self, id: &str) -> ResultEngine<()> {
        let result = entry::Entity::delete_by_id(id)
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(id.to_string()));
        }
        tracing::info!("removed entry {id}");
        Ok(())
    }
}

/// Reads every record, skipping those no view could place.
async fn load_snapshot(database: &DatabaseConnection) -> ResultEngine<EntrySnapshot> {
    let models = entry::Entity::find()
        .order_by_asc(entry::Column::CreatedAt)
        .all(database)
        .await?;

    let mut entries = Vec::with_capacity(models.len());
    for model in models {
        let id = model.id.clone();
        match model.read() {
            Ok(ReadOutcome::Valid(entry)) => entries.push(entry),
            Ok(ReadOutcome::Defaulted(entry, reasons)) => {
                tracing::debug!("entry {} read with defaults: {:?}", entry.id, reasons);
                entries.push(entry);
            }
            Err(err) => tracing::warn!("skipping entry {id}: {err}"),
        }
    }
    Ok(EntrySnapshot::new(entries))
}

/// The builder for `EntryStore`
#[derive(Default)]
pub struct EntryStoreBuilder {
    database: DatabaseConnection,
}

impl EntryStoreBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EntryStoreBuilder {
        self.database = db;
        self
    }

    /// Construct `EntryStore` with the current table contents.
    pub async fn build(self) -> ResultEngine<EntryStore> {
        let snapshot = load_snapshot(&self.database).await?;
        let (sender, _) = watch::channel(snapshot);
        Ok(EntryStore {
            database: self.database,
            snapshot: sender,
        })
    }
}
