//! Generic in-memory collection with list/create/update/delete.

use chrono::{DateTime, Utc};

use super::error::{StoreError, StoreResult};

/// A record that can live in a [`Collection`].
pub trait Record: Clone {
    /// Human-readable kind, used in `NotFound` errors.
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Record creation time. No-op for records without timestamps.
    fn stamp_created(&mut self, _now: DateTime<Utc>) {}

    /// Record modification time. No-op for records without timestamps.
    fn touch(&mut self, _now: DateTime<Utc>) {}

    /// Check the record before it is stored.
    fn validate(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// A typed set of field updates for a record.
///
/// Only the fields a patch type enumerates can change.
pub trait Patch<T> {
    /// Merge the set fields into `target`.
    fn apply_to(self, target: &mut T);

    /// Whether the patch sets no field at all.
    fn is_empty(&self) -> bool;
}

/// Ordered records of one kind, keyed by id.
///
/// Insertion order is kept so lists come back in the order records were added.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Record> Collection<T> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in insertion order.
    pub fn list(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> StoreResult<&T> {
        self.items.iter().find(|r| r.id() == id).ok_or_else(|| StoreError::not_found(T::KIND, id))
    }

    /// Whether a record with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|r| r.id() == id)
    }

    /// Add a new record under a freshly generated id.
    ///
    /// Any id already set on `draft` is replaced.
    pub fn create(&mut self, mut draft: T) -> StoreResult<T> {
        draft.validate()?;

        let now = Utc::now();
        draft.set_id(generate_id());
        draft.stamp_created(now);

        tracing::debug!(kind = T::KIND, id = draft.id(), "Created record");
        self.items.push(draft.clone());
        Ok(draft)
    }

    /// Add a record keeping its id (seed data). Replaces a record with the same id.
    pub fn insert(&mut self, record: T) {
        match self.items.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record,
            None => self.items.push(record),
        }
    }

    /// Apply a patch to a record.
    ///
    /// The merged record is validated before it replaces the stored one; on
    /// error the stored record is left unchanged.
    pub fn update<P: Patch<T>>(&mut self, id: &str, patch: P) -> StoreResult<T> {
        let existing = self
            .items
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| StoreError::not_found(T::KIND, id))?;

        let mut updated = existing.clone();
        patch.apply_to(&mut updated);
        updated.validate()?;
        updated.touch(Utc::now());

        *existing = updated.clone();
        tracing::debug!(kind = T::KIND, id, "Updated record");
        Ok(updated)
    }

    /// Remove a record, returning it.
    pub fn delete(&mut self, id: &str) -> StoreResult<T> {
        let index = self
            .items
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| StoreError::not_found(T::KIND, id))?;

        tracing::debug!(kind = T::KIND, id, "Deleted record");
        Ok(self.items.remove(index))
    }
}

/// Generate a new opaque record id.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
