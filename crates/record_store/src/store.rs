//! The user record store.

use chrono::Utc;
use entities::{StoredCollection, UserDraft, UserRecord, USERS_STORAGE_KEY};
use uuid::Uuid;

use crate::validate::normalize;
use crate::{
    validate, RecordStoreError, StorageBackend, StoreResult, ValidationFailed, ValidationMode,
};

/// Owns the durable collection of user records.
///
/// The store loads the collection once at open and is the only writer from
/// then on; collaborators get read-only snapshots. Every mutation is
/// all-or-nothing: the next collection is persisted before the in-memory
/// state is committed, so a failed write leaves both untouched.
pub struct RecordStore<B: StorageBackend> {
    backend: B,
    records: Vec<UserRecord>,
}

impl<B: StorageBackend> RecordStore<B> {
    /// Opens the store, loading any persisted collection.
    ///
    /// A missing key, an unreadable backend, or a malformed payload all load
    /// as an empty collection. Durability is best-effort here; corruption
    /// must never take the application down.
    pub fn open(backend: B) -> Self {
        let records = load(&backend);
        Self { backend, records }
    }

    /// Read-only snapshot of the collection, in insertion order.
    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    /// Number of records in the collection.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a record by id.
    pub fn get(&self, id: Uuid) -> Option<&UserRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Case-insensitive email membership check.
    ///
    /// `exclude` skips one record, so an edit does not collide with itself.
    pub fn email_exists(&self, email: &str, exclude: Option<Uuid>) -> bool {
        let email = email.trim();
        self.records
            .iter()
            .any(|r| Some(r.id) != exclude && r.email_matches(email))
    }

    /// Checks a draft's fields without touching the collection.
    pub fn validate_draft(
        &self,
        draft: &UserDraft,
        mode: ValidationMode,
    ) -> Result<(), ValidationFailed> {
        validate(draft, mode)
    }

    /// Creates a new record from `draft`.
    ///
    /// Validates the fields, checks email uniqueness, assigns a fresh id and
    /// creation timestamp, appends, and persists.
    pub fn create(&mut self, draft: &UserDraft) -> StoreResult<UserRecord> {
        let fields = normalize(draft, ValidationMode::Create)?;
        if self.email_exists(&fields.email, None) {
            return Err(RecordStoreError::duplicate_email(fields.email));
        }

        let mut record = UserRecord::new(
            fields.full_name,
            fields.email,
            fields.role,
            fields.secret.unwrap_or_default(),
        );
        record.phone = fields.phone;

        let mut next = self.records.clone();
        next.push(record.clone());
        self.persist(&next)?;
        self.records = next;

        tracing::debug!(id = %record.id, "user record created");
        Ok(record)
    }

    /// Updates the record with `id` from `draft`.
    ///
    /// `id` and `created_at` are preserved; a blank draft secret keeps the
    /// stored secret; `updated_at` is set to now.
    pub fn update(&mut self, id: Uuid, draft: &UserDraft) -> StoreResult<UserRecord> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| RecordStoreError::not_found(id))?;

        let fields = normalize(draft, ValidationMode::Edit)?;
        if self.email_exists(&fields.email, Some(id)) {
            return Err(RecordStoreError::duplicate_email(fields.email));
        }

        let mut next = self.records.clone();
        let record = &mut next[index];
        record.full_name = fields.full_name;
        record.email = fields.email;
        record.role = fields.role;
        record.phone = fields.phone;
        if let Some(secret) = fields.secret {
            record.secret = secret;
        }
        record.updated_at = Some(Utc::now());

        let record = record.clone();
        self.persist(&next)?;
        self.records = next;

        tracing::debug!(id = %id, "user record updated");
        Ok(record)
    }

    /// Removes the record with `id`, if present.
    ///
    /// Returns whether a removal occurred; a missing id is not an error. The
    /// resulting collection is persisted either way.
    pub fn delete(&mut self, id: Uuid) -> StoreResult<bool> {
        let mut next = self.records.clone();
        let before = next.len();
        next.retain(|r| r.id != id);
        let removed = next.len() != before;

        self.persist(&next)?;
        self.records = next;

        if removed {
            tracing::debug!(id = %id, "user record deleted");
        }
        Ok(removed)
    }

    fn persist(&self, records: &[UserRecord]) -> StoreResult<()> {
        let stored = StoredCollection::new(records.to_vec());
        let payload = serde_json::to_string(&stored)?;
        self.backend.write(USERS_STORAGE_KEY, &payload)?;
        Ok(())
    }
}

fn load<B: StorageBackend>(backend: &B) -> Vec<UserRecord> {
    let raw = match backend.read(USERS_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            tracing::warn!(error = %err, "storage backend unreadable, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<StoredCollection>(&raw) {
        Ok(stored) => stored.records,
        Err(err) => {
            tracing::warn!(error = %err, "persisted collection malformed, starting empty");
            Vec::new()
        }
    }
}
