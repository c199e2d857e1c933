//! UI-facing command handlers and view-state assembly.
//!
//! The session owns the store handle plus the current view criteria. UI
//! events arrive as explicit handler calls; the core never reaches into
//! presentation state.

use chrono::{DateTime, Duration, Utc};
use entities::{UserDraft, UserRecord};
use record_store::{RecordStore, RecordStoreError, StorageBackend, StoreResult};
use uuid::Uuid;

use crate::{project, SortKey};

/// How long an updated record keeps its one-shot highlight, in milliseconds.
const HIGHLIGHT_WINDOW_MS: i64 = 2200;

/// One record prepared for rendering.
#[derive(Debug, Clone)]
pub struct ViewEntry {
    /// The record itself.
    pub record: UserRecord,
    /// True while the record's post-update highlight window is open.
    pub just_updated: bool,
}

/// The ordered display list plus aggregate counts.
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Records to render, filtered and ordered.
    pub entries: Vec<ViewEntry>,
    /// Total records in the store.
    pub total: usize,
    /// Records matching the current filter.
    pub matching: usize,
}

/// Outcome of a successful form submit.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// A new record was created.
    Created(UserRecord),
    /// An existing record was updated.
    Updated(UserRecord),
}

/// Expiring highlight for the most recently updated record.
///
/// An explicit timestamped flag, checked at render time, rather than a
/// fire-and-forget timer mutating shared state.
#[derive(Debug, Clone, Copy)]
struct Highlight {
    id: Uuid,
    expires_at: DateTime<Utc>,
}

/// The command surface the UI layer drives.
pub struct Session<B: StorageBackend> {
    store: RecordStore<B>,
    query: String,
    sort: SortKey,
    editing: Option<Uuid>,
    pending_delete: Option<Uuid>,
    highlight: Option<Highlight>,
}

impl<B: StorageBackend> Session<B> {
    /// Creates a session over an opened store.
    pub fn new(store: RecordStore<B>) -> Self {
        Self {
            store,
            query: String::new(),
            sort: SortKey::default(),
            editing: None,
            pending_delete: None,
            highlight: None,
        }
    }

    /// The underlying store, read-only.
    pub fn store(&self) -> &RecordStore<B> {
        &self.store
    }

    /// Enters edit mode for `id`; the next submit updates that record.
    ///
    /// Returns a copy of the record so the form can be prefilled.
    pub fn begin_edit(&mut self, id: Uuid) -> StoreResult<UserRecord> {
        let record = self
            .store
            .get(id)
            .cloned()
            .ok_or_else(|| RecordStoreError::not_found(id))?;
        self.editing = Some(id);
        Ok(record)
    }

    /// Leaves edit mode without saving.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Id currently being edited, if any.
    pub fn editing(&self) -> Option<Uuid> {
        self.editing
    }

    /// Handles a form submit: creates a record, or updates the one selected
    /// by an earlier `begin_edit`.
    ///
    /// Validation and duplicate-email failures come back as typed errors for
    /// the form to render inline; nothing is changed when they occur. A
    /// successful update opens the record's highlight window.
    pub fn submit(&mut self, draft: &UserDraft) -> StoreResult<SubmitOutcome> {
        match self.editing {
            None => {
                let record = self.store.create(draft)?;
                self.highlight = None;
                Ok(SubmitOutcome::Created(record))
            }
            Some(id) => {
                let record = self.store.update(id, draft)?;
                self.editing = None;
                self.highlight = Some(Highlight {
                    id,
                    expires_at: Utc::now() + Duration::milliseconds(HIGHLIGHT_WINDOW_MS),
                });
                Ok(SubmitOutcome::Updated(record))
            }
        }
    }

    /// Marks `id` for deletion and returns the record for the confirmation
    /// prompt. Nothing is removed until `confirm_delete`.
    pub fn request_delete(&mut self, id: Uuid) -> Option<UserRecord> {
        let record = self.store.get(id).cloned()?;
        self.pending_delete = Some(id);
        Some(record)
    }

    /// Abandons a pending delete.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Performs the pending delete, once the collaborator has affirmatively
    /// confirmed it.
    ///
    /// Returns whether a record was removed; with no pending delete, or a
    /// stale id that is already gone, nothing is removed and that is not an
    /// error.
    pub fn confirm_delete(&mut self) -> StoreResult<bool> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(false);
        };
        if self.editing == Some(id) {
            self.editing = None;
        }
        if self.highlight.map(|h| h.id) == Some(id) {
            self.highlight = None;
        }
        let removed = self.store.delete(id)?;
        if !removed {
            tracing::debug!(id = %id, "pending delete target already gone");
        }
        Ok(removed)
    }

    /// Updates the live search query.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Current search query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Selects the display ordering.
    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    /// Current sort key.
    pub fn sort(&self) -> SortKey {
        self.sort
    }

    /// Builds the current view state.
    pub fn view(&self) -> ViewState {
        self.view_at(Utc::now())
    }

    /// Builds the view state as of `now`. Split out so tests can pin the
    /// highlight clock.
    pub fn view_at(&self, now: DateTime<Utc>) -> ViewState {
        let records = self.store.records();
        let shown = project(records, &self.query, self.sort);
        let matching = shown.len();
        let entries = shown
            .into_iter()
            .map(|record| {
                let just_updated = self
                    .highlight
                    .is_some_and(|h| h.id == record.id && now < h.expires_at);
                ViewEntry {
                    record,
                    just_updated,
                }
            })
            .collect();

        ViewState {
            entries,
            total: records.len(),
            matching,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entities::Role;
    use record_store::MemoryBackend;

    fn session() -> Session<MemoryBackend> {
        Session::new(RecordStore::open(MemoryBackend::new()))
    }

    fn draft(name: &str, email: &str) -> UserDraft {
        UserDraft::new(name, email, Role::Viewer).with_secret("password123")
    }

    #[test]
    fn test_submit_creates_then_updates() {
        let mut session = session();

        let SubmitOutcome::Created(record) = session.submit(&draft("Ann Lee", "ann@x.com")).unwrap()
        else {
            panic!("expected a create");
        };

        session.begin_edit(record.id).unwrap();
        let outcome = session.submit(&draft("Ann B. Lee", "ann@x.com")).unwrap();
        assert!(matches!(outcome, SubmitOutcome::Updated(_)));
        assert_eq!(session.editing(), None);
        assert_eq!(session.store().len(), 1);
    }

    #[test]
    fn test_failed_submit_keeps_edit_state_and_collection() {
        let mut session = session();
        session.submit(&draft("Ann Lee", "ann@x.com")).unwrap();
        let bob = match session.submit(&draft("Bob Ray", "bob@x.com")).unwrap() {
            SubmitOutcome::Created(record) => record,
            SubmitOutcome::Updated(_) => panic!("expected a create"),
        };

        session.begin_edit(bob.id).unwrap();
        let err = session.submit(&draft("Bob Ray", "ANN@x.com")).unwrap_err();
        assert!(matches!(err, RecordStoreError::DuplicateEmail { .. }));
        // Still editing: the form stays open for the fix.
        assert_eq!(session.editing(), Some(bob.id));
        assert_eq!(session.store().len(), 2);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut session = session();
        let record = match session.submit(&draft("Ann Lee", "ann@x.com")).unwrap() {
            SubmitOutcome::Created(record) => record,
            SubmitOutcome::Updated(_) => panic!("expected a create"),
        };

        let pending = session.request_delete(record.id).unwrap();
        assert_eq!(pending.id, record.id);
        assert_eq!(session.store().len(), 1);

        session.cancel_delete();
        assert!(!session.confirm_delete().unwrap());
        assert_eq!(session.store().len(), 1);

        session.request_delete(record.id).unwrap();
        assert!(session.confirm_delete().unwrap());
        assert_eq!(session.store().len(), 0);
    }

    #[test]
    fn test_request_delete_on_missing_id_is_none() {
        let mut session = session();
        assert!(session.request_delete(Uuid::now_v7()).is_none());
        assert!(!session.confirm_delete().unwrap());
    }

    #[test]
    fn test_view_counts_total_and_matching() {
        let mut session = session();
        session.submit(&draft("Ann Lee", "ann@x.com")).unwrap();
        session.submit(&draft("Bob Ray", "bob@x.com")).unwrap();

        session.set_query("ann");
        let view = session.view();
        assert_eq!(view.total, 2);
        assert_eq!(view.matching, 1);
        assert_eq!(view.entries.len(), 1);
        assert_eq!(view.entries[0].record.full_name, "Ann Lee");
    }

    #[test]
    fn test_highlight_opens_on_update_and_expires() {
        let mut session = session();
        let record = match session.submit(&draft("Ann Lee", "ann@x.com")).unwrap() {
            SubmitOutcome::Created(record) => record,
            SubmitOutcome::Updated(_) => panic!("expected a create"),
        };

        // No highlight after a create.
        assert!(session.view().entries.iter().all(|e| !e.just_updated));

        session.begin_edit(record.id).unwrap();
        session.submit(&draft("Ann B. Lee", "ann@x.com")).unwrap();

        let now = Utc::now();
        let open = session.view_at(now);
        assert!(open.entries[0].just_updated);

        let later = now + Duration::milliseconds(HIGHLIGHT_WINDOW_MS + 1000);
        let expired = session.view_at(later);
        assert!(!expired.entries[0].just_updated);
    }

    #[test]
    fn test_sort_selection_flows_into_view() {
        let mut session = session();
        session.submit(&draft("Bob Ray", "bob@x.com")).unwrap();
        session.submit(&draft("Ann Lee", "ann@x.com")).unwrap();

        session.set_sort(SortKey::NameAsc);
        let names: Vec<String> = session
            .view()
            .entries
            .iter()
            .map(|e| e.record.full_name.clone())
            .collect();
        assert_eq!(names, vec!["Ann Lee".to_string(), "Bob Ray".to_string()]);
    }
}
