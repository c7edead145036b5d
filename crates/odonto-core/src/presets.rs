//! Favorites (text presets) with optimistic add/remove.
//!
//! The list a UI renders is updated before the store confirms, so each
//! mutation is split into a begin step (speculative local change) and a
//! commit/rollback step once the backend answers. `add`/`remove` run the
//! whole round trip against a [`PresetBackend`].

use thiserror::Error;

use crate::db::DbError;
use crate::models::Preset;

/// Preset store errors.
#[derive(Error, Debug)]
pub enum PresetError {
    #[error("Store error: {0}")]
    Store(#[from] DbError),

    #[error("Backend error: {0}")]
    Backend(String),
}

pub type PresetResult<T> = Result<T, PresetError>;

/// Persistence seam for presets.
pub trait PresetBackend {
    /// Presets of a category, oldest first.
    fn load_presets(&self, category: &str) -> PresetResult<Vec<Preset>>;

    /// Persist a new preset, returning the row with its assigned id.
    fn create_preset(&self, category: &str, content: &str) -> PresetResult<Preset>;

    /// Delete a preset by id.
    fn remove_preset(&self, id: &str) -> PresetResult<()>;
}

/// Temporary entry awaiting confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAdd {
    pub temp_id: String,
    pub content: String,
}

/// Snapshot taken before an optimistic removal.
#[derive(Debug, Clone)]
pub struct PendingRemove {
    pub id: String,
    snapshot: Vec<Preset>,
}

/// Client-side list of presets for one category.
#[derive(Debug, Clone)]
pub struct PresetStore {
    category: String,
    presets: Vec<Preset>,
    loading: bool,
}

impl PresetStore {
    /// Empty store, marked as loading until the first fetch.
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            presets: Vec::new(),
            loading: true,
        }
    }

    /// Create and immediately fetch.
    pub fn load<B: PresetBackend + ?Sized>(
        category: impl Into<String>,
        backend: &B,
    ) -> PresetResult<Self> {
        let mut store = Self::new(category);
        store.refresh(backend)?;
        Ok(store)
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Reload from the backend. On failure the current list is kept.
    pub fn refresh<B: PresetBackend + ?Sized>(&mut self, backend: &B) -> PresetResult<()> {
        let result = backend.load_presets(&self.category);
        self.loading = false;

        match result {
            Ok(presets) => {
                self.presets = presets;
                Ok(())
            }
            Err(e) => {
                tracing::error!(category = %self.category, error = %e, "Failed to fetch presets");
                Err(e)
            }
        }
    }

    /// Append a temporary entry. Blank content is ignored.
    #[must_use]
    pub fn begin_add(&mut self, content: &str) -> Option<PendingAdd> {
        if content.trim().is_empty() {
            return None;
        }

        let pending = PendingAdd {
            temp_id: uuid::Uuid::new_v4().to_string(),
            content: content.to_string(),
        };
        self.presets.push(Preset {
            id: pending.temp_id.clone(),
            category: self.category.clone(),
            content: pending.content.clone(),
            created_at: chrono::Utc::now().to_rfc3339(),
        });
        Some(pending)
    }

    /// Replace the temporary entry with the stored row.
    pub fn commit_add(&mut self, pending: &PendingAdd, stored: Preset) {
        if let Some(slot) = self.presets.iter_mut().find(|p| p.id == pending.temp_id) {
            *slot = stored;
        }
    }

    /// Drop the temporary entry.
    pub fn rollback_add(&mut self, pending: &PendingAdd) {
        self.presets.retain(|p| p.id != pending.temp_id);
    }

    /// Optimistically add `content`, confirming against the backend.
    ///
    /// Returns `Ok(None)` for blank content. On backend failure the
    /// temporary entry is removed and the error returned.
    pub fn add<B: PresetBackend + ?Sized>(
        &mut self,
        backend: &B,
        content: &str,
    ) -> PresetResult<Option<Preset>> {
        let Some(pending) = self.begin_add(content) else {
            return Ok(None);
        };

        match backend.create_preset(&self.category, &pending.content) {
            Ok(stored) => {
                tracing::debug!(temp_id = %pending.temp_id, id = %stored.id, "Preset added");
                self.commit_add(&pending, stored.clone());
                Ok(Some(stored))
            }
            Err(e) => {
                tracing::error!(category = %self.category, error = %e, "Error adding preset");
                self.rollback_add(&pending);
                Err(e)
            }
        }
    }

    /// Remove locally, keeping a snapshot for rollback.
    pub fn begin_remove(&mut self, id: &str) -> PendingRemove {
        let snapshot = self.presets.clone();
        self.presets.retain(|p| p.id != id);
        PendingRemove {
            id: id.to_string(),
            snapshot,
        }
    }

    /// Restore the list as it was before `begin_remove`.
    pub fn rollback_remove(&mut self, pending: PendingRemove) {
        self.presets = pending.snapshot;
    }

    /// Optimistically remove `id`, restoring the list if the backend fails.
    pub fn remove<B: PresetBackend + ?Sized>(&mut self, backend: &B, id: &str) -> PresetResult<()> {
        let pending = self.begin_remove(id);

        match backend.remove_preset(id) {
            Ok(()) => {
                tracing::debug!(id, "Preset removed");
                Ok(())
            }
            Err(e) => {
                tracing::error!(id, error = %e, "Error removing preset");
                self.rollback_remove(pending);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::BUDGET_CONDITION_CATEGORY;

    #[test]
    fn test_load_marks_not_loading() {
        let db = Database::open_in_memory().unwrap();
        let store = PresetStore::load(BUDGET_CONDITION_CATEGORY, &db).unwrap();
        assert!(!store.is_loading());
        assert!(store.presets().is_empty());
    }

    #[test]
    fn test_blank_add_is_ignored() {
        let db = Database::open_in_memory().unwrap();
        let mut store = PresetStore::load(BUDGET_CONDITION_CATEGORY, &db).unwrap();

        assert!(store.add(&db, "   ").unwrap().is_none());
        assert!(store.presets().is_empty());
        assert!(db.list_presets(BUDGET_CONDITION_CATEGORY).unwrap().is_empty());
    }

    #[test]
    fn test_speculative_entry_visible_before_commit() {
        let mut store = PresetStore::new(BUDGET_CONDITION_CATEGORY);
        let pending = store.begin_add("Garantia de 1 ano").unwrap();

        assert_eq!(store.presets().len(), 1);
        assert_eq!(store.presets()[0].id, pending.temp_id);

        let stored = Preset::new(BUDGET_CONDITION_CATEGORY.into(), "Garantia de 1 ano".into());
        store.commit_add(&pending, stored.clone());
        assert_eq!(store.presets(), &[stored]);
    }

    #[test]
    fn test_add_replaces_temp_id() {
        let db = Database::open_in_memory().unwrap();
        let mut store = PresetStore::load(BUDGET_CONDITION_CATEGORY, &db).unwrap();

        let stored = store.add(&db, "Pagamento em 3x").unwrap().unwrap();
        assert_eq!(store.presets().len(), 1);
        assert_eq!(store.presets()[0].id, stored.id);
        assert_eq!(db.list_presets(BUDGET_CONDITION_CATEGORY).unwrap()[0].id, stored.id);
    }

    #[test]
    fn test_rollback_remove_restores_order() {
        let mut store = PresetStore::new(BUDGET_CONDITION_CATEGORY);
        for text in ["A", "B", "C"] {
            let pending = store.begin_add(text).unwrap();
            let stored = Preset::new(BUDGET_CONDITION_CATEGORY.into(), text.into());
            store.commit_add(&pending, stored);
        }
        let before = store.presets().to_vec();

        let pending = store.begin_remove(&before[1].id);
        assert_eq!(store.presets().len(), 2);

        store.rollback_remove(pending);
        assert_eq!(store.presets(), before.as_slice());
    }
}
