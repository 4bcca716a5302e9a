//! Folder-organised collections of saved characters.
//!
//! The store keeps a mapping from folder name to a set of character IDs and
//! persists it after every mutation. A deprecated flat list (the legacy
//! collection) is migrated into the default folder on first load, and
//! afterwards only ever shrinks.
//!
//! # Invariants
//!
//! - The default folder exists once [`initialize()`](CollectionStore::initialize) has run
//! - A character ID may sit in any number of folders, but never twice in one
//! - Unknown or empty folder names resolve to the default folder
//!
//! # Storage Layout
//!
//! | Key                        | JSON shape                         |
//! |----------------------------|------------------------------------|
//! | `kanjiCollection`          | `["id", ...]` (legacy)             |
//! | `kanjiCollectionsByFolder` | `{"folder": ["id", ...], ...}`     |

use crate::models::{DEFAULT_FOLDER, FolderSnapshot};
use crate::services::CharacterRepository;
use crate::storage::{self, FOLDER_COLLECTIONS_KEY, KeyValueStore, LEGACY_COLLECTION_KEY};
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use std::sync::Arc;

type Folders = IndexMap<String, IndexSet<String>>;

/// Durable, folder-organised character collections.
///
/// # Usage
///
/// ```ignore
/// let mut collections = CollectionStore::new(store, repository, DEFAULT_FOLDER);
/// let snapshot = collections.initialize();
/// collections.toggle(&snapshot.current_folder, "42");
/// ```
pub struct CollectionStore {
    store: Arc<dyn KeyValueStore>,
    repository: Arc<CharacterRepository>,
    default_folder: String,
    legacy: IndexSet<String>,
    folders: Folders,
}

impl CollectionStore {
    /// Create an empty store. Nothing is read until [`initialize()`](Self::initialize).
    ///
    /// An empty `default_folder` falls back to [`DEFAULT_FOLDER`].
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        repository: Arc<CharacterRepository>,
        default_folder: impl Into<String>,
    ) -> Self {
        let default_folder = default_folder.into();
        let default_folder = if default_folder.trim().is_empty() {
            DEFAULT_FOLDER.to_string()
        } else {
            default_folder
        };

        Self {
            store,
            repository,
            default_folder,
            legacy: IndexSet::new(),
            folders: IndexMap::new(),
        }
    }

    pub fn default_folder(&self) -> &str {
        &self.default_folder
    }

    /// Load persisted data, migrate the legacy list and ensure the default folder.
    ///
    /// # Returns
    /// A snapshot of the default folder
    pub fn initialize(&mut self) -> FolderSnapshot {
        let legacy: Vec<Value> =
            storage::read_or_default(self.store.as_ref(), LEGACY_COLLECTION_KEY, Vec::new())
                .into_value();
        let folders: IndexMap<String, Value> =
            storage::read_or_default(self.store.as_ref(), FOLDER_COLLECTIONS_KEY, IndexMap::new())
                .into_value();

        self.legacy = string_ids(legacy.iter());
        self.folders = folders
            .into_iter()
            .filter(|(name, _)| !name.trim().is_empty())
            .map(|(name, ids)| {
                let members = match ids.as_array() {
                    Some(ids) => string_ids(ids.iter()),
                    None => {
                        tracing::warn!("Folder '{}' has malformed members, starting it empty", name);
                        IndexSet::new()
                    }
                };
                (name, members)
            })
            .collect();

        self.migrate_legacy();
        self.ensure_folder(&self.default_folder.clone());

        tracing::info!(
            "Collections initialized: {} folders, {} legacy ids",
            self.folders.len(),
            self.legacy.len()
        );

        self.snapshot(&self.default_folder.clone())
    }

    /// Snapshot of `name`, or of the default folder if `name` is unknown.
    pub fn switch_folder(&mut self, name: &str) -> FolderSnapshot {
        let folder = self.resolve_folder(name);
        self.snapshot(&folder)
    }

    /// Add `id` to the folder if absent, remove it if present.
    pub fn toggle(&mut self, folder_name: &str, id: &str) -> FolderSnapshot {
        let folder = self.resolve_folder(folder_name);
        if id.is_empty() {
            return self.snapshot(&folder);
        }

        self.ensure_folder(&folder);
        let members = self.folders.entry(folder.clone()).or_default();
        if !members.shift_remove(id) {
            members.insert(id.to_string());
        }
        self.save_folders();
        self.prune_legacy(id);

        tracing::debug!("Toggled {} in folder '{}'", id, folder);
        self.snapshot(&folder)
    }

    /// Names of every folder that contains `id`.
    pub fn folders_containing(&self, id: &str) -> Vec<String> {
        self.folders
            .iter()
            .filter(|(_, members)| members.contains(id))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// All folder names, creating the default folder if there are none.
    pub fn list_folders(&mut self) -> Vec<String> {
        if self.folders.is_empty() {
            self.ensure_folder(&self.default_folder.clone());
        }
        self.folders.keys().cloned().collect()
    }

    /// Make `folders` the exact membership of `id`.
    ///
    /// Missing target folders are created. Blank names are ignored, and an
    /// empty target list means the default folder alone.
    pub fn set_folders<S: AsRef<str>>(&mut self, id: &str, folders: &[S]) {
        if id.is_empty() {
            return;
        }

        let mut targets: IndexSet<String> = folders
            .iter()
            .map(AsRef::<str>::as_ref)
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string)
            .collect();
        if targets.is_empty() {
            targets.insert(self.default_folder.clone());
        }

        for (name, members) in self.folders.iter_mut() {
            if !targets.contains(name) {
                members.shift_remove(id);
            }
        }
        for name in &targets {
            self.folders
                .entry(name.clone())
                .or_default()
                .insert(id.to_string());
        }

        self.save_folders();
        self.prune_legacy(id);
        tracing::debug!("Set folders of {} to {:?}", id, targets);
    }

    /// Remove `id` from every folder and from the legacy list.
    pub fn remove_everywhere(&mut self, id: &str) {
        if id.is_empty() {
            return;
        }

        for members in self.folders.values_mut() {
            members.shift_remove(id);
        }
        self.save_folders();

        if self.legacy.shift_remove(id) {
            self.save_legacy();
        }
        tracing::debug!("Removed {} from all folders", id);
    }

    /// Rename a folder, merging into `new_name` if it already exists.
    ///
    /// Renaming the default folder moves its members and recreates an empty
    /// default folder.
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> FolderSnapshot {
        if old_name.is_empty() || new_name.is_empty() || !self.folders.contains_key(old_name) {
            return self.snapshot(&self.default_folder.clone());
        }
        if old_name == new_name {
            return self.snapshot(new_name);
        }

        let moved = self.folders.shift_remove(old_name).unwrap_or_default();
        match self.folders.get_mut(new_name) {
            Some(existing) => existing.extend(moved),
            None => {
                self.folders.insert(new_name.to_string(), moved);
            }
        }
        self.save_folders();
        self.ensure_folder(&self.default_folder.clone());

        tracing::info!("Renamed folder '{}' to '{}'", old_name, new_name);
        self.snapshot(new_name)
    }

    /// Delete a folder, merging its members into the default folder.
    ///
    /// The default folder itself cannot be deleted.
    pub fn delete(&mut self, name: &str) -> FolderSnapshot {
        let default_folder = self.default_folder.clone();
        self.ensure_folder(&default_folder);

        if name.is_empty() || name == default_folder || !self.folders.contains_key(name) {
            return self.snapshot(&default_folder);
        }

        let moved = self.folders.shift_remove(name).unwrap_or_default();
        self.folders
            .entry(default_folder.clone())
            .or_default()
            .extend(moved);
        self.save_folders();

        tracing::info!("Deleted folder '{}'", name);
        self.snapshot(&default_folder)
    }

    /// Create an empty folder if it does not exist yet.
    pub fn create(&mut self, name: &str) -> FolderSnapshot {
        if name.trim().is_empty() {
            return self.snapshot(&self.default_folder.clone());
        }
        self.ensure_folder(name);
        self.snapshot(name)
    }

    /// True if `id` is in any folder or in the legacy list.
    pub fn is_collected(&self, id: &str) -> bool {
        !id.is_empty() && (self.legacy.contains(id) || self.in_any_folder(id))
    }

    /// IDs still held only in the legacy list.
    pub fn legacy_ids(&self) -> Vec<String> {
        self.legacy.iter().cloned().collect()
    }

    /// Map `name` to a known folder, falling back to the default folder.
    pub fn resolve_folder(&self, name: &str) -> String {
        if !name.is_empty() && self.folders.contains_key(name) {
            name.to_string()
        } else {
            self.default_folder.clone()
        }
    }

    fn in_any_folder(&self, id: &str) -> bool {
        self.folders.values().any(|members| members.contains(id))
    }

    fn migrate_legacy(&mut self) {
        if self.legacy.is_empty() || !self.folders.is_empty() {
            return;
        }

        self.folders
            .insert(self.default_folder.clone(), self.legacy.clone());
        self.save_folders();
        tracing::info!(
            "Migrated {} legacy ids into folder '{}'",
            self.legacy.len(),
            self.default_folder
        );
    }

    fn ensure_folder(&mut self, name: &str) {
        if self.folders.contains_key(name) {
            return;
        }
        self.folders.insert(name.to_string(), IndexSet::new());
        self.save_folders();
        tracing::debug!("Created folder '{}'", name);
    }

    /// Drop `id` from the legacy list once no folder holds it.
    fn prune_legacy(&mut self, id: &str) {
        if self.legacy.contains(id) && !self.in_any_folder(id) {
            self.legacy.shift_remove(id);
            self.save_legacy();
        }
    }

    fn snapshot(&mut self, folder: &str) -> FolderSnapshot {
        self.ensure_folder(folder);

        let entries = self.folders[folder]
            .iter()
            .filter_map(|id| self.repository.get(id).cloned())
            .collect();

        FolderSnapshot {
            folder_names: self.folders.keys().cloned().collect(),
            current_folder: folder.to_string(),
            entries,
        }
    }

    fn save_folders(&self) {
        if let Err(e) = storage::write_json(self.store.as_ref(), FOLDER_COLLECTIONS_KEY, &self.folders)
        {
            tracing::warn!("Failed to persist folder collections: {}", e);
        }
    }

    fn save_legacy(&self) {
        if let Err(e) = storage::write_json(self.store.as_ref(), LEGACY_COLLECTION_KEY, &self.legacy)
        {
            tracing::warn!("Failed to persist legacy collection: {}", e);
        }
    }
}

/// Non-empty string IDs, in order; other JSON values are dropped.
fn string_ids<'a>(values: impl Iterator<Item = &'a Value>) -> IndexSet<String> {
    values
        .filter_map(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}
