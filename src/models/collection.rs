use super::CharacterRecord;
use serde::{Deserialize, Serialize};

/// View of the collection store focused on one folder.
///
/// Returned by every folder-taking operation of
/// [`CollectionStore`](crate::collections::CollectionStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderSnapshot {
    /// All known folder names, in creation order
    pub folder_names: Vec<String>,

    /// The folder this snapshot was resolved to
    pub current_folder: String,

    /// Records in the current folder that the repository knows about
    pub entries: Vec<CharacterRecord>,
}

impl FolderSnapshot {
    pub fn entry_ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }
}
