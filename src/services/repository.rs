use super::dataset::{DatasetError, DatasetSource, load_dataset};
use crate::models::CharacterRecord;

/// In-memory holder for the parsed character dataset.
///
/// Populated once via [`load()`](Self::load); later loads are no-ops. After
/// loading, the repository is shared read-only (`Arc<CharacterRepository>`)
/// with the collection store and the exercise engine.
#[derive(Debug, Clone, Default)]
pub struct CharacterRepository {
    records: Vec<CharacterRecord>,
}

impl CharacterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository from already-parsed records.
    pub fn from_records(records: Vec<CharacterRecord>) -> Self {
        Self { records }
    }

    /// Load the dataset from `source` unless records are already present.
    ///
    /// # Arguments
    /// * `source` - Where the raw dataset comes from
    /// * `headless` - If true, a retrieval failure yields an empty record set
    ///   instead of an error
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] when the source cannot be fetched or decoded
    /// and `headless` is false.
    pub async fn load<D: DatasetSource>(
        &mut self,
        source: &D,
        headless: bool,
    ) -> Result<&[CharacterRecord], DatasetError> {
        if !self.records.is_empty() {
            tracing::debug!("Dataset already loaded ({} records)", self.records.len());
            return Ok(&self.records);
        }

        match load_dataset(source).await {
            Ok(records) => self.records = records,
            Err(e) if headless => {
                tracing::warn!("Dataset unavailable in headless mode, using empty set: {}", e);
                self.records.clear();
            }
            Err(e) => return Err(e),
        }

        Ok(&self.records)
    }

    pub fn records(&self) -> &[CharacterRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> Option<&CharacterRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Find records whose main glyph (annotation stripped) or counterpart
    /// glyph equals or starts with the trimmed query, in dataset order.
    pub fn search(&self, query: &str) -> Vec<&CharacterRecord> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        self.records
            .iter()
            .filter(|r| {
                r.primary_glyph().starts_with(query) || r.counterpart_glyph().starts_with(query)
            })
            .collect()
    }
}
