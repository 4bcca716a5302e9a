// Study context
//
// Owns one instance of every service for the lifetime of the process (or of a
// test). Consumers receive the context by reference instead of reaching for
// global state.

use crate::collections::CollectionStore;
use crate::models::StudyConfig;
use crate::services::{
    CharacterRepository, DatasetError, DatasetSource, ExerciseEngine, ExerciseSettings,
    RandomSource, Readout, SpeechBackend,
};
use crate::storage::KeyValueStore;
use std::sync::Arc;

/// Process-wide service container.
///
/// Built once at startup by [`bootstrap()`](Self::bootstrap): the dataset is
/// loaded, then the collection store and exercise engine are created on top
/// of the shared repository and storage.
///
/// # Related Types
///
/// - [`CharacterRepository`]: Read-only after construction, shared via `Arc`
/// - [`CollectionStore`]: Folder collections, persisted through `store`
/// - [`ExerciseEngine`]: Quiz sessions; writes missed items through `store`
/// - [`Readout`]: Speech output for glyphs and readings
pub struct StudyContext {
    pub repository: Arc<CharacterRepository>,
    pub collections: CollectionStore,
    pub exercises: ExerciseEngine,
    pub readout: Readout,
}

impl StudyContext {
    /// Load the dataset and wire up every service.
    ///
    /// # Arguments
    /// * `config` - Loaded application configuration
    /// * `source` - Dataset provider
    /// * `store` - Durable storage shared by collections and exercises
    /// * `random` - Randomness for exercise generation
    /// * `speech` - Speech backend for the readout
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the dataset is unavailable and
    /// `config.headless` is false.
    pub async fn bootstrap<D: DatasetSource>(
        config: &StudyConfig,
        source: &D,
        store: Arc<dyn KeyValueStore>,
        random: Box<dyn RandomSource>,
        speech: Box<dyn SpeechBackend>,
    ) -> Result<Self, DatasetError> {
        let mut repository = CharacterRepository::new();
        repository.load(source, config.headless).await?;

        let mut context = Self::from_repository(config, repository, store, random, speech);
        context.collections.initialize();

        tracing::info!(
            "Study context ready: {} characters, {} folders",
            context.repository.len(),
            context.collections.list_folders().len()
        );

        Ok(context)
    }

    /// Wire services around an already-loaded repository.
    ///
    /// The collection store is created but not initialized.
    pub fn from_repository(
        config: &StudyConfig,
        repository: CharacterRepository,
        store: Arc<dyn KeyValueStore>,
        random: Box<dyn RandomSource>,
        speech: Box<dyn SpeechBackend>,
    ) -> Self {
        let repository = Arc::new(repository);

        let collections = CollectionStore::new(
            Arc::clone(&store),
            Arc::clone(&repository),
            config.collections.default_folder.clone(),
        );
        let exercises = ExerciseEngine::new(
            Arc::clone(&repository),
            store,
            random,
            ExerciseSettings::from(&config.exercise),
        );

        Self {
            repository,
            collections,
            exercises,
            readout: Readout::new(speech),
        }
    }
}
