//! KanjiCard - Personal kanji study data
//!
//! Bootstrap binary for the study services.
//!
//! # Execution Flow
//!
//! 1. Load `KanjiCard Data/KanjiCard.yaml` (defaults + env overrides)
//! 2. Initialize logging → logs/kanjicard.<date>
//! 3. Create the tokio runtime for the dataset fetch
//! 4. Load the dataset, initialize collections (migrating legacy data)
//! 5. Log a summary of the loaded state
//!
//! Set `headless: true` (or `KANJICARD_HEADLESS=true`) to continue with an empty
//! dataset when the dataset file is unavailable.

use anyhow::{Context, Result};
use kanjicard::services::{FileDatasetSource, SilentBackend, StdRandom};
use kanjicard::storage::FileStore;
use kanjicard::{APP_NAME, ConfigManager, StudyContext, VERSION};
use std::sync::Arc;

fn main() -> Result<()> {
    let config_manager = ConfigManager::new("KanjiCard Data")?;
    let config = config_manager.load_study_config()?;

    let _guard = kanjicard::logging::setup_logging(&config.logging)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("kanjicard-worker")
        .build()?;

    let dataset_path = config_manager.resolve_path(&config.dataset.path);
    let source = FileDatasetSource::new(&dataset_path);
    let store = FileStore::new(config_manager.resolve_path(&config.storage.dir))
        .context("Failed to open study storage")?;

    let mut context = runtime
        .block_on(StudyContext::bootstrap(
            &config,
            &source,
            Arc::new(store),
            Box::new(StdRandom::from_entropy()),
            Box::new(SilentBackend),
        ))
        .with_context(|| format!("Failed to load dataset from {}", dataset_path))?;

    let folders = context.collections.list_folders();
    for folder in &folders {
        let snapshot = context.collections.switch_folder(folder);
        tracing::info!("Folder '{}': {} characters", folder, snapshot.entries.len());
    }

    tracing::info!(
        "{} characters loaded, {} folders, {} missed recall items",
        context.repository.len(),
        folders.len(),
        context.exercises.missed_items().len()
    );

    Ok(())
}
