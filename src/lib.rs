// KanjiCard - Personal kanji study data
//
// This is the library crate containing the dataset parser, collection store and
// exercise engine. The binary crate (main.rs) boots the services from config.

pub mod collections;
pub mod config;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;

// Re-export commonly used types for convenience
pub use collections::CollectionStore;
pub use config::ConfigManager;
pub use models::{CharacterRecord, ExerciseItem, ExerciseSession, FolderSnapshot, StudyConfig};
pub use services::{CharacterRepository, ExerciseEngine, ExerciseError};
pub use state::StudyContext;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
