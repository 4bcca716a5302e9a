//! Data models for the KanjiCard library.
//!
//! This module contains the plain data structures shared by the services:
//! - [`CharacterRecord`]: One parsed row of the character dataset
//! - [`FolderSnapshot`]: A folder-focused view of the collection store
//! - [`ExerciseSession`], [`ExerciseItem`], [`ResultSummary`]: Quiz session state and results
//! - [`StudyConfig`]: Settings loaded from `KanjiCard.yaml`
//!
//! Records and exercise types derive `Serialize`/`Deserialize` so a UI layer can
//! consume them directly. Field names serialise in camelCase.

pub mod character;
pub mod collection;
pub mod config;
pub mod exercise;

pub use character::{CharacterRecord, is_placeholder};
pub use collection::FolderSnapshot;
pub use config::{
    CollectionsConfig, DEFAULT_FOLDER, DatasetConfig, ExerciseConfig, LoggingConfig,
    StorageConfig, StudyConfig,
};
pub use exercise::{
    AnswerOutcome, ExerciseItem, ExerciseKind, ExerciseRound, ExerciseSession, LogEntry,
    RecallItem, RecognitionItem, ResultSummary, Script,
};
