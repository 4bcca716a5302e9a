//! Services module - Business logic for kanji study data.
//!
//! The services are framework-agnostic and have no dependencies on any UI layer.
//!
//! # Components
//!
//! - [`dataset`]: Retrieval ([`DatasetSource`]) and parsing ([`parse_dataset`]) of the
//!   fixed-format character table
//! - [`CharacterRepository`]: Holds parsed records; idempotent load, lookup and prefix search
//! - [`ExerciseEngine`]: Quiz session state machine with scoring and missed-item tracking
//! - [`RandomSource`]: Injectable randomness for the exercise engine
//! - [`Readout`]: Text-to-speech front that ignores placeholder text
//!
//! # Data Flow
//!
//! 1. A [`DatasetSource`] is fetched once at startup (the only async step)
//! 2. The parsed records populate a [`CharacterRepository`]
//! 3. The repository is shared via `Arc` with the collection store and the exercise engine
//! 4. The exercise engine writes missed recall items into the same key-value storage
//!    the collection store uses, under a separate key

pub mod dataset;
pub mod exercise;
pub mod random;
pub mod repository;
pub mod speech;

pub use dataset::{
    DatasetError, DatasetSource, FileDatasetSource, StaticDatasetSource, load_dataset,
    parse_dataset, split_row,
};
pub use exercise::{ExerciseEngine, ExerciseError, ExerciseSettings};
pub use random::{RandomSource, SequenceRandom, StdRandom};
pub use repository::CharacterRepository;
pub use speech::{Readout, SilentBackend, SpeechBackend, Utterance};
