//! Durable key-value storage for user study data.
//!
//! Three logical keys are persisted, each holding a JSON document:
//! - [`LEGACY_COLLECTION_KEY`]: flat array of collected character IDs (deprecated format)
//! - [`FOLDER_COLLECTIONS_KEY`]: object mapping folder name to an array of IDs
//! - [`MISSED_ITEMS_KEY`]: array of IDs missed in recall exercises
//!
//! Reads never fail. [`parse_or_default`] and [`read_or_default`] substitute a
//! default value and report what happened through [`ReadOutcome`].

pub mod file_store;
pub mod memory_store;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;

use serde::de::DeserializeOwned;
use thiserror::Error;

pub const LEGACY_COLLECTION_KEY: &str = "kanjiCollection";
pub const FOLDER_COLLECTIONS_KEY: &str = "kanjiCollectionsByFolder";
pub const MISSED_ITEMS_KEY: &str = "kanjiWrongSet";

/// Errors raised by a storage backend
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// String-keyed durable storage.
///
/// Implementations must be usable from a shared reference; the collection
/// store and the exercise engine write through the same instance.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// How a persisted value was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Loaded,
    Missing,
    Malformed(String),
}

/// A value read from storage, tagged with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    pub outcome: ReadOutcome,
}

impl<T> Parsed<T> {
    pub fn into_value(self) -> T {
        self.value
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self.outcome, ReadOutcome::Malformed(_))
    }
}

/// Parse raw JSON, substituting `default` when it is absent, empty or invalid.
pub fn parse_or_default<T: DeserializeOwned>(raw: Option<&str>, default: T) -> Parsed<T> {
    let raw = match raw {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => {
            return Parsed {
                value: default,
                outcome: ReadOutcome::Missing,
            };
        }
    };

    match serde_json::from_str(raw) {
        Ok(value) => Parsed {
            value,
            outcome: ReadOutcome::Loaded,
        },
        Err(e) => Parsed {
            value: default,
            outcome: ReadOutcome::Malformed(e.to_string()),
        },
    }
}

/// Read and parse `key`, folding backend errors into [`ReadOutcome::Malformed`].
pub fn read_or_default<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
    default: T,
) -> Parsed<T> {
    let parsed = match store.get(key) {
        Ok(raw) => parse_or_default(raw.as_deref(), default),
        Err(e) => Parsed {
            value: default,
            outcome: ReadOutcome::Malformed(e.to_string()),
        },
    };

    if let ReadOutcome::Malformed(reason) = &parsed.outcome {
        tracing::warn!("Ignoring malformed stored value for '{}': {}", key, reason);
    }

    parsed
}

/// Serialize `value` as JSON and store it under `key`.
pub fn write_json<T: serde::Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn test_parse_missing_and_empty() {
        let parsed = parse_or_default::<Vec<String>>(None, Vec::new());
        assert_eq!(parsed.outcome, ReadOutcome::Missing);
        assert!(parsed.value.is_empty());

        let parsed = parse_or_default::<Vec<String>>(Some("  "), Vec::new());
        assert_eq!(parsed.outcome, ReadOutcome::Missing);
    }

    #[test]
    fn test_parse_valid_array() {
        let parsed = parse_or_default::<Vec<String>>(Some(r#"["1","2"]"#), Vec::new());
        assert_eq!(parsed.outcome, ReadOutcome::Loaded);
        assert_eq!(parsed.value, vec!["1", "2"]);
    }

    #[test]
    fn test_parse_malformed_falls_back() {
        let parsed = parse_or_default::<Vec<String>>(Some("{not json"), vec!["x".to_string()]);
        assert!(parsed.is_malformed());
        assert_eq!(parsed.value, vec!["x"]);

        // Wrong shape is malformed too
        let parsed =
            parse_or_default::<IndexMap<String, Vec<String>>>(Some(r#"["a"]"#), IndexMap::new());
        assert!(parsed.is_malformed());
        assert!(parsed.value.is_empty());
    }

    #[test]
    fn test_read_or_default_absorbs_backend_error() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .returning(|_| Err(StorageError::Backend("locked".to_string())));

        let parsed = read_or_default::<Vec<String>>(&store, MISSED_ITEMS_KEY, Vec::new());
        assert!(parsed.is_malformed());
        assert!(parsed.value.is_empty());
    }

    #[test]
    fn test_write_json_round_trip() {
        let store = MemoryStore::new();
        write_json(&store, MISSED_ITEMS_KEY, &["1", "2"]).unwrap();

        let parsed = read_or_default::<Vec<String>>(&store, MISSED_ITEMS_KEY, Vec::new());
        assert_eq!(parsed.outcome, ReadOutcome::Loaded);
        assert_eq!(parsed.value, vec!["1", "2"]);
    }
}
