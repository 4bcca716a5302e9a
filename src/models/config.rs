use serde::{Deserialize, Serialize};

/// Name of the folder that always exists in the collection store.
pub const DEFAULT_FOLDER: &str = "默认收藏";

/// Application configuration from KanjiCard.yaml
///
/// Every section falls back to its defaults when absent, so a partial file
/// (or none at all) is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyConfig {
    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub collections: CollectionsConfig,

    #[serde(default)]
    pub exercise: ExerciseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Headless runs substitute an empty dataset when retrieval fails
    #[serde(default)]
    pub headless: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_dataset_path")]
    pub path: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_dir")]
    pub dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionsConfig {
    #[serde(default = "default_folder")]
    pub default_folder: String,
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            default_folder: default_folder(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseConfig {
    #[serde(default = "default_rounds")]
    pub rounds: u32,

    #[serde(default = "default_points_per_correct")]
    pub points_per_correct: u32,
}

impl Default for ExerciseConfig {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
            points_per_correct: default_points_per_correct(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,

    #[serde(default = "default_log_prefix")]
    pub prefix: String,

    #[serde(default)]
    pub debug: bool,

    #[serde(default = "default_true")]
    pub console: bool,

    /// Write the log file as JSON lines
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            prefix: default_log_prefix(),
            debug: false,
            console: true,
            json: false,
        }
    }
}

fn default_dataset_path() -> String {
    "data/data.csv".to_string()
}

fn default_storage_dir() -> String {
    "KanjiCard Data/storage".to_string()
}

fn default_folder() -> String {
    DEFAULT_FOLDER.to_string()
}

fn default_rounds() -> u32 {
    10
}

fn default_points_per_correct() -> u32 {
    10
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_log_prefix() -> String {
    "kanjicard".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_study_config_defaults() {
        let config = StudyConfig::default();
        assert_eq!(config.exercise.rounds, 10);
        assert_eq!(config.exercise.points_per_correct, 10);
        assert_eq!(config.collections.default_folder, "默认收藏");
        assert!(!config.headless);
        assert!(config.logging.console);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: StudyConfig = serde_yaml_ng::from_str("exercise:\n  rounds: 5\n").unwrap();
        assert_eq!(config.exercise.rounds, 5);
        assert_eq!(config.exercise.points_per_correct, 10);
        assert_eq!(config.dataset.path, "data/data.csv");
    }
}
