//! Integration tests for ConfigManager and configuration file handling
//!
//! These tests verify:
//! - Configuration loading and saving
//! - Default configuration generation
//! - Partial files falling back to defaults
//! - Path resolution relative to the config directory

use camino::Utf8PathBuf;
use kanjicard::ConfigManager;
use kanjicard::config::CONFIG_FILE_NAME;
use kanjicard::models::{DEFAULT_FOLDER, StudyConfig};
use std::fs;
use tempfile::TempDir;

fn create_test_config_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, config_path)
}

#[test]
fn test_create_config_manager() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    assert_eq!(manager.config_dir(), &config_path);
    assert_eq!(manager.config_path(), &config_path.join(CONFIG_FILE_NAME));
}

#[test]
fn test_config_manager_creates_missing_directory() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let nested = config_path.join("KanjiCard Data");

    ConfigManager::new(&nested).unwrap();
    assert!(nested.is_dir());
}

#[test]
fn test_load_default_study_config() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let config = manager.load_file_config().unwrap();
    assert_eq!(config.dataset.path, "data/data.csv");
    assert_eq!(config.collections.default_folder, DEFAULT_FOLDER);
    assert_eq!(config.exercise.rounds, 10);
    assert_eq!(config.exercise.points_per_correct, 10);
    assert!(!config.headless);
}

#[test]
fn test_partial_config_file() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let yaml = r#"
headless: true
collections:
  default_folder: "N5"
logging:
  debug: true
"#;
    fs::write(manager.config_path(), yaml).unwrap();

    let config = manager.load_file_config().unwrap();
    assert!(config.headless);
    assert_eq!(config.collections.default_folder, "N5");
    assert!(config.logging.debug);
    assert_eq!(config.exercise.rounds, 10);
    assert_eq!(config.storage, StudyConfig::default().storage);
}

#[test]
fn test_save_and_reload_round_trip() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let mut config = StudyConfig::default();
    config.dataset.path = "/srv/kanji/data.csv".to_string();
    config.exercise.points_per_correct = 5;
    manager.save_study_config(&config).unwrap();

    let loaded = manager.load_file_config().unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_invalid_yaml_is_an_error() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    fs::write(manager.config_path(), "exercise: [unclosed").unwrap();
    assert!(manager.load_file_config().is_err());
}

#[test]
fn test_resolve_paths() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    assert_eq!(
        manager.resolve_path("storage"),
        config_path.join("storage")
    );
    assert_eq!(
        manager.resolve_path("/srv/kanji/data.csv"),
        Utf8PathBuf::from("/srv/kanji/data.csv")
    );
}
