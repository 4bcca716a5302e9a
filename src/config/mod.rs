use crate::models::StudyConfig;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, Environment, File, FileFormat};
use std::fs;

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "KanjiCard.yaml";

/// Prefix for environment overrides, e.g. `KANJICARD_EXERCISE__ROUNDS=5`.
pub const ENV_PREFIX: &str = "KANJICARD";

/// Configuration manager for loading and saving `KanjiCard.yaml`.
///
/// Values are layered: built-in defaults, then the YAML file, then
/// environment variables prefixed with [`ENV_PREFIX`] (nested keys separated
/// by `__`).
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    config_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// # Arguments
    /// * `config_dir` - Directory holding `KanjiCard.yaml` (e.g., "KanjiCard Data")
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            config_path: config_dir.join(CONFIG_FILE_NAME),
            config_dir,
        })
    }

    /// Load the study configuration.
    ///
    /// # Returns
    /// The layered StudyConfig; defaults (plus env overrides) if the file doesn't exist
    pub fn load_study_config(&self) -> Result<StudyConfig> {
        self.load_with_env(Environment::with_prefix(ENV_PREFIX))
    }

    /// Load the study configuration from the file alone, ignoring the environment.
    pub fn load_file_config(&self) -> Result<StudyConfig> {
        let builder = Config::builder().add_source(
            File::new(self.config_path.as_str(), FileFormat::Yaml).required(false),
        );
        self.finish(builder)
    }

    fn load_with_env(&self, env: Environment) -> Result<StudyConfig> {
        let builder = Config::builder()
            .add_source(File::new(self.config_path.as_str(), FileFormat::Yaml).required(false))
            .add_source(env.prefix_separator("_").separator("__").try_parsing(true));
        self.finish(builder)
    }

    fn finish(
        &self,
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<StudyConfig> {
        if !self.config_path.exists() {
            tracing::warn!(
                "Config file not found at {}, using defaults",
                self.config_path
            );
        }

        let config: StudyConfig = builder
            .build()
            .with_context(|| format!("Failed to read config: {}", self.config_path))?
            .try_deserialize()
            .with_context(|| format!("Failed to parse config: {}", self.config_path))?;

        tracing::info!("Loaded study config from {}", self.config_path);
        Ok(config)
    }

    /// Save the study configuration.
    ///
    /// # Arguments
    /// * `config` - The StudyConfig to save
    pub fn save_study_config(&self, config: &StudyConfig) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(config).context("Failed to serialize study config to YAML")?;

        fs::write(&self.config_path, yaml_string)
            .with_context(|| format!("Failed to write study config: {}", self.config_path))?;

        tracing::info!("Saved study config to {}", self.config_path);
        Ok(())
    }

    /// Resolve a configured path relative to the config directory.
    ///
    /// Absolute paths are returned unchanged.
    pub fn resolve_path(&self, path: &str) -> Utf8PathBuf {
        let path = Utf8Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config_dir.join(path)
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn config_path(&self) -> &Utf8Path {
        &self.config_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let manager = ConfigManager::new(&config_path).unwrap();
        (manager, temp_dir)
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let (manager, _temp_dir) = create_test_config_manager();
        let config = manager.load_file_config().unwrap();
        assert_eq!(config, StudyConfig::default());
    }

    #[test]
    fn test_load_save_study_config() {
        let (manager, _temp_dir) = create_test_config_manager();

        let mut config = StudyConfig::default();
        config.exercise.rounds = 20;
        config.collections.default_folder = "inbox".to_string();
        manager.save_study_config(&config).unwrap();

        let loaded = manager.load_file_config().unwrap();
        assert_eq!(loaded.exercise.rounds, 20);
        assert_eq!(loaded.collections.default_folder, "inbox");
        assert_eq!(loaded.exercise.points_per_correct, 10);
    }

    #[test]
    fn test_env_overrides_file() {
        let (manager, _temp_dir) = create_test_config_manager();
        fs::write(manager.config_path(), "exercise:\n  rounds: 4\n").unwrap();

        let env = Environment::with_prefix("KANJICARD_TEST").source(Some(
            [("KANJICARD_TEST_EXERCISE__ROUNDS".to_string(), "6".to_string())]
                .into_iter()
                .collect(),
        ));
        let config = manager.load_with_env(env).unwrap();
        assert_eq!(config.exercise.rounds, 6);
    }

    #[test]
    fn test_resolve_path() {
        let (manager, _temp_dir) = create_test_config_manager();
        assert_eq!(
            manager.resolve_path("data/data.csv"),
            manager.config_dir().join("data/data.csv")
        );
    }
}
