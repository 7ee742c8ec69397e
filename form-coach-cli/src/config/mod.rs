use anyhow::{Context, Result};
use form_coach_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration: engine thresholds at the top level plus replay defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub replay: ReplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Playback rate for --realtime
    #[serde(default = "default_fps")]
    pub fps: f64,

    /// Default rep target; 0 disables it
    #[serde(default)]
    pub target: u32,
}

// Default value functions
fn default_fps() -> f64 {
    30.0
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            target: 0,
        }
    }
}

impl Config {
    /// Get config directory path (~/.form-coach/)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".form-coach"))
    }

    /// Config file path: the override if given, else ~/.form-coach/config.toml
    pub fn config_file(path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(path) => Ok(path.to_path_buf()),
            None => Ok(Self::config_dir()?.join("config.toml")),
        }
    }

    /// Load configuration from file, falling back to defaults when it is missing
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_file = Self::config_file(path)?;

        if !config_file.exists() {
            tracing::info!(path = %config_file.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_file).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;
        config
            .engine
            .validate()
            .with_context(|| format!("Invalid configuration in {}", config_file.display()))?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_file = Self::config_file(path)?;
        if let Some(config_dir) = config_file.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(config_dir).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_file, contents).context("Failed to write config file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.engine.stability.required_stable_frames, 20);
        assert_eq!(config.engine.stability.max_unstable_frames, 15);
        assert_eq!(config.replay.fps, 30.0);
        assert_eq!(config.replay.target, 0);
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(Some(dir.path().join("absent.toml").as_path())).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.engine.stability.required_stable_frames = 5;
        config.replay.target = 12;
        config.save(Some(path.as_path())).unwrap();

        assert_eq!(Config::load(Some(path.as_path())).unwrap(), config);
    }

    #[test]
    fn test_engine_sections_stay_at_top_level() {
        let contents = "[stability]\nrequired_stable_frames = 4\n\n\
                        [keypoints]\nmin_visibility = 0.5\n\n\
                        [replay]\nfps = 15.0\n";
        let config: Config = toml::from_str(contents).unwrap();

        assert_eq!(config.engine.stability.required_stable_frames, 4);
        assert_eq!(config.engine.stability.max_unstable_frames, 15);
        assert_eq!(config.engine.keypoints.min_visibility, 0.5);
        assert_eq!(config.engine.squat, EngineConfig::default().squat);
        assert_eq!(config.replay.fps, 15.0);

        let serialized = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(serialized.contains("[stability]"));
        assert!(serialized.contains("[lunge]"));
        assert!(serialized.contains("min_visibility = 0.3\n"));
        assert!(!serialized.contains("[engine"));
    }

    #[test]
    fn test_invalid_thresholds_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[squat]\ntarget_min = 130.0\n").unwrap();

        let err = Config::load(Some(path.as_path())).unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
    }
}
