use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Serialization format used when generating tracker blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Where rendered cards are placed relative to the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemplatePosition {
    Above,
    #[default]
    Bottom,
    Left,
    Right,
    Macro,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub enabled: bool,
    /// Info-string tag on fenced code blocks carrying tracker data.
    pub code_block_identifier: String,
    pub block_format: OutputFormat,
    /// Hide tracker blocks in the displayed chat text.
    pub hide_tracker_blocks: bool,
    pub default_bg_color: String,
    pub show_thought_bubble: bool,
    pub template_position: TemplatePosition,
    /// Optional custom card template; shell variables and tilde are expanded.
    pub template_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            code_block_identifier: "sim-tracker".to_string(),
            block_format: OutputFormat::default(),
            hide_tracker_blocks: true,
            default_bg_color: "#2e2e3e".to_string(),
            show_thought_bubble: true,
            template_position: TemplatePosition::default(),
            template_file: None,
        }
    }
}

impl Settings {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut settings: Settings =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the template path
        settings.template_file = settings
            .template_file
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(settings))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/sim-tracker");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Settings::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/sim-tracker/config.toml"));
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.enabled);
        assert_eq!(settings.code_block_identifier, "sim-tracker");
        assert_eq!(settings.block_format, OutputFormat::Json);
        assert!(settings.hide_tracker_blocks);
        assert_eq!(settings.template_position, TemplatePosition::Bottom);
        assert_eq!(settings.template_file, None);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let original = Settings {
            code_block_identifier: "stats".to_string(),
            block_format: OutputFormat::Yaml,
            template_position: TemplatePosition::Left,
            ..Settings::default()
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Settings = toml::from_str(&toml_str).unwrap();

        assert_eq!(deserialized.code_block_identifier, "stats");
        assert_eq!(deserialized.block_format, OutputFormat::Yaml);
        assert_eq!(deserialized.template_position, TemplatePosition::Left);
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let settings: Settings = toml::from_str("code_block_identifier = \"stats\"").unwrap();
        assert_eq!(settings.code_block_identifier, "stats");
        assert!(settings.enabled);
        assert_eq!(settings.default_bg_color, "#2e2e3e");
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Settings::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        let test_settings = Settings {
            hide_tracker_blocks: false,
            ..Settings::default()
        };

        test_settings.save_to_path(&config_file).unwrap();

        let loaded = Settings::load_from_path(&config_file).unwrap().unwrap();
        assert!(!loaded.hide_tracker_blocks);
        assert_eq!(loaded.code_block_identifier, "sim-tracker");
    }

    #[test]
    fn test_malformed_config_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "enabled = \"not a bool\"").unwrap();

        let result = Settings::load_from_path(&config_file);
        assert!(matches!(
            result,
            Err(ConfigError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_template_file_tilde_is_expanded() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "template_file = \"~/cards/template.html\"").unwrap();

        let loaded = Settings::load_from_path(&config_file).unwrap().unwrap();
        let path = loaded.template_file.unwrap();
        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.to_string_lossy().contains("cards/template.html"));
    }
}
