use crate::config::settings::Settings;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Largest margin accepted from configuration files
pub const MAX_WINDOW_MARGIN: u32 = 10_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

/// Loads and validates [`Settings`] from TOML
#[derive(Debug, Clone)]
pub struct SettingsParser {
    config_dir: PathBuf,
}

impl Default for SettingsParser {
    fn default() -> Self {
        let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(home_dir.join(".config").join("tilegraph"))
    }
}

impl SettingsParser {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    pub fn default_path(&self) -> PathBuf {
        self.config_dir.join("settings.toml")
    }

    pub fn parse_str(&self, content: &str) -> Result<Settings, ConfigError> {
        let settings: Settings = toml::from_str(content)?;
        self.validate(&settings)?;
        Ok(settings)
    }

    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Settings, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading settings");
        let content = std::fs::read_to_string(path)?;
        self.parse_str(&content)
    }

    /// Settings from the default path, or defaults when no file exists there
    pub fn load_default(&self) -> Result<Settings, ConfigError> {
        let path = self.default_path();
        if !path.exists() {
            info!(path = %path.display(), "No settings file found, using defaults");
            return Ok(Settings::default());
        }
        self.parse_file(path)
    }

    /// Settings from an explicit path when given, otherwise the default path
    pub fn load(&self, path: Option<&Path>) -> Result<Settings, ConfigError> {
        match path {
            Some(path) => self.parse_file(path),
            None => self.load_default(),
        }
    }

    pub fn to_toml(&self, settings: &Settings) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(settings)?)
    }

    pub fn validate(&self, settings: &Settings) -> Result<(), ConfigError> {
        if settings.constraints.window_margin > MAX_WINDOW_MARGIN {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "window_margin {} exceeds the maximum of {}",
                    settings.constraints.window_margin, MAX_WINDOW_MARGIN
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::Tiebreaker;
    use crate::services::neighbourhood::NeighbourhoodVariant;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_settings() {
        let parser = SettingsParser::new("/nonexistent");
        let settings = parser
            .parse_str(
                r#"
[constraints]
window_margin = 30

[navigation]
neighbourhood = "wide"
tiebreaker = "last"
"#,
            )
            .unwrap();

        assert_eq!(settings.constraints.window_margin, 30);
        assert_eq!(settings.navigation.neighbourhood, NeighbourhoodVariant::Wide);
        assert!(matches!(settings.navigation.tiebreaker, Tiebreaker::Last));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let parser = SettingsParser::new("/nonexistent");
        let settings = parser.parse_str("[constraints]\nwindow_margin = 4\n").unwrap();

        assert_eq!(settings.margin(), 4);
        assert_eq!(settings.navigation.neighbourhood, NeighbourhoodVariant::Narrow);
    }

    #[test]
    fn test_rejects_bad_values() {
        let parser = SettingsParser::new("/nonexistent");

        let result = parser.parse_str("[constraints]\nwindow_margin = 20000\n");
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));

        let result = parser.parse_str("[navigation]\ntiebreaker = \"random\"\n");
        assert!(matches!(result, Err(ConfigError::TomlError(_))));

        let result = parser.parse_str("[constraints]\nmargin = 3\n");
        assert!(matches!(result, Err(ConfigError::TomlError(_))));
    }

    #[test]
    fn test_load_default_without_file() {
        let dir = TempDir::new().unwrap();
        let parser = SettingsParser::new(dir.path());

        let settings = parser.load_default().unwrap();
        assert_eq!(settings.margin(), 0);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let parser = SettingsParser::new(dir.path());

        let content = parser.to_toml(&Settings::with_margin(12)).unwrap();
        std::fs::write(parser.default_path(), content).unwrap();

        let settings = parser.load(None).unwrap();
        assert_eq!(settings.constraints.window_margin, 12);
        assert!(parser.load(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
