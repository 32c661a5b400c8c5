//! Studio settings
//!
//! Settings are stored with `confy` in the OS-specific config directory.
//! Missing fields fall back to their defaults, so older config files keep
//! loading after new settings are added.

use crate::constant::{
    APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, DEFAULT_API_URL, DEFAULT_HIGHLIGHT_TIMEOUT_SECS,
    DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_SCROLL_MARGIN_LINES, MAX_RECENT_PROJECTS,
};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Confy(#[from] confy::ConfyError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct Config {
    pub settings: Settings,
}

impl Config {
    /// Read settings through confy; a missing file yields defaults
    pub fn load() -> Result<Self, ConfigError> {
        let settings: Settings = confy::load(APP_NAME, None)?;
        info!("Loading settings from {:?}", Self::config_path()?);
        Ok(Self { settings })
    }

    /// Write settings back to the config file
    pub fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, None, &self.settings)?;
        info!("Saving settings to {:?}", Self::config_path()?);
        Ok(())
    }

    /// Where projects and exports live, `./data` without platform dirs
    pub fn data_dir(&self) -> PathBuf {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("data"))
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(confy::get_configuration_file_path(APP_NAME, None)?)
    }

    /// Move a project to the front of the recent list
    pub fn add_recent_project(&mut self, id: &str) {
        self.settings.recent_projects.retain(|p| p != id);
        self.settings.recent_projects.insert(0, id.to_string());
        self.settings.recent_projects.truncate(MAX_RECENT_PROJECTS);

        // confy writes synchronously
        let settings = self.settings.clone();
        std::thread::spawn(move || {
            if let Err(e) = confy::store(APP_NAME, None, &settings) {
                tracing::error!("Failed to save recent projects: {}", e);
            }
        });
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Falling back to default settings: {}", e);
            Self {
                settings: Settings::default(),
            }
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// "light" or "dark"
    #[serde(default)]
    pub theme: String,

    /// Seconds before changed-line highlights clear themselves
    #[serde(default = "default_highlight_timeout")]
    pub highlight_timeout_secs: u64,

    /// Lines kept visible around a focused change block
    #[serde(default = "default_scroll_margin")]
    pub scroll_margin_lines: usize,

    /// Recently opened project ids, newest first
    #[serde(default)]
    pub recent_projects: Vec<String>,

    /// Code generation service
    #[serde(default)]
    pub generation: GenerationConfig,
}

fn default_highlight_timeout() -> u64 {
    DEFAULT_HIGHLIGHT_TIMEOUT_SECS
}

fn default_scroll_margin() -> usize {
    DEFAULT_SCROLL_MARGIN_LINES
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            highlight_timeout_secs: DEFAULT_HIGHLIGHT_TIMEOUT_SECS,
            scroll_margin_lines: DEFAULT_SCROLL_MARGIN_LINES,
            recent_projects: Vec::new(),
            generation: GenerationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// API key for the generation service
    pub api_key: String,

    /// Messages endpoint of the generation service
    pub api_url: String,

    /// Model name for the generation service
    pub model_name: String,

    pub max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            model_name: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "theme": "light" }"#).unwrap();
        assert_eq!(settings.theme, "light");
        assert_eq!(settings.highlight_timeout_secs, DEFAULT_HIGHLIGHT_TIMEOUT_SECS);
        assert_eq!(settings.scroll_margin_lines, DEFAULT_SCROLL_MARGIN_LINES);
        assert!(settings.recent_projects.is_empty());
        assert_eq!(settings.generation.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn settings_round_trip_through_json() {
        let mut settings = Settings::default();
        settings.highlight_timeout_secs = 3;
        settings.generation.model_name = "some-model".to_string();

        let json = serde_json::to_string(&settings).unwrap();
        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.highlight_timeout_secs, 3);
        assert_eq!(loaded.generation.model_name, "some-model");
    }
}
