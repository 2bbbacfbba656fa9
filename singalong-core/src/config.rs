use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub lyrics: LyricsConfig,
    #[serde(default)]
    pub library: LibraryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// How often the session polls the player for its position
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Step size of the relative seek controls, as a percentage of the track
    #[serde(default = "default_seek_step")]
    pub seek_step_percent: f32,
}

const fn default_poll_interval() -> u64 {
    100
}

const fn default_seek_step() -> f32 {
    10.0
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            seek_step_percent: default_seek_step(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LyricsConfig {
    /// Show a placeholder line before the first cue fires
    #[serde(default = "default_true")]
    pub show_placeholder: bool,
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

const fn default_true() -> bool {
    true
}

fn default_placeholder() -> String {
    "🎤 Ready to sing?".to_string()
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            show_placeholder: default_true(),
            placeholder: default_placeholder(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LibraryConfig {
    /// Where the bundled audio/lyric assets live; defaults to the config dir
    #[serde(default)]
    pub assets_dir: Option<PathBuf>,
}

impl LibraryConfig {
    /// Resolve the assets directory, falling back to the default location.
    #[must_use]
    pub fn assets_path(&self) -> PathBuf {
        self.assets_dir
            .clone()
            .unwrap_or_else(crate::paths::default_assets_dir)
    }
}

impl Config {
    /// Get the configuration directory path (~/.config/singalong/)
    #[must_use]
    pub fn config_dir() -> PathBuf {
        crate::paths::config_dir()
    }

    /// Get the config file path (~/.config/singalong/config.toml)
    #[must_use]
    pub fn config_path() -> PathBuf {
        crate::paths::config_path()
    }

    /// Parse and validate a TOML config document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be parsed or a field is out
    /// of range.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file or create a template on first run
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read, parsed, or fails
    /// validation.
    pub fn load_or_create() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            // Create config directory if it doesn't exist
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }

            // Write template config
            fs::write(&config_path, CONFIG_TEMPLATE)?;

            return Err(CoreError::ConfigNotFound { path: config_path });
        }

        let content = fs::read_to_string(&config_path)?;
        Self::from_toml(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.playback.poll_interval_ms == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "playback.poll_interval_ms must be greater than zero".to_string(),
            });
        }

        let step = self.playback.seek_step_percent;
        if !step.is_finite() || step <= 0.0 || step > 100.0 {
            return Err(CoreError::ConfigInvalid {
                message: "playback.seek_step_percent must be in (0, 100]".to_string(),
            });
        }

        Ok(())
    }
}

const CONFIG_TEMPLATE: &str = r#"# Singalong Configuration
# ~/.config/singalong/config.toml

[playback]
# How often the playback position is polled for lyric sync, in milliseconds.
# 100 keeps line transitions smooth; raise it to save battery.
poll_interval_ms = 100
# Step size of the skip forward/back controls, percent of track length
seek_step_percent = 10.0

[lyrics]
# Placeholder shown before the first lyric line starts
show_placeholder = true
placeholder = "🎤 Ready to sing?"

[library]
# Where the bundled audio/lyric assets live.
# Defaults to ~/.config/singalong/assets/
# assets_dir = ""
"#;
