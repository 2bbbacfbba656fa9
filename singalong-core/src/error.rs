use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // Configuration errors
    #[error("Config file not found at {path}. A template has been created - please edit it and restart.")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid config: {message}")]
    ConfigInvalid { message: String },

    #[error("Failed to parse config file: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    // Lyrics errors
    #[error("Malformed lyric transcript: {0}")]
    MalformedTranscript(#[from] serde_json::Error),

    // Library errors
    #[error("Song not found in library: {id}")]
    SongNotFound { id: String },

    #[error("No song is currently loaded")]
    NoActiveSong,

    // Player errors
    #[error("Audio player command failed: {reason}")]
    PlayerFailed { reason: String },

    // IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
