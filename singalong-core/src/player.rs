//! Audio player collaborator trait.

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Opaque handle to a bundled audio asset.
///
/// The engine only carries the audio file name; how that resolves to an
/// actual stream (asset bundle, filesystem, platform media session) is the
/// player implementation's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSource {
    pub file_name: String,
}

impl AudioSource {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

/// Player state as reported by a position query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerStatus {
    /// No audio loaded
    #[default]
    NotLoaded,
    /// Audio loaded; positions in track time
    Loaded {
        position: Duration,
        duration: Duration,
        is_playing: bool,
        /// The track just played to its end
        finished: bool,
    },
}

impl PlayerStatus {
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Trait for the external audio player the engine drives.
///
/// The engine never decodes or mixes audio itself; it issues commands and
/// re-polls [`status`](AudioPlayer::status) on every tick. Implementations
/// should:
///
/// - Treat `unload` with nothing loaded as a no-op, not an error
/// - Report `finished: true` exactly once after a track plays out
/// - Accept `seek` positions beyond the end by clamping, if the platform
///   player does not already
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Load an audio source, replacing whatever was loaded before.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be opened.
    async fn load(&self, source: &AudioSource) -> Result<()>;

    /// Begin or resume playback.
    ///
    /// # Errors
    ///
    /// Returns an error if no audio is loaded or the platform refuses.
    async fn play(&self) -> Result<()>;

    /// Pause playback, keeping the position.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses.
    async fn pause(&self) -> Result<()>;

    /// Jump to a position within the loaded track.
    ///
    /// # Errors
    ///
    /// Returns an error if no audio is loaded or the platform refuses.
    async fn seek(&self, position: Duration) -> Result<()>;

    /// Release the loaded audio, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform fails to release its handle.
    async fn unload(&self) -> Result<()>;

    /// Query current position and duration.
    async fn status(&self) -> PlayerStatus;
}
