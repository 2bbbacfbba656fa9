use std::time::{Duration, Instant};

/// Snapshot of the audio player's state as of the last poll.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    /// Whether audio is currently playing
    pub is_playing: bool,
    /// Playback position reported by the player
    pub position: Duration,
    /// Total track duration reported by the player
    pub duration: Duration,
    /// When this snapshot was taken (for interpolation)
    pub updated_at: Instant,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            updated_at: Instant::now(),
        }
    }
}

impl PlaybackState {
    #[must_use]
    pub fn new(is_playing: bool, position: Duration, duration: Duration) -> Self {
        Self {
            is_playing,
            position,
            duration,
            updated_at: Instant::now(),
        }
    }

    /// Get interpolated position based on time elapsed since the last poll.
    ///
    /// Between ticks the player keeps advancing; interpolating from the
    /// snapshot keeps readers smooth without an extra poll.
    #[must_use]
    pub fn interpolated_position(&self) -> Duration {
        if !self.is_playing {
            return self.position;
        }

        let interpolated = self.position + self.updated_at.elapsed();

        // Clamp to track duration
        interpolated.min(self.duration)
    }
}
