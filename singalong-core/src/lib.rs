pub mod cache;
pub mod config;
pub mod cursor;
pub mod error;
pub mod library;
pub mod paths;
pub mod playback;
pub mod player;
pub mod session;
pub mod time;
pub mod transcript;

pub use cache::{LyricsCache, LyricsSource};
pub use config::{Config, LibraryConfig, LyricsConfig, PlaybackConfig};
pub use cursor::LyricFrame;
pub use error::{CoreError, Result};
pub use library::{Song, SongLibrary};
pub use paths::{
    config_dir, config_path, default_assets_dir, ASSETS_DIR_NAME, CONFIG_DIR_NAME, CONFIG_FILE_NAME,
};
pub use playback::PlaybackState;
pub use player::{AudioPlayer, AudioSource, PlayerStatus};
pub use session::{KaraokeSession, SessionEvent};
pub use time::{parse_clock, DurationExt};
pub use transcript::{Cue, LyricRecord, Transcript};
