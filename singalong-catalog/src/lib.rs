//! The bundled song catalog.
//!
//! Ships the static song list the app presents and resolves each song's
//! lyric transcript asset from an on-disk assets directory laid out as
//!
//! ```text
//! assets/
//!   audio/<audio file>.mp3
//!   lyrics/<transcript file>.json
//! ```

use singalong_core::{parse_clock, LyricsSource, Song, SongLibrary};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const AUDIO_DIR: &str = "audio";
const LYRICS_DIR: &str = "lyrics";

struct CatalogEntry {
    id: &'static str,
    title: &'static str,
    artist: &'static str,
    audio_file: &'static str,
    transcript_file: &'static str,
    length: &'static str,
}

/// The shipped catalog. Transcript file names mostly mirror the audio
/// file names, with the one mismatched pairing the asset bundle carries.
const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        id: "1",
        title: "Uptown Funk",
        artist: "Bruno Mars",
        audio_file: "Bruno Mars - Uptown Funk.mp3",
        transcript_file: "Bruno Mars - Uptown Funk.json",
        length: "4:30",
    },
    CatalogEntry {
        id: "2",
        title: "One Dance",
        artist: "Drake",
        audio_file: "Drake - One Dance.mp3",
        transcript_file: "Drake - One Dance.json",
        length: "2:54",
    },
    CatalogEntry {
        id: "3",
        title: "Perfect",
        artist: "Ed Sheeran",
        audio_file: "Ed Sheeran - Perfect.mp3",
        transcript_file: "Ed Sheeran - Perfect.json",
        length: "4:23",
    },
    CatalogEntry {
        id: "4",
        title: "Baby",
        artist: "Justin Bieber",
        audio_file: "Justin Bieber - Baby.mp3",
        transcript_file: "Justin Bieber - Baby.json",
        length: "3:36",
    },
    CatalogEntry {
        id: "5",
        title: "All I Want for Christmas is You",
        artist: "Mariah Carey",
        audio_file: "Mariah Carey  - All I Want for Christmas is You.mp3",
        transcript_file: "Mariah Carey  - All I Want for Christmas is You.json",
        length: "4:01",
    },
    CatalogEntry {
        id: "6",
        title: "Billie Jean",
        artist: "Michael Jackson",
        audio_file: "Michael Jackson - Billie Jean.mp3",
        transcript_file: "Michael Jackson - Billie Jean.json",
        length: "4:54",
    },
    CatalogEntry {
        id: "7",
        title: "Die for You",
        artist: "The Weeknd",
        audio_file: "The Weeknd - Die for You.mp3",
        transcript_file: "The Weeknd - Die for You.json",
        length: "4:20",
    },
    CatalogEntry {
        id: "8",
        title: "SICKO MODE (Instrumental)",
        artist: "Travis Scott",
        audio_file: "TRAVIS SCOTT - SICKO MODE (INSTRUMENTAL).mp3",
        transcript_file: "Travis Scott, Drake - Sicko Mode.json",
        length: "5:13",
    },
];

/// Bundled catalog rooted at an assets directory.
#[derive(Debug, Clone)]
pub struct BundledCatalog {
    assets_dir: PathBuf,
}

impl BundledCatalog {
    pub fn new(assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
        }
    }

    /// Build the song library for the shipped catalog.
    #[must_use]
    pub fn library(&self) -> SongLibrary {
        let songs = CATALOG
            .iter()
            .map(|entry| {
                let song = Song::new(entry.id, entry.title, entry.artist, entry.audio_file);
                match parse_clock(entry.length) {
                    Some(length) => song.with_duration_hint(length),
                    None => song,
                }
            })
            .collect();
        SongLibrary::new(songs)
    }

    /// Path to a song's audio asset.
    #[must_use]
    pub fn audio_path(&self, audio_file: &str) -> PathBuf {
        self.assets_dir.join(AUDIO_DIR).join(audio_file)
    }

    /// The lyric transcript file paired with an audio file, if the
    /// catalog knows the song.
    #[must_use]
    pub fn transcript_file(audio_file: &str) -> Option<&'static str> {
        CATALOG
            .iter()
            .find(|entry| entry.audio_file == audio_file)
            .map(|entry| entry.transcript_file)
    }

    fn transcript_path(&self, audio_file: &str) -> Option<PathBuf> {
        Self::transcript_file(audio_file)
            .map(|name| self.assets_dir.join(LYRICS_DIR).join(name))
    }

    /// The assets directory this catalog reads from.
    #[must_use]
    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }
}

impl LyricsSource for BundledCatalog {
    fn raw_transcript(&self, song_id: &str) -> Option<String> {
        let path = self.transcript_path(song_id)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Some(raw),
            Err(e) => {
                warn!("Failed to read lyric asset {:?}: {}", path, e);
                None
            }
        }
    }
}
