use crate::transcript::Transcript;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Source of raw per-song lyric assets.
///
/// `song_id` is the song's audio file name, the key the rest of the
/// engine uses for lyric lookups. Returning `None` means "no lyrics for
/// this song" - a valid outcome, not an error.
pub trait LyricsSource: Send + Sync {
    fn raw_transcript(&self, song_id: &str) -> Option<String>;
}

/// Get-or-parse memoization of parsed transcripts.
///
/// Each song's asset is parsed at most once for the life of the cache;
/// later requests hand out clones of the stored `Arc`. Parse failures are
/// logged and surfaced as `None`, and are retried on the next request
/// rather than cached.
pub struct LyricsCache {
    source: Box<dyn LyricsSource>,
    entries: HashMap<String, Arc<Transcript>>,
}

impl LyricsCache {
    #[must_use]
    pub fn new(source: Box<dyn LyricsSource>) -> Self {
        Self {
            source,
            entries: HashMap::new(),
        }
    }

    /// Look up the parsed transcript for a song.
    pub fn get(&mut self, song_id: &str) -> Option<Arc<Transcript>> {
        if let Some(transcript) = self.entries.get(song_id) {
            debug!("Lyrics cache hit for {}", song_id);
            return Some(Arc::clone(transcript));
        }

        let raw = self.source.raw_transcript(song_id)?;

        match Transcript::from_json(&raw) {
            Ok(transcript) => {
                if transcript.skipped > 0 {
                    warn!(
                        "Transcript for {} dropped {} malformed record(s)",
                        song_id, transcript.skipped
                    );
                }
                debug!(
                    "Parsed lyrics for {} ({} lines)",
                    song_id,
                    transcript.lines.len()
                );
                let transcript = Arc::new(transcript);
                self.entries
                    .insert(song_id.to_string(), Arc::clone(&transcript));
                Some(transcript)
            }
            Err(e) => {
                warn!("Failed to parse lyrics for {}: {}", song_id, e);
                None
            }
        }
    }

    /// Number of songs with a cached transcript.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
