use crate::error::Result;
use serde::Deserialize;
use std::time::Duration;

/// How long the last line stays on screen after its cue fires.
const FINAL_LINE_HOLD: Duration = Duration::from_secs(5);

/// A raw per-song lyric record as it appears in the bundled JSON assets.
///
/// Both fields are optional: hand-authored transcripts are frequently
/// missing one or the other, and such records are skipped rather than
/// failing the whole asset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LyricRecord {
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub lyric: Option<String>,
}

impl LyricRecord {
    /// Convenience constructor for building records in code.
    pub fn new(time: impl Into<String>, lyric: impl Into<String>) -> Self {
        Self {
            time: Some(time.into()),
            lyric: Some(lyric.into()),
        }
    }
}

/// A single timestamped lyric line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    /// Offset from the start of the track at which this line begins.
    pub time: Duration,
    /// The line text, trimmed, never empty.
    pub text: String,
}

/// Parsed, validated lyric transcript for one song.
///
/// Immutable once constructed; the cache shares instances behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    /// Cues sorted ascending by start time (ties keep input order).
    pub lines: Vec<Cue>,
    /// Last cue time plus a hold window, or zero for an empty transcript.
    pub duration: Duration,
    /// Number of input records dropped as malformed or empty.
    pub skipped: usize,
}

impl Transcript {
    /// Parse a list of raw records into a transcript.
    ///
    /// Tolerant by design: records missing a field, carrying an
    /// unrecognizable time, or holding only whitespace text are dropped
    /// and counted in [`Transcript::skipped`]. Never fails.
    #[must_use]
    pub fn parse(records: &[LyricRecord]) -> Self {
        let mut lines = Vec::new();
        let mut skipped = 0usize;

        for record in records {
            let (Some(time), Some(lyric)) = (&record.time, &record.lyric) else {
                skipped += 1;
                continue;
            };

            let Some(start) = scan_timestamp(time) else {
                skipped += 1;
                continue;
            };

            let text = lyric.trim();
            if text.is_empty() {
                skipped += 1;
                continue;
            }

            lines.push(Cue {
                time: start,
                text: text.to_string(),
            });
        }

        // Stable sort keeps input order for duplicate times
        lines.sort_by_key(|cue| cue.time);

        let duration = lines
            .last()
            .map_or(Duration::ZERO, |cue| cue.time + FINAL_LINE_HOLD);

        Self {
            lines,
            duration,
            skipped,
        }
    }

    /// Parse a raw JSON lyric asset (an array of `{time, lyric}` records).
    ///
    /// # Errors
    ///
    /// Returns an error if the asset is not a well-formed record list.
    /// Individual malformed records within a well-formed list are skipped,
    /// not errors.
    pub fn from_json(raw: &str) -> Result<Self> {
        let records: Vec<LyricRecord> = serde_json::from_str(raw)?;
        Ok(Self::parse(&records))
    }

    /// Whether the transcript has no cues.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Find a `MM:SS.CC` timestamp anywhere in the string and convert it to a
/// duration. The leftmost occurrence wins.
fn scan_timestamp(s: &str) -> Option<Duration> {
    s.as_bytes().windows(8).find_map(parse_timestamp_window)
}

/// Try to read one 8-byte window as `MM:SS.CC`.
fn parse_timestamp_window(w: &[u8]) -> Option<Duration> {
    if w[2] != b':' || w[5] != b'.' {
        return None;
    }

    let minutes = two_digits(w[0], w[1])?;
    // Seconds above 59 are accepted; the conversion is a plain sum
    let seconds = two_digits(w[3], w[4])?;
    let centiseconds = two_digits(w[6], w[7])?;

    Some(Duration::from_millis(
        minutes * 60_000 + seconds * 1_000 + centiseconds * 10,
    ))
}

fn two_digits(tens: u8, ones: u8) -> Option<u64> {
    if tens.is_ascii_digit() && ones.is_ascii_digit() {
        Some(u64::from(tens - b'0') * 10 + u64::from(ones - b'0'))
    } else {
        None
    }
}
