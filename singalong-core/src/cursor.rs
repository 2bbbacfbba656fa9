use crate::transcript::Transcript;
use std::time::Duration;

/// Resolved lyric state for one playback position.
///
/// Recomputed on every tick; never stored. `current` is `None` before the
/// first cue fires (hosts render their placeholder there), `next` is
/// `None` after the last line begins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LyricFrame {
    pub current: Option<String>,
    pub next: Option<String>,
    /// Fraction of the way from the current cue to the next, in [0, 1].
    pub progress: f32,
}

impl Transcript {
    /// Index of the most recently started line, if any cue has fired yet.
    #[must_use]
    pub fn current_index(&self, position: Duration) -> Option<usize> {
        // Rightmost cue not exceeding the position; the lines are sorted
        self.lines.iter().rposition(|cue| cue.time <= position)
    }

    /// Resolve the lyric frame for a playback position.
    ///
    /// Total over all positions: an empty transcript or a position before
    /// the first cue yields an empty frame, never an error.
    #[must_use]
    pub fn frame(&self, position: Duration) -> LyricFrame {
        if self.lines.is_empty() {
            return LyricFrame::default();
        }

        let index = self.current_index(position);
        // Before the first cue the upcoming line is still "next"
        let next_index = index.map_or(0, |i| i + 1);

        let current = index.map(|i| self.lines[i].text.clone());
        let next = self.lines.get(next_index).map(|cue| cue.text.clone());

        let progress = match index {
            Some(i) if next_index < self.lines.len() => {
                let started = self.lines[i].time;
                let span = self.lines[next_index].time.saturating_sub(started);
                if span.is_zero() {
                    0.0
                } else {
                    let elapsed = position.saturating_sub(started);
                    (elapsed.as_secs_f32() / span.as_secs_f32()).clamp(0.0, 1.0)
                }
            }
            _ => 0.0,
        };

        LyricFrame {
            current,
            next,
            progress,
        }
    }
}
