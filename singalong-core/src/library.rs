use std::time::Duration;

/// One entry of the song catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    /// Stable identifier within the library
    pub id: String,
    /// Display title
    pub title: String,
    /// Display artist
    pub artist: String,
    /// Audio asset file name; also the key for lyric lookups
    pub file_name: String,
    /// Listed track length, if the catalog knows it ahead of playback
    pub duration_hint: Option<Duration>,
}

impl Song {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            file_name: file_name.into(),
            duration_hint: None,
        }
    }

    #[must_use]
    pub const fn with_duration_hint(mut self, duration: Duration) -> Self {
        self.duration_hint = Some(duration);
        self
    }
}

/// Ordered song catalog with wrapping next/previous selection.
#[derive(Debug, Clone, Default)]
pub struct SongLibrary {
    songs: Vec<Song>,
}

impl SongLibrary {
    #[must_use]
    pub fn new(songs: Vec<Song>) -> Self {
        Self { songs }
    }

    #[must_use]
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    #[must_use]
    pub fn get(&self, song_id: &str) -> Option<&Song> {
        self.songs.iter().find(|song| song.id == song_id)
    }

    fn position_of(&self, song_id: &str) -> Option<usize> {
        self.songs.iter().position(|song| song.id == song_id)
    }

    /// The song after `song_id` in catalog order, wrapping at the end.
    #[must_use]
    pub fn next_after(&self, song_id: &str) -> Option<&Song> {
        let index = self.position_of(song_id)?;
        self.songs.get((index + 1) % self.songs.len())
    }

    /// The song before `song_id` in catalog order, wrapping at the start.
    #[must_use]
    pub fn previous_before(&self, song_id: &str) -> Option<&Song> {
        let index = self.position_of(song_id)?;
        let wrapped = (index + self.songs.len() - 1) % self.songs.len();
        self.songs.get(wrapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> SongLibrary {
        SongLibrary::new(vec![
            Song::new("1", "First", "Artist A", "a.mp3"),
            Song::new("2", "Second", "Artist B", "b.mp3"),
            Song::new("3", "Third", "Artist C", "c.mp3"),
        ])
    }

    #[test]
    fn test_get_by_id() {
        let library = library();
        assert_eq!(library.get("2").map(|s| s.title.as_str()), Some("Second"));
        assert!(library.get("9").is_none());
    }

    #[test]
    fn test_next_wraps() {
        let library = library();
        assert_eq!(library.next_after("1").map(|s| s.id.as_str()), Some("2"));
        assert_eq!(library.next_after("3").map(|s| s.id.as_str()), Some("1"));
        assert!(library.next_after("9").is_none());
    }

    #[test]
    fn test_previous_wraps() {
        let library = library();
        assert_eq!(
            library.previous_before("2").map(|s| s.id.as_str()),
            Some("1")
        );
        assert_eq!(
            library.previous_before("1").map(|s| s.id.as_str()),
            Some("3")
        );
    }

    #[test]
    fn test_single_song_wraps_to_itself() {
        let library = SongLibrary::new(vec![Song::new("1", "Only", "Artist", "only.mp3")]);
        assert_eq!(library.next_after("1").map(|s| s.id.as_str()), Some("1"));
        assert_eq!(
            library.previous_before("1").map(|s| s.id.as_str()),
            Some("1")
        );
    }

    #[test]
    fn test_duration_hint_builder() {
        let song =
            Song::new("1", "Song", "Artist", "s.mp3").with_duration_hint(Duration::from_secs(270));
        assert_eq!(song.duration_hint, Some(Duration::from_secs(270)));
    }
}
