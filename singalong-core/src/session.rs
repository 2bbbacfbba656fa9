use crate::cache::LyricsCache;
use crate::config::Config;
use crate::cursor::LyricFrame;
use crate::error::{CoreError, Result};
use crate::library::{Song, SongLibrary};
use crate::playback::PlaybackState;
use crate::player::{AudioPlayer, AudioSource, PlayerStatus};
use crate::time::DurationExt;
use crate::transcript::Transcript;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Events emitted by the karaoke session
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A song was loaded and playback began
    SongStarted { song: Song },
    /// Lyrics were found for the started song
    LyricsLoaded { transcript: Arc<Transcript> },
    /// No lyrics are available for the started song
    LyricsUnavailable,
    /// Playback was paused
    PlaybackPaused { position: Duration },
    /// Playback was resumed
    PlaybackResumed { position: Duration },
    /// A seek was carried out
    SeekPerformed { position: Duration },
    /// Regular position poll result
    Tick {
        position: Duration,
        duration: Duration,
        /// Resolved lyric state, when the current song has lyrics
        frame: Option<LyricFrame>,
    },
    /// The current song played to its end
    SongFinished { song: Song },
    /// Playback was stopped and the audio released
    Stopped,
}

struct NowPlaying {
    song: Song,
    transcript: Option<Arc<Transcript>>,
}

struct SessionInner {
    library: SongLibrary,
    cache: LyricsCache,
    current: Option<NowPlaying>,
    state: PlaybackState,
}

/// Playback session driving an external audio player and resolving lyric
/// state on a polling tick.
///
/// All lyric computation happens here on the session's own cadence; player
/// commands are issued and the position simply re-polled on the next tick.
pub struct KaraokeSession {
    player: Arc<dyn AudioPlayer>,
    inner: RwLock<SessionInner>,
    event_tx: broadcast::Sender<SessionEvent>,
    cancel_token: CancellationToken,
    poll_interval: Duration,
    seek_step: f32,
}

impl KaraokeSession {
    /// Create a new session over a player, a song library and a lyric cache.
    #[must_use]
    pub fn new(
        player: Arc<dyn AudioPlayer>,
        library: SongLibrary,
        cache: LyricsCache,
        config: &Config,
    ) -> Arc<Self> {
        let (event_tx, _) = broadcast::channel(64);

        Arc::new(Self {
            player,
            inner: RwLock::new(SessionInner {
                library,
                cache,
                current: None,
                state: PlaybackState::default(),
            }),
            event_tx,
            cancel_token: CancellationToken::new(),
            poll_interval: Duration::from_millis(config.playback.poll_interval_ms),
            seek_step: config.playback.seek_step_percent,
        })
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    /// Get a clone of the cancellation token
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Signal the tick loop to stop
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }

    /// Start the tick loop in a background task
    #[must_use]
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// Run the tick loop until cancelled
    async fn run(&self) {
        info!(
            "Starting karaoke session loop ({} ms tick)",
            self.poll_interval.as_millis()
        );

        loop {
            tokio::select! {
                () = self.cancel_token.cancelled() => {
                    info!("Karaoke session shutting down");
                    break;
                }
                () = tokio::time::sleep(self.poll_interval) => {
                    self.tick().await;
                }
            }
        }
    }

    /// Poll the player once and publish the resulting snapshot.
    ///
    /// The run loop calls this on its own cadence; hosts with a
    /// push-capable player can call it from their position callback
    /// instead of spawning [`start`](KaraokeSession::start).
    pub async fn tick(&self) {
        let status = self.player.status().await;
        let PlayerStatus::Loaded {
            position,
            duration,
            is_playing,
            finished,
        } = status
        else {
            return;
        };

        let finished_song = {
            let mut inner = self.inner.write().await;
            inner.state = PlaybackState::new(is_playing, position, duration);
            if finished {
                inner.state = PlaybackState::default();
                inner.current.take().map(|now| now.song)
            } else {
                None
            }
        };

        if let Some(song) = finished_song {
            info!("Song finished: {} - {}", song.artist, song.title);
            if let Err(e) = self.player.unload().await {
                warn!("Failed to unload finished song: {}", e);
            }
            let _ = self.event_tx.send(SessionEvent::SongFinished { song });
            return;
        }

        let frame = {
            let inner = self.inner.read().await;
            inner
                .current
                .as_ref()
                .and_then(|now| now.transcript.as_ref())
                .map(|transcript| transcript.frame(position))
        };

        let _ = self.event_tx.send(SessionEvent::Tick {
            position,
            duration,
            frame,
        });
    }

    /// Load a song from the library and start playing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the song is not in the library or a player
    /// command fails.
    pub async fn play_song(&self, song_id: &str) -> Result<()> {
        let song = {
            let inner = self.inner.read().await;
            inner.library.get(song_id).cloned()
        }
        .ok_or_else(|| CoreError::SongNotFound {
            id: song_id.to_string(),
        })?;

        // Release whatever is currently loaded
        let had_song = {
            let mut inner = self.inner.write().await;
            inner.current.take().is_some()
        };
        if had_song {
            self.player.unload().await?;
        }

        self.player.load(&AudioSource::new(&song.file_name)).await?;
        self.player.play().await?;

        let transcript = {
            let mut inner = self.inner.write().await;
            let transcript = inner.cache.get(&song.file_name);
            inner.current = Some(NowPlaying {
                song: song.clone(),
                transcript: transcript.clone(),
            });
            inner.state = PlaybackState::new(
                true,
                Duration::ZERO,
                song.duration_hint.unwrap_or(Duration::ZERO),
            );
            transcript
        };

        info!("Now playing: {} - {}", song.artist, song.title);
        let _ = self.event_tx.send(SessionEvent::SongStarted { song });

        if let Some(transcript) = transcript {
            let _ = self.event_tx.send(SessionEvent::LyricsLoaded { transcript });
        } else {
            debug!("No lyrics available for {}", song_id);
            let _ = self.event_tx.send(SessionEvent::LyricsUnavailable);
        }

        Ok(())
    }

    /// Pause if playing, resume if paused.
    ///
    /// # Errors
    ///
    /// Returns an error if no song is loaded or a player command fails.
    pub async fn toggle_playback(&self) -> Result<()> {
        let (has_song, was_playing, position, duration) = {
            let inner = self.inner.read().await;
            (
                inner.current.is_some(),
                inner.state.is_playing,
                inner.state.interpolated_position(),
                inner.state.duration,
            )
        };

        if !has_song {
            return Err(CoreError::NoActiveSong);
        }

        if was_playing {
            self.player.pause().await?;
            self.inner.write().await.state = PlaybackState::new(false, position, duration);
            let _ = self.event_tx.send(SessionEvent::PlaybackPaused { position });
        } else {
            self.player.play().await?;
            self.inner.write().await.state = PlaybackState::new(true, position, duration);
            let _ = self.event_tx.send(SessionEvent::PlaybackResumed { position });
        }

        Ok(())
    }

    /// Seek to an absolute position, clamped to the track duration.
    ///
    /// # Errors
    ///
    /// Returns an error if no song is loaded or the player refuses.
    pub async fn seek(&self, position: Duration) -> Result<()> {
        let (has_song, is_playing, duration) = {
            let inner = self.inner.read().await;
            (
                inner.current.is_some(),
                inner.state.is_playing,
                inner.state.duration,
            )
        };

        if !has_song {
            return Err(CoreError::NoActiveSong);
        }

        // Duration may still be unknown before the first poll
        let target = if duration.is_zero() {
            position
        } else {
            position.min(duration)
        };

        debug!("Seeking to {} ms", target.as_millis_u64());
        self.player.seek(target).await?;

        self.inner.write().await.state = PlaybackState::new(is_playing, target, duration);
        let _ = self
            .event_tx
            .send(SessionEvent::SeekPerformed { position: target });

        Ok(())
    }

    /// Seek to a percentage of the track length.
    ///
    /// # Errors
    ///
    /// Returns an error if no song is loaded or the player refuses.
    pub async fn seek_percent(&self, percent: f32) -> Result<()> {
        let duration = self.inner.read().await.state.duration;
        let ratio = if percent.is_finite() {
            (percent / 100.0).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.seek(duration.mul_f32(ratio)).await
    }

    /// Skip forward by the configured seek step.
    ///
    /// # Errors
    ///
    /// Returns an error if no song is loaded or the player refuses.
    pub async fn skip_forward(&self) -> Result<()> {
        self.skip_by(self.seek_step).await
    }

    /// Skip backward by the configured seek step.
    ///
    /// # Errors
    ///
    /// Returns an error if no song is loaded or the player refuses.
    pub async fn skip_backward(&self) -> Result<()> {
        self.skip_by(-self.seek_step).await
    }

    async fn skip_by(&self, delta_percent: f32) -> Result<()> {
        let (position, duration) = {
            let inner = self.inner.read().await;
            (inner.state.interpolated_position(), inner.state.duration)
        };

        let current_percent = if duration.is_zero() {
            0.0
        } else {
            position.as_secs_f32() / duration.as_secs_f32() * 100.0
        };

        self.seek_percent(current_percent + delta_percent).await
    }

    /// Advance to the next song in library order, wrapping at the end.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is playing or a player command fails.
    pub async fn next(&self) -> Result<()> {
        let target_id = {
            let inner = self.inner.read().await;
            let now = inner.current.as_ref().ok_or(CoreError::NoActiveSong)?;
            inner
                .library
                .next_after(&now.song.id)
                .map(|song| song.id.clone())
                .ok_or_else(|| CoreError::SongNotFound {
                    id: now.song.id.clone(),
                })?
        };
        self.play_song(&target_id).await
    }

    /// Go back to the previous song in library order, wrapping at the start.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is playing or a player command fails.
    pub async fn previous(&self) -> Result<()> {
        let target_id = {
            let inner = self.inner.read().await;
            let now = inner.current.as_ref().ok_or(CoreError::NoActiveSong)?;
            inner
                .library
                .previous_before(&now.song.id)
                .map(|song| song.id.clone())
                .ok_or_else(|| CoreError::SongNotFound {
                    id: now.song.id.clone(),
                })?
        };
        self.play_song(&target_id).await
    }

    /// Stop playback and release the loaded audio.
    ///
    /// # Errors
    ///
    /// Returns an error if the player fails to release its handle.
    pub async fn stop(&self) -> Result<()> {
        let had_song = {
            let mut inner = self.inner.write().await;
            inner.state = PlaybackState::default();
            inner.current.take().is_some()
        };

        if had_song {
            self.player.unload().await?;
            let _ = self.event_tx.send(SessionEvent::Stopped);
        }

        Ok(())
    }

    /// Get the currently playing song
    pub async fn current_song(&self) -> Option<Song> {
        self.inner
            .read()
            .await
            .current
            .as_ref()
            .map(|now| now.song.clone())
    }

    /// Get the current song's transcript, if lyrics were found
    pub async fn transcript(&self) -> Option<Arc<Transcript>> {
        self.inner
            .read()
            .await
            .current
            .as_ref()
            .and_then(|now| now.transcript.clone())
    }

    /// Get the latest playback snapshot
    pub async fn playback_state(&self) -> PlaybackState {
        self.inner.read().await.state.clone()
    }

    /// Get interpolated current position
    pub async fn position(&self) -> Duration {
        self.inner.read().await.state.interpolated_position()
    }

    /// Check if currently playing
    pub async fn is_playing(&self) -> bool {
        self.inner.read().await.state.is_playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LyricsSource;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Clone, Default)]
    struct MockState {
        loaded: Option<String>,
        playing: bool,
        position: Duration,
        duration: Duration,
        finished: bool,
        loads: usize,
    }

    #[derive(Default)]
    struct MockPlayer {
        state: Mutex<MockState>,
    }

    impl MockPlayer {
        fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        fn snapshot(&self) -> MockState {
            self.state.lock().unwrap().clone()
        }

        fn set_position(&self, position: Duration) {
            self.state.lock().unwrap().position = position;
        }

        fn finish(&self) {
            self.state.lock().unwrap().finished = true;
        }
    }

    #[async_trait]
    impl AudioPlayer for MockPlayer {
        async fn load(&self, source: &AudioSource) -> Result<()> {
            let mut state = self.state.lock().unwrap();
            state.loaded = Some(source.file_name.clone());
            state.playing = false;
            state.position = Duration::ZERO;
            state.duration = Duration::from_secs(240);
            state.finished = false;
            state.loads += 1;
            Ok(())
        }

        async fn play(&self) -> Result<()> {
            self.state.lock().unwrap().playing = true;
            Ok(())
        }

        async fn pause(&self) -> Result<()> {
            self.state.lock().unwrap().playing = false;
            Ok(())
        }

        async fn seek(&self, position: Duration) -> Result<()> {
            self.state.lock().unwrap().position = position;
            Ok(())
        }

        async fn unload(&self) -> Result<()> {
            let mut state = self.state.lock().unwrap();
            let loads = state.loads;
            *state = MockState {
                loads,
                ..MockState::default()
            };
            Ok(())
        }

        async fn status(&self) -> PlayerStatus {
            let state = self.state.lock().unwrap();
            if state.loaded.is_none() {
                return PlayerStatus::NotLoaded;
            }
            PlayerStatus::Loaded {
                position: state.position,
                duration: state.duration,
                is_playing: state.playing,
                finished: state.finished,
            }
        }
    }

    struct StaticSource(HashMap<String, String>);

    impl LyricsSource for StaticSource {
        fn raw_transcript(&self, song_id: &str) -> Option<String> {
            self.0.get(song_id).cloned()
        }
    }

    const FIRST_ASSET: &str = r#"[
        {"time": "00:00.00", "lyric": "Intro"},
        {"time": "00:01.50", "lyric": "Hello"}
    ]"#;

    fn test_session() -> (
        Arc<KaraokeSession>,
        Arc<MockPlayer>,
        broadcast::Receiver<SessionEvent>,
    ) {
        let player = MockPlayer::new();
        let library = SongLibrary::new(vec![
            Song::new("1", "First", "Artist A", "a.mp3").with_duration_hint(Duration::from_secs(240)),
            Song::new("2", "Second", "Artist B", "b.mp3"),
        ]);
        let mut assets = HashMap::new();
        assets.insert("a.mp3".to_string(), FIRST_ASSET.to_string());
        let cache = LyricsCache::new(Box::new(StaticSource(assets)));

        let player_handle: Arc<dyn AudioPlayer> = player.clone();
        let session = KaraokeSession::new(player_handle, library, cache, &Config::default());
        let events = session.subscribe();
        (session, player, events)
    }

    fn drain(rx: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_play_song_loads_and_plays() {
        let (session, player, mut events) = test_session();

        session.play_song("1").await.unwrap();

        let state = player.snapshot();
        assert_eq!(state.loaded.as_deref(), Some("a.mp3"));
        assert!(state.playing);

        let song = session.current_song().await.unwrap();
        assert_eq!(song.id, "1");

        let events = drain(&mut events);
        assert!(matches!(events[0], SessionEvent::SongStarted { .. }));
        assert!(matches!(events[1], SessionEvent::LyricsLoaded { .. }));
    }

    #[tokio::test]
    async fn test_play_song_unknown_id() {
        let (session, _, _) = test_session();
        let result = session.play_song("99").await;
        assert!(matches!(result, Err(CoreError::SongNotFound { .. })));
    }

    #[tokio::test]
    async fn test_play_song_without_lyrics() {
        let (session, _, mut events) = test_session();

        session.play_song("2").await.unwrap();

        let events = drain(&mut events);
        assert!(events
            .iter()
            .any(|e| matches!(e, SessionEvent::LyricsUnavailable)));
        assert!(session.transcript().await.is_none());
    }

    #[tokio::test]
    async fn test_toggle_pauses_and_resumes() {
        let (session, player, mut events) = test_session();
        session.play_song("1").await.unwrap();
        drain(&mut events);

        session.toggle_playback().await.unwrap();
        assert!(!player.snapshot().playing);
        assert!(!session.is_playing().await);
        assert!(matches!(
            drain(&mut events).as_slice(),
            [SessionEvent::PlaybackPaused { .. }]
        ));

        session.toggle_playback().await.unwrap();
        assert!(player.snapshot().playing);
        assert!(session.is_playing().await);
        assert!(matches!(
            drain(&mut events).as_slice(),
            [SessionEvent::PlaybackResumed { .. }]
        ));
    }

    #[tokio::test]
    async fn test_toggle_without_song() {
        let (session, _, _) = test_session();
        let result = session.toggle_playback().await;
        assert!(matches!(result, Err(CoreError::NoActiveSong)));
    }

    #[tokio::test]
    async fn test_seek_clamps_to_duration() {
        let (session, player, mut events) = test_session();
        session.play_song("1").await.unwrap();
        drain(&mut events);

        session.seek(Duration::from_secs(1000)).await.unwrap();

        assert_eq!(player.snapshot().position, Duration::from_secs(240));
        assert!(matches!(
            drain(&mut events).as_slice(),
            [SessionEvent::SeekPerformed { position }] if *position == Duration::from_secs(240)
        ));
    }

    #[tokio::test]
    async fn test_skip_forward_moves_by_step() {
        let (session, player, _) = test_session();
        session.play_song("1").await.unwrap();

        // 10% of the 240 s track
        session.skip_forward().await.unwrap();

        let seconds = player.snapshot().position.as_secs_f32();
        assert!((23.5..24.5).contains(&seconds));
    }

    #[tokio::test]
    async fn test_tick_emits_lyric_frame() {
        let (session, player, mut events) = test_session();
        session.play_song("1").await.unwrap();
        drain(&mut events);

        player.set_position(Duration::from_millis(750));
        session.tick().await;

        let events = drain(&mut events);
        let SessionEvent::Tick {
            position,
            frame: Some(frame),
            ..
        } = &events[0]
        else {
            panic!("expected a tick with a frame, got {events:?}");
        };

        assert_eq!(*position, Duration::from_millis(750));
        assert_eq!(frame.current.as_deref(), Some("Intro"));
        assert_eq!(frame.next.as_deref(), Some("Hello"));
        assert!((frame.progress - 0.5).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_tick_without_loaded_audio_is_silent() {
        let (session, _, mut events) = test_session();
        session.tick().await;
        assert!(drain(&mut events).is_empty());
    }

    #[tokio::test]
    async fn test_finished_song_is_unloaded() {
        let (session, player, mut events) = test_session();
        session.play_song("1").await.unwrap();
        drain(&mut events);

        player.finish();
        session.tick().await;

        assert!(session.current_song().await.is_none());
        assert!(player.snapshot().loaded.is_none());
        assert!(matches!(
            drain(&mut events).as_slice(),
            [SessionEvent::SongFinished { song }] if song.id == "1"
        ));
    }

    #[tokio::test]
    async fn test_next_and_previous_wrap() {
        let (session, _, _) = test_session();
        session.play_song("2").await.unwrap();

        session.next().await.unwrap();
        assert_eq!(session.current_song().await.unwrap().id, "1");

        session.previous().await.unwrap();
        assert_eq!(session.current_song().await.unwrap().id, "2");
    }

    #[tokio::test]
    async fn test_next_without_song() {
        let (session, _, _) = test_session();
        assert!(matches!(
            session.next().await,
            Err(CoreError::NoActiveSong)
        ));
    }

    #[tokio::test]
    async fn test_stop_releases_audio() {
        let (session, player, mut events) = test_session();
        session.play_song("1").await.unwrap();
        drain(&mut events);

        session.stop().await.unwrap();

        assert!(player.snapshot().loaded.is_none());
        assert!(session.current_song().await.is_none());
        assert!(matches!(
            drain(&mut events).as_slice(),
            [SessionEvent::Stopped]
        ));

        // Stopping again is a no-op with no further events
        session.stop().await.unwrap();
        assert!(drain(&mut events).is_empty());
    }

    #[tokio::test]
    async fn test_run_loop_ticks_and_cancels() {
        let (session, player, mut events) = test_session();
        session.play_song("1").await.unwrap();
        drain(&mut events);
        player.set_position(Duration::from_millis(500));

        let handle = session.clone().start();
        tokio::time::sleep(Duration::from_millis(350)).await;
        session.shutdown();
        handle.await.unwrap();

        let ticks = drain(&mut events)
            .into_iter()
            .filter(|e| matches!(e, SessionEvent::Tick { .. }))
            .count();
        assert!(ticks >= 1);
    }
}
