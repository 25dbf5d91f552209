use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::audio::AudioCmd;
use crate::library::Track;

use super::events::{EventCallback, PlayerEvent};

/// The transport status of the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing selected yet.
    Idle,
    Playing,
    Paused,
    /// The playlist ran out; recovery needs an explicit selection.
    Stopped,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Volume restored on unmute when the stored pre-mute volume was lower.
const UNMUTE_FLOOR: f32 = 0.1;

/// The playback controller.
///
/// Owns the playlist, the current index and all transport state. Every
/// operation tolerates stray calls: out-of-range indices and empty playlists
/// are no-ops, never errors. The UI is expected to disable the matching
/// controls, but nothing breaks when it doesn't.
pub struct Player {
    playlist: Vec<Track>,
    index: Option<usize>,
    state: PlaybackState,
    position: Duration,
    duration: Option<Duration>,
    volume: f32,
    muted: bool,
    premute_volume: f32,
    load_seq: u64,
    audio: Sender<AudioCmd>,
    observers: Vec<EventCallback>,
}

impl Player {
    pub fn new(audio: Sender<AudioCmd>) -> Self {
        Self {
            playlist: Vec::new(),
            index: None,
            state: PlaybackState::Idle,
            position: Duration::ZERO,
            duration: None,
            volume: 1.0,
            muted: false,
            premute_volume: 1.0,
            load_seq: 0,
            audio,
            observers: Vec::new(),
        }
    }

    /// Register a state-change observer.
    pub fn subscribe(&mut self, callback: EventCallback) {
        self.observers.push(callback);
    }

    /// Replace the playlist wholesale and return to `Idle`.
    pub fn load_playlist(&mut self, tracks: Vec<Track>) {
        self.playlist = tracks;
        self.index = None;
        self.position = Duration::ZERO;
        self.duration = None;
        let _ = self.audio.send(AudioCmd::Stop);

        self.emit(PlayerEvent::PlaylistChanged {
            len: self.playlist.len(),
        });
        self.emit(PlayerEvent::TrackChanged { index: None });
        self.set_state(PlaybackState::Idle);
    }

    /// Select the track at `index` and start it, or hold it paused when
    /// `start_paused` is set. Out-of-range indices are ignored.
    pub fn select_track(&mut self, index: usize, start_paused: bool) {
        if index >= self.playlist.len() {
            return;
        }

        self.index = Some(index);
        self.position = Duration::ZERO;
        self.duration = None;
        self.load_seq += 1;

        let track = &self.playlist[index];
        let _ = self.audio.send(AudioCmd::Load {
            path: track.path.clone(),
            duration_hint: track.duration,
            start_paused,
            seq: self.load_seq,
        });

        self.emit(PlayerEvent::TrackChanged { index: Some(index) });
        self.emit(PlayerEvent::PositionChanged {
            position: Duration::ZERO,
            duration: None,
        });
        self.set_state(if start_paused {
            PlaybackState::Paused
        } else {
            PlaybackState::Playing
        });
    }

    pub fn play(&mut self) {
        match self.state {
            PlaybackState::Idle | PlaybackState::Playing => {}
            PlaybackState::Paused => {
                let _ = self.audio.send(AudioCmd::Resume);
                self.set_state(PlaybackState::Playing);
            }
            PlaybackState::Stopped => {
                // Restart the last selection from the top.
                if let Some(i) = self.index {
                    self.select_track(i, false);
                }
            }
        }
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            let _ = self.audio.send(AudioCmd::Pause);
            self.set_state(PlaybackState::Paused);
        }
    }

    /// The play/pause button.
    pub fn toggle_play(&mut self) {
        match self.state {
            PlaybackState::Playing => self.pause(),
            _ => self.play(),
        }
    }

    /// Move to the next track and play it; at the end of the playlist,
    /// stop and keep the index where it is.
    pub fn advance(&mut self) {
        if self.playlist.is_empty() {
            return;
        }

        // No selection counts as "before the first track".
        let next = self.index.map_or(0, |i| i + 1);
        if next < self.playlist.len() {
            self.select_track(next, false);
        } else {
            let _ = self.audio.send(AudioCmd::Stop);
            self.set_state(PlaybackState::Stopped);
        }
    }

    /// Move to the previous track and play it. No wraparound.
    pub fn retreat(&mut self) {
        if let Some(i) = self.index {
            if i > 0 {
                self.select_track(i - 1, false);
            }
        }
    }

    /// Position playback at `fraction` of the track's duration.
    ///
    /// The fraction is clamped to [0, 1]; while the duration is still
    /// unknown (or zero) this is a no-op.
    pub fn seek_to_fraction(&mut self, fraction: f64) {
        if !fraction.is_finite() {
            return;
        }
        let fraction = fraction.clamp(0.0, 1.0);

        let Some(duration) = self.duration else {
            return;
        };
        if duration.is_zero() {
            return;
        }

        let position = duration.mul_f64(fraction);
        self.position = position;
        let _ = self.audio.send(AudioCmd::SeekTo(position));
        self.emit(PlayerEvent::PositionChanged {
            position,
            duration: Some(duration),
        });
    }

    /// Set the volume, clamped to [0, 1]. Any positive volume unmutes.
    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);

        self.volume = volume;
        if volume > 0.0 {
            self.muted = false;
        }
        let _ = self.audio.send(AudioCmd::SetVolume(volume));
        self.emit(PlayerEvent::VolumeChanged {
            volume,
            muted: self.muted,
        });
    }

    /// Volume entry point for UI widgets working in percent ([0, 100]).
    pub fn set_volume_percent(&mut self, percent: i32) {
        self.set_volume(percent.clamp(0, 100) as f32 / 100.0);
    }

    /// Muting stores the current volume and drives the gain to zero;
    /// unmuting restores the stored volume with a floor of 0.1.
    pub fn toggle_mute(&mut self) {
        if self.muted {
            self.muted = false;
            self.volume = self.premute_volume.max(UNMUTE_FLOOR);
        } else {
            self.premute_volume = self.volume;
            self.muted = true;
            self.volume = 0.0;
        }

        let _ = self.audio.send(AudioCmd::SetVolume(self.volume));
        self.emit(PlayerEvent::VolumeChanged {
            volume: self.volume,
            muted: self.muted,
        });
    }

    /// Duration report from the media layer once a track is decoded.
    pub fn metadata_loaded(&mut self, duration: Duration) {
        self.duration = Some(duration);
        self.emit(PlayerEvent::PositionChanged {
            position: self.position,
            duration: Some(duration),
        });
    }

    /// Position report from the media layer.
    pub fn position_changed(&mut self, position: Duration) {
        if self.position != position {
            self.position = position;
            self.emit(PlayerEvent::PositionChanged {
                position,
                duration: self.duration,
            });
        }
    }

    /// End-of-track notification from the media layer.
    pub fn track_ended(&mut self) {
        self.advance();
    }

    /// The media layer could not start the current track. The player
    /// degrades to a paused look instead of surfacing an error.
    pub fn playback_blocked(&mut self) {
        if self.state == PlaybackState::Playing {
            self.set_state(PlaybackState::Paused);
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.playlist
    }

    pub fn has_tracks(&self) -> bool {
        !self.playlist.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.index
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.index.and_then(|i| self.playlist.get(i))
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn volume_percent(&self) -> u8 {
        (self.volume * 100.0).round() as u8
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Sequence number of the most recent `Load` this player issued.
    pub fn load_seq(&self) -> u64 {
        self.load_seq
    }

    /// Position as a fraction of the known duration, for the seek bar.
    pub fn fraction(&self) -> f64 {
        match self.duration {
            Some(d) if !d.is_zero() => {
                (self.position.as_secs_f64() / d.as_secs_f64()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.emit(PlayerEvent::StatusChanged { state });
        }
    }

    fn emit(&mut self, event: PlayerEvent) {
        for cb in &mut self.observers {
            cb(&event);
        }
    }
}
