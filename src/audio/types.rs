//! Commands and shared state for the audio backend.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug)]
pub enum AudioCmd {
    /// Load a track and either start playing it or hold it paused at 0:00.
    Load {
        path: PathBuf,
        /// Tag-derived duration, used when the decoder cannot tell.
        duration_hint: Option<Duration>,
        start_paused: bool,
        /// Load sequence number, echoed back through `MediaInfo::seq`.
        seq: u64,
    },
    /// Resume the paused sink.
    Resume,
    /// Pause the playing sink.
    Pause,
    /// Stop playback and drop the sink.
    Stop,
    /// Set the output gain (0.0..=1.0).
    SetVolume(f32),
    /// Jump to an absolute position in the current track.
    SeekTo(Duration),
    /// Quit the audio thread, fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Media facts published by the audio thread.
///
/// `seq` identifies the `Load` these facts belong to; consumers must ignore
/// snapshots whose `seq` does not match the load they last issued.
#[derive(Debug, Clone)]
pub struct MediaInfo {
    pub seq: u64,
    /// Elapsed playback time for the current track.
    pub elapsed: Duration,
    /// Known once the track has been decoded ("metadata loaded").
    pub duration: Option<Duration>,
    /// Whether the sink is currently producing audio.
    pub playing: bool,
    /// The current track ran to its end. Edge flag: consumed by the reader.
    pub finished: bool,
    /// The current track could not be opened or decoded. Edge flag as well.
    pub failed: bool,
}

impl Default for MediaInfo {
    fn default() -> Self {
        Self {
            seq: 0,
            elapsed: Duration::ZERO,
            duration: None,
            playing: false,
            finished: false,
            failed: false,
        }
    }
}

pub type MediaHandle = Arc<Mutex<MediaInfo>>;
