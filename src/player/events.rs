//! State-change notifications emitted by the playback controller.
//!
//! Subscribers are called synchronously after each mutation; payloads are
//! owned values so callbacks never borrow controller state.

use std::time::Duration;

use super::model::PlaybackState;

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// A different track (or none) became current.
    TrackChanged { index: Option<usize> },
    /// The transport status changed.
    StatusChanged { state: PlaybackState },
    /// Position or known duration moved.
    PositionChanged {
        position: Duration,
        duration: Option<Duration>,
    },
    /// The playlist was replaced wholesale.
    PlaylistChanged { len: usize },
    /// Volume or mute state changed.
    VolumeChanged { volume: f32, muted: bool },
}

pub type EventCallback = Box<dyn FnMut(&PlayerEvent) + Send>;
