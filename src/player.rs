//! Playback controller: the state machine behind the transport controls.
//!
//! The [`Player`] owns the playlist, the current selection and all transport
//! state, drives the audio thread through its command channel and reports
//! state changes to subscribers.

mod events;
mod model;

pub use events::*;
pub use model::*;
