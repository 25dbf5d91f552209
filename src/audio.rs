//! Audio backend: a dedicated playback thread around a single rodio sink.
//!
//! The thread consumes [`AudioCmd`]s and publishes media facts (elapsed
//! time, known duration, finished/failed flags) through a shared
//! [`MediaHandle`]. It plays exactly one track at a time; which track comes
//! next is decided by the playback controller, not here.

mod player;
mod sink;
mod thread;
mod types;

pub use player::*;
pub use types::*;
