//! Sink construction for the audio thread.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

/// Create a paused `Sink` for `path` positioned at `start_at`.
///
/// Returns the sink plus the decoded total duration when the decoder knows
/// it. Open and decode failures are reported, not panicked on: a track that
/// cannot start must leave the player inert, not dead.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> io::Result<(Sink, Option<Duration>)> {
    let file = File::open(path)?;

    let source = Decoder::new(BufReader::new(file)).map_err(io::Error::other)?;
    let total = source.total_duration();
    // `skip_duration` is the seeking primitive; even Duration::ZERO is fine.
    let source = source.skip_duration(start_at);

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}
