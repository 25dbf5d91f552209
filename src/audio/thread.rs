use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStreamBuilder, Sink};

use super::sink::create_sink_at;
use super::types::{AudioCmd, MediaHandle};

pub(super) fn spawn_audio_thread(rx: Receiver<AudioCmd>, media: MediaHandle) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream =
            OutputStreamBuilder::open_default_stream().expect("ERR: No audio output device");
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy for a TUI app.
        let mut stream = stream;
        stream.log_on_drop(false);

        let mut sink: Option<Sink> = None;
        let mut paused = true;
        let mut volume: f32 = 1.0;

        // Path of the loaded track, kept around for seek rebuilds.
        let mut current: Option<PathBuf> = None;

        // Ticker thread advancing the published elapsed time while playing.
        let media_for_ticker = media.clone();
        thread::spawn(move || {
            loop {
                thread::sleep(Duration::from_millis(500));
                let mut info = media_for_ticker.lock().unwrap();
                if info.playing {
                    info.elapsed = info.elapsed + Duration::from_millis(500);
                }
            }
        });

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load {
                        path,
                        duration_hint,
                        start_paused,
                        seq,
                    } => {
                        if let Some(s) = sink.as_ref() {
                            s.stop();
                        }
                        sink = None;

                        match create_sink_at(&stream, &path, Duration::ZERO) {
                            Ok((new_sink, decoded)) => {
                                new_sink.set_volume(volume);
                                paused = start_paused;
                                if !start_paused {
                                    new_sink.play();
                                }
                                let duration = decoded.or(duration_hint);
                                sink = Some(new_sink);
                                current = Some(path);
                                if let Ok(mut info) = media.lock() {
                                    info.seq = seq;
                                    info.elapsed = Duration::ZERO;
                                    info.duration = duration;
                                    info.playing = !start_paused;
                                    info.finished = false;
                                    info.failed = false;
                                }
                            }
                            Err(e) => {
                                eprintln!("audio: cannot start {}: {e}", path.display());
                                current = None;
                                paused = true;
                                if let Ok(mut info) = media.lock() {
                                    info.seq = seq;
                                    info.elapsed = Duration::ZERO;
                                    info.duration = duration_hint;
                                    info.playing = false;
                                    info.finished = false;
                                    info.failed = true;
                                }
                            }
                        }
                    }

                    AudioCmd::Resume => {
                        if let Some(ref s) = sink {
                            if paused {
                                s.play();
                                paused = false;
                                if let Ok(mut info) = media.lock() {
                                    info.playing = true;
                                }
                            }
                        }
                    }

                    AudioCmd::Pause => {
                        if let Some(ref s) = sink {
                            if !paused {
                                s.pause();
                                paused = true;
                                if let Ok(mut info) = media.lock() {
                                    info.playing = false;
                                }
                            }
                        }
                    }

                    AudioCmd::Stop => {
                        if let Some(s) = sink.as_ref() {
                            s.stop();
                        }
                        sink = None;
                        current = None;
                        paused = true;
                        if let Ok(mut info) = media.lock() {
                            info.elapsed = Duration::ZERO;
                            info.duration = None;
                            info.playing = false;
                            info.finished = false;
                        }
                    }

                    AudioCmd::SetVolume(v) => {
                        volume = v.clamp(0.0, 1.0);
                        if let Some(ref s) = sink {
                            s.set_volume(volume);
                        }
                    }

                    AudioCmd::SeekTo(target) => {
                        // Seeking rebuilds the sink and skips into the file.
                        let Some(path) = current.clone() else {
                            continue;
                        };
                        if sink.is_none() {
                            continue;
                        }
                        if let Some(s) = sink.as_ref() {
                            s.stop();
                        }

                        match create_sink_at(&stream, &path, target) {
                            Ok((new_sink, _)) => {
                                new_sink.set_volume(volume);
                                if !paused {
                                    new_sink.play();
                                }
                                sink = Some(new_sink);
                                if let Ok(mut info) = media.lock() {
                                    info.elapsed = target;
                                }
                            }
                            Err(e) => {
                                eprintln!("audio: seek failed for {}: {e}", path.display());
                                sink = None;
                                current = None;
                                paused = true;
                                if let Ok(mut info) = media.lock() {
                                    info.playing = false;
                                    info.failed = true;
                                }
                            }
                        }
                    }

                    AudioCmd::Quit { fade_out_ms } => {
                        if let Some(ref s) = sink {
                            // Fade out gently before stopping.
                            fade_out_sink(s, fade_out_ms);
                            s.stop();
                        }
                        // Update shared state so UI/MPRIS don't keep showing Playing.
                        if let Ok(mut info) = media.lock() {
                            info.playing = false;
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    // End-of-track poll: a drained sink means the song ran out.
                    if let Some(ref s) = sink {
                        if !paused && s.empty() {
                            sink = None;
                            current = None;
                            paused = true;
                            if let Ok(mut info) = media.lock() {
                                info.playing = false;
                                info.finished = true;
                            }
                        }
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    let start = sink.volume();
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(start * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
