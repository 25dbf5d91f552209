use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, MediaHandle, MediaInfo};

/// Handle to the audio thread: a command sender plus the shared media facts.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    media: MediaHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let media: MediaHandle = Arc::new(Mutex::new(MediaInfo::default()));

        let join = spawn_audio_thread(rx, media.clone());

        Self {
            tx,
            media,
            join: Mutex::new(Some(join)),
        }
    }

    pub fn media_handle(&self) -> MediaHandle {
        self.media.clone()
    }

    /// Command sender handed to the playback controller.
    pub fn command_sender(&self) -> Sender<AudioCmd> {
        self.tx.clone()
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.tx.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
