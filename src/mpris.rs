use std::collections::HashMap;
use std::path::Path;
use std::sync::{
    Arc, Mutex,
    mpsc::{self, Sender},
};

use async_io::block_on;
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedValue, Value};

use crate::library::Track;
use crate::player::PlaybackState;

#[derive(Clone, Debug)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackState,
    title: Option<String>,
    artist: Vec<String>,
    album: Option<String>,
    url: Option<String>,
    art_url: Option<String>,
    length_micros: Option<i64>,
    track_id: Option<ObjectPath<'static>>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: PlaybackState) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = playback;
        }
        let _ = self.notify.send(());
    }

    /// Publish metadata for the now-playing track, or clear it.
    pub fn set_track_metadata(&self, index: Option<usize>, track: Option<&Track>) {
        if let Ok(mut s) = self.state.lock() {
            match (index, track) {
                (Some(i), Some(t)) => {
                    s.title = Some(t.title.clone());
                    s.artist = t.artist.clone().into_iter().collect();
                    s.album = t.album.clone();
                    s.url = Some(format!("file://{}", t.path.display()));
                    s.length_micros = t.duration.map(|d| d.as_micros() as i64);
                    s.track_id =
                        ObjectPath::try_from(format!("/org/mpris/MediaPlayer2/track/{i}")).ok();
                }
                _ => {
                    s.title = None;
                    s.artist = Vec::new();
                    s.album = None;
                    s.url = None;
                    s.length_micros = None;
                    s.track_id = None;
                }
            }
        }
        let _ = self.notify.send(());
    }

    /// Album art shown by MPRIS clients; points at the album's cover file.
    pub fn set_art_url(&self, cover: Option<&Path>) {
        if let Ok(mut s) = self.state.lock() {
            s.art_url = cover.map(|p| format!("file://{}", p.display()));
        }
        let _ = self.notify.send(());
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "vivace"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

fn insert_str(map: &mut HashMap<String, OwnedValue>, key: &str, val: &str) {
    if let Ok(v) = OwnedValue::try_from(Value::from(val.to_string())) {
        map.insert(key.to_string(), v);
    }
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        // NOTE: This returns a &'static str; we map state into static strings.
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            PlaybackState::Idle | PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        if let Some(id) = &s.track_id {
            if let Ok(v) = OwnedValue::try_from(Value::from(id.clone())) {
                map.insert("mpris:trackid".to_string(), v);
            }
        }
        if let Some(title) = &s.title {
            insert_str(&mut map, "xesam:title", title);
        }
        if !s.artist.is_empty() {
            if let Ok(v) = OwnedValue::try_from(Value::from(s.artist.clone())) {
                map.insert("xesam:artist".to_string(), v);
            }
        }
        if let Some(album) = &s.album {
            insert_str(&mut map, "xesam:album", album);
        }
        if let Some(url) = &s.url {
            insert_str(&mut map, "xesam:url", url);
        }
        if let Some(art) = &s.art_url {
            insert_str(&mut map, "mpris:artUrl", art);
        }
        if let Some(len) = s.length_micros {
            if let Ok(v) = OwnedValue::try_from(Value::from(len)) {
                map.insert("mpris:length".to_string(), v);
            }
        }
        map
    }
}

pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        let path = "/org/mpris/MediaPlayer2";

        let connection = match block_on(Connection::session()) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("MPRIS: failed to connect to session bus: {e}");
                return;
            }
        };

        if let Err(e) = block_on(connection.request_name("org.mpris.MediaPlayer2.vivace")) {
            eprintln!("MPRIS: failed to acquire name: {e}");
            return;
        }

        let object_server = connection.object_server();

        if let Err(e) = block_on(object_server.at(path, RootIface { tx: tx.clone() })) {
            eprintln!("MPRIS: failed to register root iface: {e}");
            return;
        }

        if let Err(e) = block_on(object_server.at(
            path,
            PlayerIface {
                tx,
                state: state_for_thread,
            },
        )) {
            eprintln!("MPRIS: failed to register player iface: {e}");
            return;
        }

        let iface_ref = match block_on(object_server.interface::<_, PlayerIface>(path)) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("MPRIS: failed to look up player iface: {e}");
                return;
            }
        };

        // Emit PropertiesChanged whenever the app pokes the notify channel.
        // The channel closing means the app is gone; the thread ends with it.
        while notify_rx.recv().is_ok() {
            block_on(async {
                let iface = iface_ref.get().await;
                let _ = iface
                    .playback_status_changed(iface_ref.signal_emitter())
                    .await;
                let _ = iface.metadata_changed(iface_ref.signal_emitter()).await;
            });
        }
    });

    MprisHandle {
        state,
        notify: notify_tx,
    }
}

#[cfg(test)]
mod tests;
