use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Pane};
use crate::audio::{AudioPlayer, MediaHandle};
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::player::{PlaybackState, Player, PlayerEvent};
use crate::runtime::loader::{LoaderEvent, LoaderHandle};
use crate::runtime::mpris_sync::update_mpris;
use crate::ui;

/// Main terminal event loop: handles input, UI drawing and the sync between
/// the controller, the audio thread, the loader and MPRIS. Returns `Ok(())`
/// when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Player,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
    control_tx: &Sender<ControlCmd>,
    control_rx: &Receiver<ControlCmd>,
    loader: &LoaderHandle,
    player_events: &Receiver<PlayerEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    let media = audio_player.media_handle();

    loop {
        sync_media(player, &media);

        // Apply loader results, discarding any that raced a folder change.
        while let Some(ev) = loader.try_recv() {
            apply_loader_event(ev, settings, app, player);
        }

        // Controller notifications: keep MPRIS and the cursor in sync.
        while let Ok(ev) = player_events.try_recv() {
            apply_player_event(&ev, app, player, mpris);
        }

        terminal.draw(|f| ui::draw(f, app, player, &settings.ui, &settings.controls))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, settings, app, player, audio_player) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, player, audio_player, control_tx, loader) {
                    return Ok(());
                }
            }
        }
    }
}

/// Pull media facts from the audio thread into the controller, ignoring
/// snapshots that do not belong to the controller's latest load.
fn sync_media(player: &mut Player, media: &MediaHandle) {
    let (elapsed, duration, finished, failed) = {
        let Ok(mut info) = media.lock() else {
            return;
        };
        if info.seq != player.load_seq() {
            return;
        }
        let snap = (info.elapsed, info.duration, info.finished, info.failed);
        // finished/failed are edge notifications; consume them here.
        info.finished = false;
        info.failed = false;
        snap
    };

    if player.duration().is_none() {
        if let Some(d) = duration {
            player.metadata_loaded(d);
        }
    }
    player.position_changed(elapsed);
    if failed {
        player.playback_blocked();
    }
    if finished {
        player.track_ended();
    }
}

fn apply_loader_event(
    ev: LoaderEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Player,
) {
    match ev {
        LoaderEvent::FolderLoaded {
            folder,
            tracks,
            autoplay,
        } => {
            if folder != app.current_folder {
                // Stale result for a folder the user already left.
                return;
            }

            app.loading = false;
            app.set_track_count(tracks.len());
            app.track_selected = 0;
            app.current_cover = app
                .albums
                .iter()
                .find(|a| a.folder == app.current_folder)
                .and_then(|a| a.cover.clone());

            player.load_playlist(tracks);

            if autoplay {
                player.select_track(0, false);
            } else if settings.playback.select_first && player.has_tracks() {
                player.select_track(0, settings.playback.start_paused);
            }
        }
        LoaderEvent::AlbumsListed { root, albums } => {
            if root != app.root {
                return;
            }
            app.set_albums(albums);
        }
    }
}

fn apply_player_event(ev: &PlayerEvent, app: &mut App, player: &Player, mpris: &MprisHandle) {
    match ev {
        PlayerEvent::TrackChanged { index } => {
            if app.follow_playback {
                if let Some(i) = index {
                    app.set_track_selected(*i);
                }
            }
            update_mpris(mpris, player, app.current_cover.as_deref());
        }
        PlayerEvent::StatusChanged { .. } | PlayerEvent::PlaylistChanged { .. } => {
            update_mpris(mpris, player, app.current_cover.as_deref());
        }
        PlayerEvent::PositionChanged { .. } | PlayerEvent::VolumeChanged { .. } => {}
    }
}

fn handle_control_cmd(
    cmd: ControlCmd,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Player,
    audio_player: &AudioPlayer,
) -> bool {
    match cmd {
        ControlCmd::Quit => {
            audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return true;
        }
        ControlCmd::Play => {
            app.follow_playback_on();
            if player.state() == PlaybackState::Idle {
                if app.has_tracks() {
                    player.select_track(app.track_selected, false);
                }
            } else {
                player.play();
            }
        }
        ControlCmd::Pause => player.pause(),
        ControlCmd::PlayPause => {
            app.follow_playback_on();
            if player.state() == PlaybackState::Idle {
                if app.has_tracks() {
                    player.select_track(app.track_selected, false);
                }
            } else {
                player.toggle_play();
            }
        }
        ControlCmd::Stop => player.pause(),
        ControlCmd::Next => {
            app.follow_playback_on();
            player.advance();
        }
        ControlCmd::Prev => {
            app.follow_playback_on();
            player.retreat();
        }
    }

    false
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Player,
    audio_player: &AudioPlayer,
    control_tx: &Sender<ControlCmd>,
    loader: &LoaderHandle,
) -> bool {
    match key.code {
        KeyCode::Char('q') => {
            audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return true;
        }
        KeyCode::Tab => app.toggle_pane(),
        KeyCode::Char('j') | KeyCode::Down => {
            app.follow_playback_off();
            app.cursor_down();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.follow_playback_off();
            app.cursor_up();
        }
        KeyCode::Enter => match app.pane {
            Pane::Tracks => {
                if app.has_tracks() {
                    app.follow_playback_on();
                    player.select_track(app.track_selected, false);
                }
            }
            Pane::Albums => {
                if let Some(album) = app.selected_album() {
                    // Switch folders; the playlist is replaced when (and if)
                    // the matching loader result comes back.
                    let folder = album.folder.clone();
                    app.current_folder = folder.clone();
                    app.loading = true;
                    loader.request_folder(folder, true);
                }
            }
        },
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('l') => {
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') => {
            let _ = control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Right => {
            let step = f64::from(settings.controls.seek_step_percent) / 100.0;
            player.seek_to_fraction(player.fraction() + step);
        }
        KeyCode::Left => {
            let step = f64::from(settings.controls.seek_step_percent) / 100.0;
            player.seek_to_fraction(player.fraction() - step);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let step = i32::from(settings.controls.volume_step_percent);
            player.set_volume_percent(i32::from(player.volume_percent()) + step);
        }
        KeyCode::Char('-') => {
            let step = i32::from(settings.controls.volume_step_percent);
            player.set_volume_percent(i32::from(player.volume_percent()) - step);
        }
        KeyCode::Char('m') => player.toggle_mute(),
        _ => {}
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioCmd, MediaInfo};
    use crate::library::Track;
    use std::sync::mpsc;
    use std::sync::{Arc, Mutex};

    fn track(title: &str) -> Track {
        Track {
            path: std::path::PathBuf::from(format!("/tmp/{title}.mp3")),
            title: title.into(),
            artist: None,
            album: None,
            duration: None,
            display: title.into(),
        }
    }

    fn playing_player() -> Player {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        // The audio thread is not running in tests; sends go nowhere.
        std::mem::drop(rx);
        let mut player = Player::new(tx);
        player.load_playlist(vec![track("A")]);
        player.select_track(0, false);
        player
    }

    #[test]
    fn media_facts_with_a_stale_seq_are_ignored() {
        let mut player = playing_player();
        assert_eq!(player.load_seq(), 1);

        let media: MediaHandle = Arc::new(Mutex::new(MediaInfo {
            seq: 0,
            elapsed: Duration::from_secs(9),
            duration: Some(Duration::from_secs(60)),
            playing: true,
            finished: true,
            failed: false,
        }));

        sync_media(&mut player, &media);

        assert_eq!(player.position(), Duration::ZERO);
        assert_eq!(player.duration(), None);
        assert_eq!(player.state(), PlaybackState::Playing);
        // Stale edge flags are left for the load they belong to.
        assert!(media.lock().unwrap().finished);
    }

    #[test]
    fn matching_media_facts_apply_and_consume_edge_flags() {
        let mut player = playing_player();

        let media: MediaHandle = Arc::new(Mutex::new(MediaInfo {
            seq: 1,
            elapsed: Duration::from_secs(5),
            duration: Some(Duration::from_secs(60)),
            playing: true,
            finished: false,
            failed: false,
        }));

        sync_media(&mut player, &media);
        assert_eq!(player.duration(), Some(Duration::from_secs(60)));
        assert_eq!(player.position(), Duration::from_secs(5));

        media.lock().unwrap().finished = true;
        sync_media(&mut player, &media);
        // Single-track playlist: the end-of-track notification stops playback.
        assert_eq!(player.state(), PlaybackState::Stopped);
        assert!(!media.lock().unwrap().finished);
    }

    #[test]
    fn a_failed_load_reads_as_paused() {
        let mut player = playing_player();

        let media: MediaHandle = Arc::new(Mutex::new(MediaInfo {
            seq: 1,
            elapsed: Duration::ZERO,
            duration: None,
            playing: false,
            finished: false,
            failed: true,
        }));

        sync_media(&mut player, &media);
        assert_eq!(player.state(), PlaybackState::Paused);
        assert!(!media.lock().unwrap().failed);
    }
}
