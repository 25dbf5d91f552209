use std::env;
use std::path::PathBuf;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::mpris::ControlCmd;
use crate::player::{Player, PlayerEvent};

mod event_loop;
mod loader;
mod mpris_sync;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    let folder = env::args()
        .nth(1)
        .unwrap_or_else(|| settings.library.folder.clone());
    let root = PathBuf::from(&folder);

    let audio_player = AudioPlayer::new();
    let mut player = Player::new(audio_player.command_sender());
    player.set_volume_percent(i32::from(settings.audio.initial_volume_percent));

    let mut app = App::new(root.clone());
    app.follow_playback = settings.ui.follow_playback;

    // Controller notifications feed the event loop through a channel so
    // MPRIS metadata and the cursor can react to them.
    let (player_ev_tx, player_ev_rx) = mpsc::channel::<PlayerEvent>();
    player.subscribe(Box::new(move |ev| {
        let _ = player_ev_tx.send(ev.clone());
    }));

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx.clone());
    mpris_sync::update_mpris(&mpris, &player, None);

    // Folder work happens off the UI thread; the initial root load and the
    // album listing go through the same worker as album clicks later on.
    let loader = loader::spawn_loader(settings.library.clone());
    loader.request_albums(root.clone());
    loader.request_folder(root, false);
    app.loading = true;

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut player,
        &audio_player,
        &mpris,
        &control_tx,
        &control_rx,
        &loader,
        &player_ev_rx,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
