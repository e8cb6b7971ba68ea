use std::env;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::audio::RodioOutput;
use crate::config::{SettingsStore, expand_tilde};
use crate::download::Downloader;
use crate::library::scan;
use crate::mpris::ControlCmd;
use crate::playback::Player;

mod event_loop;
mod mpris_sync;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = SettingsStore::load();

    let (output, output_rx) = RodioOutput::spawn();
    let playback_handle = output.playback_handle();
    let mut player = Player::new(Box::new(output));
    player.set_volume(store.settings().playback.volume);

    let mut app = App::new();

    // Optional library folder from the command line. Loading it does not
    // start playback; only interactive folder loads do.
    if let Some(dir) = env::args().nth(1) {
        let dir = expand_tilde(&dir);
        let tracks = scan(&dir, &store.settings().library);
        info!("loaded {} tracks from {}", tracks.len(), dir.display());
        player.load_tracks(tracks);
        app.library_dir = Some(dir);
    }

    let downloader = Downloader::new(store.settings().download.tool.clone());

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    mpris_sync::update_mpris(&mpris, &player);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = {
        let mut state = event_loop::EventLoopState::new(&player);
        event_loop::run(
            &mut terminal,
            &mut store,
            &mut app,
            &mut player,
            &downloader,
            &playback_handle,
            &mpris,
            &control_rx,
            &output_rx,
            &mut state,
        )
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    player.shutdown();

    run_result
}
