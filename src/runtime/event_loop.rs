use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::{App, DownloadField, DownloadState, FolderPurpose, InputMode, SettingsRow};
use crate::audio::{OutputEvent, PlaybackHandle};
use crate::config::{SettingsStore, expand_tilde};
use crate::download::{ActiveDownload, DownloadEvent, DownloadRequest, Downloader};
use crate::i18n::{Label, label};
use crate::library::scan;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::playback::{PlaybackState, Player};
use crate::runtime::mpris_sync::update_mpris;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Two-key prefix state for `gg`.
    pending_gg: bool,
    /// The single in-flight download job, if any.
    active_download: Option<ActiveDownload>,
    /// Last playing position announced to MPRIS and the cursor.
    last_index: Option<usize>,
    last_playback: PlaybackState,
}

impl EventLoopState {
    pub fn new(player: &Player) -> Self {
        Self {
            pending_gg: false,
            active_download: None,
            last_index: player.queue().current(),
            last_playback: player.state(),
        }
    }
}

/// Main terminal event loop: handles input, UI drawing, audio and download
/// events and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    store: &mut SettingsStore,
    app: &mut App,
    player: &mut Player,
    downloader: &Downloader,
    playback: &PlaybackHandle,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
    output_rx: &mpsc::Receiver<OutputEvent>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Remote commands first so media keys feel immediate.
        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, app, player) {
                return Ok(());
            }
        }

        // Events from the audio thread.
        while let Ok(ev) = output_rx.try_recv() {
            match ev {
                OutputEvent::Finished => player.on_track_finished(),
                OutputEvent::Failed(message) => {
                    warn!("playback failed: {message}");
                    player.on_output_error();
                    app.set_status(message);
                }
            }
        }

        // Progress and completion from the download job.
        let mut download_done = false;
        if let Some(job) = state.active_download.as_ref() {
            for ev in job.try_events() {
                match ev {
                    DownloadEvent::Progress(percent) => {
                        app.download_state = DownloadState::Running { percent };
                    }
                    DownloadEvent::Finished(Ok(path)) => {
                        info!("download finished: {}", path.display());
                        app.download_state = DownloadState::Succeeded;
                        download_done = true;
                    }
                    DownloadEvent::Finished(Err(err)) => {
                        app.download_state = DownloadState::Failed(err.to_string());
                        download_done = true;
                    }
                }
            }
        }
        if download_done {
            if let Some(job) = state.active_download.take() {
                job.finish();
            }
        }

        // Sample playback progress for the status line.
        if let Ok(pb) = playback.lock() {
            app.elapsed = pb.elapsed;
        }

        // Keep MPRIS and the cursor in step with track changes, wherever
        // they originate (keys, media keys, auto-advance).
        let current = player.queue().current();
        let playback_state = player.state();
        if current != state.last_index || playback_state != state.last_playback {
            if current != state.last_index && app.mode == InputMode::Normal {
                if let Some(pos) = current {
                    app.selected = pos;
                }
            }
            update_mpris(mpris, player);
            state.last_index = current;
            state.last_playback = playback_state;
        }

        terminal.draw(|f| ui::draw(f, app, player, store.settings()))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, store, app, player, downloader, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn handle_control_cmd(cmd: ControlCmd, app: &mut App, player: &mut Player) -> bool {
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => {
            if player.state() != PlaybackState::Playing {
                player.toggle_play_pause();
            }
        }
        ControlCmd::Pause => {
            if player.state() == PlaybackState::Playing {
                player.toggle_play_pause();
            }
        }
        ControlCmd::PlayPause => player.toggle_play_pause(),
        ControlCmd::Stop => player.stop(),
        ControlCmd::Next => player.next(),
        ControlCmd::Prev => player.prev(app.elapsed),
    }
    false
}

fn handle_key_event(
    key: KeyEvent,
    store: &mut SettingsStore,
    app: &mut App,
    player: &mut Player,
    downloader: &Downloader,
    state: &mut EventLoopState,
) -> bool {
    match app.mode {
        InputMode::Normal => handle_normal_key(key, store, app, player, state),
        InputMode::Filter => {
            handle_filter_key(key, app, player);
            false
        }
        InputMode::Download => {
            handle_download_key(key, store, app, downloader, state);
            false
        }
        InputMode::Folder(purpose) => {
            handle_folder_key(key, purpose, store, app, player, downloader, state);
            false
        }
        InputMode::Settings => {
            handle_settings_key(key, store, app);
            false
        }
    }
}

fn handle_normal_key(
    key: KeyEvent,
    store: &mut SettingsStore,
    app: &mut App,
    player: &mut Player,
    state: &mut EventLoopState,
) -> bool {
    let lang = store.settings().ui.language;
    match key.code {
        KeyCode::Char('q') => {
            state.pending_gg = false;
            return true;
        }
        KeyCode::Char('j') => {
            state.pending_gg = false;
            app.move_down(player.queue().visible_len());
        }
        KeyCode::Char('k') => {
            state.pending_gg = false;
            app.move_up(player.queue().visible_len());
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            state.pending_gg = false;
            app.select_last(player.queue().visible_len());
        }
        KeyCode::Enter => {
            state.pending_gg = false;
            if player.queue().visible_len() > 0 {
                player.play(app.selected);
            }
        }
        KeyCode::Char(' ') | KeyCode::Char('p') => {
            state.pending_gg = false;
            player.toggle_play_pause();
        }
        KeyCode::Char('l') => {
            state.pending_gg = false;
            player.next();
        }
        KeyCode::Char('h') => {
            state.pending_gg = false;
            player.prev(app.elapsed);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            state.pending_gg = false;
            player.set_volume(player.volume() + 0.05);
        }
        KeyCode::Char('-') => {
            state.pending_gg = false;
            player.set_volume(player.volume() - 0.05);
        }
        KeyCode::Char('/') => {
            state.pending_gg = false;
            app.mode = InputMode::Filter;
        }
        KeyCode::Char('s') => {
            state.pending_gg = false;
            player.toggle_shuffle();
        }
        KeyCode::Char('r') => {
            state.pending_gg = false;
            player.cycle_loop_mode();
        }
        KeyCode::Char('d') => {
            state.pending_gg = false;
            if state.active_download.is_some() {
                app.set_status(label(lang, Label::DownloadRunning));
            } else {
                app.open_download_prompt();
            }
        }
        KeyCode::Char('o') => {
            state.pending_gg = false;
            let initial = app
                .library_dir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            app.open_folder_prompt(FolderPurpose::Library, &initial);
        }
        KeyCode::Char('S') => {
            state.pending_gg = false;
            app.open_settings();
        }
        KeyCode::Char('K') => {
            state.pending_gg = false;
            app.toggle_metadata_window();
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            state.pending_gg = false;
            let fraction = f64::from(c as u8 - b'0') / 10.0;
            player.seek_fraction(fraction);
        }
        KeyCode::Esc => {
            state.pending_gg = false;
            app.metadata_window = false;
            app.status = None;
        }
        KeyCode::Char(_) => {
            // g prefix clears on any other printable char.
            state.pending_gg = false;
        }
        _ => {}
    }
    false
}

fn handle_filter_key(key: KeyEvent, app: &mut App, player: &mut Player) {
    match key.code {
        KeyCode::Esc => {
            app.clear_filter();
            app.close_overlay();
            player.apply_filter("");
            app.clamp_selection(player.queue().visible_len());
        }
        KeyCode::Enter => {
            app.close_overlay();
            if player.queue().visible_len() > 0 {
                player.play(app.selected);
            }
        }
        KeyCode::Backspace => {
            app.pop_filter_char();
            refresh_filter(app, player);
        }
        KeyCode::Char(c) if !c.is_control() => {
            app.push_filter_char(c);
            refresh_filter(app, player);
        }
        _ => {}
    }
}

fn refresh_filter(app: &mut App, player: &mut Player) {
    player.apply_filter(&app.filter_query);
    app.clamp_selection(player.queue().visible_len());
}

fn handle_download_key(
    key: KeyEvent,
    store: &mut SettingsStore,
    app: &mut App,
    downloader: &Downloader,
    state: &mut EventLoopState,
) {
    let lang = store.settings().ui.language;
    match key.code {
        KeyCode::Esc => app.close_overlay(),
        KeyCode::Tab => app.download_field = app.download_field.toggled(),
        KeyCode::Backspace => {
            match app.download_field {
                DownloadField::Url => app.url_input.pop(),
                DownloadField::Name => app.name_input.pop(),
            };
        }
        KeyCode::Enter => {
            let url = app.url_input.trim().to_string();
            if url.is_empty() {
                app.set_status(label(lang, Label::EmptyUrl));
                return;
            }
            let name = app.name_input.trim();
            let request = DownloadRequest {
                url,
                custom_name: (!name.is_empty()).then(|| name.to_string()),
                quality: store.settings().download.quality,
            };
            app.close_overlay();
            match store.settings().download.folder.clone() {
                Some(folder) => start_download(app, downloader, state, &request, &folder),
                None => {
                    // No folder configured yet; ask for one and hold the
                    // request until it's answered.
                    app.pending_download = Some(request);
                    app.open_folder_prompt(FolderPurpose::Download, "");
                }
            }
        }
        KeyCode::Char(c) if !c.is_control() => match app.download_field {
            DownloadField::Url => app.url_input.push(c),
            DownloadField::Name => app.name_input.push(c),
        },
        _ => {}
    }
}

fn handle_folder_key(
    key: KeyEvent,
    purpose: FolderPurpose,
    store: &mut SettingsStore,
    app: &mut App,
    player: &mut Player,
    downloader: &Downloader,
    state: &mut EventLoopState,
) {
    let lang = store.settings().ui.language;
    match key.code {
        KeyCode::Esc => {
            app.close_overlay();
            // A dismissed folder prompt fails the request that was waiting
            // on it; nothing was spawned yet.
            if purpose == FolderPurpose::Download && app.pending_download.take().is_some() {
                app.download_state =
                    DownloadState::Failed(label(lang, Label::DownloadCancelled).to_string());
            }
        }
        KeyCode::Backspace => {
            app.path_input.pop();
        }
        KeyCode::Enter => {
            let input = app.path_input.trim().to_string();
            if input.is_empty() {
                return;
            }
            let folder = expand_tilde(&input);
            app.close_overlay();
            match purpose {
                FolderPurpose::Library => {
                    let tracks = scan(&folder, &store.settings().library);
                    if tracks.is_empty() {
                        app.set_status(label(lang, Label::NoTracksFound));
                    } else {
                        app.set_status(format!(
                            "{} {}",
                            tracks.len(),
                            label(lang, Label::TracksLoaded)
                        ));
                    }
                    let count = tracks.len();
                    app.clear_filter();
                    app.select_first();
                    app.library_dir = Some(folder);
                    player.load_tracks(tracks);
                    // Interactive folder loads start playing right away.
                    if count > 0 {
                        player.play(0);
                    }
                }
                FolderPurpose::Download => {
                    store.set_download_folder(folder.clone());
                    if let Some(request) = app.pending_download.take() {
                        start_download(app, downloader, state, &request, &folder);
                    }
                }
            }
        }
        KeyCode::Char(c) if !c.is_control() => app.path_input.push(c),
        _ => {}
    }
}

fn handle_settings_key(key: KeyEvent, store: &mut SettingsStore, app: &mut App) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('S') => app.close_overlay(),
        KeyCode::Char('j') => app.settings_down(),
        KeyCode::Char('k') => app.settings_up(),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('l') => {
            match app.selected_settings_row() {
                SettingsRow::DownloadFolder => {
                    let initial = store
                        .settings()
                        .download
                        .folder
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default();
                    app.open_folder_prompt(FolderPurpose::Download, &initial);
                }
                SettingsRow::Quality => {
                    let next = store.settings().download.quality.cycled();
                    store.set_quality(next);
                }
                SettingsRow::Animations => {
                    let next = !store.settings().ui.animations_enabled;
                    store.set_animations_enabled(next);
                }
                SettingsRow::Language => {
                    let next = store.settings().ui.language.toggled();
                    store.set_language(next);
                }
            }
        }
        _ => {}
    }
}

fn start_download(
    app: &mut App,
    downloader: &Downloader,
    state: &mut EventLoopState,
    request: &DownloadRequest,
    folder: &Path,
) {
    match downloader.start(request, folder) {
        Ok(job) => {
            state.active_download = Some(job);
            app.download_state = DownloadState::Running { percent: 0.0 };
        }
        Err(err) => {
            warn!("download failed to start: {err}");
            app.download_state = DownloadState::Failed(err.to_string());
        }
    }
}
