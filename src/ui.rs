//! UI rendering for the terminal interface.
//!
//! One `draw` call renders the whole frame from the app model, the player
//! and the current settings. Overlay prompts are drawn last over the
//! track list.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{sync::LazyLock, time::Duration};

use crate::app::{App, DownloadField, DownloadState, FolderPurpose, InputMode, SettingsRow};
use crate::config::{QualityTier, Settings};
use crate::i18n::{Label, label};
use crate::playback::{LoopMode, PlaybackState, Player};

static CONTROLS_TEXT: LazyLock<String> = LazyLock::new(|| {
    [
        ("j/k", "up/down"),
        ("gg/G", "top/bottom"),
        ("enter", "play selected"),
        ("space/p", "play/pause"),
        ("h/l", "prev/next"),
        ("0-9", "seek"),
        ("+/-", "volume"),
        ("/", "filter"),
        ("s", "shuffle"),
        ("r", "loop"),
        ("d", "download"),
        ("o", "open folder"),
        ("S", "settings"),
        ("K", "metadata"),
        ("q", "quit"),
    ]
    .iter()
    .map(|(k, v)| format!("[{k}] {v}"))
    .collect::<Vec<String>>()
    .join(" | ")
});

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn loop_label(mode: LoopMode) -> Label {
    match mode {
        LoopMode::Off => Label::LoopOff,
        LoopMode::All => Label::LoopAll,
        LoopMode::One => Label::LoopOne,
    }
}

fn quality_label(quality: QualityTier) -> Label {
    match quality {
        QualityTier::Best => Label::QualityBest,
        QualityTier::High => Label::QualityHigh,
        QualityTier::Standard => Label::QualityStandard,
    }
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, app: &App, player: &Player, settings: &Settings) {
    let lang = settings.ui.language;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header_text = app
        .library_dir
        .as_ref()
        .map(|dir| dir.display().to_string())
        .unwrap_or_default();
    let header = Paragraph::new(header_text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" vivace ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status = {
        let mut parts: Vec<String> = Vec::new();

        let state_label = match player.state() {
            PlaybackState::Playing => Label::Playing,
            PlaybackState::Paused => Label::Paused,
            PlaybackState::Stopped => Label::Stopped,
        };
        parts.push(label(lang, state_label).to_string());

        if let Some(track) = player.queue().current_track() {
            let time = match track.duration {
                Some(total) => format!("{}/{}", format_mmss(app.elapsed), format_mmss(total)),
                None => format_mmss(app.elapsed),
            };
            parts.push(format!("{} [{}]", track.display, time));
        }

        parts.push(format!(
            "{}: {}",
            label(lang, Label::Loop),
            label(lang, loop_label(player.queue().loop_mode()))
        ));

        let shuffle = if player.queue().shuffle_on() {
            Label::On
        } else {
            Label::Off
        };
        parts.push(format!(
            "{}: {}",
            label(lang, Label::Shuffle),
            label(lang, shuffle)
        ));

        parts.push(format!("Vol: {:.0}%", player.volume() * 100.0));

        let q = app.filter_query.trim();
        if app.mode == InputMode::Filter || !q.is_empty() {
            parts.push(format!("/{q}"));
        }

        match &app.download_state {
            DownloadState::Idle => {}
            DownloadState::Running { percent } => {
                parts.push(format!("{} {percent:.0}%", label(lang, Label::Downloading)));
            }
            DownloadState::Succeeded => {
                parts.push(label(lang, Label::DownloadComplete).to_string());
            }
            DownloadState::Failed(msg) => {
                parts.push(format!("{}: {msg}", label(lang, Label::DownloadFailed)));
            }
        }

        if let Some(message) = &app.status {
            parts.push(message.clone());
        }

        parts.join(" • ")
    };

    let mut status_par = Paragraph::new(status)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    if settings.ui.animations_enabled && player.is_playing() {
        status_par = status_par.slow_blink();
    }
    frame.render_widget(status_par, chunks[1]);

    // Main list, windowed so the cursor stays centered on long libraries.
    {
        let queue = player.queue();
        let total = queue.visible_len();

        if total == 0 {
            let hint = if queue.base_len() == 0 {
                label(lang, Label::EmptyLibrary)
            } else {
                label(lang, Label::NoMatches)
            };
            let empty = Paragraph::new(hint)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(" tracks "));
            frame.render_widget(empty, chunks[2]);
        } else {
            let list_height = chunks[2].height.saturating_sub(2) as usize;
            let sel_pos = app.selected.min(total - 1);
            let (start, end, selected_in_window) = if total <= list_height || list_height == 0 {
                (0, total, sel_pos)
            } else {
                let half = list_height / 2;
                let mut start = sel_pos.saturating_sub(half);
                if start + list_height > total {
                    start = total - list_height;
                }
                (start, start + list_height, sel_pos - start)
            };

            let playing_pos = queue.current();
            let items: Vec<ListItem> = (start..end)
                .map(|pos| {
                    let title = queue
                        .track_at(pos)
                        .map(|t| t.display.as_str())
                        .unwrap_or_default();
                    if Some(pos) == playing_pos {
                        ListItem::new(format!("♪ {title}"))
                    } else {
                        ListItem::new(format!("  {title}"))
                    }
                })
                .collect();

            let list = List::new(items)
                .block(Block::default().borders(Borders::ALL).title(" tracks "))
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                .highlight_symbol("> ");
            let mut state = ratatui::widgets::ListState::default();
            state.select(Some(selected_in_window));
            frame.render_stateful_widget(list, chunks[2], &mut state);
        }
    }

    // Footer
    let footer = Paragraph::new(CONTROLS_TEXT.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);

    // Overlays sit on top of the track list only, never the header or footer.
    if app.metadata_window {
        let popup_area = centered_rect_sized(72, 8, chunks[2]);
        frame.render_widget(Clear, popup_area);

        let meta = match player.queue().track_at(app.selected) {
            Some(track) => {
                let duration = track
                    .duration
                    .map(format_mmss)
                    .unwrap_or_else(|| "-".to_string());
                format!(
                    "Title: {}\nArtist: {}\nDuration: {}\nPath: {}",
                    track.title,
                    track
                        .artist
                        .as_deref()
                        .unwrap_or(label(lang, Label::UnknownArtist)),
                    duration,
                    track.path.display()
                )
            }
            None => label(lang, Label::NoMatches).to_string(),
        };
        let meta_par = Paragraph::new(meta)
            .block(
                Block::default()
                    .padding(Padding {
                        left: 1,
                        right: 0,
                        top: 0,
                        bottom: 0,
                    })
                    .borders(Borders::ALL)
                    .title(" metadata (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(meta_par, popup_area);
    }

    if app.mode == InputMode::Download {
        let popup_area = centered_rect_sized(56, 7, chunks[2]);
        frame.render_widget(Clear, popup_area);

        let url_marker = if app.download_field == DownloadField::Url {
            ">"
        } else {
            " "
        };
        let name_marker = if app.download_field == DownloadField::Name {
            ">"
        } else {
            " "
        };
        let body = format!(
            "{url_marker} URL: {}\n{name_marker} {}: {}",
            app.url_input,
            label(lang, Label::CustomName),
            app.name_input,
        );
        let par = Paragraph::new(body)
            .block(
                Block::default()
                    .padding(Padding {
                        left: 1,
                        right: 0,
                        top: 0,
                        bottom: 0,
                    })
                    .borders(Borders::ALL)
                    .title(format!(" {} ", label(lang, Label::DownloadTitle))),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(par, popup_area);
    }

    if let InputMode::Folder(purpose) = app.mode {
        let popup_area = centered_rect_sized(64, 5, chunks[2]);
        frame.render_widget(Clear, popup_area);

        let title = match purpose {
            FolderPurpose::Library => Label::OpenFolder,
            FolderPurpose::Download => Label::DownloadFolder,
        };
        let par = Paragraph::new(format!("> {}", app.path_input))
            .block(
                Block::default()
                    .padding(Padding {
                        left: 1,
                        right: 0,
                        top: 0,
                        bottom: 0,
                    })
                    .borders(Borders::ALL)
                    .title(format!(" {} ", label(lang, title))),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(par, popup_area);
    }

    if app.mode == InputMode::Settings {
        let popup_area = centered_rect_sized(52, 8, chunks[2]);
        frame.render_widget(Clear, popup_area);

        let folder_value = settings
            .download
            .folder
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| label(lang, Label::NotSet).to_string());
        let animations = if settings.ui.animations_enabled {
            Label::On
        } else {
            Label::Off
        };

        let rows = [
            (
                SettingsRow::DownloadFolder,
                format!("{}: {}", label(lang, Label::DownloadFolder), folder_value),
            ),
            (
                SettingsRow::Quality,
                format!(
                    "{}: {}",
                    label(lang, Label::AudioQuality),
                    label(lang, quality_label(settings.download.quality))
                ),
            ),
            (
                SettingsRow::Animations,
                format!("{}: {}", label(lang, Label::Animations), label(lang, animations)),
            ),
            (
                SettingsRow::Language,
                format!("{}: {}", label(lang, Label::LanguageName), lang.name()),
            ),
        ];
        let body = rows
            .iter()
            .map(|(row, text)| {
                let marker = if *row == app.selected_settings_row() {
                    ">"
                } else {
                    " "
                };
                format!("{marker} {text}")
            })
            .collect::<Vec<String>>()
            .join("\n");

        let par = Paragraph::new(body)
            .block(
                Block::default()
                    .padding(Padding {
                        left: 1,
                        right: 0,
                        top: 0,
                        bottom: 0,
                    })
                    .borders(Borders::ALL)
                    .title(format!(" {} ", label(lang, Label::Settings))),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(par, popup_area);
    }
}
