//! UI-facing application state.
//!
//! Everything the event loop mutates and the renderer reads lives here.

use std::path::PathBuf;
use std::time::Duration;

use crate::download::DownloadRequest;

/// Which surface currently receives key input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the filter line.
    Filter,
    /// The download prompt is open.
    Download,
    /// The folder prompt is open.
    Folder(FolderPurpose),
    /// The settings panel is open.
    Settings,
}

impl Default for InputMode {
    fn default() -> Self {
        Self::Normal
    }
}

/// What a submitted folder path is for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FolderPurpose {
    /// Load a music library from the folder.
    Library,
    /// Save downloads into the folder.
    Download,
}

/// Which field of the download prompt has focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DownloadField {
    Url,
    Name,
}

impl DownloadField {
    pub fn toggled(self) -> Self {
        match self {
            Self::Url => Self::Name,
            Self::Name => Self::Url,
        }
    }
}

/// Lifecycle of the single allowed download job.
#[derive(Clone, Debug, PartialEq)]
pub enum DownloadState {
    Idle,
    Running { percent: f32 },
    Succeeded,
    Failed(String),
}

impl Default for DownloadState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Rows of the settings panel, in display order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SettingsRow {
    DownloadFolder,
    Quality,
    Animations,
    Language,
}

impl SettingsRow {
    pub const COUNT: usize = 4;

    pub fn from_index(index: usize) -> Self {
        match index % Self::COUNT {
            0 => Self::DownloadFolder,
            1 => Self::Quality,
            2 => Self::Animations,
            _ => Self::Language,
        }
    }
}

/// The main application model.
pub struct App {
    pub mode: InputMode,
    /// Cursor position within the queue's visible list.
    pub selected: usize,
    pub filter_query: String,
    /// One-line message shown in the status bar until replaced.
    pub status: Option<String>,

    pub url_input: String,
    pub name_input: String,
    pub download_field: DownloadField,
    /// Request parked while the folder prompt asks where to save it.
    pub pending_download: Option<DownloadRequest>,
    pub download_state: DownloadState,

    pub path_input: String,
    pub settings_row: usize,

    pub metadata_window: bool,
    pub library_dir: Option<PathBuf>,
    /// Elapsed time of the current track, sampled each tick.
    pub elapsed: Duration,
}

impl App {
    pub fn new() -> Self {
        Self {
            mode: InputMode::Normal,
            selected: 0,
            filter_query: String::new(),
            status: None,
            url_input: String::new(),
            name_input: String::new(),
            download_field: DownloadField::Url,
            pending_download: None,
            download_state: DownloadState::Idle,
            path_input: String::new(),
            settings_row: 0,
            metadata_window: false,
            library_dir: None,
            elapsed: Duration::ZERO,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// Move the cursor down one row, wrapping at the end.
    pub fn move_down(&mut self, visible_len: usize) {
        if visible_len == 0 {
            self.selected = 0;
        } else {
            self.selected = (self.selected + 1) % visible_len;
        }
    }

    /// Move the cursor up one row, wrapping at the top.
    pub fn move_up(&mut self, visible_len: usize) {
        if visible_len == 0 {
            self.selected = 0;
        } else if self.selected == 0 {
            self.selected = visible_len - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self, visible_len: usize) {
        self.selected = visible_len.saturating_sub(1);
    }

    /// Keep the cursor inside the view after the visible list changed.
    pub fn clamp_selection(&mut self, visible_len: usize) {
        if visible_len == 0 {
            self.selected = 0;
        } else if self.selected >= visible_len {
            self.selected = visible_len - 1;
        }
    }

    /// Append to the filter line. The caller re-applies the filter.
    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
    }

    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
    }

    /// Open the download prompt with fresh inputs.
    pub fn open_download_prompt(&mut self) {
        self.url_input.clear();
        self.name_input.clear();
        self.download_field = DownloadField::Url;
        self.mode = InputMode::Download;
    }

    /// Open the folder prompt seeded with `initial`.
    pub fn open_folder_prompt(&mut self, purpose: FolderPurpose, initial: &str) {
        self.path_input.clear();
        self.path_input.push_str(initial);
        self.mode = InputMode::Folder(purpose);
    }

    pub fn open_settings(&mut self) {
        self.settings_row = 0;
        self.mode = InputMode::Settings;
    }

    /// Drop back to normal mode, leaving inputs as they are.
    pub fn close_overlay(&mut self) {
        self.mode = InputMode::Normal;
    }

    pub fn settings_down(&mut self) {
        self.settings_row = (self.settings_row + 1) % SettingsRow::COUNT;
    }

    pub fn settings_up(&mut self) {
        self.settings_row = (self.settings_row + SettingsRow::COUNT - 1) % SettingsRow::COUNT;
    }

    pub fn selected_settings_row(&self) -> SettingsRow {
        SettingsRow::from_index(self.settings_row)
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
