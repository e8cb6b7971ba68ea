use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::i18n::Language;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/vivace/config.toml` or `~/.config/vivace/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `VIVACE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
///
/// Everything here also serializes, because the settings panel writes the
/// whole file back after each change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub download: DownloadSettings,
    pub playback: PlaybackSettings,
    pub ui: UiSettings,
    pub library: LibrarySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            download: DownloadSettings::default(),
            playback: PlaybackSettings::default(),
            ui: UiSettings::default(),
            library: LibrarySettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadSettings {
    /// Folder downloaded audio is written to. Stays unset until the user
    /// picks one; the first download prompts for it and persists the choice.
    pub folder: Option<PathBuf>,
    /// Audio quality requested from the extraction tool.
    pub quality: QualityTier,
    /// Binary to invoke for extraction.
    pub tool: String,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            folder: None,
            quality: QualityTier::default(),
            tool: "yt-dlp".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Initial volume, 0.0 to 1.0.
    pub volume: f32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self { volume: 0.7 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Whether the status line uses blink styling.
    pub animations_enabled: bool,
    /// Interface language.
    pub language: Language,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            animations_enabled: true,
            language: Language::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "mp3".into(),
                "m4a".into(),
                "flac".into(),
                "wav".into(),
                "ogg".into(),
            ],
            follow_links: true,
        }
    }
}

/// Audio quality tier passed to the extraction tool.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    High,
    Standard,
    #[serde(other)]
    Best,
}

impl Default for QualityTier {
    fn default() -> Self {
        QualityTier::Best
    }
}

impl QualityTier {
    /// Numeric code for the tool's `--audio-quality` flag. Unrecognized
    /// config values already deserialized to `Best`, so this is total.
    pub fn code(self) -> &'static str {
        match self {
            QualityTier::Best => "0",
            QualityTier::High => "5",
            QualityTier::Standard => "9",
        }
    }

    pub fn cycled(self) -> Self {
        match self {
            QualityTier::Best => QualityTier::High,
            QualityTier::High => QualityTier::Standard,
            QualityTier::Standard => QualityTier::Best,
        }
    }
}
