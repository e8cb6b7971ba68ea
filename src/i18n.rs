//! Localized UI strings.

use serde::{Deserialize, Serialize};

/// Interface language, selectable from the settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    De,
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

impl Language {
    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::De,
            Language::De => Language::En,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::De => "Deutsch",
        }
    }
}

/// Every user-facing string the interface localizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    UnknownArtist,
    Playing,
    Paused,
    Stopped,
    Loop,
    LoopOff,
    LoopAll,
    LoopOne,
    Shuffle,
    On,
    Off,
    Downloading,
    DownloadComplete,
    DownloadFailed,
    DownloadCancelled,
    DownloadRunning,
    EmptyUrl,
    DownloadTitle,
    CustomName,
    OpenFolder,
    DownloadFolder,
    Settings,
    AudioQuality,
    Animations,
    LanguageName,
    QualityBest,
    QualityHigh,
    QualityStandard,
    NotSet,
    EmptyLibrary,
    NoMatches,
    NoTracksFound,
    TracksLoaded,
}

pub fn label(lang: Language, label: Label) -> &'static str {
    match lang {
        Language::En => en(label),
        Language::De => de(label),
    }
}

fn en(label: Label) -> &'static str {
    match label {
        Label::UnknownArtist => "Unknown artist",
        Label::Playing => "Playing",
        Label::Paused => "Paused",
        Label::Stopped => "Stopped",
        Label::Loop => "Loop",
        Label::LoopOff => "off",
        Label::LoopAll => "all",
        Label::LoopOne => "one",
        Label::Shuffle => "Shuffle",
        Label::On => "on",
        Label::Off => "off",
        Label::Downloading => "Downloading",
        Label::DownloadComplete => "Download complete",
        Label::DownloadFailed => "Download failed",
        Label::DownloadCancelled => "Folder selection aborted",
        Label::DownloadRunning => "A download is already running",
        Label::EmptyUrl => "Please enter a URL",
        Label::DownloadTitle => "Download audio",
        Label::CustomName => "Custom name (optional)",
        Label::OpenFolder => "Open music folder",
        Label::DownloadFolder => "Download folder",
        Label::Settings => "Settings",
        Label::AudioQuality => "Audio quality",
        Label::Animations => "Animations",
        Label::LanguageName => "Language",
        Label::QualityBest => "best",
        Label::QualityHigh => "high",
        Label::QualityStandard => "standard",
        Label::NotSet => "not set",
        Label::EmptyLibrary => "No tracks loaded (press o to open a folder)",
        Label::NoMatches => "No matches",
        Label::NoTracksFound => "No audio files found",
        Label::TracksLoaded => "tracks loaded",
    }
}

fn de(label: Label) -> &'static str {
    match label {
        Label::UnknownArtist => "Unbekannter Künstler",
        Label::Playing => "Wiedergabe",
        Label::Paused => "Pausiert",
        Label::Stopped => "Gestoppt",
        Label::Loop => "Schleife",
        Label::LoopOff => "aus",
        Label::LoopAll => "alle",
        Label::LoopOne => "eins",
        Label::Shuffle => "Zufall",
        Label::On => "an",
        Label::Off => "aus",
        Label::Downloading => "Wird heruntergeladen",
        Label::DownloadComplete => "Download abgeschlossen",
        Label::DownloadFailed => "Download fehlgeschlagen",
        Label::DownloadCancelled => "Ordnerauswahl abgebrochen",
        Label::DownloadRunning => "Es läuft bereits ein Download",
        Label::EmptyUrl => "Bitte eine URL eingeben",
        Label::DownloadTitle => "Audio herunterladen",
        Label::CustomName => "Eigener Name (optional)",
        Label::OpenFolder => "Musikordner öffnen",
        Label::DownloadFolder => "Download-Ordner",
        Label::Settings => "Einstellungen",
        Label::AudioQuality => "Audioqualität",
        Label::Animations => "Animationen",
        Label::LanguageName => "Sprache",
        Label::QualityBest => "beste",
        Label::QualityHigh => "hoch",
        Label::QualityStandard => "standard",
        Label::NotSet => "nicht gesetzt",
        Label::EmptyLibrary => "Keine Titel geladen (o öffnet einen Ordner)",
        Label::NoMatches => "Keine Treffer",
        Label::NoTracksFound => "Keine Audiodateien gefunden",
        Label::TracksLoaded => "Titel geladen",
    }
}
