use std::{fs, io, path::PathBuf};

use tracing::warn;

use super::load::resolve_config_path;
use super::schema::{QualityTier, Settings};
use crate::i18n::Language;

/// Owns the active settings plus the path they persist to.
///
/// Every mutation rewrites the whole config file immediately, so a value
/// changed in the settings panel survives a crash right away. Persistence
/// failures are logged and never roll back the in-memory value.
pub struct SettingsStore {
    settings: Settings,
    path: Option<PathBuf>,
}

impl SettingsStore {
    /// Load settings, falling back to defaults when the config file is
    /// missing, unreadable or fails validation.
    pub fn load() -> Self {
        let settings = match Settings::load() {
            Ok(s) => match s.validate() {
                Ok(()) => s,
                Err(msg) => {
                    warn!("invalid config, using defaults: {msg}");
                    Settings::default()
                }
            },
            Err(err) => {
                warn!("could not load config, using defaults: {err}");
                Settings::default()
            }
        };
        Self {
            settings,
            path: resolve_config_path(),
        }
    }

    /// Build a store around already-loaded settings and an explicit path.
    #[cfg(test)]
    pub fn with_settings(settings: Settings, path: Option<PathBuf>) -> Self {
        Self { settings, path }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_download_folder(&mut self, folder: PathBuf) {
        self.settings.download.folder = Some(folder);
        self.persist();
    }

    pub fn set_quality(&mut self, quality: QualityTier) {
        self.settings.download.quality = quality;
        self.persist();
    }

    pub fn set_animations_enabled(&mut self, enabled: bool) {
        self.settings.ui.animations_enabled = enabled;
        self.persist();
    }

    pub fn set_language(&mut self, language: Language) {
        self.settings.ui.language = language;
        self.persist();
    }

    fn persist(&self) {
        if let Err(err) = self.save() {
            warn!("could not persist settings: {err}");
        }
    }

    fn save(&self) -> io::Result<()> {
        let Some(path) = &self.path else {
            return Err(io::Error::other("no writable config path"));
        };
        let rendered = toml::to_string_pretty(&self.settings).map_err(io::Error::other)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, rendered)
    }
}
