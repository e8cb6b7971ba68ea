use std::sync::{Mutex, MutexGuard, OnceLock};

use tempfile::tempdir;

use super::load::{default_config_path, expand_tilde, resolve_config_path};
use super::schema::*;
use super::store::SettingsStore;
use crate::i18n::Language;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

// Env-var mutation is process-global; tests touching it serialize here.
fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: String,
    previous: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &str, value: &str) -> Self {
        let previous = std::env::var_os(key);
        unsafe { std::env::set_var(key, value) };
        Self {
            key: key.to_string(),
            previous,
        }
    }

    fn unset(key: &str) -> Self {
        let previous = std::env::var_os(key);
        unsafe { std::env::remove_var(key) };
        Self {
            key: key.to_string(),
            previous,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => unsafe { std::env::set_var(&self.key, value) },
            None => unsafe { std::env::remove_var(&self.key) },
        }
    }
}

#[test]
fn defaults_are_sane() {
    let s = Settings::default();
    assert!(s.download.folder.is_none());
    assert_eq!(s.download.quality, QualityTier::Best);
    assert_eq!(s.download.tool, "yt-dlp");
    assert!((s.playback.volume - 0.7).abs() < f32::EPSILON);
    assert!(s.ui.animations_enabled);
    assert_eq!(s.ui.language, Language::En);
    assert!(s.library.extensions.iter().any(|e| e == "m4a"));
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_out_of_range_volume() {
    let mut s = Settings::default();
    s.playback.volume = 1.5;
    assert!(s.validate().is_err());
}

#[test]
fn validate_rejects_empty_extension_list() {
    let mut s = Settings::default();
    s.library.extensions.clear();
    assert!(s.validate().is_err());
}

#[test]
fn validate_rejects_blank_tool_name() {
    let mut s = Settings::default();
    s.download.tool = "  ".to_string();
    assert!(s.validate().is_err());
}

#[test]
fn resolve_prefers_env_override() {
    let _env = lock_env();
    let _guard = EnvGuard::set("VIVACE_CONFIG_PATH", "/tmp/custom-vivace.toml");
    assert_eq!(
        resolve_config_path(),
        Some(std::path::PathBuf::from("/tmp/custom-vivace.toml"))
    );
}

#[test]
fn default_path_honors_xdg_config_home() {
    let _env = lock_env();
    let _unset = EnvGuard::unset("VIVACE_CONFIG_PATH");
    let _xdg = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-test");
    assert_eq!(
        default_config_path(),
        Some(std::path::PathBuf::from("/tmp/xdg-test/vivace/config.toml"))
    );
}

#[test]
fn load_reads_file_values() {
    let _env = lock_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[download]
folder = "/music/downloads"
quality = "high"

[playback]
volume = 0.4

[ui]
animations_enabled = false
language = "de"
"#,
    )
    .unwrap();

    let _guard = EnvGuard::set("VIVACE_CONFIG_PATH", path.to_str().unwrap());
    let s = Settings::load().unwrap();
    assert_eq!(
        s.download.folder.as_deref(),
        Some(std::path::Path::new("/music/downloads"))
    );
    assert_eq!(s.download.quality, QualityTier::High);
    assert!((s.playback.volume - 0.4).abs() < f32::EPSILON);
    assert!(!s.ui.animations_enabled);
    assert_eq!(s.ui.language, Language::De);
}

#[test]
fn env_overrides_file() {
    let _env = lock_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[download]\nquality = \"high\"\n").unwrap();

    let _file = EnvGuard::set("VIVACE_CONFIG_PATH", path.to_str().unwrap());
    let _quality = EnvGuard::set("VIVACE__DOWNLOAD__QUALITY", "standard");
    let s = Settings::load().unwrap();
    assert_eq!(s.download.quality, QualityTier::Standard);
}

#[test]
fn unrecognized_quality_falls_back_to_best() {
    let _env = lock_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[download]\nquality = \"ultra\"\n").unwrap();

    let _guard = EnvGuard::set("VIVACE_CONFIG_PATH", path.to_str().unwrap());
    let s = Settings::load().unwrap();
    assert_eq!(s.download.quality, QualityTier::Best);
}

#[test]
fn quality_codes_match_tool_flags() {
    assert_eq!(QualityTier::Best.code(), "0");
    assert_eq!(QualityTier::High.code(), "5");
    assert_eq!(QualityTier::Standard.code(), "9");
}

#[test]
fn quality_cycles_through_all_tiers() {
    let start = QualityTier::Best;
    assert_eq!(start.cycled(), QualityTier::High);
    assert_eq!(start.cycled().cycled(), QualityTier::Standard);
    assert_eq!(start.cycled().cycled().cycled(), QualityTier::Best);
}

#[test]
fn store_persists_every_mutation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let mut store = SettingsStore::with_settings(Settings::default(), Some(path.clone()));

    store.set_quality(QualityTier::High);
    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert!(on_disk.contains("quality = \"high\""));

    store.set_download_folder("/music/dl".into());
    store.set_animations_enabled(false);
    store.set_language(Language::De);
    let reloaded: Settings = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        reloaded.download.folder.as_deref(),
        Some(std::path::Path::new("/music/dl"))
    );
    assert_eq!(reloaded.download.quality, QualityTier::High);
    assert!(!reloaded.ui.animations_enabled);
    assert_eq!(reloaded.ui.language, Language::De);
}

#[test]
fn expand_tilde_resolves_home() {
    let _env = lock_env();
    let _home = EnvGuard::set("HOME", "/tmp/home-test");
    assert_eq!(
        expand_tilde("~/Music"),
        std::path::PathBuf::from("/tmp/home-test/Music")
    );
    assert_eq!(expand_tilde("~"), std::path::PathBuf::from("/tmp/home-test"));
    assert_eq!(
        expand_tilde("/absolute/path"),
        std::path::PathBuf::from("/absolute/path")
    );
}
