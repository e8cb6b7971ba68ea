use std::path::{Path, PathBuf};

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::ItemKey;
use rayon::prelude::*;
use tracing::warn;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::{Track, make_display};

/// Recursively scan `dir` for audio files and read their tags in parallel.
///
/// A file whose tags cannot be read is logged and skipped; the caller just
/// gets a shorter list. The result is sorted case-insensitively by display
/// line, so scanning the same folder twice yields the same order.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let files = collect_audio_files(dir, settings);

    let mut tracks: Vec<Track> = files
        .into_par_iter()
        .filter_map(|path| read_track(&path))
        .collect();

    tracks.sort_by(|a, b| {
        a.display
            .to_lowercase()
            .cmp(&b.display.to_lowercase())
            .then_with(|| a.path.cmp(&b.path))
    });
    tracks
}

fn collect_audio_files(dir: &Path, settings: &LibrarySettings) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_audio_file(p, settings))
        .collect();

    // Walk order varies by filesystem; sort so display-sort ties stay stable.
    files.sort();
    files
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn read_track(path: &Path) -> Option<Track> {
    let tagged = match lofty::read_from_path(path) {
        Ok(tagged) => tagged,
        Err(err) => {
            warn!("skipping {}: {err}", path.display());
            return None;
        }
    };

    let duration = Some(tagged.properties().duration());

    let mut title = default_title(path);
    let mut artist: Option<String> = None;

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        if let Some(v) = tag.get_string(ItemKey::TrackTitle) {
            if !v.trim().is_empty() {
                title = v.to_string();
            }
        }
        if let Some(v) = tag.get_string(ItemKey::TrackArtist) {
            let v = v.trim();
            if !v.is_empty() {
                artist = Some(v.to_string());
            }
        }
    }

    let display = make_display(&title, artist.as_deref());

    Some(Track {
        path: path.to_path_buf(),
        title,
        artist,
        duration,
        display,
    })
}

fn default_title(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string()
}
