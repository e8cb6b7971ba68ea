use std::path::PathBuf;
use std::time::Duration;

/// A single playable track discovered during a library scan.
///
/// The path doubles as the track identity: filter recomputation and the
/// media-key surface compare paths, never list positions.
#[derive(Debug, Clone)]
pub struct Track {
    pub path: PathBuf,
    /// Tag title, or the file stem when the tag is missing or empty.
    pub title: String,
    /// None when untagged; rendering substitutes a localized placeholder.
    pub artist: Option<String>,
    /// None when the container reports no duration. Seeking by fraction is
    /// a no-op without one.
    pub duration: Option<Duration>,
    /// Line shown in the track list.
    pub display: String,
}

/// Build the list line: "Artist - Title", or the bare title when the artist
/// tag is missing.
pub fn make_display(title: &str, artist: Option<&str>) -> String {
    match artist {
        Some(a) if !a.trim().is_empty() => format!("{} - {}", a.trim(), title),
        _ => title.to_string(),
    }
}
