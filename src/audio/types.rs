//! Output-thread message types and shared handles.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;

/// Commands serviced by the output thread.
#[derive(Debug)]
pub enum OutputCmd {
    /// Decode the file and start playing it from the beginning.
    Load(PathBuf),
    /// Pause the current sink.
    Pause,
    /// Resume the current sink.
    Resume,
    /// Stop and drop the current sink.
    Stop,
    /// Jump to an absolute position in the current track.
    Seek(Duration),
    /// Volume for the current sink and every future one.
    SetVolume(f32),
    /// Tear the thread down.
    Quit,
}

/// Events the output thread reports back to the runtime.
#[derive(Debug)]
pub enum OutputEvent {
    /// The current track played to its end.
    Finished,
    /// A file could not be opened or decoded.
    Failed(String),
}

/// Failure opening or decoding an audio file.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}

#[derive(Debug, Clone)]
/// Runtime playback information shared with the UI.
pub struct PlaybackInfo {
    /// Elapsed playback time for the current track.
    pub elapsed: Duration,
    /// Whether audio is actually coming out right now.
    pub playing: bool,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            elapsed: Duration::ZERO,
            playing: false,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
