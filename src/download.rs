//! Audio downloads driven by an external yt-dlp process.
//!
//! A job runs on its own thread and reports progress and the final
//! outcome over a channel, so the UI thread never blocks on the tool.

mod job;
mod progress;
mod types;

pub use job::*;
pub use types::*;
