//! rodio-backed implementation of the playback output device.
//!
//! The device runs on its own thread and is driven entirely by commands;
//! end-of-track and failures come back to the runtime as events, so the
//! playback controller stays in charge of what plays next.

mod output;
mod sink;
mod types;

pub use output::*;
pub use types::*;
