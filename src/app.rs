//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the active input mode,
//! overlay inputs, cursor position and download status. Playback itself
//! belongs to `playback::Player`.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
