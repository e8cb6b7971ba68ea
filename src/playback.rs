//! Playback core: the filtered queue and the controller driving an audio
//! output. No device code lives here, which keeps the whole state machine
//! testable with a recording fake.

mod controller;
mod queue;

pub use controller::*;
pub use queue::*;

#[cfg(test)]
mod tests;
