use std::path::Path;
use std::time::Duration;

use super::queue::{LoopMode, PrevAction, Queue};
use crate::library::Track;

/// Commands a playback device must service. The rodio backend forwards them
/// to its audio thread; tests substitute a recorder.
///
/// All commands are fire-and-forget. Device failures surface asynchronously
/// and come back to the controller through `Player::on_output_error`.
pub trait AudioOutput {
    /// Load `path` and start playing it from the beginning.
    fn play(&mut self, path: &Path);
    fn pause(&mut self);
    fn resume(&mut self);
    fn stop(&mut self);
    fn seek(&mut self, position: Duration);
    fn set_volume(&mut self, volume: f32);
    /// Tear the device down. Called once on application exit.
    fn shutdown(&mut self) {}
}

/// Coarse playback state as the controller tracks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

impl Default for PlaybackState {
    fn default() -> Self {
        PlaybackState::Stopped
    }
}

/// Owns the queue and drives the audio output.
///
/// Every intent arrives on the event-loop thread, so there is no locking
/// here; the device runs elsewhere and is reached only through `AudioOutput`
/// commands.
pub struct Player {
    queue: Queue,
    output: Box<dyn AudioOutput>,
    state: PlaybackState,
    volume: f32,
}

impl Player {
    pub fn new(output: Box<dyn AudioOutput>) -> Self {
        Self {
            queue: Queue::new(),
            output,
            state: PlaybackState::Stopped,
            volume: 1.0,
        }
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Replace the library. Playback stops and nothing is current.
    pub fn load_tracks(&mut self, tracks: Vec<Track>) {
        self.output.stop();
        self.state = PlaybackState::Stopped;
        self.queue.load_tracks(tracks);
    }

    pub fn apply_filter(&mut self, query: &str) {
        self.queue.apply_filter(query);
    }

    pub fn toggle_shuffle(&mut self) {
        let on = self.queue.shuffle_on();
        self.queue.set_shuffle(!on);
    }

    pub fn cycle_loop_mode(&mut self) {
        self.queue.cycle_loop_mode();
    }

    /// Start playing the visible entry at `index`. A stale index (the list
    /// shrank under a filter) is a no-op that leaves playback off.
    pub fn play(&mut self, index: usize) {
        let Some(path) = self.queue.track_at(index).map(|t| t.path.clone()) else {
            self.state = PlaybackState::Stopped;
            return;
        };
        self.queue.set_current(Some(index));
        self.output.play(&path);
        self.state = PlaybackState::Playing;
    }

    /// Space-bar semantics: with nothing ever current this plays the first
    /// entry; otherwise pause/resume, or replay the retained track after a
    /// stop.
    pub fn toggle_play_pause(&mut self) {
        match self.queue.current() {
            None => self.play(0),
            Some(current) => match self.state {
                PlaybackState::Playing => {
                    self.output.pause();
                    self.state = PlaybackState::Paused;
                }
                PlaybackState::Paused => {
                    self.output.resume();
                    self.state = PlaybackState::Playing;
                }
                PlaybackState::Stopped => self.play(current),
            },
        }
    }

    /// Manual next. At the end with loop off there is nowhere to go and the
    /// current track keeps playing.
    pub fn next(&mut self) {
        if let Some(next) = self.queue.next() {
            self.play(next);
        }
    }

    /// Manual previous: restart when deep enough into the track, otherwise
    /// step back (wrapping).
    pub fn prev(&mut self, position: Duration) {
        match self.queue.prev(position) {
            Some(PrevAction::Restart) => self.output.seek(Duration::ZERO),
            Some(PrevAction::Play(pos)) => self.play(pos),
            None => {}
        }
    }

    /// The output ran out of audio for the current track.
    pub fn on_track_finished(&mut self) {
        if self.queue.loop_mode() == LoopMode::One {
            if let Some(current) = self.queue.current() {
                self.play(current);
                return;
            }
        }
        match self.queue.next() {
            Some(next) => self.play(next),
            None => self.stop(),
        }
    }

    /// The output failed to play something. Baseline policy: stop and let
    /// the user pick the next move, no automatic skipping.
    pub fn on_output_error(&mut self) {
        self.stop();
    }

    /// Stop playback but keep the current index, so the UI still shows which
    /// track the queue ended on.
    pub fn stop(&mut self) {
        self.output.stop();
        self.state = PlaybackState::Stopped;
    }

    /// Seek to a fraction of the current track. Unknown duration: no-op.
    pub fn seek_fraction(&mut self, fraction: f64) {
        let Some(duration) = self.queue.current_track().and_then(|t| t.duration) else {
            return;
        };
        let fraction = fraction.clamp(0.0, 1.0);
        self.output.seek(duration.mul_f64(fraction));
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.output.set_volume(self.volume);
    }

    pub fn shutdown(&mut self) {
        self.output.shutdown();
    }
}
