use std::time::Duration;

use rand::Rng;

use crate::library::Track;

/// How far into a track the previous intent restarts it instead of stepping
/// back one entry.
pub const PREV_RESTART_THRESHOLD: Duration = Duration::from_secs(3);

/// Loop behavior applied when advancing past the end of the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    Off,
    All,
    One,
}

impl Default for LoopMode {
    fn default() -> Self {
        LoopMode::Off
    }
}

impl LoopMode {
    pub fn cycled(self) -> Self {
        match self {
            LoopMode::Off => LoopMode::All,
            LoopMode::All => LoopMode::One,
            LoopMode::One => LoopMode::Off,
        }
    }
}

/// Outcome of a previous-track intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrevAction {
    /// Seek the current track back to the start; the index stays put.
    Restart,
    /// Play the visible entry at this position.
    Play(usize),
}

/// The play queue: the full scanned list plus the filtered view over it.
///
/// `visible` holds indices into `base`. `current` is a position in `visible`
/// (never a base index) and is either `None` or in bounds; every operation
/// that reshapes `visible` re-establishes that.
#[derive(Debug, Default)]
pub struct Queue {
    base: Vec<Track>,
    visible: Vec<usize>,
    current: Option<usize>,
    shuffle: bool,
    loop_mode: LoopMode,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole library. The filter resets and nothing is current.
    pub fn load_tracks(&mut self, tracks: Vec<Track>) {
        self.visible = (0..tracks.len()).collect();
        self.base = tracks;
        self.current = None;
    }

    /// Re-derive the visible list from `query`, then point `current` at the
    /// same track as before when it survived the filter.
    ///
    /// Matching is a case-insensitive substring test on title or artist,
    /// nothing smarter.
    pub fn apply_filter(&mut self, query: &str) {
        let previous = self.current.map(|pos| self.base[self.visible[pos]].path.clone());

        let query = query.trim().to_lowercase();
        if query.is_empty() {
            self.visible = (0..self.base.len()).collect();
        } else {
            self.visible = self
                .base
                .iter()
                .enumerate()
                .filter(|(_, track)| matches_query(track, &query))
                .map(|(i, _)| i)
                .collect();
        }

        self.current = previous.and_then(|path| {
            self.visible
                .iter()
                .position(|&i| self.base[i].path == path)
        });
    }

    /// Position to play after the current one, or `None` when playback
    /// should stop. Shuffle picks uniformly at random; repeats are possible
    /// since no played-history is kept.
    pub fn next(&self) -> Option<usize> {
        if self.visible.is_empty() {
            return None;
        }
        if self.shuffle {
            return Some(rand::rng().random_range(0..self.visible.len()));
        }
        let next = match self.current {
            Some(pos) => pos + 1,
            None => 0,
        };
        if next < self.visible.len() {
            Some(next)
        } else if self.loop_mode == LoopMode::All {
            Some(0)
        } else {
            None
        }
    }

    /// Outcome of the previous intent given how far into the current track
    /// playback is. Past the restart threshold the same track restarts;
    /// otherwise step back one entry, wrapping to the end.
    pub fn prev(&self, position: Duration) -> Option<PrevAction> {
        if self.visible.is_empty() {
            return None;
        }
        if position > PREV_RESTART_THRESHOLD {
            return Some(PrevAction::Restart);
        }
        let pos = match self.current {
            Some(pos) if pos > 0 => pos - 1,
            _ => self.visible.len() - 1,
        };
        Some(PrevAction::Play(pos))
    }

    pub fn set_current(&mut self, pos: Option<usize>) {
        self.current = pos;
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.track_at(self.current?)
    }

    /// Track at a visible position.
    pub fn track_at(&self, pos: usize) -> Option<&Track> {
        self.visible.get(pos).map(|&i| &self.base[i])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn base_len(&self) -> usize {
        self.base.len()
    }

    pub fn set_shuffle(&mut self, on: bool) {
        self.shuffle = on;
    }

    pub fn shuffle_on(&self) -> bool {
        self.shuffle
    }

    pub fn cycle_loop_mode(&mut self) {
        self.loop_mode = self.loop_mode.cycled();
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }
}

fn matches_query(track: &Track, query: &str) -> bool {
    // `query` arrives already lowercased.
    if track.title.to_lowercase().contains(query) {
        return true;
    }
    track
        .artist
        .as_deref()
        .is_some_and(|artist| artist.to_lowercase().contains(query))
}
