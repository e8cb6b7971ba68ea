use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use super::*;
use crate::library::Track;

fn t(title: &str) -> Track {
    Track {
        path: PathBuf::from(format!("/music/{title}.mp3")),
        title: title.to_string(),
        artist: None,
        duration: Some(Duration::from_secs(180)),
        display: title.to_string(),
    }
}

fn t_by(title: &str, artist: &str) -> Track {
    let mut track = t(title);
    track.artist = Some(artist.to_string());
    track.display = format!("{artist} - {title}");
    track
}

fn titles(q: &Queue) -> Vec<String> {
    (0..q.visible_len())
        .map(|i| q.track_at(i).unwrap().title.clone())
        .collect()
}

// --- queue ---

#[test]
fn loading_tracks_resets_filter_and_current() {
    let mut q = Queue::new();
    q.load_tracks(vec![t("a"), t("b")]);
    q.set_current(Some(1));
    q.apply_filter("a");
    q.load_tracks(vec![t("c")]);
    assert_eq!(q.visible_len(), 1);
    assert_eq!(q.current(), None);
    assert_eq!(q.track_at(0).unwrap().title, "c");
}

#[test]
fn empty_filter_restores_base_order() {
    let mut q = Queue::new();
    q.load_tracks(vec![t("b"), t("a"), t("c")]);
    q.apply_filter("a");
    q.apply_filter("");
    assert_eq!(titles(&q), vec!["b", "a", "c"]);
}

#[test]
fn filter_matches_title_or_artist_substring_case_insensitive() {
    let mut q = Queue::new();
    q.load_tracks(vec![
        t_by("Harvest Moon", "Neil Young"),
        t_by("Blue", "Joni Mitchell"),
        t("moonlight"),
    ]);
    q.apply_filter("MOON");
    assert_eq!(titles(&q), vec!["Harvest Moon", "moonlight"]);

    q.apply_filter("joni");
    assert_eq!(titles(&q), vec!["Blue"]);
}

#[test]
fn filter_is_substring_not_fuzzy() {
    let mut q = Queue::new();
    q.load_tracks(vec![t("abc")]);
    // "ac" is a subsequence of "abc" but not a substring.
    q.apply_filter("ac");
    assert_eq!(q.visible_len(), 0);
}

#[test]
fn filter_is_idempotent() {
    let mut q = Queue::new();
    q.load_tracks(vec![t_by("Song One", "Band"), t("other")]);
    q.set_current(Some(0));
    q.apply_filter("song");
    q.apply_filter("song");
    assert_eq!(titles(&q), vec!["Song One"]);
    assert_eq!(q.current(), Some(0));
}

#[test]
fn filtering_follows_the_current_track() {
    let mut q = Queue::new();
    q.load_tracks(vec![t("alpha"), t("beta"), t("gamma")]);
    q.set_current(Some(2));
    q.apply_filter("gam");
    assert_eq!(q.current(), Some(0));
    assert_eq!(q.current_track().unwrap().title, "gamma");
}

#[test]
fn filtering_away_the_current_track_clears_current() {
    let mut q = Queue::new();
    q.load_tracks(vec![t("alpha"), t("beta")]);
    q.set_current(Some(0));
    q.apply_filter("beta");
    assert_eq!(q.current(), None);
}

#[test]
fn next_stops_at_the_end_without_looping() {
    let mut q = Queue::new();
    q.load_tracks(vec![t("a"), t("b"), t("c")]);
    q.set_current(Some(2));
    assert_eq!(q.next(), None);
}

#[test]
fn next_wraps_with_loop_all() {
    let mut q = Queue::new();
    q.load_tracks(vec![t("a"), t("b"), t("c")]);
    q.cycle_loop_mode(); // Off -> All
    q.set_current(Some(2));
    assert_eq!(q.next(), Some(0));
}

#[test]
fn next_from_nothing_current_starts_at_the_top() {
    let mut q = Queue::new();
    q.load_tracks(vec![t("a"), t("b")]);
    assert_eq!(q.next(), Some(0));
}

#[test]
fn next_on_empty_queue_is_none() {
    let q = Queue::new();
    assert_eq!(q.next(), None);
}

#[test]
fn loop_one_does_not_change_manual_next() {
    let mut q = Queue::new();
    q.load_tracks(vec![t("a"), t("b")]);
    q.cycle_loop_mode();
    q.cycle_loop_mode(); // Off -> All -> One
    q.set_current(Some(0));
    assert_eq!(q.next(), Some(1));
    q.set_current(Some(1));
    assert_eq!(q.next(), None);
}

#[test]
fn shuffle_next_stays_in_bounds() {
    let mut q = Queue::new();
    q.load_tracks(vec![t("a"), t("b"), t("c")]);
    q.set_shuffle(true);
    q.set_current(Some(2));
    for _ in 0..50 {
        assert!(q.next().unwrap() < 3);
    }
}

#[test]
fn prev_restarts_when_past_the_threshold() {
    let mut q = Queue::new();
    q.load_tracks(vec![t("a"), t("b")]);
    q.set_current(Some(1));
    assert_eq!(q.prev(Duration::from_secs(5)), Some(PrevAction::Restart));
}

#[test]
fn prev_early_in_the_track_steps_back_and_wraps() {
    let mut q = Queue::new();
    q.load_tracks(vec![t("a"), t("b"), t("c")]);
    q.set_current(Some(0));
    assert_eq!(q.prev(Duration::from_secs(1)), Some(PrevAction::Play(2)));
    q.set_current(Some(2));
    assert_eq!(q.prev(Duration::from_secs(1)), Some(PrevAction::Play(1)));
}

#[test]
fn prev_exactly_at_the_threshold_still_steps_back() {
    let mut q = Queue::new();
    q.load_tracks(vec![t("a"), t("b")]);
    q.set_current(Some(1));
    assert_eq!(q.prev(PREV_RESTART_THRESHOLD), Some(PrevAction::Play(0)));
}

#[test]
fn loop_mode_cycles_off_all_one() {
    let mut q = Queue::new();
    assert_eq!(q.loop_mode(), LoopMode::Off);
    q.cycle_loop_mode();
    assert_eq!(q.loop_mode(), LoopMode::All);
    q.cycle_loop_mode();
    assert_eq!(q.loop_mode(), LoopMode::One);
    q.cycle_loop_mode();
    assert_eq!(q.loop_mode(), LoopMode::Off);
}

// --- controller, against a recording output ---

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Play(PathBuf),
    Pause,
    Resume,
    Stop,
    Seek(Duration),
    SetVolume(f32),
}

#[derive(Default)]
struct FakeOutput {
    calls: Rc<RefCell<Vec<Call>>>,
}

impl FakeOutput {
    fn new() -> (Self, Rc<RefCell<Vec<Call>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                calls: Rc::clone(&calls),
            },
            calls,
        )
    }
}

impl AudioOutput for FakeOutput {
    fn play(&mut self, path: &Path) {
        self.calls.borrow_mut().push(Call::Play(path.to_path_buf()));
    }
    fn pause(&mut self) {
        self.calls.borrow_mut().push(Call::Pause);
    }
    fn resume(&mut self) {
        self.calls.borrow_mut().push(Call::Resume);
    }
    fn stop(&mut self) {
        self.calls.borrow_mut().push(Call::Stop);
    }
    fn seek(&mut self, position: Duration) {
        self.calls.borrow_mut().push(Call::Seek(position));
    }
    fn set_volume(&mut self, volume: f32) {
        self.calls.borrow_mut().push(Call::SetVolume(volume));
    }
}

fn player_with(tracks: Vec<Track>) -> (Player, Rc<RefCell<Vec<Call>>>) {
    let (output, calls) = FakeOutput::new();
    let mut player = Player::new(Box::new(output));
    player.load_tracks(tracks);
    calls.borrow_mut().clear();
    (player, calls)
}

fn last_play(calls: &Rc<RefCell<Vec<Call>>>) -> Option<PathBuf> {
    calls.borrow().iter().rev().find_map(|c| match c {
        Call::Play(p) => Some(p.clone()),
        _ => None,
    })
}

#[test]
fn playing_a_valid_index_starts_that_track() {
    let (mut player, calls) = player_with(vec![t("a"), t("b")]);
    player.play(1);
    assert_eq!(player.state(), PlaybackState::Playing);
    assert_eq!(player.queue().current(), Some(1));
    assert_eq!(last_play(&calls).unwrap(), PathBuf::from("/music/b.mp3"));
}

#[test]
fn playing_a_stale_index_is_a_quiet_no_op() {
    let (mut player, calls) = player_with(vec![t("a")]);
    player.play(5);
    assert!(!player.is_playing());
    assert_eq!(player.state(), PlaybackState::Stopped);
    assert_eq!(player.queue().current(), None);
    assert!(calls.borrow().is_empty());
}

#[test]
fn toggle_with_nothing_current_plays_the_first_entry() {
    let (mut player, calls) = player_with(vec![t("a"), t("b")]);
    player.toggle_play_pause();
    assert_eq!(player.queue().current(), Some(0));
    assert_eq!(player.state(), PlaybackState::Playing);
    assert_eq!(last_play(&calls).unwrap(), PathBuf::from("/music/a.mp3"));
}

#[test]
fn toggle_pauses_and_resumes() {
    let (mut player, calls) = player_with(vec![t("a")]);
    player.play(0);
    player.toggle_play_pause();
    assert_eq!(player.state(), PlaybackState::Paused);
    player.toggle_play_pause();
    assert_eq!(player.state(), PlaybackState::Playing);
    let calls = calls.borrow();
    assert!(calls.contains(&Call::Pause));
    assert!(calls.contains(&Call::Resume));
}

#[test]
fn toggle_on_empty_queue_stays_stopped() {
    let (mut player, _calls) = player_with(vec![]);
    player.toggle_play_pause();
    assert_eq!(player.state(), PlaybackState::Stopped);
}

#[test]
fn finishing_midway_advances_in_order() {
    let (mut player, calls) = player_with(vec![t("a"), t("b")]);
    player.play(0);
    player.on_track_finished();
    assert_eq!(player.queue().current(), Some(1));
    assert_eq!(player.state(), PlaybackState::Playing);
    assert_eq!(last_play(&calls).unwrap(), PathBuf::from("/music/b.mp3"));
}

#[test]
fn finishing_the_last_track_stops_and_keeps_the_index() {
    let (mut player, _calls) = player_with(vec![t("a"), t("b"), t("c")]);
    player.play(2);
    player.on_track_finished();
    assert_eq!(player.state(), PlaybackState::Stopped);
    assert!(!player.is_playing());
    // Still points at the last track for the UI.
    assert_eq!(player.queue().current(), Some(2));
}

#[test]
fn finishing_the_last_track_wraps_with_loop_all() {
    let (mut player, calls) = player_with(vec![t("a"), t("b"), t("c")]);
    player.cycle_loop_mode(); // Off -> All
    player.play(2);
    player.on_track_finished();
    assert_eq!(player.state(), PlaybackState::Playing);
    assert_eq!(player.queue().current(), Some(0));
    assert_eq!(last_play(&calls).unwrap(), PathBuf::from("/music/a.mp3"));
}

#[test]
fn loop_one_replays_the_same_track() {
    let (mut player, calls) = player_with(vec![t("a"), t("b")]);
    player.cycle_loop_mode();
    player.cycle_loop_mode(); // Off -> All -> One
    player.play(1);
    player.on_track_finished();
    assert_eq!(player.queue().current(), Some(1));
    let plays: Vec<Call> = calls
        .borrow()
        .iter()
        .filter(|c| matches!(c, Call::Play(_)))
        .cloned()
        .collect();
    assert_eq!(
        plays,
        vec![
            Call::Play("/music/b.mp3".into()),
            Call::Play("/music/b.mp3".into()),
        ]
    );
}

#[test]
fn manual_next_at_the_end_keeps_playing() {
    let (mut player, calls) = player_with(vec![t("a"), t("b")]);
    player.play(1);
    let before = calls.borrow().len();
    player.next();
    assert_eq!(player.state(), PlaybackState::Playing);
    assert_eq!(player.queue().current(), Some(1));
    assert_eq!(calls.borrow().len(), before);
}

#[test]
fn prev_deep_into_a_track_restarts_it() {
    let (mut player, calls) = player_with(vec![t("a"), t("b")]);
    player.play(1);
    player.prev(Duration::from_secs(5));
    assert_eq!(player.queue().current(), Some(1));
    assert_eq!(calls.borrow().last(), Some(&Call::Seek(Duration::ZERO)));
}

#[test]
fn prev_early_from_the_top_wraps_to_the_end() {
    let (mut player, calls) = player_with(vec![t("a"), t("b"), t("c")]);
    player.play(0);
    player.prev(Duration::from_secs(1));
    assert_eq!(player.queue().current(), Some(2));
    assert_eq!(last_play(&calls).unwrap(), PathBuf::from("/music/c.mp3"));
}

#[test]
fn seek_fraction_scales_the_known_duration() {
    let (mut player, calls) = player_with(vec![t("a")]); // 180 s
    player.play(0);
    player.seek_fraction(0.5);
    assert_eq!(
        calls.borrow().last(),
        Some(&Call::Seek(Duration::from_secs(90)))
    );
}

#[test]
fn seek_fraction_without_duration_is_a_no_op() {
    let mut track = t("a");
    track.duration = None;
    let (mut player, calls) = player_with(vec![track]);
    player.play(0);
    let before = calls.borrow().len();
    player.seek_fraction(0.5);
    assert_eq!(calls.borrow().len(), before);
}

#[test]
fn volume_is_clamped_and_forwarded() {
    let (mut player, calls) = player_with(vec![t("a")]);
    player.set_volume(1.7);
    assert_eq!(player.volume(), 1.0);
    player.set_volume(-0.2);
    assert_eq!(player.volume(), 0.0);
    let calls = calls.borrow();
    assert!(calls.contains(&Call::SetVolume(1.0)));
    assert!(calls.contains(&Call::SetVolume(0.0)));
}

#[test]
fn output_error_stops_playback() {
    let (mut player, calls) = player_with(vec![t("a")]);
    player.play(0);
    player.on_output_error();
    assert_eq!(player.state(), PlaybackState::Stopped);
    assert_eq!(calls.borrow().last(), Some(&Call::Stop));
}

#[test]
fn end_of_track_after_filtering_away_current_plays_first_match() {
    let (mut player, calls) = player_with(vec![t("alpha"), t("beta")]);
    player.play(0);
    player.apply_filter("beta");
    assert_eq!(player.queue().current(), None);
    player.on_track_finished();
    assert_eq!(player.queue().current(), Some(0));
    assert_eq!(last_play(&calls).unwrap(), PathBuf::from("/music/beta.mp3"));
}
