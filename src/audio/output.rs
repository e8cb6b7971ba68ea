use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::{OutputStreamBuilder, Sink};
use tracing::warn;

use crate::playback::AudioOutput;

use super::sink::create_sink_at;
use super::types::{OutputCmd, OutputEvent, PlaybackHandle, PlaybackInfo};

/// Playback device backed by a dedicated rodio thread.
///
/// Commands go out over an mpsc channel; `Finished`/`Failed` events come
/// back on the receiver returned from `spawn`, and the shared playback
/// handle carries the elapsed time the UI renders each frame.
pub struct RodioOutput {
    tx: Sender<OutputCmd>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl RodioOutput {
    pub fn spawn() -> (Self, Receiver<OutputEvent>) {
        let (tx, rx) = mpsc::channel::<OutputCmd>();
        let (event_tx, event_rx) = mpsc::channel::<OutputEvent>();
        let playback: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let join = spawn_output_thread(rx, event_tx, playback.clone());

        (
            Self {
                tx,
                playback,
                join: Mutex::new(Some(join)),
            },
            event_rx,
        )
    }

    pub fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    fn send(&self, cmd: OutputCmd) {
        // The thread outlives every sender except during shutdown, where a
        // dropped command is harmless.
        let _ = self.tx.send(cmd);
    }
}

impl AudioOutput for RodioOutput {
    fn play(&mut self, path: &Path) {
        self.send(OutputCmd::Load(path.to_path_buf()));
    }

    fn pause(&mut self) {
        self.send(OutputCmd::Pause);
    }

    fn resume(&mut self) {
        self.send(OutputCmd::Resume);
    }

    fn stop(&mut self) {
        self.send(OutputCmd::Stop);
    }

    fn seek(&mut self, position: Duration) {
        self.send(OutputCmd::Seek(position));
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(OutputCmd::SetVolume(volume));
    }

    fn shutdown(&mut self) {
        self.send(OutputCmd::Quit);
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

fn spawn_output_thread(
    rx: Receiver<OutputCmd>,
    events: Sender<OutputEvent>,
    playback_info: PlaybackHandle,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream =
            OutputStreamBuilder::open_default_stream().expect("ERR: No audio output device");
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy for a TUI app.
        stream.log_on_drop(false);

        let mut sink: Option<Sink> = None;
        let mut current: Option<PathBuf> = None;
        let mut paused = false;
        let mut volume: f32 = 1.0;

        // Track start time and accumulated elapsed across pauses/seeks.
        let mut started_at: Option<Instant> = None;
        let mut accumulated = Duration::ZERO;

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(cmd) => match cmd {
                    OutputCmd::Load(path) => {
                        if let Some(s) = sink.take() {
                            s.stop();
                        }
                        match create_sink_at(&stream, &path, Duration::ZERO, volume) {
                            Ok(new_sink) => {
                                new_sink.play();
                                sink = Some(new_sink);
                                current = Some(path);
                                paused = false;
                                started_at = Some(Instant::now());
                                accumulated = Duration::ZERO;
                                update_info(&playback_info, Duration::ZERO, true);
                            }
                            Err(err) => {
                                warn!("{err}");
                                current = None;
                                paused = false;
                                started_at = None;
                                accumulated = Duration::ZERO;
                                update_info(&playback_info, Duration::ZERO, false);
                                let _ = events.send(OutputEvent::Failed(err.to_string()));
                            }
                        }
                    }

                    OutputCmd::Pause => {
                        if let Some(ref s) = sink {
                            if !paused {
                                s.pause();
                                paused = true;
                                if let Some(st) = started_at.take() {
                                    accumulated += st.elapsed();
                                }
                                update_info(&playback_info, accumulated, false);
                            }
                        }
                    }

                    OutputCmd::Resume => {
                        if let Some(ref s) = sink {
                            if paused {
                                s.play();
                                paused = false;
                                started_at = Some(Instant::now());
                                update_info(&playback_info, accumulated, true);
                            }
                        }
                    }

                    OutputCmd::Stop => {
                        if let Some(s) = sink.take() {
                            s.stop();
                        }
                        current = None;
                        paused = false;
                        started_at = None;
                        accumulated = Duration::ZERO;
                        update_info(&playback_info, Duration::ZERO, false);
                    }

                    OutputCmd::Seek(position) => {
                        // Seeking rebuilds the sink and skips into the file.
                        let Some(path) = current.clone() else {
                            continue;
                        };
                        if sink.is_none() {
                            continue;
                        }
                        if let Some(s) = sink.take() {
                            s.stop();
                        }
                        match create_sink_at(&stream, &path, position, volume) {
                            Ok(new_sink) => {
                                if paused {
                                    started_at = None;
                                } else {
                                    new_sink.play();
                                    started_at = Some(Instant::now());
                                }
                                sink = Some(new_sink);
                                accumulated = position;
                                update_info(&playback_info, position, !paused);
                            }
                            Err(err) => {
                                warn!("{err}");
                                current = None;
                                paused = false;
                                started_at = None;
                                accumulated = Duration::ZERO;
                                update_info(&playback_info, Duration::ZERO, false);
                                let _ = events.send(OutputEvent::Failed(err.to_string()));
                            }
                        }
                    }

                    OutputCmd::SetVolume(v) => {
                        volume = v;
                        if let Some(ref s) = sink {
                            s.set_volume(v);
                        }
                    }

                    OutputCmd::Quit => {
                        if let Some(s) = sink.take() {
                            s.stop();
                        }
                        update_info(&playback_info, Duration::ZERO, false);
                        break;
                    }
                },

                Err(RecvTimeoutError::Timeout) => {
                    if sink.is_some() && !paused {
                        let elapsed =
                            accumulated + started_at.map_or(Duration::ZERO, |st| st.elapsed());
                        update_info(&playback_info, elapsed, true);
                    }
                    // A non-paused sink that ran dry means the track ended.
                    // Clear it so the event fires exactly once.
                    if sink.as_ref().is_some_and(|s| !paused && s.empty()) {
                        sink = None;
                        current = None;
                        started_at = None;
                        accumulated = Duration::ZERO;
                        update_info(&playback_info, Duration::ZERO, false);
                        let _ = events.send(OutputEvent::Finished);
                    }
                }

                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

fn update_info(handle: &PlaybackHandle, elapsed: Duration, playing: bool) {
    if let Ok(mut info) = handle.lock() {
        info.elapsed = elapsed;
        info.playing = playing;
    }
}
