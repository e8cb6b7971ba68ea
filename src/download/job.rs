use std::ffi::OsString;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStderr, ChildStdout, Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use super::progress::parse_progress;
use super::types::{DownloadError, DownloadEvent, DownloadRequest};

/// Spawns and supervises external download jobs.
pub struct Downloader {
    tool: PathBuf,
}

impl Downloader {
    pub fn new(tool: impl Into<PathBuf>) -> Self {
        Self { tool: tool.into() }
    }

    /// Starts a job writing into `folder`.
    ///
    /// Validation failures surface here, before any process is spawned.
    /// Everything after that arrives as [`DownloadEvent`]s on the
    /// returned handle.
    pub fn start(
        &self,
        request: &DownloadRequest,
        folder: &Path,
    ) -> Result<ActiveDownload, DownloadError> {
        if request.url.trim().is_empty() {
            return Err(DownloadError::EmptyUrl);
        }

        let template = output_template(request, folder);
        let mut child = Command::new(&self.tool)
            .args(build_args(request, &template))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        info!(
            "downloading {} into {}",
            request.url.trim(),
            folder.display()
        );

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (tx, rx) = mpsc::channel();
        let join = thread::spawn(move || supervise(child, stdout, stderr, template, tx));

        Ok(ActiveDownload { events: rx, join })
    }
}

/// Handle to a running download job.
pub struct ActiveDownload {
    events: Receiver<DownloadEvent>,
    join: JoinHandle<()>,
}

impl ActiveDownload {
    /// Drains whatever the job has reported since the last call.
    pub fn try_events(&self) -> impl Iterator<Item = DownloadEvent> + '_ {
        self.events.try_iter()
    }

    /// Joins the worker. Call once the terminal event has arrived.
    pub fn finish(self) {
        let _ = self.join.join();
    }

    /// Blocks until the job ends, returning every remaining event.
    #[cfg(test)]
    pub fn wait(self) -> Vec<DownloadEvent> {
        let events: Vec<_> = self.events.iter().collect();
        let _ = self.join.join();
        events
    }
}

fn supervise(
    mut child: Child,
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
    template: PathBuf,
    tx: Sender<DownloadEvent>,
) {
    // Collected on its own thread so a chatty tool can't fill the pipe
    // and stall while we read stdout.
    let stderr_join = stderr.map(|pipe| {
        thread::spawn(move || {
            let mut buf = String::new();
            let _ = BufReader::new(pipe).read_to_string(&mut buf);
            buf
        })
    });

    if let Some(pipe) = stdout {
        for line in BufReader::new(pipe).lines() {
            let Ok(line) = line else { break };
            match parse_progress(&line) {
                Some(pct) => {
                    let _ = tx.send(DownloadEvent::Progress(pct));
                }
                None => debug!("yt-dlp: {line}"),
            }
        }
    }

    let stderr_text = stderr_join
        .and_then(|j| j.join().ok())
        .map(|raw| raw.lines().collect::<Vec<_>>().join("\n"))
        .unwrap_or_default();

    let outcome = match child.wait() {
        Ok(status) if status.success() => Ok(template),
        Ok(status) => {
            let status = status.code().unwrap_or(-1);
            warn!("downloader exited with status {status}: {stderr_text}");
            Err(DownloadError::Tool {
                status,
                stderr: stderr_text,
            })
        }
        Err(err) => Err(DownloadError::Io(err)),
    };

    let _ = tx.send(DownloadEvent::Finished(outcome));
}

/// Where the tool should write, as a yt-dlp output template.
pub(super) fn output_template(request: &DownloadRequest, folder: &Path) -> PathBuf {
    let name = request
        .custom_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    match name {
        Some(name) => folder.join(format!("{name}.%(ext)s")),
        None => folder.join("%(title)s.%(ext)s"),
    }
}

pub(super) fn build_args(request: &DownloadRequest, template: &Path) -> Vec<OsString> {
    vec![
        request.url.trim().into(),
        "-x".into(),
        "--audio-format".into(),
        "mp3".into(),
        "--audio-quality".into(),
        request.quality.code().into(),
        "--embed-thumbnail".into(),
        "--add-metadata".into(),
        "--newline".into(),
        "-o".into(),
        template.as_os_str().to_os_string(),
    ]
}
