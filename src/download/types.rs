use std::path::PathBuf;

use thiserror::Error;

use crate::config::QualityTier;

/// What the user asked to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// URL handed to the external tool, trimmed before use.
    pub url: String,
    /// Optional file name override; the tool's title template applies when
    /// this is empty.
    pub custom_name: Option<String>,
    pub quality: QualityTier,
}

/// Reports emitted while a download job runs.
#[derive(Debug)]
pub enum DownloadEvent {
    /// Percentage in `0.0..=100.0`, parsed from the tool's progress lines.
    Progress(f32),
    /// Terminal report; carries the output template path on success.
    Finished(Result<PathBuf, DownloadError>),
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("no URL given")]
    EmptyUrl,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("downloader exited with status {status}: {stderr}")]
    Tool { status: i32, stderr: String },
}
