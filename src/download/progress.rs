use std::sync::LazyLock;

use regex::Regex;

// With `--newline` the tool prints one progress line per update, shaped
// like `[download]  42.7% of 3.00MiB at ...`.
static PROGRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[download\]\s+(\d+(?:\.\d+)?)%").unwrap());

/// Extracts the percentage from a progress line, if the line carries one.
pub(super) fn parse_progress(line: &str) -> Option<f32> {
    let caps = PROGRESS.captures(line)?;
    let pct: f32 = caps.get(1)?.as_str().parse().ok()?;
    Some(pct.clamp(0.0, 100.0))
}
