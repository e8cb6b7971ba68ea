mod app;
mod audio;
mod config;
mod download;
mod i18n;
mod library;
mod logging;
mod mpris;
mod playback;
mod runtime;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Guard must outlive the program so buffered log lines get flushed.
    let _guard = logging::init();
    runtime::run()
}
