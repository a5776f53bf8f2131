// The TUI owns stdout/stderr while running, so log records go to a file in the
// state directory. RUST_LOG overrides the default `info` filter.

use crate::app_dirs::AppDirs;
use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Install the global logger writing to the default log file.
/// Returns the path being written, or `None` if logging is disabled.
pub fn init() -> Option<PathBuf> {
    let path = AppDirs::log_path()?;
    init_with_path(&path).then_some(path)
}

/// Install the global logger writing to `path`. Falls back to a silent logger
/// when the file cannot be opened.
pub fn init_with_path(path: &Path) -> bool {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));

    let opened = path
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|_| OpenOptions::new().create(true).append(true).open(path));

    let to_file = match opened {
        Ok(file) => {
            builder.target(Target::Pipe(Box::new(file)));
            true
        }
        Err(_) => {
            builder.filter_level(LevelFilter::Off);
            false
        }
    };

    // A second init (tests, embedding) keeps the first logger.
    let _ = builder.try_init();
    to_file
}
