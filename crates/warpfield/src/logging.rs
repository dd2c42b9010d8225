//! Logger setup.
//!
//! The terminal UI owns stderr, so interactive runs only log when a log
//! file is configured. Headless runs log to stderr.

use std::fs::OpenOptions;
use std::path::Path;

use env_logger::{Builder, Env, Target};

/// Default filter for a `-v` count; `RUST_LOG` still wins.
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn builder(verbose: u8) -> Builder {
    Builder::from_env(Env::default().default_filter_or(default_filter(verbose)))
}

/// Log to stderr.
pub fn init_stderr(verbose: u8) -> color_eyre::Result<()> {
    builder(verbose).try_init()?;
    Ok(())
}

/// Log to `path` when given, otherwise stay silent.
pub fn init_file(verbose: u8, path: Option<&Path>) -> color_eyre::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    builder(verbose)
        .target(Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}
