use std::fs::File;
use std::path::Path;

use anyhow::Context as _;
use env_logger::{Env, Target};

/// Send log records to `path`, filtered by `RUST_LOG` (default `info`).
///
/// The terminal is owned by the UI, so without a file nothing is installed
/// and every record is dropped.
pub fn init(path: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .context("logger already installed")?;
    Ok(())
}
