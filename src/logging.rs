use anyhow::{Context, Result};
use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;
use std::path::Path;

/// Send log output to a file. The terminal belongs to the map, so nothing goes to stderr.
pub fn setup_logging(path: &Path, level: LevelFilter) -> Result<()> {
    if level == LevelFilter::Off {
        return Ok(());
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    WriteLogger::init(
        level,
        ConfigBuilder::new()
            .set_target_level(LevelFilter::Error)
            .set_time_format_rfc3339()
            .build(),
        file,
    )
    .context("Logger already initialized")
}
