//! Runtime configuration: defaults, then an optional TOML file, then CLI flags.

use crate::marker::{MarkerScale, MAX_MARKER_SIZE, MIN_PIXELS_PER_DOT};
use anyhow::{bail, Context, Result};
use clap::Parser;
use log::LevelFilter;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "trigger-cities.toml";
pub const DEFAULT_DATA: &str = "data/trigger_cities.json";
pub const DEFAULT_BASEMAP_DIR: &str = "data";
pub const DEFAULT_LOG_FILE: &str = "trigger-cities.log";

/// Command-line flags. Anything left unset falls through to the config file.
#[derive(Debug, Default, Parser)]
#[command(name = "trigger-cities", version, about = "World map of music trigger cities")]
pub struct Args {
    /// Config file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// City dataset: a JSON file path or an http(s) URL
    #[arg(short, long)]
    pub data: Option<String>,

    /// Directory holding Natural Earth GeoJSON files
    #[arg(long)]
    pub basemap_dir: Option<PathBuf>,

    /// Smallest marker diameter, in pixels
    #[arg(long)]
    pub min_marker_size: Option<u32>,

    /// Largest marker diameter, in pixels
    #[arg(long)]
    pub max_marker_size: Option<u32>,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<LevelFilter>,
}

/// Config file contents. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub data: Option<String>,
    pub basemap_dir: Option<PathBuf>,
    pub min_marker_size: Option<u32>,
    pub max_marker_size: Option<u32>,
    pub pixels_per_dot: Option<f64>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub initial_zoom: Option<f64>,
    /// [lon, lat]
    pub initial_center: Option<[f64; 2]>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data: String,
    pub basemap_dir: PathBuf,
    pub scale: MarkerScale,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    pub initial_zoom: f64,
    pub initial_center: (f64, f64),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DEFAULT_DATA.to_string(),
            basemap_dir: PathBuf::from(DEFAULT_BASEMAP_DIR),
            scale: MarkerScale::default(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_level: LevelFilter::Info,
            initial_zoom: 1.0,
            initial_center: (0.0, 20.0),
        }
    }
}

impl Config {
    /// Resolve from CLI flags, reading the config file if one is named or the default exists
    pub fn load(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => {
                if !path.exists() {
                    bail!("Configuration file not found at {}", path.display());
                }
                FileConfig::load(path)?
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    FileConfig::load(default_path)?
                } else {
                    FileConfig::default()
                }
            }
        };
        Self::merge(file, args)
    }

    /// Layer file values over defaults, then CLI flags over both
    pub fn merge(file: FileConfig, args: &Args) -> Result<Self> {
        let mut config = Config::default();

        if let Some(data) = file.data {
            config.data = data;
        }
        if let Some(dir) = file.basemap_dir {
            config.basemap_dir = dir;
        }
        if let Some(size) = file.min_marker_size {
            config.scale.min_size = size;
        }
        if let Some(size) = file.max_marker_size {
            config.scale.max_size = size;
        }
        if let Some(ppd) = file.pixels_per_dot {
            config.scale.pixels_per_dot = ppd;
        }
        if let Some(path) = file.log_file {
            config.log_file = path;
        }
        if let Some(level) = file.log_level {
            config.log_level = level
                .parse()
                .with_context(|| format!("Invalid log_level {:?}", level))?;
        }
        if let Some(zoom) = file.initial_zoom {
            config.initial_zoom = zoom;
        }
        if let Some([lon, lat]) = file.initial_center {
            config.initial_center = (lon, lat);
        }

        if let Some(data) = &args.data {
            config.data = data.clone();
        }
        if let Some(dir) = &args.basemap_dir {
            config.basemap_dir = dir.clone();
        }
        if let Some(size) = args.min_marker_size {
            config.scale.min_size = size;
        }
        if let Some(size) = args.max_marker_size {
            config.scale.max_size = size;
        }
        if let Some(path) = &args.log_file {
            config.log_file = path.clone();
        }
        if let Some(level) = args.log_level {
            config.log_level = level;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.scale.min_size > self.scale.max_size {
            bail!(
                "min_marker_size ({}) must not exceed max_marker_size ({})",
                self.scale.min_size,
                self.scale.max_size
            );
        }
        if self.scale.min_size == 0 || self.scale.max_size > MAX_MARKER_SIZE {
            bail!(
                "marker sizes must be within 1..={} (got {}..={})",
                MAX_MARKER_SIZE,
                self.scale.min_size,
                self.scale.max_size
            );
        }
        let ppd = self.scale.pixels_per_dot;
        if !ppd.is_finite() || ppd < MIN_PIXELS_PER_DOT {
            bail!("pixels_per_dot must be at least {} (got {})", MIN_PIXELS_PER_DOT, ppd);
        }
        if !(self.initial_zoom > 0.0) {
            bail!("initial_zoom must be positive (got {})", self.initial_zoom);
        }
        let (lon, lat) = self.initial_center;
        if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
            bail!("initial_center out of range: [{}, {}]", lon, lat);
        }
        Ok(())
    }
}
