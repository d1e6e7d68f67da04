use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use trajscope_utils::Config;

/// Trajectory playback and geometry queries.
///
/// Reads interaction commands as JSON lines on stdin and writes state
/// snapshots as JSON lines on stdout. Logs go to stderr (`RUST_LOG`).
#[derive(Debug, Parser)]
#[clap(name = "trajscope", version, about)]
pub struct CliArgs {
    /// KDL config file
    #[clap(short, long, env = "TRAJSCOPE_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Sample trajectories endpoint
    #[clap(long, value_name = "URL")]
    pub trips_url: Option<String>,

    /// Point query endpoint
    #[clap(long, value_name = "URL")]
    pub point_url: Option<String>,

    /// Trajectory query endpoint
    #[clap(long, value_name = "URL")]
    pub traj_url: Option<String>,

    /// Number of trajectories sampled at startup
    #[clap(short = 'n', long)]
    pub sample_size: Option<usize>,

    /// Animation frames per second
    #[clap(long)]
    pub fps: Option<u32>,

    /// Write a frame line on every animation tick
    #[clap(long)]
    pub emit_frames: bool,
}

impl CliArgs {
    /// Config file (or defaults) with command line overrides applied
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_path(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(url) = &self.trips_url {
            config.endpoints.trips = url.clone();
        }
        if let Some(url) = &self.point_url {
            config.endpoints.point = url.clone();
        }
        if let Some(url) = &self.traj_url {
            config.endpoints.trajectory = url.clone();
        }
        if let Some(sample_size) = self.sample_size {
            config.sample_size = sample_size;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }

        config.validate().context("invalid command line options")?;
        Ok(config)
    }
}
