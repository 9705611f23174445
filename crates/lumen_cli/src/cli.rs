use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::scenes::SceneName;

/// Log verbosity accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "lumen")]
#[command(about = "Offline Monte Carlo path tracer")]
pub struct Args {
    /// Demo scene to render
    #[arg(long, value_enum, default_value = "final-scene")]
    pub scene: SceneName,

    /// Output path. `-` writes PPM to stdout; a `.png` extension writes PNG.
    #[arg(short, long, default_value = "-")]
    pub output: String,

    /// Image width in pixels (height follows the scene's aspect ratio)
    #[arg(long)]
    pub width: Option<u32>,

    /// Number of samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Maximum bounce depth
    #[arg(long)]
    pub depth: Option<u32>,

    /// JSON file of render overrides; command line flags win over it
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Render buckets on all cores instead of scanlines on one
    #[arg(long)]
    pub parallel: bool,

    /// Seed for scene construction and sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Logging level, overridden by RUST_LOG when set
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Output goes to stdout rather than a file.
    pub fn writes_stdout(&self) -> bool {
        self.output == "-"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["lumen"]).unwrap();
        assert_eq!(args.scene, SceneName::FinalScene);
        assert!(args.writes_stdout());
        assert!(!args.parallel);
        assert_eq!(args.log_level, LogLevel::Info);
        assert!(args.width.is_none() && args.seed.is_none());
    }

    #[test]
    fn test_all_flags() {
        let args = Args::try_parse_from([
            "lumen",
            "--scene",
            "cornell-smoke",
            "--output",
            "out.png",
            "--width",
            "320",
            "--samples",
            "16",
            "--depth",
            "8",
            "--settings",
            "render.json",
            "--parallel",
            "--seed",
            "3",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(args.scene, SceneName::CornellSmoke);
        assert_eq!(args.output, "out.png");
        assert!(!args.writes_stdout());
        assert_eq!(
            (args.width, args.samples, args.depth, args.seed),
            (Some(320), Some(16), Some(8), Some(3))
        );
        assert_eq!(args.settings, Some(PathBuf::from("render.json")));
        assert!(args.parallel);
        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Debug);
    }

    #[test]
    fn test_unknown_scene_rejected() {
        assert!(Args::try_parse_from(["lumen", "--scene", "teapot"]).is_err());
    }
}
