//! Command-line argument parsing for smart-search.

use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{Config, API_URL_ENV};

/// Report format for headless runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Final screen plus a state line.
    #[default]
    Text,
    /// Screen, widget state and assertion tally as JSON.
    Json,
    /// Every frame, one per scripted event.
    Frames,
}

/// Virtual terminal size for headless runs, written `WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u16,
    pub height: u16,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
        }
    }
}

impl FromStr for ScreenSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .to_lowercase()
            .split_once('x')
            .map(|(w, h)| (w.trim().to_string(), h.trim().to_string()))
            .ok_or_else(|| format!("Invalid size '{s}'. Expected WIDTHxHEIGHT (e.g. 80x24)"))?;

        let width = width
            .parse::<u16>()
            .map_err(|_| format!("Invalid width: '{width}'"))?;
        let height = height
            .parse::<u16>()
            .map_err(|_| format!("Invalid height: '{height}'"))?;
        if width == 0 || height == 0 {
            return Err(format!("Screen size must be non-zero, got {width}x{height}"));
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for ScreenSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Interactive search box with debounced exact and fuzzy suggestions.
#[derive(Parser, Debug)]
#[command(name = "smart-search")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suggestion API base URL (e.g. http://localhost:5000/api)
    #[arg(long, value_name = "URL", env = API_URL_ENV)]
    pub api_url: Option<String>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Serve suggestions from an in-memory store seeded with sample terms
    #[arg(long)]
    pub mock_api: bool,

    /// Drive the UI from a script against a virtual terminal
    #[arg(long, help_heading = "Headless")]
    pub headless: bool,

    /// Inline script, e.g. "type:re,wait:400ms,key:down,key:enter"
    #[arg(long, value_name = "EVENTS", conflicts_with = "script", help_heading = "Headless")]
    pub events: Option<String>,

    /// Script file, one event per line ("-" reads stdin)
    #[arg(long, value_name = "PATH", help_heading = "Headless")]
    pub script: Option<String>,

    /// Virtual terminal size
    #[arg(
        long,
        value_name = "WxH",
        default_value_t = ScreenSize::default(),
        help_heading = "Headless"
    )]
    pub size: ScreenSize,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, help_heading = "Headless")]
    pub output: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(long, value_name = "PATH", help_heading = "Headless")]
    pub output_file: Option<PathBuf>,

    /// Stop at the first failed assertion
    #[arg(long, help_heading = "Headless")]
    pub fail_fast: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// `--config` if given, otherwise the per-user default.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// The API URL from `--api-url` or the environment, if non-blank.
    pub fn api_url(&self) -> Option<&str> {
        self.api_url.as_deref().filter(|url| !url.trim().is_empty())
    }

    pub fn is_headless(&self) -> bool {
        self.headless
    }

    /// Checks that a headless run has something to execute.
    pub fn validate_headless(&self) -> Result<(), String> {
        if self.headless && self.events.is_none() && self.script.is_none() {
            return Err("--headless requires --events or --script".to_string());
        }
        Ok(())
    }
}
