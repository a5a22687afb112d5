//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

/// mp3rec - record the microphone straight to MP3
#[derive(Parser, Debug)]
#[command(name = "mp3rec")]
#[command(version)]
#[command(about = "Record microphone audio to an MP3 file through LAME")]
#[command(long_about = None)]
pub struct Cli {
    /// Output MP3 file
    #[arg(short = 'o', long, value_name = "PATH", env = "MP3REC_OUTPUT")]
    pub output: Option<String>,

    /// Capture sample rate in Hz
    #[arg(
        short = 'r',
        long,
        value_name = "HZ",
        env = "MP3REC_SAMPLE_RATE",
        allow_hyphen_values = true
    )]
    pub sample_rate: Option<i64>,

    /// MP3 bitrate in kbps
    #[arg(short = 'b', long, value_name = "KBPS")]
    pub bitrate: Option<u16>,

    /// LAME quality, 0 (best) to 9 (fastest)
    #[arg(short = 'q', long, value_name = "0-9")]
    pub quality: Option<u8>,

    /// Stop automatically after this long (e.g., 30s, 5m, 1h30m)
    #[arg(short = 'd', long, value_name = "TIME")]
    pub duration: Option<String>,

    /// Input device name (defaults to the system microphone)
    #[arg(short = 'D', long, value_name = "NAME", env = "MP3REC_DEVICE")]
    pub device: Option<String>,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "output",
    "sample_rate",
    "bitrate",
    "quality",
    "max_duration",
    "device",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
