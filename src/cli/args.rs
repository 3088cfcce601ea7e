//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

/// Clipcast - record the screen or a camera and save it as MP4
#[derive(Parser, Debug)]
#[command(name = "clipcast")]
#[command(version)]
#[command(about = "Record the screen or a camera to WebM and transcode it to MP4")]
#[command(long_about = None)]
pub struct Cli {
    /// Recording type: 1 screen, 2 screen + audio, 3 camera, 4 camera + audio
    #[arg(short = 'm', long, value_name = "MODE")]
    pub mode: Option<u32>,

    /// Resolution key (see `clipcast catalog`)
    #[arg(short = 'r', long, value_name = "RES")]
    pub resolution: Option<u32>,

    /// Record once for this long, then transcode and exit (e.g., 10s, 1m30s)
    #[arg(short = 'd', long, value_name = "TIME")]
    pub duration: Option<String>,

    /// Directory for finished MP4 files
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Capture frame rate
    #[arg(long, value_name = "N")]
    pub frame_rate: Option<u32>,

    /// Transcode without percent reporting
    #[arg(long)]
    pub no_progress: bool,

    /// Verbose diagnostics on stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List recording types and resolutions
    Catalog {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
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

/// Config keys settable with `config set`.
/// `resolutions` is a list and only editable in the file.
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "mode",
    "resolution",
    "duration",
    "frame_rate",
    "audio_bitrate",
    "output_dir",
    "preset",
    "crf",
    "stall_timeout",
    "progress",
    "linux.display",
    "linux.camera_device",
    "linux.audio_source",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["clipcast"]);
        assert!(cli.mode.is_none());
        assert!(cli.resolution.is_none());
        assert!(cli.duration.is_none());
        assert!(cli.output_dir.is_none());
        assert!(!cli.no_progress);
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_parses_selection() {
        let cli = Cli::parse_from(["clipcast", "-m", "4", "-r", "3"]);
        assert_eq!(cli.mode, Some(4));
        assert_eq!(cli.resolution, Some(3));
    }

    #[test]
    fn cli_parses_one_shot_options() {
        let cli = Cli::parse_from([
            "clipcast",
            "-d",
            "1m30s",
            "-o",
            "/tmp/clips",
            "--frame-rate",
            "24",
            "--no-progress",
            "-v",
        ]);
        assert_eq!(cli.duration.as_deref(), Some("1m30s"));
        assert_eq!(cli.output_dir.as_deref(), Some("/tmp/clips"));
        assert_eq!(cli.frame_rate, Some(24));
        assert!(cli.no_progress);
        assert!(cli.verbose);
    }

    #[test]
    fn cli_rejects_non_numeric_mode() {
        assert!(Cli::try_parse_from(["clipcast", "-m", "screen"]).is_err());
    }

    #[test]
    fn cli_parses_catalog_json() {
        let cli = Cli::parse_from(["clipcast", "catalog", "--json"]);
        assert!(matches!(cli.command, Some(Commands::Catalog { json: true })));
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["clipcast", "config", "set", "crf", "23"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "crf");
            assert_eq!(value, "23");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("mode"));
        assert!(is_valid_config_key("stall_timeout"));
        assert!(is_valid_config_key("linux.camera_device"));
        assert!(!is_valid_config_key("resolutions"));
        assert!(!is_valid_config_key("api_key"));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
