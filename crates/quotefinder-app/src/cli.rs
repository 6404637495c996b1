//! CLI argument definitions for the quotefinder binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use quotefinder_core::QuoteFinderConfig;

/// Find My Quote: name the movie behind a quote, one match at a time.
#[derive(Parser, Debug)]
#[command(name = "quotefinder", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Override the quote lookup service URL.
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// Override the number of matches read per turn.
    #[arg(long = "page-size")]
    pub page_size: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Look up a quote and print the first page of matches.
    Search {
        /// The quote to look up.
        #[arg(required = true, num_args = 1..)]
        phrase: Vec<String>,
        /// Keep paging until every match has been printed.
        #[arg(long)]
        all: bool,
    },
    /// Hold a multi-turn conversation on stdin.
    Console,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > QUOTEFINDER_CONFIG env var > ~/.quotefinder/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("QUOTEFINDER_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut QuoteFinderConfig) {
        if let Some(ref url) = self.base_url {
            config.lookup.base_url = url.clone();
        }
        if let Some(size) = self.page_size {
            config.paging.page_size = size;
        }
        if let Some(ref level) = self.log_level {
            config.general.log_level = level.clone();
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".quotefinder").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".quotefinder").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        let args = CliArgs::parse_from(["quotefinder", "search", "I'll", "be", "back"]);
        assert_eq!(
            args.command,
            Command::Search {
                phrase: vec!["I'll".into(), "be".into(), "back".into()],
                all: false,
            }
        );
    }

    #[test]
    fn test_parse_search_all_with_overrides() {
        let args = CliArgs::parse_from([
            "quotefinder",
            "--page-size",
            "2",
            "--base-url",
            "http://localhost:8080/search/",
            "-l",
            "debug",
            "search",
            "--all",
            "rosebud",
        ]);
        assert_eq!(args.page_size, Some(2));
        assert!(matches!(args.command, Command::Search { all: true, .. }));

        let mut config = QuoteFinderConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.paging.page_size, 2);
        assert_eq!(config.lookup.base_url, "http://localhost:8080/search/");
        assert_eq!(config.general.log_level, "debug");
    }

    #[test]
    fn test_search_requires_phrase() {
        assert!(CliArgs::try_parse_from(["quotefinder", "search"]).is_err());
    }

    #[test]
    fn test_parse_console() {
        let args = CliArgs::parse_from(["quotefinder", "console"]);
        assert_eq!(args.command, Command::Console);
    }

    #[test]
    fn test_config_flag_wins() {
        let args = CliArgs::parse_from(["quotefinder", "-c", "/tmp/qf.toml", "console"]);
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/qf.toml"));
    }

    #[test]
    fn test_no_overrides_leaves_config() {
        let args = CliArgs::parse_from(["quotefinder", "console"]);
        let mut config = QuoteFinderConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.paging.page_size, 1);
        assert_eq!(config.general.log_level, "info");
    }
}
