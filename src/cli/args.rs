//! Command-line argument definitions for the DSI yearbook extractor
//!
//! Defines the complete CLI interface using the clap derive API. Arguments
//! convert into a validated [`Config`] before any processing starts.

use crate::config::Config;
use crate::constants::DEFAULT_OUTPUT_FILENAME;
use crate::{Error, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the DSI streamflow yearbook extractor
///
/// Extracts normalized station-year flow records from DSI annual streamflow
/// yearbook text dumps into a single CSV dataset.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dsi-extractor",
    version,
    about = "Extract station-year flow records from DSI streamflow yearbook text dumps",
    long_about = "Scans plain-text dumps of DSI (Turkish State Hydraulic Works) annual \
                  streamflow yearbooks, locates the pages of a configured set of gauging \
                  stations, and extracts their monthly flow tables and annual summaries \
                  into one normalized CSV dataset."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Extract station records from yearbook text dumps (default command)
    Extract(ExtractArgs),
    /// List the configured target stations
    Stations(StationsArgs),
}

/// Arguments for the extract command
#[derive(Debug, Clone, Parser)]
pub struct ExtractArgs {
    /// Directory holding yearbook .txt dumps (searched recursively)
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATH",
        default_value = ".",
        help = "Input directory holding yearbook text dumps"
    )]
    pub input_dir: PathBuf,

    /// Output CSV path
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        default_value = DEFAULT_OUTPUT_FILENAME,
        help = "Output CSV file path"
    )]
    pub output_file: PathBuf,

    /// Station codes to extract (comma-separated, e.g. "D22A093,E14A027")
    ///
    /// Defaults to the built-in target set when not given.
    #[arg(
        short = 's',
        long = "stations",
        value_name = "LIST",
        help = "Comma-separated station codes to extract"
    )]
    pub stations: Option<StationList>,

    /// Write partial records to a secondary review CSV
    #[arg(
        long = "review",
        value_name = "PATH",
        help = "Write partial records to a review CSV for manual triage"
    )]
    pub review_file: Option<PathBuf>,

    /// Skip station-years already present in the output file
    #[arg(long = "resume", help = "Resume into an existing output file")]
    pub resume: bool,

    /// Number of concurrent document workers
    #[arg(
        short = 'w',
        long = "workers",
        value_name = "N",
        help = "Concurrent document workers (defaults to the CPU count)"
    )]
    pub workers: Option<usize>,

    /// Disable progress bars
    #[arg(long = "no-progress", help = "Disable progress bars")]
    pub no_progress: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Arguments for the stations command
#[derive(Debug, Clone, Parser)]
pub struct StationsArgs {
    /// Station codes to list instead of the built-in set
    #[arg(short = 's', long = "stations", value_name = "LIST")]
    pub stations: Option<StationList>,
}

/// Comma-separated list of station codes
#[derive(Debug, Clone)]
pub struct StationList(pub Vec<String>);

impl FromStr for StationList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let codes: Vec<String> = s
            .split(',')
            .map(|code| code.trim().to_uppercase())
            .filter(|code| !code.is_empty())
            .collect();
        if codes.is_empty() {
            return Err(Error::configuration("station list is empty"));
        }
        Ok(StationList(codes))
    }
}

impl ExtractArgs {
    /// Log level implied by the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Build and validate the run configuration
    pub fn to_config(&self) -> Result<Config> {
        let mut config = Config::default()
            .with_input_dir(&self.input_dir)
            .with_output_file(&self.output_file);

        if let Some(StationList(codes)) = &self.stations {
            config = config.with_target_stations(codes);
        }
        if let Some(path) = &self.review_file {
            config = config.with_review_file(path);
        }
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if self.resume {
            config = config.with_resume();
        }
        if self.no_progress {
            config = config.without_progress();
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_list_parses_and_normalizes() {
        let list: StationList = "d22a093, e14a027 ,".parse().unwrap();
        assert_eq!(list.0, vec!["D22A093", "E14A027"]);
    }

    #[test]
    fn empty_station_list_is_rejected() {
        assert!(" , ".parse::<StationList>().is_err());
    }

    #[test]
    fn verbosity_flags_map_to_levels() {
        let args = Args::parse_from(["dsi-extractor", "extract", "-vv"]);
        let Some(Commands::Extract(extract)) = args.command else {
            panic!("expected extract command");
        };
        assert_eq!(extract.log_level(), "trace");

        let args = Args::parse_from(["dsi-extractor", "extract", "-q"]);
        let Some(Commands::Extract(extract)) = args.command else {
            panic!("expected extract command");
        };
        assert_eq!(extract.log_level(), "warn");
    }

    #[test]
    fn extract_config_round_trips_flags() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().to_str().unwrap().to_string();
        let output = dir.path().join("out.csv");

        let args = Args::parse_from([
            "dsi-extractor",
            "extract",
            "-i",
            &input,
            "-o",
            output.to_str().unwrap(),
            "-s",
            "D22A093",
            "-w",
            "2",
            "--no-progress",
        ]);
        let Some(Commands::Extract(extract)) = args.command else {
            panic!("expected extract command");
        };

        let config = extract.to_config().unwrap();
        assert_eq!(config.target_stations, vec!["D22A093"]);
        assert_eq!(config.workers, 2);
        assert!(!config.show_progress);
        assert!(config.review_file.is_none());
    }
}
