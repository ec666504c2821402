//! Command-line argument definitions for the VATSIM data file decoder
//!
//! This module defines the complete CLI interface using clap derive API.

use crate::config::ParserConfig;
use crate::constants::{
    DEFAULT_MAX_INPUT_BYTES, SUPPORTED_FORMAT_VERSION_MAX, SUPPORTED_FORMAT_VERSION_MIN,
};
use crate::{Error, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

const BYTES_PER_MIB: u64 = 1024 * 1024;

/// CLI arguments for the VATSIM data file decoder
///
/// Decodes legacy `vatsim-data.txt` network status documents and reports what
/// was found and which lines had to be rejected.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "vatsim-datafile",
    version,
    about = "Decode legacy VATSIM network status data files",
    long_about = "Decodes legacy VATSIM status documents (vatsim-data.txt, format versions 8 and 9) \
                  into clients, prefiled flight plans, FSD servers and voice servers. Malformed lines \
                  never abort decoding; they are reported in the parser log instead."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Decode a data file and print a summary report
    Parse(ParseArgs),
    /// List the sections of a data file with their line counts
    Sections(SectionsArgs),
}

/// Arguments for the parse command
#[derive(Debug, Clone, Parser)]
pub struct ParseArgs {
    /// Path to the data file
    #[arg(value_name = "FILE", help = "Path to the vatsim-data.txt file")]
    pub file: PathBuf,

    /// Print every parser log entry after the summary
    #[arg(long = "show-log", help = "Print all parser log entries")]
    pub show_log: bool,

    /// Restrict the printed log to rejected lines
    #[arg(
        long = "rejected-only",
        requires = "show_log",
        help = "Only print log entries for rejected lines"
    )]
    pub rejected_only: bool,

    /// List every decoded client with its effective type
    #[arg(long = "clients", help = "List all decoded clients")]
    pub list_clients: bool,

    /// Largest file accepted, in MiB
    #[arg(
        long = "max-size",
        value_name = "MIB",
        default_value_t = DEFAULT_MAX_INPUT_BYTES / BYTES_PER_MIB,
        help = "Maximum input file size in MiB"
    )]
    pub max_size_mib: u64,

    /// Lowest format version decoded without a warning
    #[arg(
        long = "min-version",
        value_name = "VERSION",
        default_value_t = SUPPORTED_FORMAT_VERSION_MIN,
        help = "Lowest supported format version"
    )]
    pub min_version: i32,

    /// Highest format version decoded without a warning
    #[arg(
        long = "max-version",
        value_name = "VERSION",
        default_value_t = SUPPORTED_FORMAT_VERSION_MAX,
        help = "Highest supported format version"
    )]
    pub max_version: i32,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress logging except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the sections command
#[derive(Debug, Clone, Parser)]
pub struct SectionsArgs {
    /// Path to the data file
    #[arg(value_name = "FILE", help = "Path to the vatsim-data.txt file")]
    pub file: PathBuf,

    /// Print the content lines of every section
    #[arg(long = "lines", help = "Print the content lines of each section")]
    pub show_lines: bool,

    /// Largest file accepted, in MiB
    #[arg(
        long = "max-size",
        value_name = "MIB",
        default_value_t = DEFAULT_MAX_INPUT_BYTES / BYTES_PER_MIB,
        help = "Maximum input file size in MiB"
    )]
    pub max_size_mib: u64,

    /// Enable verbose logging output
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Enable verbose logging (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

impl ParseArgs {
    /// Validate the parse command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.file.is_file() {
            return Err(Error::configuration(format!(
                "Data file does not exist: {}",
                self.file.display()
            )));
        }

        self.parser_config().map(|_| ())
    }

    /// Build the parser configuration from the command line
    pub fn parser_config(&self) -> Result<ParserConfig> {
        let max_input_bytes = mib_to_bytes(self.max_size_mib)?;

        let config = ParserConfig::default()
            .with_format_versions(self.min_version..=self.max_version)
            .with_max_input_bytes(max_input_bytes);
        config.validate()?;

        Ok(config)
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            verbosity_level(self.verbose)
        }
    }
}

impl SectionsArgs {
    /// Size limit in bytes for the file being listed
    pub fn max_input_bytes(&self) -> Result<u64> {
        mib_to_bytes(self.max_size_mib)
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        verbosity_level(self.verbose)
    }
}

fn mib_to_bytes(mib: u64) -> Result<u64> {
    mib.checked_mul(BYTES_PER_MIB).ok_or_else(|| {
        Error::configuration(format!("Maximum size of {} MiB is too large", mib))
    })
}

fn verbosity_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn parse_args(argv: &[&str]) -> ParseArgs {
        match Args::try_parse_from(argv).unwrap().command {
            Some(Commands::Parse(args)) => args,
            other => panic!("expected parse command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_defaults() {
        let args = parse_args(&["vatsim-datafile", "parse", "vatsim-data.txt"]);

        assert_eq!(args.file, PathBuf::from("vatsim-data.txt"));
        assert!(!args.show_log);
        assert_eq!(args.max_size_mib, 16);
        assert_eq!(args.min_version, 8);
        assert_eq!(args.max_version, 9);

        let config = args.parser_config().unwrap();
        assert_eq!(config.max_input_bytes, DEFAULT_MAX_INPUT_BYTES);
        assert_eq!(config.supported_format_versions(), 8..=9);
    }

    #[test]
    fn test_rejected_only_requires_show_log() {
        assert!(Args::try_parse_from(["vatsim-datafile", "parse", "f", "--rejected-only"]).is_err());

        let args = parse_args(&["vatsim-datafile", "parse", "f", "--show-log", "--rejected-only"]);
        assert!(args.rejected_only);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["vatsim-datafile", "parse", "f", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_no_subcommand() {
        let args = Args::try_parse_from(["vatsim-datafile"]).unwrap();
        assert!(args.command.is_none());
    }

    #[test]
    fn test_log_level() {
        let mut args = parse_args(&["vatsim-datafile", "parse", "f"]);
        assert_eq!(args.get_log_level(), "warn");

        args.verbose = 2;
        assert_eq!(args.get_log_level(), "debug");

        args.quiet = true;
        assert_eq!(args.get_log_level(), "error");

        let sections = SectionsArgs {
            file: PathBuf::from("f"),
            show_lines: false,
            max_size_mib: 2,
            verbose: 5,
        };
        assert_eq!(sections.get_log_level(), "trace");
        assert_eq!(sections.max_input_bytes().unwrap(), 2 * 1024 * 1024);
    }

    #[test]
    fn test_sections_max_size() {
        let args = Args::try_parse_from(["vatsim-datafile", "sections", "f", "--max-size", "4"]).unwrap();
        match args.command {
            Some(Commands::Sections(sections)) => {
                assert_eq!(sections.max_size_mib, 4);
                assert_eq!(sections.max_input_bytes().unwrap(), 4 * 1024 * 1024);
            }
            other => panic!("expected sections command, got {:?}", other),
        }

        let defaults = Args::try_parse_from(["vatsim-datafile", "sections", "f"]).unwrap();
        match defaults.command {
            Some(Commands::Sections(sections)) => assert_eq!(sections.max_size_mib, 16),
            other => panic!("expected sections command, got {:?}", other),
        }

        let overflow = SectionsArgs {
            file: PathBuf::from("f"),
            show_lines: false,
            max_size_mib: u64::MAX,
            verbose: 0,
        };
        assert!(overflow.max_input_bytes().is_err());
    }

    #[test]
    fn test_validate() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().to_string();

        let args = parse_args(&["vatsim-datafile", "parse", path.as_str()]);
        assert!(args.validate().is_ok());

        let missing = parse_args(&["vatsim-datafile", "parse", "/nonexistent/vatsim-data.txt"]);
        assert!(missing.validate().is_err());

        let inverted = parse_args(&[
            "vatsim-datafile",
            "parse",
            path.as_str(),
            "--min-version",
            "9",
            "--max-version",
            "8",
        ]);
        assert!(matches!(inverted.validate(), Err(Error::Configuration { .. })));

        let zero = parse_args(&["vatsim-datafile", "parse", path.as_str(), "--max-size", "0"]);
        assert!(zero.validate().is_err());
    }
}
