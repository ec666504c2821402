//! Command implementations for the data file CLI
//!
//! This module contains the command execution logic, logging setup and the
//! colored summary reports printed for each command.

use crate::app::models::{ClientType, DataFile};
use crate::app::services::datafile_parser::{
    DataFileParser, ParseResult, ParseStats, SectionLineExtractor,
};
use crate::cli::args::{Args, Commands, ParseArgs, SectionsArgs};
use crate::config::ParserConfig;
use anyhow::{Context, Result};
use chrono::Duration;
use colored::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Client counts by effective type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSummary {
    pub pilots_connected: usize,
    pub pilots_prefiled: usize,
    pub atc_connected: usize,
    pub atis: usize,
    /// Records kept without an effective type
    pub unresolved: usize,
    /// Records whose effective type differs from the raw type token
    pub reclassified: usize,
}

impl ClientSummary {
    pub fn from_data_file(data_file: &DataFile) -> Self {
        let mut summary = Self::default();

        for client in &data_file.clients {
            match client.effective_client_type {
                Some(ClientType::PilotConnected) => summary.pilots_connected += 1,
                Some(ClientType::PilotPrefiled) => summary.pilots_prefiled += 1,
                Some(ClientType::AtcConnected) => summary.atc_connected += 1,
                Some(ClientType::Atis) => summary.atis += 1,
                None => summary.unresolved += 1,
            }

            if client.effective_client_type.is_some()
                && client.effective_client_type != client.raw_client_type
            {
                summary.reclassified += 1;
            }
        }

        summary
    }

    pub fn total(&self) -> usize {
        self.pilots_connected
            + self.pilots_prefiled
            + self.atc_connected
            + self.atis
            + self.unresolved
    }
}

/// Main command runner
pub fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Commands::Parse(parse_args)) => {
            setup_logging(parse_args.get_log_level(), parse_args.quiet)?;
            run_parse(&parse_args)
        }
        Some(Commands::Sections(sections_args)) => {
            setup_logging(sections_args.get_log_level(), false)?;
            run_sections(&sections_args)
        }
        None => Ok(()),
    }
}

/// Set up structured logging on stderr
///
/// `RUST_LOG` takes precedence over the level derived from the command line.
pub fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vatsim_datafile={}", log_level)));

    if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .context("Failed to initialize logging")?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .context("Failed to initialize logging")?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Decode the data file named on the command line
pub fn decode(args: &ParseArgs) -> Result<ParseResult> {
    args.validate()?;

    let parser = DataFileParser::new(args.parser_config()?)?;
    parser
        .parse_file_with_stats(&args.file)
        .with_context(|| format!("Failed to decode {}", args.file.display()))
}

/// Decode a data file and print the summary report
pub fn run_parse(args: &ParseArgs) -> Result<()> {
    debug!("Parse arguments: {:?}", args);

    let start_time = Instant::now();
    let result = decode(args)?;
    let elapsed = start_time.elapsed();

    info!("Decoded {} in {:?}", args.file.display(), elapsed);

    print_report(&args.file, &result.data_file, &result.stats);
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        elapsed.as_millis().to_string().bright_white()
    );

    if args.list_clients {
        print_clients(&result.data_file);
    }

    if args.show_log {
        print_log(&result.data_file, args.rejected_only);
    }

    Ok(())
}

/// List the sections of a data file
pub fn run_sections(args: &SectionsArgs) -> Result<()> {
    debug!("Sections arguments: {:?}", args);

    let config = ParserConfig::default().with_max_input_bytes(args.max_input_bytes()?);
    let content = DataFileParser::new(config)?
        .load_file(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let extractor = SectionLineExtractor::new(&content);

    println!(
        "{} {}",
        "Sections of".bright_green().bold(),
        args.file.display()
    );

    if extractor.section_names().is_empty() {
        println!("  {}", "No sections found".bright_yellow());
        return Ok(());
    }

    for name in extractor.section_names() {
        let lines = extractor.relevant_lines(name);
        println!(
            "  {} {} lines",
            format!("{:<16}", name).bright_cyan(),
            lines.len().to_string().bright_white().bold()
        );

        if args.show_lines {
            for line in lines {
                println!("      {}", line);
            }
        }
    }

    Ok(())
}

fn print_report(path: &Path, data_file: &DataFile, stats: &ParseStats) {
    let metadata = &data_file.metadata;
    let clients = ClientSummary::from_data_file(data_file);

    println!("{}", "VATSIM data file".bright_green().bold());
    println!("  {} {}", "File:".bright_cyan(), path.display());
    println!(
        "  {} {}",
        "Format version:".bright_cyan(),
        display_count(metadata.version_format)
    );
    println!(
        "  {} {}",
        "Generated:".bright_cyan(),
        metadata
            .timestamp
            .map_or("unknown".to_string(), |t| t.to_rfc3339())
    );
    println!(
        "  {} {}",
        "Reload interval:".bright_cyan(),
        display_interval(metadata.minimum_data_file_retrieval_interval)
    );
    println!(
        "  {} {}",
        "ATIS interval:".bright_cyan(),
        display_interval(metadata.minimum_atis_retrieval_interval)
    );
    println!(
        "  {} {} clients, {} unique users",
        "Reported:".bright_cyan(),
        display_count(metadata.number_of_connected_clients),
        display_count(metadata.number_of_unique_connected_users)
    );

    println!("\n{}", "Clients".bright_yellow());
    println!(
        "  {} {}",
        "Connected pilots:".bright_cyan(),
        clients.pilots_connected.to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Prefiled flight plans:".bright_cyan(),
        clients.pilots_prefiled.to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Controllers:".bright_cyan(),
        clients.atc_connected.to_string().bright_white().bold()
    );
    if clients.reclassified > 0 {
        println!(
            "  {} {}",
            "Reclassified:".bright_yellow(),
            clients.reclassified.to_string().bright_yellow()
        );
    }
    if clients.unresolved > 0 {
        println!(
            "  {} {}",
            "Unresolved:".bright_red(),
            clients.unresolved.to_string().bright_red().bold()
        );
    }

    println!("\n{}", "Servers".bright_yellow());
    println!(
        "  {} {}",
        "FSD servers:".bright_cyan(),
        data_file.fsd_servers.len().to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Voice servers:".bright_cyan(),
        data_file.voice_servers.len().to_string().bright_white()
    );

    println!("\n{}", "Parsing Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Lines decoded:".bright_cyan(),
        stats.total_accepted().to_string().bright_white()
    );
    if stats.total_rejected() > 0 {
        println!(
            "  {} {}",
            "Lines rejected:".bright_red(),
            stats.total_rejected().to_string().bright_red().bold()
        );
    }
    println!(
        "  {} {:.1}%",
        "Success rate:".bright_cyan(),
        stats.success_rate()
    );
    println!(
        "  {} {}",
        "Log entries:".bright_cyan(),
        data_file.log().len().to_string().bright_white()
    );
}

fn print_clients(data_file: &DataFile) {
    println!("\n{}", "Client List".bright_green().bold());

    for client in &data_file.clients {
        let effective = client
            .effective_client_type
            .map_or("unresolved".to_string(), |t| t.to_string());
        let rating = client
            .controller_rating
            .map_or("-".to_string(), |r| format!("{:?}", r).to_uppercase());

        println!(
            "  {} {} {}",
            format!("{:<12}", client.callsign).bright_white().bold(),
            format!("{:<18}", effective).bright_cyan(),
            rating
        );
    }
}

fn print_log(data_file: &DataFile, rejected_only: bool) {
    println!("\n{}", "Parser Log".bright_green().bold());

    for entry in data_file
        .parser_log_entries()
        .into_iter()
        .filter(|entry| !rejected_only || entry.is_line_rejected)
    {
        if entry.is_line_rejected {
            println!("  {} {}", "rejected".bright_red().bold(), entry);
        } else {
            println!("  {} {}", "note".bright_yellow(), entry);
        }
    }
}

fn display_count(value: i32) -> String {
    if value < 0 {
        "unknown".to_string()
    } else {
        value.to_string()
    }
}

fn display_interval(interval: Option<Duration>) -> String {
    match interval {
        None => "unknown".to_string(),
        Some(interval) if interval.num_seconds() % 60 == 0 => {
            format!("{} min", interval.num_minutes())
        }
        Some(interval) => format!("{} s", interval.num_seconds()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    const GHOST_AND_PREFILE: &str = "!GENERAL:\n\
        VERSION = 9\n\
        !CLIENTS:\n\
        GHOST1:::::51.47:-0.46:0:0:::::::::1200::::::::::::::::::::20180126213000:270:29.92:1013:\n\
        !PREFILE:\n\
        BAW456:1111111:Alex Roe:::::::A320:430:EGLL:36000:LFPG:::::::2:I:1830:0:0:55:2:30:LFPO:/t/:MID UL612:::::::::::\n";

    #[test]
    fn test_client_summary() {
        let data_file = DataFileParser::default().parse(GHOST_AND_PREFILE);
        let summary = ClientSummary::from_data_file(&data_file);

        assert_eq!(
            summary,
            ClientSummary {
                pilots_connected: 1,
                pilots_prefiled: 1,
                reclassified: 1,
                ..Default::default()
            }
        );
        assert_eq!(summary.total(), 2);
    }

    #[test]
    fn test_display_helpers() {
        assert_eq!(display_count(-1), "unknown");
        assert_eq!(display_count(42), "42");
        assert_eq!(display_interval(None), "unknown");
        assert_eq!(display_interval(Some(Duration::minutes(2))), "2 min");
        assert_eq!(display_interval(Some(Duration::seconds(15))), "15 s");
    }

    fn parse_args_for(path: &Path) -> ParseArgs {
        ParseArgs {
            file: path.to_path_buf(),
            show_log: true,
            rejected_only: false,
            list_clients: true,
            max_size_mib: 16,
            min_version: 8,
            max_version: 9,
            verbose: 0,
            quiet: false,
        }
    }

    #[test]
    fn test_run_parse() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(GHOST_AND_PREFILE.as_bytes()).unwrap();

        assert!(run_parse(&parse_args_for(file.path())).is_ok());
        assert!(run_parse(&parse_args_for(Path::new("/nonexistent/vatsim-data.txt"))).is_err());
    }

    #[test]
    fn test_run_parse_reports_invalid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(GHOST_AND_PREFILE.as_bytes()).unwrap();
        file.write_all(b"!SERVERS:\nLATIN:1.2.3.4:M\xfcnchen:Server:1:\n")
            .unwrap();

        let args = parse_args_for(file.path());
        assert!(run_parse(&args).is_ok());

        let result = decode(&args).unwrap();
        let entries = result.data_file.parser_log_entries();
        assert!(entries
            .iter()
            .any(|e| !e.is_line_rejected && e.message.contains("not valid UTF-8")));
        assert_eq!(result.data_file.fsd_servers[0].location, "M\u{fffd}nchen");
    }

    #[test]
    fn test_run_sections() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(GHOST_AND_PREFILE.as_bytes()).unwrap();

        let args = SectionsArgs {
            file: file.path().to_path_buf(),
            show_lines: true,
            max_size_mib: 16,
            verbose: 0,
        };
        assert!(run_sections(&args).is_ok());

        let missing = SectionsArgs {
            file: PathBuf::from("/nonexistent/vatsim-data.txt"),
            show_lines: false,
            max_size_mib: 16,
            verbose: 0,
        };
        assert!(run_sections(&missing).is_err());

        let too_small = SectionsArgs {
            max_size_mib: 0,
            ..args
        };
        assert!(run_sections(&too_small).is_err());
    }
}
