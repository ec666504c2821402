use clap::Parser;
use std::process;
use vatsim_datafile::cli::{args::Args, commands};

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("vatsim-datafile - VATSIM Network Status Decoder");
    println!("===============================================");
    println!();
    println!("Decode legacy VATSIM status documents (vatsim-data.txt) into clients,");
    println!("prefiled flight plans and servers, reporting every rejected line.");
    println!();
    println!("USAGE:");
    println!("    vatsim-datafile <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    parse       Decode a data file and print a summary report");
    println!("    sections    List the sections of a data file");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Decode a data file:");
    println!("    vatsim-datafile parse vatsim-data.txt");
    println!();
    println!("    # Show why lines were rejected:");
    println!("    vatsim-datafile parse vatsim-data.txt --show-log --rejected-only");
    println!();
    println!("    # Inspect the section layout:");
    println!("    vatsim-datafile sections vatsim-data.txt --lines");
    println!();
    println!("For detailed help on any command, use:");
    println!("    vatsim-datafile <COMMAND> --help");
}
