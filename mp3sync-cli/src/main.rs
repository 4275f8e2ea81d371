use anyhow::Result;
use clap::{Parser, Subcommand};
use mp3sync_cli::commands;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "mp3sync")]
#[command(about = "mp3sync - Frame sync and probing for damaged MPEG audio", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report stream parameters and estimated length
    Probe {
        /// Input file to probe
        #[arg(short, long)]
        input: String,

        /// Byte offset to start probing at
        #[arg(long, default_value = "0")]
        offset: u64,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Walk every frame of a possibly damaged file
    Scan {
        /// Input file to scan
        #[arg(short, long)]
        input: String,

        /// Output JSON file for located frames
        #[arg(short, long)]
        output: Option<String>,

        /// Show statistics only
        #[arg(long)]
        stats_only: bool,
    },

    /// Decode to raw 16-bit little-endian PCM
    Decode {
        /// Input file to decode
        #[arg(short, long)]
        input: String,

        /// Output file for PCM
        #[arg(short, long)]
        output: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Execute command
    match cli.command {
        Commands::Probe {
            input,
            offset,
            json,
        } => commands::probe::execute(&input, offset, json),

        Commands::Scan {
            input,
            output,
            stats_only,
        } => commands::scan::execute(&input, output.as_deref(), stats_only),

        Commands::Decode { input, output } => commands::decode::execute(&input, &output),
    }
}
