//! Craftopt CLI - simulate crafting rotations and search for better ones.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Craftopt - a crafting rotation simulator and optimizer
#[derive(Parser, Debug)]
#[command(name = "craftopt")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate the settings sequence (expected value and Monte Carlo)
    Simulate {
        /// Settings file (JSON)
        #[arg(required = true)]
        settings: PathBuf,

        /// Random seed (default: settings seed, else random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Monte Carlo runs (default: maxMontecarloRuns from settings)
        #[arg(short, long)]
        runs: Option<usize>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Search variable-length sequences, seeded from the settings sequence
    Solve {
        /// Settings file (JSON)
        #[arg(required = true)]
        settings: PathBuf,

        /// Random seed (default: settings seed, else random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Search fixed-length sequences with the genetic algorithm
    Ga {
        /// Settings file (JSON)
        #[arg(required = true)]
        settings: PathBuf,

        /// Random seed (default: settings seed, else random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Sequence length (default: 20)
        #[arg(short, long)]
        length: Option<usize>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// List the action catalog
    Actions {
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let result = match args.command {
        Commands::Simulate {
            settings,
            seed,
            runs,
            format,
        } => cli::simulate::execute(settings, seed, runs, format),

        Commands::Solve {
            settings,
            seed,
            format,
            progress,
        } => cli::solve::execute(settings, seed, format, progress),

        Commands::Ga {
            settings,
            seed,
            length,
            format,
            progress,
        } => cli::ga::execute(settings, seed, length, format, progress),

        Commands::Actions { format } => cli::actions::execute(format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
