//! EMG MVC normalization tool
//!
//! - `process`: normalize a raw EMG log against the MVC of a calibration log
//!   and render raw, processed and spectrum plots
//! - `generate`: write a synthetic EMG log for trying the pipeline out

mod commands;
mod csv_renderer;
mod logging;

use clap::{Parser, Subcommand};
use commands::{GenerateArgs, ProcessArgs};

#[derive(Parser)]
#[command(name = "emg-mvc")]
#[command(author, version, about = "EMG MVC normalization and spectrum analysis", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize, rectify and analyze a raw EMG log
    Process(ProcessArgs),

    /// Generate a synthetic EMG log
    Generate(GenerateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    match &cli.command {
        Commands::Process(args) => commands::process(args),
        Commands::Generate(args) => commands::generate(args),
    }
}
