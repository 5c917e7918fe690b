mod commands;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "assembly-line",
    version,
    about = "Replicated discrete-time simulation of a production line"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a batch of replicas and print the summary as JSON
    Run {
        /// Path to a JSON configuration (default: the laptop line preset)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the number of replicas
        #[arg(short, long)]
        replications: Option<u32>,
        /// Override the base seed
        #[arg(long)]
        seed: Option<u64>,
        /// Run one thread per replica
        #[arg(long)]
        parallel: bool,
        /// Print the full report including per-replica results
        #[arg(long)]
        results: bool,
    },
    /// Print the laptop line preset as JSON
    Preset,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level);

    match cli.command {
        Commands::Run {
            config,
            replications,
            seed,
            parallel,
            results,
        } => commands::run::execute(
            config.as_deref(),
            commands::run::Overrides {
                replications,
                seed,
                parallel,
            },
            results,
        ),
        Commands::Preset => commands::preset::execute(),
    }
}
