mod demo;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use unistate::config::RuntimeConfig;
use unistate::logging::init_tracing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// Debounced type-ahead search
    Search,
    /// Sheet with animated present/dismiss
    Modal,
    /// Drill-down navigation stack
    Stack,
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Run a scripted feature against a store", long_about = None)]
struct Cli {
    /// Scenario to run
    #[arg(short, long, value_enum, default_value_t = Scenario::Search)]
    scenario: Scenario,

    /// TOML runtime config (defaults are used if the file does not exist)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RuntimeConfig::load_from(path)?,
        None => RuntimeConfig::default(),
    };
    tracing::info!(scenario = ?cli.scenario, "Running demo");

    match cli.scenario {
        Scenario::Search => {
            let state = demo::run_search(&config).await?;
            println!(
                "{} result(s) for {:?} after {} search(es)",
                state.results.len(),
                state.query,
                state.searches
            );
            if let Some(at) = state.loaded_at_ms {
                println!("loaded at {} ms", at);
            }
        }
        Scenario::Modal => {
            let state = demo::run_modal(&config).await?;
            println!("confirmed: {:?} ({:?})", state.confirmed, state.sheet.status());
        }
        Scenario::Stack => {
            let state = demo::run_stack(&config).await?;
            println!("depth {}, top {:?}", state.len(), state.top().title);
        }
    }
    Ok(())
}
