//! `page-ruler-replay`: run a scripted gesture scenario against a headless page and print the
//! resulting margins, ruler geometry and document as JSON.
//!
//! ```text
//! page-ruler-replay scenarios/page_margins.json
//! RUST_LOG=page_ruler=trace page-ruler-replay --compact scenarios/paragraph_indent.json
//! ```

mod replay;
mod scenario;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use page_ruler::RulerConfig;

use crate::scenario::Scenario;

#[derive(Parser, Debug)]
#[command(name = "page-ruler-replay", version, about, long_about = None)]
struct Cli {
    /// Scenario file (JSON)
    scenario: PathBuf,

    /// Ruler configuration (JSON); defaults apply to missing fields
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the report on a single line
    #[arg(long)]
    compact: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<RulerConfig> {
    let Some(path) = path else {
        return Ok(RulerConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    RulerConfig::from_json_str(&json).with_context(|| format!("in config {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    let scenario = Scenario::load(&cli.scenario)?;
    tracing::info!(
        path = %cli.scenario.display(),
        steps = scenario.steps.len(),
        "replaying scenario"
    );

    let report = replay::run(&scenario, &config)?;
    let json = if cli.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{json}");
    Ok(())
}
