use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gemhunter::cnf::Strategy;
use gemhunter::compare::{CompareConfig, run_dataset};
use gemhunter::solver::Engine;

#[derive(Debug, Parser)]
#[command(name = "compare_all")]
struct Cli {
    #[arg(long)]
    dir: String,
    #[arg(long, default_value = "truth_table,cardinality")]
    strategies: String,
    #[arg(long, default_value = "brute_force,backtracking,external_library")]
    engines: String,
    #[arg(long = "timeout_ms", default_value_t = 300_000)]
    timeout_ms: u64,
    #[arg(long, default_value_t = 3)]
    repeat: usize,
    #[arg(long)]
    csv: String,
    #[arg(long, default_value_t = false)]
    progress: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    run_from_args(&cli)
}

fn run_from_args(cli: &Cli) -> Result<()> {
    let cfg = CompareConfig {
        strategies: parse_list::<Strategy>(&cli.strategies)?,
        engines: parse_list::<Engine>(&cli.engines)?,
        timeout: Duration::from_millis(cli.timeout_ms),
        repeat: cli.repeat,
    };
    let rows = run_dataset(
        &PathBuf::from(&cli.dir),
        &cfg,
        &PathBuf::from(&cli.csv),
        cli.progress,
    )?;
    println!("rows={}", rows.len());
    Ok(())
}

fn parse_list<T>(s: &str) -> Result<Vec<T>>
where
    T: std::str::FromStr<Err = gemhunter::GemError>,
{
    s.split(',')
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .map(|x| x.parse::<T>().map_err(anyhow::Error::from))
        .collect()
}
