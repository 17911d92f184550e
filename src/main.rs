use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gemhunter::cnf::dimacs::to_dimacs;
use gemhunter::cnf::{Strategy, encode_grid};
use gemhunter::compare::{CompareConfig, run_matrix, write_csv};
use gemhunter::grid::generate::{GenOptions, generate};
use gemhunter::grid::text::{load_grid, save_grid};
use gemhunter::hunter::{HuntOptions, HuntReport, HuntStatus, hunt};
use gemhunter::sat::{CancelToken, Progress};
use gemhunter::solver::{Engine, EngineStats};

#[derive(Debug, Parser)]
#[command(name = "gemhunter")]
#[command(about = "Infer traps and gems on a hint grid via CNF encoding")]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    Solve {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short = 'c', long = "cnf", default_value = "cardinality")]
        strategy: String,
        #[arg(short = 's', long = "solver", default_value = "backtracking")]
        engine: String,
        #[arg(long, default_value_t = 1000)]
        progress_every: u64,
        #[arg(long = "timeout_ms")]
        timeout_ms: Option<u64>,
    },
    Cnf {
        input: PathBuf,
        #[arg(short = 'c', long = "cnf", default_value = "cardinality")]
        strategy: String,
        #[arg(long)]
        emit: PathBuf,
    },
    Gen {
        #[arg(long)]
        rows: usize,
        #[arg(long)]
        cols: usize,
        #[arg(long, default_value_t = 0.2)]
        density: f64,
        #[arg(long, default_value_t = 0.5)]
        reveal: f64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        solution: Option<PathBuf>,
    },
    Compare {
        input: PathBuf,
        #[arg(long = "timeout_ms", default_value_t = 300_000)]
        timeout_ms: u64,
        #[arg(long, default_value_t = 3)]
        repeat: usize,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Cmd::Solve {
            input,
            output,
            strategy,
            engine,
            progress_every,
            timeout_ms,
        } => solve_cmd(&input, output, &strategy, &engine, progress_every, timeout_ms)?,
        Cmd::Cnf {
            input,
            strategy,
            emit,
        } => cnf_cmd(&input, &strategy, &emit)?,
        Cmd::Gen {
            rows,
            cols,
            density,
            reveal,
            seed,
            out,
            solution,
        } => gen_cmd(
            GenOptions {
                rows,
                cols,
                trap_density: density,
                reveal_ratio: reveal,
                seed,
            },
            &out,
            solution.as_deref(),
        )?,
        Cmd::Compare {
            input,
            timeout_ms,
            repeat,
            csv,
        } => compare_cmd(&input, timeout_ms, repeat, csv.as_deref())?,
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn solve_cmd(
    input: &Path,
    output: Option<PathBuf>,
    strategy: &str,
    engine: &str,
    progress_every: u64,
    timeout_ms: Option<u64>,
) -> Result<()> {
    // reject bad identifiers before touching the grid
    let strategy = strategy.parse::<Strategy>()?;
    let engine = engine.parse::<Engine>()?;
    let grid = load_grid(input)?;
    tracing::debug!("loaded grid from {}:\n{}", input.display(), grid);

    let cancel = CancelToken::new();
    if let Some(ms) = timeout_ms {
        let token = cancel.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(ms));
            token.cancel();
        });
    }

    let mut observer = |p: &Progress| match *p {
        Progress::Backtracking {
            decisions,
            backtracks,
            elapsed,
        } => tracing::info!(decisions, backtracks, ?elapsed, "backtracking progress"),
        Progress::BruteForce {
            checked,
            total,
            elapsed,
        } => tracing::info!(%checked, %total, ?elapsed, "brute force progress"),
    };
    let report = hunt(
        &grid,
        &HuntOptions {
            strategy,
            engine,
            progress_every,
        },
        &cancel,
        &mut observer,
    )?;

    let output = output.unwrap_or_else(|| default_output(input, strategy, engine));
    print_report(&report);
    if let Some(result) = &report.grid {
        save_grid(&output, result)?;
        println!("solution saved to {}", output.display());
        println!("{}", result);
    }
    Ok(())
}

fn default_output(input: &Path, strategy: Strategy, engine: Engine) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().replace("input", "output"))
        .unwrap_or_else(|| "output.txt".to_string());
    Path::new("results").join(format!("{}_{}_{}", strategy, engine, name))
}

fn print_report(report: &HuntReport) {
    let stats = &report.stats;
    match report.status {
        HuntStatus::Satisfied => println!(
            "SOLVED with {} strategy and {} engine",
            report.strategy, report.engine
        ),
        HuntStatus::Unsatisfiable => println!(
            "UNSATISFIABLE with {} strategy and {} engine",
            report.strategy, report.engine
        ),
        HuntStatus::Cancelled => println!(
            "CANCELLED with {} strategy and {} engine",
            report.strategy, report.engine
        ),
    }
    println!("clauses={} variables={}", stats.clauses, stats.variables);
    println!(
        "generation_s={:.6} solving_s={:.6} total_s={:.6}",
        stats.generation.as_secs_f64(),
        stats.solving.as_secs_f64(),
        stats.total.as_secs_f64()
    );
    match stats.engine {
        EngineStats::Backtracking {
            decisions,
            backtracks,
        } => println!("decisions={} backtracks={}", decisions, backtracks),
        EngineStats::BruteForce { checked, total } => {
            println!("checked={} total={}", checked, total)
        }
        EngineStats::External => {}
    }
}

fn cnf_cmd(input: &Path, strategy: &str, emit: &Path) -> Result<()> {
    let strategy = strategy.parse::<Strategy>()?;
    let grid = load_grid(input)?;
    let cnf = encode_grid(&grid, strategy);
    std::fs::write(emit, to_dimacs(&cnf))
        .with_context(|| format!("failed to write {}", emit.display()))?;
    println!(
        "strategy={} vars={} clauses={}",
        strategy,
        cnf.num_vars,
        cnf.len()
    );
    Ok(())
}

fn gen_cmd(opts: GenOptions, out: &Path, solution: Option<&Path>) -> Result<()> {
    let planted = generate(&opts)?;
    save_grid(out, &planted.puzzle)?;
    if let Some(path) = solution {
        save_grid(path, &planted.solution)?;
    }
    println!(
        "GEN: wrote {} | {}x{} seed={}",
        out.display(),
        opts.rows,
        opts.cols,
        opts.seed
    );
    Ok(())
}

fn compare_cmd(input: &Path, timeout_ms: u64, repeat: usize, csv: Option<&Path>) -> Result<()> {
    let grid = load_grid(input)?;
    let cfg = CompareConfig {
        timeout: Duration::from_millis(timeout_ms),
        repeat,
        ..CompareConfig::default()
    };
    let label = input.to_string_lossy().to_string();
    let rows = run_matrix(&label, &grid, &cfg);
    match csv {
        Some(path) => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_csv(&mut file, &rows)?;
            println!("rows={} csv={}", rows.len(), path.display());
        }
        None => write_csv(&mut std::io::stdout().lock(), &rows)?,
    }
    Ok(())
}
