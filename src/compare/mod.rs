use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::cnf::Strategy;
use crate::grid::Grid;
use crate::grid::text::load_grid;
use crate::hunter::{HuntOptions, HuntReport, HuntStatus, hunt};
use crate::sat::{CancelToken, Silent};
use crate::solver::{Engine, EngineStats};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareConfig {
    pub strategies: Vec<Strategy>,
    pub engines: Vec<Engine>,
    pub timeout: Duration,
    // timings are averaged over this many runs per pair
    pub repeat: usize,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            strategies: Strategy::ALL.to_vec(),
            engines: Engine::ALL.to_vec(),
            timeout: Duration::from_secs(300),
            repeat: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareRow {
    pub grid: String,
    pub size: String,
    pub strategy: Strategy,
    pub engine: Engine,
    pub status: String,
    pub clauses: Option<usize>,
    pub variables: Option<usize>,
    pub generation_us: Option<u128>,
    pub solving_us: Option<u128>,
    pub decisions: Option<u64>,
    pub backtracks: Option<u64>,
    pub checked: Option<u128>,
    pub total: Option<u128>,
}

impl CompareRow {
    pub fn csv_header() -> &'static str {
        "grid,size,strategy,engine,status,clauses,variables,generation_us,solving_us,decisions,backtracks,checked,total"
    }

    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{}",
            esc_csv(&self.grid),
            self.size,
            self.strategy,
            self.engine,
            self.status,
            opt(self.clauses),
            opt(self.variables),
            opt(self.generation_us),
            opt(self.solving_us),
            opt(self.decisions),
            opt(self.backtracks),
            opt(self.checked),
            opt(self.total),
        )
    }

    fn empty(label: &str, grid: &Grid, strategy: Strategy, engine: Engine, status: &str) -> Self {
        Self {
            grid: label.to_string(),
            size: format!("{}x{}", grid.rows(), grid.cols()),
            strategy,
            engine,
            status: status.to_string(),
            clauses: None,
            variables: None,
            generation_us: None,
            solving_us: None,
            decisions: None,
            backtracks: None,
            checked: None,
            total: None,
        }
    }

    fn from_report(label: &str, grid: &Grid, report: &HuntReport) -> Self {
        let status = match report.status {
            HuntStatus::Satisfied => "sat",
            HuntStatus::Unsatisfiable => "unsat",
            HuntStatus::Cancelled => "cancelled",
        };
        let mut row = Self::empty(label, grid, report.strategy, report.engine, status);
        row.clauses = Some(report.stats.clauses);
        row.variables = Some(report.stats.variables);
        row.generation_us = Some(report.stats.generation.as_micros());
        row.solving_us = Some(report.stats.solving.as_micros());
        match report.stats.engine {
            EngineStats::Backtracking {
                decisions,
                backtracks,
            } => {
                row.decisions = Some(decisions);
                row.backtracks = Some(backtracks);
            }
            EngineStats::BruteForce { checked, total } => {
                row.checked = Some(checked);
                row.total = Some(total);
            }
            EngineStats::External => {}
        }
        row
    }
}

// workers abandoned at a deadline; the external engine cannot be interrupted
#[derive(Debug, Default)]
pub struct Stragglers {
    handles: Vec<JoinHandle<()>>,
}

impl Stragglers {
    fn push(&mut self, handle: JoinHandle<()>) {
        self.handles.push(handle);
    }

    // drops finished workers and returns how many are still running
    pub fn outstanding(&mut self) -> usize {
        self.handles.retain(|h| !h.is_finished());
        self.handles.len()
    }

    pub fn join_all(self) {
        for handle in self.handles {
            let _ = handle.join();
        }
    }
}

enum Attempt {
    Done(Box<HuntReport>),
    Failed(String),
    TimedOut,
}

fn run_timed(
    grid: &Grid,
    opts: HuntOptions,
    timeout: Duration,
    stragglers: &mut Stragglers,
) -> Attempt {
    let cancel = CancelToken::new();
    let (tx, rx) = mpsc::channel();
    let owned = grid.clone();
    let token = cancel.clone();

    let handle = std::thread::spawn(move || {
        let mut silent = Silent;
        let report = hunt(&owned, &opts, &token, &mut silent);
        let _ = tx.send(report.map_err(|e| format!("{:#}", e)));
    });

    match rx.recv_timeout(timeout) {
        Ok(Ok(report)) => {
            let _ = handle.join();
            Attempt::Done(Box::new(report))
        }
        Ok(Err(msg)) => {
            let _ = handle.join();
            Attempt::Failed(msg)
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            cancel.cancel();
            stragglers.push(handle);
            Attempt::TimedOut
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            let _ = handle.join();
            Attempt::Failed("worker exited without a report".to_string())
        }
    }
}

pub fn run_one(
    label: &str,
    grid: &Grid,
    strategy: Strategy,
    engine: Engine,
    cfg: &CompareConfig,
    stragglers: &mut Stragglers,
) -> CompareRow {
    let opts = HuntOptions {
        strategy,
        engine,
        progress_every: 0,
    };
    let repeat = cfg.repeat.max(1);
    let mut reports = Vec::with_capacity(repeat);

    for _ in 0..repeat {
        match run_timed(grid, opts, cfg.timeout, stragglers) {
            Attempt::Done(report) => reports.push(*report),
            Attempt::Failed(msg) => {
                tracing::warn!(grid = label, %strategy, %engine, error = %msg, "run failed");
                return CompareRow::empty(label, grid, strategy, engine, "error");
            }
            Attempt::TimedOut => {
                tracing::warn!(grid = label, %strategy, %engine, timeout = ?cfg.timeout, "run timed out");
                return CompareRow::empty(label, grid, strategy, engine, "timeout");
            }
        }
    }

    let Some(last) = reports.last() else {
        return CompareRow::empty(label, grid, strategy, engine, "error");
    };
    let mut row = CompareRow::from_report(label, grid, last);
    let runs = reports.len() as u128;
    row.generation_us = Some(
        reports
            .iter()
            .map(|r| r.stats.generation.as_micros())
            .sum::<u128>()
            / runs,
    );
    row.solving_us = Some(
        reports
            .iter()
            .map(|r| r.stats.solving.as_micros())
            .sum::<u128>()
            / runs,
    );
    row
}

pub fn run_matrix_with(
    label: &str,
    grid: &Grid,
    cfg: &CompareConfig,
    stragglers: &mut Stragglers,
) -> Vec<CompareRow> {
    let mut rows = Vec::with_capacity(cfg.strategies.len() * cfg.engines.len());
    for &strategy in &cfg.strategies {
        for &engine in &cfg.engines {
            rows.push(run_one(label, grid, strategy, engine, cfg, stragglers));
        }
    }
    rows
}

pub fn run_matrix(label: &str, grid: &Grid, cfg: &CompareConfig) -> Vec<CompareRow> {
    let mut stragglers = Stragglers::default();
    let rows = run_matrix_with(label, grid, cfg, &mut stragglers);
    let outstanding = stragglers.outstanding();
    if outstanding > 0 {
        tracing::warn!(grid = label, outstanding, "timed out workers still running");
    }
    rows
}

pub fn write_csv<W: Write>(w: &mut W, rows: &[CompareRow]) -> std::io::Result<()> {
    writeln!(w, "{}", CompareRow::csv_header())?;
    for row in rows {
        writeln!(w, "{}", row.to_csv_line())?;
    }
    Ok(())
}

pub fn run_dataset(
    dir: &Path,
    cfg: &CompareConfig,
    csv_path: &Path,
    progress: bool,
) -> Result<Vec<CompareRow>> {
    let paths = discover_grids(dir)
        .with_context(|| format!("failed to list grids under {}", dir.display()))?;
    let mut csv = File::create(csv_path)
        .with_context(|| format!("failed to create {}", csv_path.display()))?;
    writeln!(csv, "{}", CompareRow::csv_header())?;
    csv.flush()?;

    let mut stragglers = Stragglers::default();
    let mut rows = Vec::new();
    for path in paths {
        let label = path.to_string_lossy().to_string();
        let grid = match load_grid(&path) {
            Ok(g) => g,
            Err(e) => {
                tracing::warn!(grid = %label, error = %format!("{:#}", e), "skipping grid");
                continue;
            }
        };
        let outstanding = stragglers.outstanding();
        if outstanding > 0 {
            tracing::warn!(grid = %label, outstanding, "timed out workers still running");
        }
        for row in run_matrix_with(&label, &grid, cfg, &mut stragglers) {
            if progress {
                println!(
                    "grid={} strategy={} engine={} status={} solving_us={}",
                    row.grid,
                    row.strategy,
                    row.engine,
                    row.status,
                    opt(row.solving_us)
                );
            }
            writeln!(csv, "{}", row.to_csv_line())?;
            csv.flush()?;
            rows.push(row);
        }
    }

    let outstanding = stragglers.outstanding();
    if outstanding > 0 {
        tracing::info!(outstanding, "waiting for timed out workers");
    }
    stragglers.join_all();
    Ok(rows)
}

fn discover_grids(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut out = Vec::<PathBuf>::new();
    collect_grids(dir, &mut out)?;
    out.sort();
    Ok(out)
}

fn collect_grids(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let p = entry.path();
        if p.is_dir() {
            collect_grids(&p, out)?;
            continue;
        }
        if p.extension().and_then(|x| x.to_str()) == Some("txt") {
            out.push(p);
        }
    }
    Ok(())
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

fn esc_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
