use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::cnf::{Strategy, encode_grid};
use crate::grid::Grid;
use crate::project::project_model;
use crate::sat::{CancelToken, SatOutcome, SearchHooks, SearchObserver, Silent};
use crate::solver::{Engine, EngineStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuntOptions {
    pub strategy: Strategy,
    pub engine: Engine,
    pub progress_every: u64,
}

impl Default for HuntOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::Cardinality,
            engine: Engine::Backtracking,
            progress_every: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuntStatus {
    Satisfied,
    Unsatisfiable,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuntStats {
    pub clauses: usize,
    pub variables: usize,
    pub generation: Duration,
    pub solving: Duration,
    pub total: Duration,
    pub engine: EngineStats,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuntReport {
    pub strategy: Strategy,
    pub engine: Engine,
    pub status: HuntStatus,
    pub grid: Option<Grid>,
    pub stats: HuntStats,
}

impl HuntReport {
    pub fn success(&self) -> bool {
        self.status == HuntStatus::Satisfied
    }
}

pub fn hunt(
    grid: &Grid,
    opts: &HuntOptions,
    cancel: &CancelToken,
    observer: &mut dyn SearchObserver,
) -> Result<HuntReport> {
    let started = Instant::now();
    let cnf = encode_grid(grid, opts.strategy);
    let generation = started.elapsed();
    let variables = cnf.variables().len();

    let solve_started = Instant::now();
    let mut hooks = SearchHooks {
        cancel,
        observer,
        progress_every: opts.progress_every,
    };
    let run = opts.engine.solve(&cnf, &mut hooks).with_context(|| {
        format!(
            "{} engine failed on {} clauses over {} variables ({} strategy, {}x{} grid)",
            opts.engine,
            cnf.len(),
            variables,
            opts.strategy,
            grid.rows(),
            grid.cols()
        )
    })?;
    let solving = solve_started.elapsed();

    let (status, result) = match &run.outcome {
        SatOutcome::Sat(model) => (HuntStatus::Satisfied, Some(project_model(grid, model))),
        SatOutcome::Unsat => (HuntStatus::Unsatisfiable, None),
        SatOutcome::Cancelled => (HuntStatus::Cancelled, None),
    };

    tracing::info!(
        strategy = opts.strategy.name(),
        engine = opts.engine.name(),
        status = ?status,
        clauses = cnf.len(),
        variables,
        generation_us = generation.as_micros() as u64,
        solving_us = solving.as_micros() as u64,
        "hunt finished"
    );

    Ok(HuntReport {
        strategy: opts.strategy,
        engine: opts.engine,
        status,
        grid: result,
        stats: HuntStats {
            clauses: cnf.len(),
            variables,
            generation,
            solving,
            total: started.elapsed(),
            engine: run.stats,
        },
    })
}

pub fn hunt_quiet(grid: &Grid, opts: &HuntOptions) -> Result<HuntReport> {
    let cancel = CancelToken::new();
    let mut silent = Silent;
    hunt(grid, opts, &cancel, &mut silent)
}
