use std::time::Instant;

use crate::cnf::cnf::Cnf;

use super::{CancelToken, Model, Progress, SatOutcome, SearchHooks, Silent};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BacktrackStats {
    pub decisions: u64,
    pub backtracks: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacktrackRun {
    pub outcome: SatOutcome,
    pub stats: BacktrackStats,
}

pub fn solve(cnf: &Cnf, hooks: &mut SearchHooks<'_>) -> BacktrackRun {
    let mut search = Search::new(cnf);
    tracing::info!(
        vars = search.order.len(),
        clauses = cnf.len(),
        "backtracking search started"
    );
    let outcome = search.run(hooks);
    tracing::info!(
        decisions = search.stats.decisions,
        backtracks = search.stats.backtracks,
        sat = matches!(outcome, SatOutcome::Sat(_)),
        cancelled = matches!(outcome, SatOutcome::Cancelled),
        "backtracking search finished"
    );
    BacktrackRun {
        outcome,
        stats: search.stats,
    }
}

pub fn solve_model(cnf: &Cnf) -> Option<Model> {
    let cancel = CancelToken::new();
    let mut silent = Silent;
    let mut hooks = SearchHooks {
        cancel: &cancel,
        observer: &mut silent,
        progress_every: 0,
    };
    match solve(cnf, &mut hooks).outcome {
        SatOutcome::Sat(m) => Some(m),
        SatOutcome::Unsat | SatOutcome::Cancelled => None,
    }
}

pub fn is_sat(cnf: &Cnf) -> bool {
    solve_model(cnf).is_some()
}

// most frequent first, ties by lower id
pub fn decision_order(cnf: &Cnf) -> Vec<u32> {
    let mut counts = vec![0usize; cnf.max_var() as usize + 1];
    for lit in cnf.clauses.iter().flatten() {
        counts[lit.var as usize] += 1;
    }
    let mut order = cnf.variables();
    order.sort_by(|a, b| counts[*b as usize].cmp(&counts[*a as usize]).then(a.cmp(b)));
    order
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    cursor: usize,
    mark: usize,
    value: bool,
}

struct Search<'c> {
    cnf: &'c Cnf,
    order: Vec<u32>,
    assignment: Vec<Option<bool>>,
    trail: Vec<u32>,
    stats: BacktrackStats,
    started: Instant,
}

impl<'c> Search<'c> {
    fn new(cnf: &'c Cnf) -> Self {
        let size = cnf.num_vars.max(cnf.max_var()) as usize + 1;
        Self {
            cnf,
            order: decision_order(cnf),
            assignment: vec![None; size],
            trail: Vec::new(),
            stats: BacktrackStats::default(),
            started: Instant::now(),
        }
    }

    fn run(&mut self, hooks: &mut SearchHooks<'_>) -> SatOutcome {
        if !self.propagate() {
            return SatOutcome::Unsat;
        }

        let mut frames = Vec::<Frame>::new();
        let mut cursor = 0usize;
        'descend: loop {
            cursor = self.next_open(cursor);
            if cursor == self.order.len() {
                return SatOutcome::Sat(Model::from_assignment(&self.order, &self.assignment));
            }
            frames.push(Frame {
                cursor,
                mark: self.trail.len(),
                value: true,
            });

            while let Some(&frame) = frames.last() {
                if !self.begin_decision(hooks) {
                    return SatOutcome::Cancelled;
                }
                self.assign(self.order[frame.cursor], frame.value);
                if self.propagate() {
                    cursor = frame.cursor + 1;
                    continue 'descend;
                }
                if !self.retreat(&mut frames) {
                    return SatOutcome::Unsat;
                }
            }
            return SatOutcome::Unsat;
        }
    }

    fn begin_decision(&mut self, hooks: &mut SearchHooks<'_>) -> bool {
        if hooks.cancel.is_cancelled() {
            return false;
        }
        self.stats.decisions += 1;
        if hooks.due(self.stats.decisions as u128) {
            hooks.observer.on_progress(&Progress::Backtracking {
                decisions: self.stats.decisions,
                backtracks: self.stats.backtracks,
                elapsed: self.started.elapsed(),
            });
        }
        true
    }

    // undo the failed decision on top; false once the root has tried both values
    fn retreat(&mut self, frames: &mut Vec<Frame>) -> bool {
        while let Some(top) = frames.last_mut() {
            self.undo(top.mark);
            self.stats.backtracks += 1;
            if top.value {
                top.value = false;
                return true;
            }
            frames.pop();
        }
        false
    }

    fn next_open(&self, mut cursor: usize) -> usize {
        while cursor < self.order.len() && self.assignment[self.order[cursor] as usize].is_some() {
            cursor += 1;
        }
        cursor
    }

    fn assign(&mut self, var: u32, value: bool) {
        self.assignment[var as usize] = Some(value);
        self.trail.push(var);
    }

    fn undo(&mut self, mark: usize) {
        while self.trail.len() > mark {
            if let Some(var) = self.trail.pop() {
                self.assignment[var as usize] = None;
            }
        }
    }

    fn propagate(&mut self) -> bool {
        let cnf = self.cnf;
        loop {
            let mut changed = false;

            for clause in &cnf.clauses {
                let mut open_count = 0usize;
                let mut last_open = None;
                let mut has_true = false;

                for &lit in clause {
                    match Cnf::eval_lit_partial(lit, &self.assignment) {
                        Some(true) => {
                            has_true = true;
                            break;
                        }
                        Some(false) => {}
                        None => {
                            open_count += 1;
                            last_open = Some(lit);
                        }
                    }
                }

                if has_true {
                    continue;
                }
                match (open_count, last_open) {
                    (0, _) => return false,
                    (1, Some(lit)) => {
                        self.assign(lit.var, lit.sign);
                        changed = true;
                    }
                    _ => {}
                }
            }

            if !changed {
                return true;
            }
        }
    }
}
