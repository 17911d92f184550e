pub mod backtrack;
pub mod brute;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::cnf::cnf::{Cnf, Lit};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatOutcome {
    Sat(Model),
    Unsat,
    Cancelled,
}

impl SatOutcome {
    pub fn model(&self) -> Option<&Model> {
        match self {
            SatOutcome::Sat(m) => Some(m),
            _ => None,
        }
    }
}

/// One literal per variable that occurs in the clause set, ascending by variable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    lits: Vec<Lit>,
}

impl Model {
    pub fn from_lits(mut lits: Vec<Lit>) -> Self {
        lits.sort_unstable();
        lits.dedup_by_key(|lit| lit.var);
        Self { lits }
    }

    pub fn from_assignment(vars: &[u32], assignment: &[Option<bool>]) -> Self {
        let lits = vars
            .iter()
            .filter_map(|&v| assignment.get(v as usize).copied().flatten().map(|b| Lit::new(v, b)))
            .collect();
        Self::from_lits(lits)
    }

    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    pub fn len(&self) -> usize {
        self.lits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    pub fn value(&self, var: u32) -> Option<bool> {
        self.lits
            .binary_search_by_key(&var, |lit| lit.var)
            .ok()
            .map(|idx| self.lits[idx].sign)
    }

    pub fn satisfies(&self, cnf: &Cnf) -> bool {
        cnf.clauses.iter().all(|clause| {
            clause
                .iter()
                .any(|&lit| self.value(lit.var).is_some_and(|v| lit.eval(v)))
        })
    }
}

/// Shared abort flag, polled by the engines between decisions.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Backtracking {
        decisions: u64,
        backtracks: u64,
        elapsed: Duration,
    },
    BruteForce {
        checked: u128,
        total: u128,
        elapsed: Duration,
    },
}

pub trait SearchObserver {
    fn on_progress(&mut self, progress: &Progress);
}

impl<F: FnMut(&Progress)> SearchObserver for F {
    fn on_progress(&mut self, progress: &Progress) {
        self(progress)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl SearchObserver for Silent {
    fn on_progress(&mut self, _progress: &Progress) {}
}

pub struct SearchHooks<'a> {
    pub cancel: &'a CancelToken,
    pub observer: &'a mut dyn SearchObserver,
    // 0 disables progress callbacks
    pub progress_every: u64,
}

impl SearchHooks<'_> {
    pub(crate) fn due(&self, count: u128) -> bool {
        self.progress_every > 0 && count % self.progress_every as u128 == 0
    }
}
