use std::time::Instant;

use anyhow::Result;

use crate::cnf::cnf::{Cnf, Lit};
use crate::error::GemError;

use super::{Model, Progress, SatOutcome, SearchHooks};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BruteStats {
    pub checked: u128,
    pub total: u128,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BruteRun {
    pub outcome: SatOutcome,
    pub stats: BruteStats,
}

pub fn solve(cnf: &Cnf, hooks: &mut SearchHooks<'_>) -> Result<BruteRun> {
    let vars = cnf.variables();
    let n = vars.len();
    let total = 1u128
        .checked_shl(n as u32)
        .ok_or(GemError::TooManyVariables {
            engine: "brute_force",
            variables: n,
        })?;

    // clause literals rewritten to positions in `vars`
    let compiled = cnf
        .clauses
        .iter()
        .map(|clause| {
            clause
                .iter()
                .map(|lit| (vars.partition_point(|&v| v < lit.var), lit.sign))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    tracing::info!(vars = n, clauses = cnf.len(), %total, "brute force started");
    let started = Instant::now();
    let mut stats = BruteStats { checked: 0, total };

    for mask in 0..total {
        if hooks.cancel.is_cancelled() {
            tracing::info!(checked = %stats.checked, "brute force cancelled");
            return Ok(BruteRun {
                outcome: SatOutcome::Cancelled,
                stats,
            });
        }
        stats.checked += 1;
        if hooks.due(stats.checked) || (stats.checked == total && hooks.progress_every > 0) {
            hooks.observer.on_progress(&Progress::BruteForce {
                checked: stats.checked,
                total,
                elapsed: started.elapsed(),
            });
        }

        // first variable is the most significant bit
        let bit = |pos: usize| (mask >> (n - 1 - pos)) & 1 == 1;
        let satisfied = compiled
            .iter()
            .all(|clause| clause.iter().any(|&(pos, sign)| bit(pos) == sign));
        if satisfied {
            let lits = vars
                .iter()
                .enumerate()
                .map(|(pos, &v)| Lit::new(v, bit(pos)))
                .collect();
            tracing::info!(checked = %stats.checked, "brute force found a model");
            return Ok(BruteRun {
                outcome: SatOutcome::Sat(Model::from_lits(lits)),
                stats,
            });
        }
    }

    tracing::info!(checked = %stats.checked, "brute force exhausted");
    Ok(BruteRun {
        outcome: SatOutcome::Unsat,
        stats,
    })
}
