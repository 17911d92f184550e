pub mod varisat;

use std::fmt;
use std::str::FromStr;

use anyhow::Result;

use crate::cnf::cnf::Cnf;
use crate::error::GemError;
use crate::sat::{SatOutcome, SearchHooks, backtrack, brute};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Engine {
    BruteForce,
    #[default]
    Backtracking,
    ExternalLibrary,
}

impl Engine {
    pub const ALL: [Engine; 3] = [Engine::BruteForce, Engine::Backtracking, Engine::ExternalLibrary];

    pub fn name(self) -> &'static str {
        match self {
            Engine::BruteForce => "brute_force",
            Engine::Backtracking => "backtracking",
            Engine::ExternalLibrary => "external_library",
        }
    }

    pub fn solve(self, cnf: &Cnf, hooks: &mut SearchHooks<'_>) -> Result<EngineRun> {
        match self {
            Engine::Backtracking => {
                let run = backtrack::solve(cnf, hooks);
                Ok(EngineRun {
                    outcome: run.outcome,
                    stats: EngineStats::Backtracking {
                        decisions: run.stats.decisions,
                        backtracks: run.stats.backtracks,
                    },
                })
            }
            Engine::BruteForce => {
                let run = brute::solve(cnf, hooks)?;
                Ok(EngineRun {
                    outcome: run.outcome,
                    stats: EngineStats::BruteForce {
                        checked: run.stats.checked,
                        total: run.stats.total,
                    },
                })
            }
            Engine::ExternalLibrary => {
                let outcome = match self::varisat::solve_external(cnf)? {
                    Some(model) => SatOutcome::Sat(model),
                    None => SatOutcome::Unsat,
                };
                Ok(EngineRun {
                    outcome,
                    stats: EngineStats::External,
                })
            }
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Engine {
    type Err = GemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brute_force" => Ok(Engine::BruteForce),
            "backtracking" => Ok(Engine::Backtracking),
            "external_library" | "varisat" => Ok(Engine::ExternalLibrary),
            _ => Err(GemError::UnknownConfiguration {
                kind: "engine",
                value: s.to_string(),
                expected: "brute_force|backtracking|external_library",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStats {
    Backtracking { decisions: u64, backtracks: u64 },
    BruteForce { checked: u128, total: u128 },
    External,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineRun {
    pub outcome: SatOutcome,
    pub stats: EngineStats,
}
