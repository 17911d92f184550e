use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::GemError;
use crate::grid::{Cell, Grid};

use super::cardinality;
use super::cnf::{Clause, Cnf, Lit, normalize_clause};
use super::truth_table;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    #[default]
    Cardinality,
    TruthTable,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::TruthTable, Strategy::Cardinality];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Cardinality => "cardinality",
            Strategy::TruthTable => "truth_table",
        }
    }

    pub fn exactly_n_clauses(self, vars: &[u32], n: usize) -> Vec<Clause> {
        match self {
            Strategy::Cardinality => cardinality::exactly_n(vars, n),
            Strategy::TruthTable => truth_table::exactly_n(vars, n),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = GemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cardinality" => Ok(Strategy::Cardinality),
            "truth_table" => Ok(Strategy::TruthTable),
            _ => Err(GemError::UnknownConfiguration {
                kind: "strategy",
                value: s.to_string(),
                expected: "truth_table|cardinality",
            }),
        }
    }
}

pub fn encode_grid(grid: &Grid, strategy: Strategy) -> Cnf {
    let mut raw = Vec::<Clause>::new();

    for ((r, c), cell) in grid.cells() {
        let var = grid.position_to_var(r, c);
        match cell {
            Cell::Hint(n) => {
                let vars = grid
                    .neighbors(r, c)
                    .into_iter()
                    .map(|(nr, nc)| grid.position_to_var(nr, nc))
                    .collect::<Vec<_>>();
                raw.extend(strategy.exactly_n_clauses(&vars, n as usize));
            }
            Cell::Trap => raw.push(vec![Lit::trap(var)]),
            Cell::Gem => raw.push(vec![Lit::safe(var)]),
            Cell::Unknown => {}
        }
    }

    let generated = raw.len();
    let mut cnf = Cnf::new(grid.num_vars());
    cnf.clauses = dedup_clauses(raw);
    tracing::debug!(
        strategy = strategy.name(),
        generated,
        kept = cnf.len(),
        "encoded grid"
    );
    cnf
}

// first occurrence of each literal set wins, order otherwise preserved
pub fn dedup_clauses(clauses: Vec<Clause>) -> Vec<Clause> {
    let mut seen = IndexMap::<Vec<Lit>, Clause>::with_capacity(clauses.len());
    for clause in clauses {
        seen.entry(normalize_clause(&clause)).or_insert(clause);
    }
    seen.into_values().collect()
}
