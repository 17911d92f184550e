use anyhow::Result;
use indexmap::IndexMap;
use varisat::ExtendFormula;

use crate::cnf::cnf::{Cnf, Lit};
use crate::error::GemError;
use crate::sat::Model;

pub struct VarisatSolver {
    inner: varisat::Solver<'static>,
    vars: IndexMap<u32, varisat::Var>,
}

impl VarisatSolver {
    pub fn new() -> Self {
        Self {
            inner: varisat::Solver::new(),
            vars: IndexMap::new(),
        }
    }

    fn to_lit(&mut self, lit: Lit) -> varisat::Lit {
        let inner = &mut self.inner;
        let var = *self.vars.entry(lit.var).or_insert_with(|| inner.new_var());
        varisat::Lit::from_var(var, lit.sign)
    }

    pub fn add_cnf(&mut self, cnf: &Cnf) {
        // register variables in ascending order so solver indices line up
        for v in cnf.variables() {
            let inner = &mut self.inner;
            self.vars.entry(v).or_insert_with(|| inner.new_var());
        }
        for clause in &cnf.clauses {
            let lits = clause
                .iter()
                .map(|&lit| self.to_lit(lit))
                .collect::<Vec<_>>();
            self.inner.add_clause(&lits);
        }
    }

    pub fn solve(&mut self) -> Result<Option<Model>> {
        let sat = self
            .inner
            .solve()
            .map_err(|e| GemError::ExternalSolver(format!("{:?}", e)))?;
        if !sat {
            return Ok(None);
        }

        let model = self
            .inner
            .model()
            .ok_or_else(|| GemError::ExternalSolver("sat result without a model".to_string()))?;
        let lits = model
            .into_iter()
            .filter_map(|lit| {
                self.vars
                    .get_index(lit.var().index())
                    .map(|(&var, _)| Lit::new(var, lit.is_positive()))
            })
            .collect();
        Ok(Some(Model::from_lits(lits)))
    }
}

impl Default for VarisatSolver {
    fn default() -> Self {
        Self::new()
    }
}

pub fn solve_external(cnf: &Cnf) -> Result<Option<Model>> {
    if cnf.clauses.iter().any(Vec::is_empty) {
        return Ok(None);
    }
    let mut solver = VarisatSolver::new();
    solver.add_cnf(cnf);
    solver.solve()
}
