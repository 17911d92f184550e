use std::collections::BTreeSet;

// positive literal = trap, negative = safe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lit {
    pub var: u32,
    pub sign: bool,
}

impl Lit {
    pub fn new(var: u32, sign: bool) -> Self {
        Self { var, sign }
    }

    pub fn trap(var: u32) -> Self {
        Self::new(var, true)
    }

    pub fn safe(var: u32) -> Self {
        Self::new(var, false)
    }

    pub fn to_dimacs(self) -> i64 {
        let v = self.var as i64;
        if self.sign { v } else { -v }
    }

    pub fn eval(self, value: bool) -> bool {
        value == self.sign
    }
}

pub type Clause = Vec<Lit>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cnf {
    pub num_vars: u32,
    pub clauses: Vec<Clause>,
}

impl Cnf {
    pub fn new(num_vars: u32) -> Self {
        Self {
            num_vars,
            clauses: Vec::new(),
        }
    }

    pub fn add_clause(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    // variables that occur in at least one clause, ascending
    pub fn variables(&self) -> Vec<u32> {
        self.clauses
            .iter()
            .flatten()
            .map(|lit| lit.var)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn max_var(&self) -> u32 {
        self.clauses
            .iter()
            .flatten()
            .map(|lit| lit.var)
            .max()
            .unwrap_or(0)
    }

    pub fn eval_lit_partial(lit: Lit, assignment: &[Option<bool>]) -> Option<bool> {
        let var = lit.var as usize;
        if var >= assignment.len() {
            return None;
        }
        assignment[var].map(|v| lit.eval(v))
    }
}

pub fn normalize_clause(clause: &[Lit]) -> Vec<Lit> {
    let mut key = clause.to_vec();
    key.sort_unstable();
    key.dedup();
    key
}
