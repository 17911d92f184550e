use super::cnf::{Clause, Lit};

// at least n of `vars` are traps: no (k-n+1)-subset may be all safe
pub fn at_least_n(vars: &[u32], n: usize) -> Vec<Clause> {
    let k = vars.len();
    if n == 0 {
        return Vec::new();
    }
    if n > k {
        return vec![Vec::new()];
    }
    if n == k {
        return vars.iter().map(|&v| vec![Lit::trap(v)]).collect();
    }
    combinations(vars, k - n + 1)
        .into_iter()
        .map(|combo| combo.into_iter().map(Lit::trap).collect())
        .collect()
}

// at most n of `vars` are traps: no (n+1)-subset may be all traps
pub fn at_most_n(vars: &[u32], n: usize) -> Vec<Clause> {
    let k = vars.len();
    if n >= k {
        return Vec::new();
    }
    if n == 0 {
        return vars.iter().map(|&v| vec![Lit::safe(v)]).collect();
    }
    combinations(vars, n + 1)
        .into_iter()
        .map(|combo| combo.into_iter().map(Lit::safe).collect())
        .collect()
}

pub fn exactly_n(vars: &[u32], n: usize) -> Vec<Clause> {
    let mut clauses = at_least_n(vars, n);
    clauses.extend(at_most_n(vars, n));
    clauses
}

// r-subsets in lexicographic index order
pub fn combinations(items: &[u32], r: usize) -> Vec<Vec<u32>> {
    let n = items.len();
    if r > n {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut idx = (0..r).collect::<Vec<_>>();
    loop {
        out.push(idx.iter().map(|&i| items[i]).collect());

        let Some(pos) = (0..r).rev().find(|&i| idx[i] != i + n - r) else {
            return out;
        };
        idx[pos] += 1;
        for j in pos + 1..r {
            idx[j] = idx[j - 1] + 1;
        }
    }
}
