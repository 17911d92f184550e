use super::cnf::{Clause, Lit};

// block every neighbor pattern whose trap count differs from n
pub fn exactly_n(vars: &[u32], n: usize) -> Vec<Clause> {
    let k = vars.len();
    if n == 0 {
        return vars.iter().map(|&v| vec![Lit::safe(v)]).collect();
    }
    if n == k {
        return vars.iter().map(|&v| vec![Lit::trap(v)]).collect();
    }

    let mut clauses = Vec::new();
    for bits in 0u32..(1u32 << k) {
        if bits.count_ones() as usize == n {
            continue;
        }
        // first neighbor is the most significant bit
        let clause = vars
            .iter()
            .enumerate()
            .map(|(idx, &v)| {
                let set = (bits >> (k - 1 - idx)) & 1 == 1;
                Lit::new(v, !set)
            })
            .collect();
        clauses.push(clause);
    }
    clauses
}
