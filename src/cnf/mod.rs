pub mod cardinality;
pub mod cnf;
pub mod dimacs;
pub mod encode;
pub mod truth_table;

pub use cnf::{Clause, Cnf, Lit};
pub use encode::{Strategy, encode_grid};
