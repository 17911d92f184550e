pub mod cnf;
pub mod compare;
pub mod error;
pub mod grid;
pub mod hunter;
pub mod project;
pub mod sat;
pub mod solver;

pub use error::GemError;
