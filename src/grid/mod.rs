pub mod generate;
pub mod grid;
pub mod text;

pub use grid::{Cell, Grid, check_solution};
