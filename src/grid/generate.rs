use anyhow::{Result, bail};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::grid::{Cell, Grid};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenOptions {
    pub rows: usize,
    pub cols: usize,
    pub trap_density: f64,
    pub reveal_ratio: f64,
    pub seed: u64,
}

impl Default for GenOptions {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 5,
            trap_density: 0.2,
            reveal_ratio: 0.5,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Planted {
    pub puzzle: Grid,
    pub solution: Grid,
}

pub fn generate(opts: &GenOptions) -> Result<Planted> {
    if opts.rows == 0 || opts.cols == 0 {
        bail!("grid must be at least 1x1, got {}x{}", opts.rows, opts.cols);
    }
    if !(0.0..=1.0).contains(&opts.trap_density) {
        bail!("trap density must be in [0,1], got {}", opts.trap_density);
    }
    if !(0.0..=1.0).contains(&opts.reveal_ratio) {
        bail!("reveal ratio must be in [0,1], got {}", opts.reveal_ratio);
    }
    Grid::check_size(opts.rows, opts.cols)?;

    let mut rng = ChaCha8Rng::seed_from_u64(opts.seed);
    let mut layout = Grid::filled(opts.rows, opts.cols, Cell::Gem);
    for r in 0..opts.rows {
        for c in 0..opts.cols {
            if rng.random::<f64>() < opts.trap_density {
                layout.set(r, c, Cell::Trap);
            }
        }
    }

    let mut puzzle = Grid::filled(opts.rows, opts.cols, Cell::Unknown);
    let mut solution = layout.clone();
    for r in 0..opts.rows {
        for c in 0..opts.cols {
            if layout.get(r, c).is_trap() {
                continue;
            }
            // draw for every safe cell so the stream only depends on the layout
            let reveal = rng.random::<f64>() < opts.reveal_ratio;
            if reveal {
                let hint = Cell::Hint(layout.traps_around(r, c) as u8);
                puzzle.set(r, c, hint);
                solution.set(r, c, hint);
            }
        }
    }

    Ok(Planted { puzzle, solution })
}
