use crate::grid::{Cell, Grid};
use crate::sat::Model;

// hint numbers win over the gem marker; unmodelled cells keep the puzzle value
pub fn project_model(puzzle: &Grid, model: &Model) -> Grid {
    let mut out = Grid::filled(puzzle.rows(), puzzle.cols(), Cell::Unknown);

    for &lit in model.lits() {
        if !puzzle.contains_var(lit.var) {
            continue;
        }
        let (r, c) = puzzle.var_to_position(lit.var);
        let cell = match (lit.sign, puzzle.get(r, c)) {
            (true, _) => Cell::Trap,
            (false, hint @ Cell::Hint(_)) => hint,
            (false, _) => Cell::Gem,
        };
        out.set(r, c, cell);
    }

    for ((r, c), cell) in puzzle.cells() {
        if out.get(r, c) == Cell::Unknown {
            out.set(r, c, cell);
        }
    }
    out
}
