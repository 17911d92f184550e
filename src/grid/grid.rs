use std::fmt;

use anyhow::{Result, bail};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Hint(u8),
    Trap,
    Gem,
    Unknown,
}

impl Cell {
    pub fn is_trap(self) -> bool {
        matches!(self, Cell::Trap)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Hint(n) => write!(f, "{}", n),
            Cell::Trap => f.write_str("T"),
            Cell::Gem => f.write_str("G"),
            Cell::Unknown => f.write_str("_"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    // variable ids are u32 and start at 1
    pub(crate) fn check_size(rows: usize, cols: usize) -> Result<()> {
        match rows.checked_mul(cols) {
            Some(n) if n <= u32::MAX as usize => Ok(()),
            _ => bail!("grid {}x{} has more cells than variable ids", rows, cols),
        }
    }

    pub fn new(rows: usize, cols: usize, cells: Vec<Cell>) -> Result<Self> {
        Self::check_size(rows, cols)?;
        if cells.len() != rows * cols {
            bail!(
                "grid {}x{} needs {} cells, got {}",
                rows,
                cols,
                rows * cols,
                cells.len()
            );
        }
        Ok(Self { rows, cols, cells })
    }

    pub fn filled(rows: usize, cols: usize, cell: Cell) -> Self {
        Self {
            rows,
            cols,
            cells: vec![cell; rows * cols],
        }
    }

    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        let mut cells = Vec::with_capacity(height * width);
        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                bail!("row {} has {} cells, expected {}", idx, row.len(), width);
            }
            cells.extend(row);
        }
        Self::new(height, width, cells)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn num_vars(&self) -> u32 {
        (self.rows * self.cols) as u32
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.cols + col]
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row * self.cols + col] = cell;
    }

    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), Cell)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, &cell)| ((idx / cols, idx % cols), cell))
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    pub fn position_to_var(&self, row: usize, col: usize) -> u32 {
        (row * self.cols + col + 1) as u32
    }

    pub fn var_to_position(&self, var: u32) -> (usize, usize) {
        let idx = var as usize - 1;
        (idx / self.cols, idx % self.cols)
    }

    pub fn contains_var(&self, var: u32) -> bool {
        var >= 1 && var <= self.num_vars()
    }

    pub fn neighbors(&self, row: usize, col: usize) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(8);
        for dr in -1i64..=1 {
            for dc in -1i64..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let r = row as i64 + dr;
                let c = col as i64 + dc;
                if r >= 0 && c >= 0 && (r as usize) < self.rows && (c as usize) < self.cols {
                    out.push((r as usize, c as usize));
                }
            }
        }
        out
    }

    pub fn traps_around(&self, row: usize, col: usize) -> usize {
        self.neighbors(row, col)
            .into_iter()
            .filter(|&(r, c)| self.get(r, c).is_trap())
            .count()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            let line = self
                .row(r)
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            if r + 1 < self.rows {
                writeln!(f, "{}", line)?;
            } else {
                write!(f, "{}", line)?;
            }
        }
        Ok(())
    }
}

// fixed cells must survive and every hint must see exactly its count;
// a hint cell may itself come back as a trap
pub fn check_solution(puzzle: &Grid, solved: &Grid) -> Result<()> {
    if puzzle.rows() != solved.rows() || puzzle.cols() != solved.cols() {
        bail!(
            "solution is {}x{}, puzzle is {}x{}",
            solved.rows(),
            solved.cols(),
            puzzle.rows(),
            puzzle.cols()
        );
    }
    for ((r, c), cell) in puzzle.cells() {
        let got = solved.get(r, c);
        match cell {
            Cell::Hint(n) => {
                if got != cell && got != Cell::Trap {
                    bail!("hint at ({}, {}) became {}", r, c, got);
                }
                let traps = solved.traps_around(r, c);
                if traps != n as usize {
                    bail!("hint {} at ({}, {}) sees {} traps", n, r, c, traps);
                }
            }
            Cell::Trap | Cell::Gem => {
                if got != cell {
                    bail!("fixed {} at ({}, {}) became {}", cell, r, c, got);
                }
            }
            Cell::Unknown => {}
        }
    }
    Ok(())
}
