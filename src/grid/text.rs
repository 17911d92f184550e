use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::GemError;

use super::grid::{Cell, Grid};

pub fn parse_grid_str(s: &str) -> Result<Grid> {
    parse_grid_reader(std::io::Cursor::new(s.as_bytes()))
}

pub fn parse_grid_reader<R: BufRead>(r: R) -> Result<Grid> {
    let mut rows = Vec::<Vec<Cell>>::new();
    let mut width = None::<usize>;

    for (idx, line) in r.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.context("failed to read grid line")?;
        let clean = line.trim();
        if clean.is_empty() {
            continue;
        }

        let mut row = Vec::new();
        for (col, token) in clean.split(',').enumerate() {
            row.push(parse_token(token.trim(), line_no, col + 1)?);
        }

        match width {
            None => width = Some(row.len()),
            Some(w) if w != row.len() => {
                return Err(GemError::malformed(
                    line_no,
                    row.len(),
                    format!("row has {} cells, expected {}", row.len(), w),
                )
                .into());
            }
            Some(_) => {}
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(GemError::malformed(0, 0, "grid has no rows").into());
    }
    Grid::from_rows(rows)
}

pub fn load_grid(path: &Path) -> Result<Grid> {
    let file =
        File::open(path).with_context(|| format!("failed to open grid {}", path.display()))?;
    parse_grid_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse grid {}", path.display()))
}

pub fn write_grid<W: Write>(w: &mut W, grid: &Grid) -> std::io::Result<()> {
    for r in 0..grid.rows() {
        let line = grid
            .row(r)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(w, "{}", line)?;
    }
    Ok(())
}

pub fn save_grid(path: &Path, grid: &Grid) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    let mut file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write_grid(&mut file, grid)?;
    file.flush()?;
    Ok(())
}

fn parse_token(token: &str, line: usize, column: usize) -> Result<Cell> {
    let cell = match token {
        "_" => Cell::Unknown,
        "T" => Cell::Trap,
        "G" => Cell::Gem,
        _ => match token.parse::<u8>() {
            Ok(n) if n <= 8 => Cell::Hint(n),
            Ok(n) => {
                return Err(GemError::malformed(line, column, format!("hint {} exceeds 8", n)).into());
            }
            Err(_) => {
                return Err(
                    GemError::malformed(line, column, format!("invalid token '{}'", token)).into(),
                );
            }
        },
    };
    Ok(cell)
}

#[cfg(test)]
mod tests {
    use super::{parse_grid_str, parse_token};
    use crate::grid::grid::Cell;

    #[test]
    fn parse_tokens_with_spaces() {
        let grid = match parse_grid_str("1, _ ,T\nG,8, 0\n\n") {
            Ok(v) => v,
            Err(e) => panic!("parse failed: {e}"),
        };
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.get(0, 1), Cell::Unknown);
        assert_eq!(grid.get(0, 2), Cell::Trap);
        assert_eq!(grid.get(1, 0), Cell::Gem);
        assert_eq!(grid.get(1, 1), Cell::Hint(8));
    }

    #[test]
    fn hint_over_eight_is_rejected() {
        assert!(parse_token("9", 1, 1).is_err());
        assert!(parse_token("-1", 1, 1).is_err());
        assert!(parse_token("", 1, 1).is_err());
    }
}
