use gemhunter::GemError;
use gemhunter::grid::text::{parse_grid_str, write_grid};
use gemhunter::grid::{Cell, Grid, check_solution};
use proptest::prelude::*;

#[test]
fn parses_all_token_kinds() {
    let grid = parse_grid_str("3,_,T\nG,0,8\n").expect("parse");
    assert_eq!(grid.rows(), 2);
    assert_eq!(grid.cols(), 3);
    assert_eq!(grid.row(0), &[Cell::Hint(3), Cell::Unknown, Cell::Trap]);
    assert_eq!(grid.row(1), &[Cell::Gem, Cell::Hint(0), Cell::Hint(8)]);
}

#[test]
fn ragged_rows_are_malformed() {
    let err = parse_grid_str("1,_\n_\n").expect_err("ragged grid must fail");
    match err.downcast_ref::<GemError>() {
        Some(GemError::MalformedInput { line, .. }) => assert_eq!(*line, 2),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn bad_token_reports_position() {
    let err = parse_grid_str("1,_,x\n").expect_err("bad token must fail");
    match err.downcast_ref::<GemError>() {
        Some(GemError::MalformedInput { line, column, .. }) => {
            assert_eq!(*line, 1);
            assert_eq!(*column, 3);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn empty_input_is_malformed() {
    let err = parse_grid_str("\n\n").expect_err("empty grid must fail");
    assert!(matches!(
        err.downcast_ref::<GemError>(),
        Some(GemError::MalformedInput { .. })
    ));
}

#[test]
fn written_grid_reads_back() {
    let grid = parse_grid_str("1,_,T\nG,2,_\n").expect("parse");
    let mut buf = Vec::new();
    write_grid(&mut buf, &grid).expect("write");
    let text = String::from_utf8(buf).expect("utf8");
    assert_eq!(text, "1, _, T\nG, 2, _\n");
    assert_eq!(parse_grid_str(&text).expect("reparse"), grid);
}

#[test]
fn neighbors_are_clipped_at_edges() {
    let grid = Grid::filled(3, 4, Cell::Unknown);
    assert_eq!(grid.neighbors(0, 0), vec![(0, 1), (1, 0), (1, 1)]);
    assert_eq!(grid.neighbors(1, 1).len(), 8);
    assert_eq!(grid.neighbors(2, 3), vec![(1, 2), (1, 3), (2, 2)]);
    assert!(Grid::filled(1, 1, Cell::Unknown).neighbors(0, 0).is_empty());
}

#[test]
fn check_solution_counts_hint_neighbors() {
    let puzzle = parse_grid_str("1,_\n_,_\n").expect("parse");
    let good = parse_grid_str("1,T\nG,G\n").expect("parse");
    let bad = parse_grid_str("1,T\nT,G\n").expect("parse");
    assert!(check_solution(&puzzle, &good).is_ok());
    assert!(check_solution(&puzzle, &bad).is_err());
}

#[test]
fn oversized_grids_are_rejected() {
    let err = Grid::new(1 << 16, 1 << 16, Vec::new()).expect_err("too many cells");
    assert!(format!("{:#}", err).contains("more cells than variable ids"));
    assert!(Grid::new(usize::MAX, 2, Vec::new()).is_err());
    assert!(Grid::new(2, 3, vec![Cell::Unknown; 6]).is_ok());
}

#[test]
fn check_solution_accepts_trapped_hint_cells() {
    let puzzle = parse_grid_str("1,1\n").expect("parse");
    let solved = parse_grid_str("T,T\n").expect("parse");
    assert!(check_solution(&puzzle, &solved).is_ok());

    let lost = parse_grid_str("G,T\n").expect("parse");
    assert!(check_solution(&puzzle, &lost).is_err());
}

proptest! {
    #[test]
    fn variable_mapping_is_a_bijection(rows in 1usize..20, cols in 1usize..20) {
        let grid = Grid::filled(rows, cols, Cell::Unknown);
        let mut seen = vec![false; rows * cols + 1];
        for r in 0..rows {
            for c in 0..cols {
                let var = grid.position_to_var(r, c);
                prop_assert!(var >= 1 && var <= grid.num_vars());
                prop_assert!(!seen[var as usize]);
                seen[var as usize] = true;
                prop_assert_eq!(grid.var_to_position(var), (r, c));
            }
        }
        for var in 1..=grid.num_vars() {
            let (r, c) = grid.var_to_position(var);
            prop_assert_eq!(grid.position_to_var(r, c), var);
        }
    }
}
