use gemhunter::cnf::{Lit, Strategy};
use gemhunter::grid::text::parse_grid_str;
use gemhunter::grid::{Cell, check_solution};
use gemhunter::hunter::{HuntOptions, HuntStatus, hunt, hunt_quiet};
use gemhunter::project::project_model;
use gemhunter::sat::{CancelToken, Model, Progress, Silent};
use gemhunter::solver::{Engine, EngineStats};

#[test]
fn three_by_three_diagonal_hints_are_solved() {
    let grid = parse_grid_str("1,_,_\n_,2,_\n_,_,1").expect("parse");
    for_each_combo(|opts| {
        let report = hunt_quiet(&grid, &opts).expect("hunt");
        assert_eq!(report.status, HuntStatus::Satisfied, "{:?}", opts);
        let solved = report.grid.expect("result grid");
        check_solution(&grid, &solved).expect("hint counts hold");
        assert!(matches!(solved.get(1, 1), Cell::Hint(2) | Cell::Trap));
    });
}

#[test]
fn two_by_two_is_solved() {
    let grid = parse_grid_str("1,_\n_,1").expect("parse");
    for_each_combo(|opts| {
        let report = hunt_quiet(&grid, &opts).expect("hunt");
        let solved = report.grid.expect("result grid");
        check_solution(&grid, &solved).expect("hint counts hold");
    });
}

#[test]
fn adjacent_hints_can_both_be_traps() {
    let grid = parse_grid_str("1,1").expect("parse");
    for_each_combo(|opts| {
        let report = hunt_quiet(&grid, &opts).expect("hunt");
        assert_eq!(report.status, HuntStatus::Satisfied, "{:?}", opts);
        assert_eq!(report.stats.clauses, 2);
        let solved = report.grid.expect("result grid");
        assert_eq!(solved.row(0), &[Cell::Trap, Cell::Trap]);
        check_solution(&grid, &solved).expect("hint counts hold");
    });
}

#[test]
fn zero_hint_next_to_fixed_trap_is_unsat() {
    let grid = parse_grid_str("0,T\nG,_").expect("parse");
    for_each_combo(|opts| {
        let report = hunt_quiet(&grid, &opts).expect("hunt");
        assert_eq!(report.status, HuntStatus::Unsatisfiable, "{:?}", opts);
        assert!(report.grid.is_none());
        assert!(report.stats.clauses > 0);
    });
}

#[test]
fn solving_twice_gives_the_same_grid() {
    let grid = parse_grid_str("1,_,_,_\n_,2,_,1\n_,_,_,_\n1,_,2,_").expect("parse");
    for_each_combo(|opts| {
        let a = hunt_quiet(&grid, &opts).expect("first");
        let b = hunt_quiet(&grid, &opts).expect("second");
        assert_eq!(a.status, b.status);
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.stats.clauses, b.stats.clauses);
    });
}

#[test]
fn projector_restores_hints_and_keeps_unmodelled_cells() {
    let grid = parse_grid_str("1,_\n_,G").expect("parse");
    let model = Model::from_lits(vec![Lit::safe(1), Lit::trap(2), Lit::safe(4)]);
    let out = project_model(&grid, &model);
    assert_eq!(out.row(0), &[Cell::Hint(1), Cell::Trap]);
    assert_eq!(out.row(1), &[Cell::Unknown, Cell::Gem]);
}

#[test]
fn cancelled_before_start_is_not_unsat() {
    let grid = parse_grid_str("1,_\n_,_").expect("parse");
    for engine in [Engine::Backtracking, Engine::BruteForce] {
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut silent = Silent;
        let opts = HuntOptions {
            engine,
            ..HuntOptions::default()
        };
        let report = hunt(&grid, &opts, &cancel, &mut silent).expect("hunt");
        assert_eq!(report.status, HuntStatus::Cancelled);
        assert!(report.grid.is_none());
        match report.stats.engine {
            EngineStats::Backtracking { decisions, .. } => assert_eq!(decisions, 0),
            EngineStats::BruteForce { checked, total } => {
                assert_eq!(checked, 0);
                // the hint cell itself never occurs in a clause
                assert_eq!(total, 8);
            }
            EngineStats::External => panic!("external engine not requested"),
        }
    }
}

#[test]
fn observer_can_cancel_between_decisions() {
    let grid = parse_grid_str("_,_,_\n_,2,_\n_,_,_").expect("parse");
    let cancel = CancelToken::new();
    let token = cancel.clone();
    let mut seen = Vec::new();
    let mut observer = |p: &Progress| {
        seen.push(*p);
        token.cancel();
    };
    let opts = HuntOptions {
        strategy: Strategy::Cardinality,
        engine: Engine::Backtracking,
        progress_every: 1,
    };
    let report = hunt(&grid, &opts, &cancel, &mut observer).expect("hunt");
    assert_eq!(report.status, HuntStatus::Cancelled);
    assert_eq!(
        report.stats.engine,
        EngineStats::Backtracking {
            decisions: 1,
            backtracks: 0
        }
    );
    assert_eq!(seen.len(), 1);
    assert!(matches!(seen[0], Progress::Backtracking { decisions: 1, .. }));
}

fn for_each_combo(mut f: impl FnMut(HuntOptions)) {
    for strategy in Strategy::ALL {
        for engine in Engine::ALL {
            f(HuntOptions {
                strategy,
                engine,
                progress_every: 0,
            });
        }
    }
}
