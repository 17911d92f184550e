use gemhunter::grid::check_solution;
use gemhunter::grid::generate::{GenOptions, generate};
use gemhunter::hunter::{HuntOptions, hunt_quiet};
use proptest::prelude::*;

#[test]
fn planted_layout_satisfies_its_puzzle() {
    let opts = GenOptions {
        rows: 6,
        cols: 7,
        trap_density: 0.25,
        reveal_ratio: 0.6,
        seed: 11,
    };
    let planted = generate(&opts).expect("generate");
    assert_eq!(planted.puzzle.rows(), 6);
    assert_eq!(planted.puzzle.cols(), 7);
    check_solution(&planted.puzzle, &planted.solution).expect("planted layout is valid");
}

#[test]
fn same_seed_same_puzzle() {
    let opts = GenOptions {
        seed: 42,
        ..GenOptions::default()
    };
    let a = generate(&opts).expect("first");
    let b = generate(&opts).expect("second");
    assert_eq!(a, b);
}

#[test]
fn bad_ratios_are_rejected() {
    let too_dense = GenOptions {
        trap_density: 1.5,
        ..GenOptions::default()
    };
    assert!(generate(&too_dense).is_err());
    let empty = GenOptions {
        rows: 0,
        ..GenOptions::default()
    };
    assert!(generate(&empty).is_err());
    let huge = GenOptions {
        rows: 1 << 16,
        cols: 1 << 16,
        ..GenOptions::default()
    };
    assert!(generate(&huge).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn generated_puzzles_are_solvable(seed in any::<u64>(), density in 0.0f64..0.5) {
        let opts = GenOptions {
            rows: 5,
            cols: 5,
            trap_density: density,
            reveal_ratio: 0.5,
            seed,
        };
        let planted = generate(&opts).expect("generate");
        let report = hunt_quiet(&planted.puzzle, &HuntOptions::default()).expect("hunt");
        prop_assert!(report.success());
        let solved = report.grid.expect("result grid");
        prop_assert!(check_solution(&planted.puzzle, &solved).is_ok());
    }
}
