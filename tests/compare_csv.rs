use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use gemhunter::cnf::Strategy;
use gemhunter::compare::{
    CompareConfig, CompareRow, Stragglers, run_dataset, run_matrix, run_one, write_csv,
};
use gemhunter::solver::Engine;
use gemhunter::grid::text::parse_grid_str;

#[test]
fn matrix_covers_every_pair() {
    let grid = parse_grid_str("1,_\n_,1").expect("parse");
    let cfg = CompareConfig {
        timeout: Duration::from_secs(30),
        ..CompareConfig::default()
    };
    let rows = run_matrix("tiny", &grid, &cfg);
    assert_eq!(rows.len(), 6);
    for row in &rows {
        assert_eq!(row.status, "sat", "{:?}", row);
        assert_eq!(row.size, "2x2");
        assert!(row.clauses.is_some());
    }

    let mut buf = Vec::new();
    write_csv(&mut buf, &rows).expect("csv");
    let text = String::from_utf8(buf).expect("utf8");
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(CompareRow::csv_header()));
    let data = lines.collect::<Vec<_>>();
    assert_eq!(data.len(), 6);
    for line in &data {
        assert_eq!(line.split(',').count(), 13);
    }
}

#[test]
fn dataset_run_writes_csv_and_skips_bad_grids() {
    let root = temp_dataset_dir("compare_dataset");
    fs::create_dir_all(&root).expect("mkdir");
    fs::write(root.join("input_a.txt"), "1,_\n_,1\n").expect("write grid");
    fs::write(root.join("input_b.txt"), "0,T\nG,_\n").expect("write grid");
    fs::write(root.join("broken.txt"), "1,x\n").expect("write grid");
    fs::write(root.join("notes.md"), "ignored").expect("write notes");

    let csv_path = root.join("results.csv");
    let cfg = CompareConfig {
        timeout: Duration::from_secs(30),
        ..CompareConfig::default()
    };
    let rows = run_dataset(&root, &cfg, &csv_path, false).expect("run dataset");
    assert_eq!(rows.len(), 12);
    assert!(rows.iter().filter(|r| r.grid.ends_with("input_b.txt")).all(|r| r.status == "unsat"));

    let csv_text = fs::read_to_string(&csv_path).expect("read csv");
    assert_eq!(csv_text.lines().count(), 13);
}

#[test]
fn repeated_runs_report_one_averaged_row() {
    let grid = parse_grid_str("1,_,_\n_,2,_\n_,_,1").expect("parse");
    let mut stragglers = Stragglers::default();
    for repeat in [0, 1, 5] {
        let cfg = CompareConfig {
            timeout: Duration::from_secs(30),
            repeat,
            ..CompareConfig::default()
        };
        let row = run_one(
            "avg",
            &grid,
            Strategy::Cardinality,
            Engine::Backtracking,
            &cfg,
            &mut stragglers,
        );
        assert_eq!(row.status, "sat", "repeat={}", repeat);
        assert!(row.generation_us.is_some());
        assert!(row.solving_us.is_some());
        assert!(row.decisions.is_some());
    }
    assert_eq!(stragglers.outstanding(), 0);
    assert_eq!(CompareConfig::default().repeat, 3);
}

#[test]
fn timed_out_workers_are_tracked_and_joined() {
    // 42 occurring variables; the 0 next to a trap makes brute force scan them all
    let mut text = String::from("0,T,1,1,1,1,1\n");
    for _ in 0..5 {
        text.push_str("1,1,1,1,1,1,1\n");
    }
    let grid = parse_grid_str(&text).expect("parse");
    let cfg = CompareConfig {
        timeout: Duration::from_millis(50),
        repeat: 3,
        ..CompareConfig::default()
    };
    let mut stragglers = Stragglers::default();
    let row = run_one(
        "slow",
        &grid,
        Strategy::Cardinality,
        Engine::BruteForce,
        &cfg,
        &mut stragglers,
    );
    assert_eq!(row.status, "timeout");
    assert!(row.solving_us.is_none());
    assert!(stragglers.outstanding() <= 1);
    stragglers.join_all();
}

#[test]
fn unwritable_csv_path_is_named_in_the_error() {
    let root = temp_dataset_dir("compare_bad_csv");
    fs::create_dir_all(&root).expect("mkdir");
    fs::write(root.join("input_a.txt"), "1,_\n").expect("write grid");

    let csv_path = root.join("missing").join("results.csv");
    let err = run_dataset(&root, &CompareConfig::default(), &csv_path, false)
        .expect_err("parent directory does not exist");
    let msg = format!("{:#}", err);
    assert!(msg.contains("failed to create"), "{}", msg);
    assert!(msg.contains("results.csv"), "{}", msg);
}

fn temp_dataset_dir(tag: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    let t = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    p.push(format!("gemhunter_{}_{}", tag, t));
    p
}
