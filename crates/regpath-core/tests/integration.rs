//! Integration tests for regpath-core.
//!
//! These tests run both pipelines against files on disk:
//! weight files → scores → significance calls, and
//! dump files → tally → confidence tables.

use std::fs;
use std::path::Path;

use regpath_core::{
    AggregatorConfig, Error, Lambda, ModuleLayout, ScorerConfig, VariableCategory, aggregate,
    matching_files, score_module, tally_files,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Write the real weight file plus `trials` random files for module 7.
///
/// Real data has one lambda with a strong regulator `Strong` (score 0.5) and a
/// weak one `Weak` (score 0.05). Random runs give `Strong` small, varying
/// scores and never mention `Weak`.
fn write_module(dir: &Path, trials: usize) -> ModuleLayout {
    let layout = ModuleLayout::new(dir, "7");
    fs::write(
        layout.real_path(),
        "0.1\t1\tStrong\tG1\t0.4\n\
         0.1\t2\tStrong\tG1\t0.6\n\
         0.1\t1\tStrong\tG2\t0.5\n\
         0.1\t1\tWeak\tG1\t0.05\n",
    )
    .unwrap();
    for i in 1..=trials {
        let w = if i % 2 == 0 { 0.01 } else { 0.03 };
        fs::write(
            layout.trial_path(i),
            format!("0.1\t1\tStrong\tG1\t{w}\n0.5\t1\tStrong\tG1\t0.9\n"),
        )
        .unwrap();
    }
    layout
}

fn write_dump(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).unwrap();
}

fn pattern(dir: &Path) -> String {
    format!("{}/sol*.dump", dir.display())
}

// ---------------------------------------------------------------------------
// Regulator significance
// ---------------------------------------------------------------------------

#[test]
fn scores_module_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let layout = write_module(dir.path(), 40);
    let report = score_module(&layout, &ScorerConfig::with_cutoff(0.1)).unwrap();

    assert_eq!(report.module_id, "7");
    assert_eq!(report.lambdas.len(), 1, "random-only lambda must be ignored");
    let lam = &report.lambdas[0];
    assert_eq!(lam.lambda, Lambda::new(0.1));
    assert!((lam.corrected_alpha - 0.025).abs() < 1e-12);

    let strong = &lam.results[0];
    assert_eq!(strong.protein, "Strong");
    assert!((strong.score - 0.5).abs() < 1e-12);
    assert!((strong.rand_mean - 0.02).abs() < 1e-12);
    assert!(strong.p_value < 1e-6);
    assert!(strong.hit);

    let weak = &lam.results[1];
    assert_eq!(weak.protein, "Weak");
    assert_eq!(weak.rand_mean, 0.0);
    assert_eq!(weak.p_value, 0.0);
    assert!(!weak.hit);

    assert_eq!(lam.fdr.qualifying, 1);
    assert_eq!(lam.fdr.failed, 0);
    assert_eq!(lam.fdr.display_rate(), "0.000");
}

#[test]
fn missing_trial_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let layout = write_module(dir.path(), 40);
    fs::remove_file(layout.trial_path(7)).unwrap();

    match score_module(&layout, &ScorerConfig::default()) {
        Err(Error::MissingTrial { trial, .. }) => assert_eq!(trial, 7),
        other => panic!("expected missing trial 7, got {other:?}"),
    }
}

#[test]
fn missing_real_file_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ModuleLayout::new(dir.path(), "99");
    assert!(matches!(
        score_module(&layout, &ScorerConfig::default()),
        Err(Error::MissingInput { .. })
    ));
}

#[test]
fn malformed_trial_row_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let layout = write_module(dir.path(), 40);
    fs::write(layout.trial_path(3), "0.1\tone\tStrong\tG1\t0.2\n").unwrap();

    match score_module(&layout, &ScorerConfig::default()) {
        Err(Error::Format { path, line, .. }) => {
            assert_eq!(path, layout.trial_path(3));
            assert_eq!(line, 1);
        }
        other => panic!("expected format error, got {other:?}"),
    }
}

#[test]
fn configured_trial_count_is_respected() {
    let dir = tempfile::tempdir().unwrap();
    let layout = write_module(dir.path(), 5);
    let config = ScorerConfig {
        trials: 5,
        ..ScorerConfig::with_cutoff(0.1)
    };
    let report = score_module(&layout, &config).unwrap();
    assert_eq!(report.config.trials, 5);
    // 3 odd trials at 0.03, 2 even at 0.01.
    assert!((report.lambdas[0].results[0].rand_mean - 0.022).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// Solution confidence
// ---------------------------------------------------------------------------

#[test]
fn bad_file_excluded_from_denominator() {
    let dir = tempfile::tempdir().unwrap();
    for i in 1..=3 {
        write_dump(
            dir.path(),
            &format!("sol{i}.dump"),
            "x\t'A'.'B'\t1\nx\t'A'.'B'\t1\ny\t'A'\t1\n",
        );
    }
    write_dump(dir.path(), "sol4.dump", "*** Symbol not found\nx\t'A'.'B'\t1\n");

    let prefix = dir.path().join("conf");
    let config = AggregatorConfig::new(pattern(dir.path()), prefix.display().to_string());
    let summary = aggregate(&config).unwrap();
    assert_eq!(summary.files_matched, 4);
    assert_eq!(summary.good_files, 3);
    assert_eq!(summary.bad_files, 1);
    assert_eq!(summary.outputs.len(), 5);

    let edges = fs::read_to_string(config.output_path(VariableCategory::Edge)).unwrap();
    assert_eq!(edges, "#item\tconf(x)\nA.B\t1.000000\n");
    let paths = fs::read_to_string(config.output_path(VariableCategory::Path)).unwrap();
    assert_eq!(paths, "#item\tconf(sigma)\n");
}

#[test]
fn partial_counts_from_bad_file_are_kept() {
    let dir = tempfile::tempdir().unwrap();
    write_dump(dir.path(), "sol1.dump", "y\t'A'\t1\ny\t'B'\t1\n");
    write_dump(dir.path(), "sol2.dump", "y\t'B'\t1\nSymbol not found\n");

    let paths = matching_files(&pattern(dir.path())).unwrap();
    let tally = tally_files(&paths);
    assert_eq!(tally.good_files(), 1);
    assert_eq!(tally.count(VariableCategory::Node, "B"), 2);
}

#[test]
fn overflow_aborts_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    write_dump(dir.path(), "sol1.dump", "y\t'A'\t1\n");
    write_dump(dir.path(), "sol2.dump", "y\t'A'\t1\n");
    // Tallies A before going bad, pushing A to 3 of 2 good files.
    write_dump(dir.path(), "sol3.dump", "y\t'A'\t1\nSymbol not found\n");

    let prefix = dir.path().join("conf");
    let config = AggregatorConfig::new(pattern(dir.path()), prefix.display().to_string());
    match aggregate(&config) {
        Err(Error::ConfidenceOverflow {
            category,
            symbol,
            count,
            total,
        }) => {
            assert_eq!(category, VariableCategory::Node);
            assert_eq!(symbol, "A");
            assert_eq!((count, total), (3, 2));
        }
        other => panic!("expected overflow, got {other:?}"),
    }
    for category in VariableCategory::ALL {
        assert!(!config.output_path(category).exists());
    }
}

#[test]
fn no_matching_files_writes_empty_tables() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("empty");
    let config = AggregatorConfig::new(pattern(dir.path()), prefix.display().to_string());
    let summary = aggregate(&config).unwrap();
    assert_eq!(summary.files_matched, 0);
    assert_eq!(summary.good_files, 0);
    for category in VariableCategory::ALL {
        let body = fs::read_to_string(config.output_path(category)).unwrap();
        assert_eq!(body, format!("#item\tconf({})\n", category.code()));
    }
}

#[test]
fn non_utf8_symbol_does_not_break_confidence() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("sol1.dump"), "y\t'A'\t1\n").unwrap();
    fs::write(dir.path().join("sol2.dump"), b"y\t'A'\t1\ny\t'G\xe9ne'\t1\n").unwrap();
    let prefix = dir.path().join("latin1");
    let config = AggregatorConfig::new(pattern(dir.path()), prefix.display().to_string());

    let summary = aggregate(&config).unwrap();
    assert_eq!((summary.good_files, summary.bad_files), (2, 0));
    let body = fs::read_to_string(config.output_path(VariableCategory::Node)).unwrap();
    assert_eq!(body, "#item\tconf(y)\nA\t1.000000\nG\u{FFFD}ne\t0.500000\n");
}
