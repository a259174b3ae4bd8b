#![cfg(unix)]

mod common;

use std::fs;
use std::path::Path;
use std::time::Duration;

use radiant_routes::Config;
use radiant_routes::{ResultCode, RunError};
use radiant_routes::smarts::BatchRunner;
use tempfile::tempdir;

use common::{Outcome, install_fake_smarts, read, write_document};

const OUTCOMES: [(&str, Outcome); 6] = [
    ("000000", Outcome::Zenith),
    ("000001", Outcome::Terrestrial),
    ("000002", Outcome::Turbidity),
    ("000003", Outcome::Unrecognized),
    ("000004", Outcome::Hang),
    ("000005", Outcome::Crash),
];

fn config(root: &Path) -> Config {
    Config::new(root.join("smarts"))
        .with_input_dir(root.join("inp"))
        .with_output_dir(root.join("out"))
        .with_timeout(Duration::from_secs(20))
}

#[test]
fn test_every_outcome_is_classified_in_order() {
    let _serial = common::serial();
    let dir = tempdir().unwrap();
    install_fake_smarts(&dir.path().join("smarts"), &OUTCOMES);
    for row in ["000003", "000001", "000000", "000002"] {
        write_document(&dir.path().join("inp"), "birds", row);
    }
    let results_file = dir.path().join("out").join("birds_results.csv");

    let runner = BatchRunner::new(&config(dir.path())).unwrap();
    let results = runner.run_batch("birds", &results_file).unwrap();

    assert_eq!(
        results,
        vec![
            ResultCode::Nighttime,
            ResultCode::Irradiance("886.37".to_string()),
            ResultCode::Turbidity,
            ResultCode::Unclassified,
        ]
    );
    assert_eq!(read(&results_file), "SMARTSirr\n-2\n886.37\n-3\n-4\n");
}

#[test]
fn test_outputs_are_archived_per_row() {
    let _serial = common::serial();
    let dir = tempdir().unwrap();
    let smarts = dir.path().join("smarts");
    install_fake_smarts(&smarts, &OUTCOMES);
    write_document(&dir.path().join("inp"), "birds", "000000");
    write_document(&dir.path().join("inp"), "birds", "000001");

    let runner = BatchRunner::new(&config(dir.path())).unwrap();
    runner
        .run_batch("birds", &dir.path().join("results.csv"))
        .unwrap();

    let out = dir.path().join("out");
    assert!(read(&out.join("birds_000001.out.txt")).contains("Terrestrial"));
    assert_eq!(read(&out.join("birds_000001.ext.txt")), "extinction\n");
    assert_eq!(read(&out.join("birds_000001.scn.txt")), "scan\n");
    assert!(read(&out.join("birds_000000.out.txt")).contains("RUN ABORTED"));
    // a zenith abort writes no extinction or scan file
    assert!(!out.join("birds_000000.ext.txt").exists());
    assert!(!out.join("birds_000000.scn.txt").exists());

    // nothing left behind in the program directory, and it ran there
    assert!(!smarts.join("smarts295.out.txt").exists());
    assert!(!smarts.join("smarts295.ext.txt").exists());
    assert_eq!(
        Path::new(read(&smarts.join("last_cwd.txt")).trim())
            .canonicalize()
            .unwrap(),
        smarts.canonicalize().unwrap()
    );
}

#[test]
fn test_missing_input_is_recorded_and_batch_continues() {
    let _serial = common::serial();
    let dir = tempdir().unwrap();
    install_fake_smarts(&dir.path().join("smarts"), &OUTCOMES);
    let inp = dir.path().join("inp");
    let files = vec![
        inp.join("birds_000000.inp.txt"),
        write_document(&inp, "birds", "000001"),
    ];

    let runner = BatchRunner::new(&config(dir.path())).unwrap();
    let results = runner
        .process(&files, &dir.path().join("results.csv"))
        .unwrap();

    assert_eq!(
        results,
        vec![
            ResultCode::MissingInput,
            ResultCode::Irradiance("886.37".to_string())
        ]
    );
}

#[test]
fn test_hanging_run_times_out() {
    let _serial = common::serial();
    let dir = tempdir().unwrap();
    install_fake_smarts(&dir.path().join("smarts"), &OUTCOMES);
    write_document(&dir.path().join("inp"), "birds", "000004");
    write_document(&dir.path().join("inp"), "birds", "000005");

    let config = config(dir.path()).with_timeout(Duration::from_millis(300));
    let runner = BatchRunner::new(&config).unwrap();
    let results = runner
        .run_batch("birds", &dir.path().join("results.csv"))
        .unwrap();

    assert_eq!(results, vec![ResultCode::TimedOut, ResultCode::Unclassified]);
    assert_eq!(results[0].to_string(), "-5");
}

#[test]
fn test_stale_report_is_not_reused() {
    let _serial = common::serial();
    let dir = tempdir().unwrap();
    let smarts = dir.path().join("smarts");
    install_fake_smarts(&smarts, &OUTCOMES);
    fs::write(smarts.join("smarts295.out.txt"), common::TERRESTRIAL_LINE).unwrap();
    // 000005 exits without writing anything
    write_document(&dir.path().join("inp"), "birds", "000005");

    let runner = BatchRunner::new(&config(dir.path())).unwrap();
    let results = runner
        .run_batch("birds", &dir.path().join("results.csv"))
        .unwrap();

    assert_eq!(results, vec![ResultCode::Unclassified]);
}

#[test]
fn test_missing_program_is_unclassified() {
    let _serial = common::serial();
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("smarts")).unwrap();
    write_document(&dir.path().join("inp"), "birds", "000001");

    let config = config(dir.path()).with_executable("not_installed");
    let runner = BatchRunner::new(&config).unwrap();
    let results = runner
        .run_batch("birds", &dir.path().join("results.csv"))
        .unwrap();

    assert_eq!(results, vec![ResultCode::Unclassified]);
}

#[test]
fn test_unreadable_source_is_missing_input() {
    let _serial = common::serial();
    let dir = tempdir().unwrap();
    install_fake_smarts(&dir.path().join("smarts"), &OUTCOMES);
    let inp = dir.path().join("inp");
    let not_a_file = inp.join("birds_000000.inp.txt");
    fs::create_dir_all(&not_a_file).unwrap();
    let dangling = inp.join("birds_000002.inp.txt");
    std::os::unix::fs::symlink(inp.join("deleted.inp.txt"), &dangling).unwrap();
    let files = vec![not_a_file, write_document(&inp, "birds", "000001"), dangling];

    let runner = BatchRunner::new(&config(dir.path())).unwrap();
    let results = runner
        .process(&files, &dir.path().join("results.csv"))
        .unwrap();

    assert_eq!(
        results,
        vec![
            ResultCode::MissingInput,
            ResultCode::Irradiance("886.37".to_string()),
            ResultCode::MissingInput,
        ]
    );
}

#[test]
fn test_blocked_staging_stops_the_batch() {
    let _serial = common::serial();
    let dir = tempdir().unwrap();
    let smarts = dir.path().join("smarts");
    install_fake_smarts(&smarts, &OUTCOMES);
    // the fixed input name is taken by a directory, so nothing can be staged
    fs::create_dir_all(smarts.join("smarts295.inp.txt")).unwrap();
    let inp = dir.path().join("inp");
    let files = vec![
        inp.join("birds_000000.inp.txt"),
        write_document(&inp, "birds", "000001"),
    ];
    let results_file = dir.path().join("results.csv");

    let runner = BatchRunner::new(&config(dir.path())).unwrap();
    let result = runner.process(&files, &results_file);

    assert!(matches!(result, Err(RunError::Stage { .. })));
    // the row before the failure is still reported
    assert_eq!(read(&results_file), "SMARTSirr\n-1\n");
}
