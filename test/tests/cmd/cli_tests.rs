use std::io::Write;

use clap::Parser;
use wordcheck::cli::{CLI, Options, SutKind};
use wordcheck_common::Opcode;
use wordcheck_harness::{BatchReport, DispatchMode, ReportMode, Verdict};

fn options(args: &[&str]) -> Options {
    let mut argv = vec!["wordcheck"];
    argv.extend_from_slice(args);
    CLI::parse_from(argv).opts
}

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("wordcheck-{}-{name}", std::process::id()))
}

#[tokio::test]
async fn vm_run_passes() {
    let report = wordcheck::run(&options(&["-n", "10", "--seed", "7", "--boundaries"]))
        .await
        .unwrap();
    assert_eq!(report.verdict, Verdict::AllPassed);
    assert_eq!(report.seed, Some(7));
    assert_eq!(report.vectors, 10 + 121);
}

#[tokio::test]
async fn faulty_run_reports_the_corrupted_opcode() {
    let report = wordcheck::run(&options(&[
        "--sut",
        "faulty",
        "--fault.opcode",
        "smod",
        "--fault.bit",
        "100",
        "--opcodes",
        "sdiv,smod",
        "-n",
        "5",
    ]))
    .await
    .unwrap();
    let mismatch = report.first_mismatch().unwrap();
    assert_eq!(mismatch.vector_index, 0);
    assert_eq!(mismatch.outcome.opcode, Opcode::SMod);
}

#[tokio::test]
async fn config_file_is_overridden_by_flags() {
    let path = temp_path("config.json");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(
        file,
        r#"{{
            "vectors": 3,
            "mask": ["add", "lt"],
            "report": "exhaustive",
            "dispatch": {{ "mode": "batched", "chunk_size": 2 }},
            "invocation_timeout": "2s"
        }}"#
    )
    .unwrap();

    let opts = options(&["--config", path.to_str().unwrap(), "-n", "9"]);
    let config = opts.harness_config().unwrap();
    assert_eq!(config.vectors, 9);
    assert_eq!(config.report, ReportMode::Exhaustive);
    assert_eq!(config.dispatch, DispatchMode::Batched { chunk_size: 2 });
    assert_eq!(config.mask.len(), 2);

    let opts = options(&["--config", path.to_str().unwrap(), "--sut", "loopback"]);
    assert_eq!(opts.sut, SutKind::Loopback);
    let report = wordcheck::run(&opts).await.unwrap();
    assert_eq!(report.comparisons, 6);
    std::fs::remove_file(path).unwrap();
}

#[tokio::test]
async fn report_file_round_trips() {
    let path = temp_path("report.json");
    let opts = options(&[
        "--sut",
        "faulty",
        "-n",
        "4",
        "--exhaustive",
        "--report",
        path.to_str().unwrap(),
    ]);
    let report = wordcheck::run(&opts).await.unwrap();

    let written: BatchReport =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written, report);
    assert_eq!(written.verdict.outcomes().count(), 4);
    std::fs::remove_file(path).unwrap();
}

#[tokio::test]
async fn bad_config_is_an_error() {
    assert!(wordcheck::run(&options(&["--concurrency", "0"])).await.is_err());
    assert!(wordcheck::run(&options(&["--opcodes", "blockhash"])).await.is_err());
}

#[tokio::test]
async fn outcomes_map_to_exit_codes() {
    let passed = wordcheck::run(&options(&["-n", "3", "--seed", "1"])).await;
    assert_eq!(wordcheck::exit_code(&passed), wordcheck::EXIT_ALL_PASSED);

    let mismatch = wordcheck::run(&options(&["--sut", "faulty", "-n", "3"])).await;
    assert_eq!(wordcheck::exit_code(&mismatch), wordcheck::EXIT_MISMATCH);

    let error = wordcheck::run(&options(&["--chunk-size", "0"])).await;
    assert_eq!(wordcheck::exit_code(&error), wordcheck::EXIT_ERROR);
}

#[tokio::test]
async fn oversized_config_timeout_is_an_error() {
    let path = temp_path("huge-timeout.json");
    std::fs::write(&path, r#"{ "invocation_timeout": "99999999999999999999999h" }"#).unwrap();

    let outcome = wordcheck::run(&options(&["--config", path.to_str().unwrap()])).await;
    assert_eq!(wordcheck::exit_code(&outcome), wordcheck::EXIT_ERROR);
    std::fs::remove_file(path).unwrap();
}
