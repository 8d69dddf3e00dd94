use assert_cmd::cargo::cargo_bin_cmd;
use serde::Deserialize;
use std::{error::Error, fs, path::PathBuf};

#[derive(Deserialize)]
struct Landmark {
    index: usize,
    amplitude: f64,
    time: f64,
}

#[derive(Deserialize)]
struct Complexes {
    p: Vec<Landmark>,
    q: Vec<Landmark>,
    r: Vec<Landmark>,
    s: Vec<Landmark>,
    t: Vec<Landmark>,
}

#[derive(Deserialize)]
struct DetectOutput {
    complexes: Complexes,
    dropped: Vec<serde_json::Value>,
}

const DETECT_ARGS: [&str; 7] = [
    "detect",
    "--r-threshold",
    "0.5",
    "--heart-rate-hz",
    "1",
    "--s-search",
    "after-r",
];

#[test]
fn detects_synthetic_text_trace() -> Result<(), Box<dyn Error>> {
    let recording = sample_path("test_data/synthetic_pqrst.txt");

    let mut cmd = cargo_bin_cmd!("pqrst");
    cmd.args(DETECT_ARGS)
        .args(["--fs", "100", "--input", &recording]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let actual: DetectOutput = serde_json::from_slice(&output)?;

    let r: Vec<usize> = actual.complexes.r.iter().map(|l| l.index).collect();
    assert_eq!(r, vec![40, 140, 240, 340, 440]);
    assert!(actual.dropped.is_empty());
    assert_offsets(&actual.complexes, &r);
    Ok(())
}

#[test]
fn csv_time_column_drives_landmark_times() -> Result<(), Box<dyn Error>> {
    let recording = sample_path("test_data/synthetic_pqrst.csv");

    let mut cmd = cargo_bin_cmd!("pqrst");
    cmd.args(DETECT_ARGS)
        .args(["--csv", &recording, "--time-column", "time"]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let actual: DetectOutput = serde_json::from_slice(&output)?;

    assert_eq!(actual.complexes.r.len(), 5);
    assert_close(actual.complexes.r[0].time, 0.41, 1e-9);
    assert_close(actual.complexes.t[4].time, 4.71, 1e-9);
    assert_close(actual.complexes.s[2].amplitude, -0.4, 1e-12);
    Ok(())
}

#[test]
fn wfdb_record_lead_is_detected() -> Result<(), Box<dyn Error>> {
    let header = sample_path("test_data/wfdb/pqrst01.hea");

    let mut cmd = cargo_bin_cmd!("pqrst");
    cmd.args(DETECT_ARGS)
        .args(["--wfdb-header", &header, "--wfdb-lead", "0"]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let actual: DetectOutput = serde_json::from_slice(&output)?;
    let r: Vec<usize> = actual.complexes.r.iter().map(|l| l.index).collect();
    assert_eq!(r, vec![40, 140, 240, 340, 440]);
    assert_close(actual.complexes.r[0].amplitude, 1.0, 1e-12);

    let mut cmd = cargo_bin_cmd!("pqrst");
    cmd.args(DETECT_ARGS)
        .args(["--wfdb-header", &header, "--wfdb-lead", "2"]);
    cmd.assert().failure();
    Ok(())
}

#[test]
fn config_file_supplies_detector_options() -> Result<(), Box<dyn Error>> {
    let recording = sample_path("test_data/synthetic_pqrst.txt");
    let config = sample_path("test_data/detector.toml");

    let mut cmd = cargo_bin_cmd!("pqrst");
    cmd.args(["detect", "--fs", "100", "--input", &recording, "--config", &config]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let actual: DetectOutput = serde_json::from_slice(&output)?;
    assert_eq!(actual.complexes.r.len(), 5);

    // a flag overrides the file
    let mut cmd = cargo_bin_cmd!("pqrst");
    cmd.args([
        "detect",
        "--fs",
        "100",
        "--input",
        &recording,
        "--config",
        &config,
        "--r-threshold",
        "2",
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let actual: DetectOutput = serde_json::from_slice(&output)?;
    assert!(actual.complexes.r.is_empty());
    Ok(())
}

#[test]
fn row_layout_matches_column_layout() -> Result<(), Box<dyn Error>> {
    let column = fs::read_to_string(sample_path("test_data/synthetic_pqrst.txt"))?;
    let row: Vec<&str> = column
        .lines()
        .filter(|line| !line.starts_with('#'))
        .collect();
    let dir = tempfile::tempdir()?;
    let row_path = dir.path().join("row.txt");
    fs::write(&row_path, row.join(","))?;

    let mut cmd = cargo_bin_cmd!("pqrst");
    cmd.args(DETECT_ARGS)
        .args(["--fs", "100", "--input", row_path.to_str().expect("utf8 path")]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let actual: DetectOutput = serde_json::from_slice(&output)?;
    let r: Vec<usize> = actual.complexes.r.iter().map(|l| l.index).collect();
    assert_eq!(r, vec![40, 140, 240, 340, 440]);
    Ok(())
}

#[test]
fn flat_stdin_signal_yields_empty_result() -> Result<(), Box<dyn Error>> {
    let flat = "0\n".repeat(300);
    let mut cmd = cargo_bin_cmd!("pqrst");
    cmd.args(["detect", "--fs", "100"]).write_stdin(flat);
    let output = cmd.assert().success().get_output().stdout.clone();
    let actual: DetectOutput = serde_json::from_slice(&output)?;
    for seq in [
        &actual.complexes.p,
        &actual.complexes.q,
        &actual.complexes.r,
        &actual.complexes.s,
        &actual.complexes.t,
    ] {
        assert!(seq.is_empty());
    }
    Ok(())
}

#[test]
fn non_positive_heart_rate_is_rejected() {
    let recording = sample_path("test_data/synthetic_pqrst.txt");
    for rate in ["0", "-1.5"] {
        let mut cmd = cargo_bin_cmd!("pqrst");
        cmd.args([
            "detect",
            "--fs",
            "100",
            "--input",
            &recording,
            "--heart-rate-hz",
            rate,
        ]);
        let output = cmd.assert().failure().get_output().stderr.clone();
        let stderr = String::from_utf8_lossy(&output);
        assert!(stderr.contains("heart rate"), "unexpected stderr: {stderr}");
    }
}

fn assert_offsets(c: &Complexes, r: &[usize]) {
    for (seq, offset) in [(&c.p, -20isize), (&c.q, -10), (&c.s, 10), (&c.t, 30)] {
        let found: Vec<usize> = seq.iter().map(|l| l.index).collect();
        let expected: Vec<usize> = r.iter().map(|&i| (i as isize + offset) as usize).collect();
        assert_eq!(found, expected, "offset {offset}");
    }
}

fn assert_close(a: f64, b: f64, tol: f64) {
    let diff = (a - b).abs();
    assert!(
        diff <= tol,
        "diff {} exceeded tol {} ({} vs {})",
        diff,
        tol,
        a,
        b
    );
}

fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .expect("crates dir")
        .parent()
        .expect("workspace root")
        .to_path_buf()
}

fn sample_path(relative: &str) -> String {
    workspace_root()
        .join(relative)
        .to_string_lossy()
        .to_string()
}
