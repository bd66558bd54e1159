use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run_simulation(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_junction_sim"))
        .args(args)
        .env("RUST_LOG", "warn,junction_sim=info")
        .output()
        .expect("Failed to execute simulation")
}

/// Test that the simulation runs to completion with the sample input files
#[test]
fn test_simulation_runs_with_sample_files() {
    let output = run_simulation(&[
        "--properties",
        concat!(env!("CARGO_MANIFEST_DIR"), "/data/properties.txt"),
        "--probabilities",
        concat!(env!("CARGO_MANIFEST_DIR"), "/data/probabilities.txt"),
        "--ticks",
        "250",
        "--seed",
        "1",
    ]);

    assert!(
        output.status.success(),
        "Simulation failed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("laneLength      : 10"), "Missing setup listing");
    assert!(stdout.contains("Morning rush"), "Missing regime comment");
    assert!(
        stdout.contains("------------- Time = 250 ----------------------"),
        "Did not reach tick 250"
    );
    // Two full batches of 100 and one partial batch
    assert_eq!(stdout.matches("=== Statistics after").count(), 3);
    assert!(stdout.contains("Percent time steps with block:"));
    assert!(stdout.contains("Percent time steps with queue:"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Junction setup: 5 regimes over a 260-tick cycle"));
    assert_eq!(stderr.matches("Batch done at tick").count(), 3);
    assert!(stderr.contains("Batch done at tick 250:"));
    assert!(
        stderr.contains("SIMULATION COMPLETE"),
        "Simulation did not complete properly. stderr: {}",
        stderr
    );
}

/// Test that quiet mode skips the per-tick snapshots
#[test]
fn test_quiet_mode_prints_only_statistics() {
    let output = run_simulation(&["--ticks", "50", "--quiet"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Time ="));
    assert!(stdout.contains("=== Statistics after 50 time steps ==="));
}

/// Test that a missing parameter file stops the run before any tick
#[test]
fn test_missing_properties_file_is_fatal() {
    let output = run_simulation(&["--properties", "does/not/exist.txt"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not be loaded"), "stderr: {}", stderr);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Time ="));
}

/// Run the binary in interactive mode, feeding `input` on stdin
fn run_interactive(input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_junction_sim"))
        .args(["--interactive", "--quiet", "--batch", "20", "--seed", "3"])
        .env("RUST_LOG", "warn,junction_sim=info")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start simulation");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write answers");
    child.wait_with_output().expect("Failed to wait for simulation")
}

/// Test that closed stdin ends an interactive run after the first batch
#[test]
fn test_interactive_stops_at_end_of_input() {
    let output = run_interactive("");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("Continue (y/n)?").count(), 1);
    assert!(stdout.contains("=== Statistics after 20 time steps ==="));
    assert!(!stdout.contains("=== Statistics after 40 time steps ==="));
}

/// Test that answering anything but "n" runs another batch
#[test]
fn test_interactive_continues_until_no() {
    let output = run_interactive("y\n\nn\n");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("Continue (y/n)?").count(), 3);
    assert!(stdout.contains("=== Statistics after 60 time steps ==="));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SIMULATION COMPLETE"));
}
