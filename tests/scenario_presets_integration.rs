use std::path::PathBuf;
use std::process::{Command, Output};

#[derive(Debug)]
struct Summary {
    purchased_kwh: f64,
    self_sufficiency_pct: f64,
}

#[test]
fn scenario_files_run_via_cli_and_produce_distinct_dynamics() {
    let baseline = run_and_parse_summary(&["--scenario", &scenario("baseline.toml")]);
    let industrial = run_and_parse_summary(&["--scenario", &scenario("industrial.toml")]);
    let windy = run_and_parse_summary(&["--scenario", &scenario("windy.toml")]);

    assert!(
        industrial.purchased_kwh > baseline.purchased_kwh + 100.0,
        "expected industrial to buy far more than baseline: baseline={:.3}, industrial={:.3}",
        baseline.purchased_kwh,
        industrial.purchased_kwh
    );
    assert!(
        baseline.self_sufficiency_pct > industrial.self_sufficiency_pct,
        "expected baseline to be more self-sufficient: baseline={:.1}, industrial={:.1}",
        baseline.self_sufficiency_pct,
        industrial.self_sufficiency_pct
    );
    assert!(windy.self_sufficiency_pct.is_finite());
}

#[test]
fn presets_run_via_cli() {
    for preset in ["baseline", "mixed"] {
        let summary = run_and_parse_summary(&["--preset", preset, "--ticks", "12"]);
        assert!(summary.purchased_kwh >= 0.0);
    }
}

#[test]
fn state_flag_prints_json_snapshot() {
    let output = run(&["--preset", "mixed", "--ticks", "5", "--state"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout should be valid UTF-8");
    let json = stdout
        .lines()
        .find(|line| line.starts_with('{'))
        .unwrap_or_else(|| panic!("missing JSON snapshot in output: {stdout}"));
    let state: serde_json::Value = serde_json::from_str(json).expect("snapshot should parse");
    assert_eq!(state["time"], 5.0);
    assert_eq!(state["battery"]["capacity"], 200.0);
    assert!(state["producers"]["wind"].is_number());
}

#[test]
fn telemetry_out_writes_csv() {
    let path = std::env::temp_dir().join(format!("microgrid-sim-{}.csv", std::process::id()));
    let output = run(&[
        "--preset",
        "baseline",
        "--telemetry-out",
        path.to_str().expect("temp path should be UTF-8"),
    ]);
    assert!(output.status.success());

    let csv = std::fs::read_to_string(&path).expect("CSV should be written");
    std::fs::remove_file(&path).ok();
    let mut lines = csv.lines();
    assert!(lines.next().is_some_and(|h| h.starts_with("tick,time_hr,")));
    assert_eq!(lines.count(), 24);
}

#[test]
fn invalid_input_exits_nonzero() {
    assert!(!run(&["--preset", "nonexistent"]).status.success());
    assert!(!run(&["--ticks", "0"]).status.success());
    assert!(!run(&["--scenario", "no/such/file.toml"]).status.success());
    assert!(!run(&["--bogus"]).status.success());
}

fn scenario(name: &str) -> String {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "scenarios", name].iter().collect();
    path.to_string_lossy().into_owned()
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_microgrid-sim"))
        .args(args)
        .output()
        .expect("microgrid-sim process should run")
}

fn run_and_parse_summary(args: &[&str]) -> Summary {
    let output = run(args);
    assert!(
        output.status.success(),
        "run failed for {args:?}: stderr={} ",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).expect("stdout should be valid UTF-8");
    Summary {
        purchased_kwh: parse_metric(&stdout, "Purchased from grid:"),
        self_sufficiency_pct: parse_metric(&stdout, "Self-sufficiency:"),
    }
}

fn parse_metric(stdout: &str, label: &str) -> f64 {
    let line = stdout
        .lines()
        .find(|line| line.trim_start().starts_with(label))
        .unwrap_or_else(|| panic!("missing summary line `{label}` in output: {stdout}"));

    let raw = line
        .split_once(':')
        .map(|(_, right)| right.trim())
        .unwrap_or_else(|| panic!("invalid summary format for line `{line}`"));

    let numeric = raw
        .split_whitespace()
        .next()
        .unwrap_or(raw)
        .trim_end_matches('%');
    numeric
        .parse::<f64>()
        .unwrap_or_else(|_| panic!("failed parsing `{numeric}` from summary line `{line}`"))
}
