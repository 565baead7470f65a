use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_codemon")
}

fn unique_temp_path(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("codemon-{name}-{stamp}.json"))
}

fn language_json(id: &str, name: &str, attack: u32, speed: u32) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "base_stats": {
            "hp": 100, "maxHp": 100, "attack": attack, "defense": 70,
            "specialAttack": attack, "specialDefense": 70, "speed": speed
        },
        "abilities": [
            { "name": "Compile", "type": "Physical", "power": 50, "accuracy": 90 },
            { "name": "Lint", "type": "Status", "power": 10, "accuracy": 100 }
        ]
    })
}

fn write_roster(name: &str, languages: Vec<serde_json::Value>) -> PathBuf {
    let path = unique_temp_path(name);
    let document = serde_json::json!({
        "metadata": { "version": "1.0" },
        "languages": languages
    });
    fs::write(&path, document.to_string()).expect("roster should write");
    path
}

fn valid_roster() -> PathBuf {
    write_roster(
        "roster",
        vec![
            language_json("rust", "Rust", 90, 80),
            language_json("python", "Python", 70, 60),
            language_json("go", "Go", 80, 85),
        ],
    )
}

fn run(args: &[&str]) -> Output {
    Command::new(bin())
        .args(args)
        .env_remove("CODEMON_BATTLES")
        .env_remove("CODEMON_SEED")
        .env_remove("CODEMON_TURN_ORDER")
        .output()
        .expect("codemon should run")
}

fn simulate_into(roster: &Path, out: &Path, seed: &str) -> Output {
    run(&[
        "simulate",
        roster.to_str().expect("utf-8 path"),
        "10",
        seed,
        "--out",
        out.to_str().expect("utf-8 path"),
    ])
}

#[test]
fn simulate_writes_results_document() {
    let roster = valid_roster();
    let out = unique_temp_path("results");

    let output = simulate_into(&roster, &out, "42");
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("simulated 30 battles"));

    let raw = fs::read_to_string(&out).expect("results should exist");
    let payload: serde_json::Value = serde_json::from_str(&raw).expect("results are json");
    assert_eq!(payload["metadata"]["total_battles"], 30);
    assert_eq!(payload["metadata"]["battles_per_matchup"], 10);
    assert_eq!(payload["metadata"]["random_seed"], 42);
    assert_eq!(payload["raw_results"].as_array().map(Vec::len), Some(30));
    assert!(payload["language_performance"]["rust"]["win_rate"].is_number());
    assert!(payload["matchup_statistics"]["rust_vs_python"].is_object());

    let _ = fs::remove_file(&roster);
    let _ = fs::remove_file(&out);
}

#[test]
fn simulate_with_the_same_seed_is_reproducible() {
    let roster = valid_roster();
    let first = unique_temp_path("first");
    let second = unique_temp_path("second");

    assert_eq!(simulate_into(&roster, &first, "7").status.code(), Some(0));
    assert_eq!(simulate_into(&roster, &second, "7").status.code(), Some(0));

    let read = |path: &Path| -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).expect("results exist"))
            .expect("results are json")
    };
    let (a, b) = (read(&first), read(&second));
    assert_eq!(a["language_performance"], b["language_performance"]);
    assert_eq!(a["raw_results"], b["raw_results"]);

    for path in [&roster, &first, &second] {
        let _ = fs::remove_file(path);
    }
}

#[test]
fn analyze_visualize_and_compare_read_results() {
    let roster = valid_roster();
    let out = unique_temp_path("results");
    let report = unique_temp_path("balance");
    assert_eq!(simulate_into(&roster, &out, "3").status.code(), Some(0));
    let out_str = out.to_str().expect("utf-8 path");

    let analyze = run(&[
        "analyze",
        out_str,
        "--report",
        report.to_str().expect("utf-8 path"),
    ]);
    assert_eq!(analyze.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&analyze.stdout).contains("Language Performance Analysis"));
    let balance: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).expect("balance report exists"))
            .expect("balance report is json");
    assert_eq!(balance["summary"]["languages_tested"], 3);

    let visualize = run(&["visualize", out_str]);
    assert_eq!(visualize.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&visualize.stdout).contains("Head-to-Head Matchup Matrix"));

    let compare = run(&["compare", out_str, out_str]);
    assert_eq!(compare.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&compare.stdout).contains("Balance Comparison"));

    for path in [&roster, &out, &report] {
        let _ = fs::remove_file(path);
    }
}

#[test]
fn compare_requires_two_paths() {
    let output = run(&["compare", "only-one.json"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("usage: codemon compare"));
}

#[test]
fn missing_results_file_fails() {
    let missing = unique_temp_path("missing");
    let output = run(&["analyze", missing.to_str().expect("utf-8 path")]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn validate_accepts_a_good_roster() {
    let roster = valid_roster();
    let output = run(&["validate", roster.to_str().expect("utf-8 path")]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("validation passed"));
    let _ = fs::remove_file(&roster);
}

#[test]
fn validate_and_simulate_reject_duplicate_ids() {
    let roster = write_roster(
        "dupes",
        vec![
            language_json("rust", "Rust", 90, 80),
            language_json("rust", "Rust Again", 70, 60),
        ],
    );
    let path = roster.to_str().expect("utf-8 path");

    let validate = run(&["validate", path]);
    assert_eq!(validate.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&validate.stdout).contains("duplicate id 'rust'"));

    let out = unique_temp_path("never-written");
    let simulate = simulate_into(&roster, &out, "1");
    assert_eq!(simulate.status.code(), Some(1));
    assert!(!out.exists());

    let _ = fs::remove_file(&roster);
}

#[test]
fn unknown_command_prints_usage() {
    let output = run(&[]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("usage: codemon <simulate|analyze|visualize|compare|validate>"));
}

#[test]
fn analyze_writes_the_balance_report_to_the_default_path() {
    let roster = valid_roster();
    let out = unique_temp_path("results");
    assert_eq!(simulate_into(&roster, &out, "5").status.code(), Some(0));

    let workdir = unique_temp_path("analyze-dir");
    fs::create_dir_all(&workdir).expect("workdir should be created");
    let analyze = Command::new(bin())
        .args(["analyze", out.to_str().expect("utf-8 path")])
        .current_dir(&workdir)
        .output()
        .expect("codemon should run");
    assert_eq!(analyze.status.code(), Some(0));

    let written = workdir.join("balance_report.json");
    let balance: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written).expect("default report exists"))
            .expect("balance report is json");
    assert_eq!(balance["summary"]["total_battles"], 30);

    let _ = fs::remove_dir_all(&workdir);
    let _ = fs::remove_file(&roster);
    let _ = fs::remove_file(&out);
}
