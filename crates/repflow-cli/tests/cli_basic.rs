//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with HOME pointed at a temporary directory
//! so the user's real configuration is never touched.

use std::path::Path;
use std::process::Command;

const CATALOG: &str = r#"
[[plans]]
company_id = "acme"
vertical_id = "wellness"

[[plans.ranks]]
name = "Starter"
order = 0
required_group_volume = 0.0
estimated_payout = 0.0

[[plans.ranks]]
name = "TeamLeader"
order = 1
required_group_volume = 5000.0
estimated_payout = 2200.0

[flow]
contact_to_qualified_rate = 0.3
qualified_to_close_rate = 0.2
work_days_per_week = 5
reactivation_fraction = 0.1
average_volume_per_person = 250.0
follow_up = { max_touches = 3, interval_days = 2 }

[adapters.home-parties]
party_plan = { guests_per_party = 8 }
"#;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_repflow-cli"))
        .args(args)
        .env("HOME", home)
        .env_remove("REPFLOW_ENV")
        .env_remove("REPFLOW_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn setup() -> (tempfile::TempDir, String) {
    let home = tempfile::tempdir().unwrap();
    let catalog = home.path().join("catalog.toml");
    std::fs::write(&catalog, CATALOG).unwrap();
    let catalog = catalog.to_string_lossy().to_string();
    (home, catalog)
}

#[test]
fn test_goal_calc_json() {
    let (home, catalog) = setup();
    let (code, stdout, stderr) = run_cli(
        home.path(),
        &[
            "--catalog", &catalog, "goal", "calc",
            "--type", "volume", "--target", "5000", "--horizon", "6",
            "--company", "acme", "--json",
        ],
    );
    assert_eq!(code, 0, "goal calc failed: {stderr}");

    let result: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(result["resolved_rank"]["name"], "TeamLeader");
    assert_eq!(result["vertical_id"], "wellness");
    assert_eq!(result["required_headcount"]["customers"], 14);
    assert_eq!(result["required_headcount"]["partners"], 6);
    assert_eq!(result["needed_contacts"], 334);
    assert_eq!(result["feasible"], true);
}

#[test]
fn test_goal_calc_text() {
    let (home, catalog) = setup();
    let (code, stdout, _) = run_cli(
        home.path(),
        &[
            "--catalog", &catalog, "goal", "calc",
            "--type", "rank", "--target", "TeamLeader", "--horizon", "3",
            "--company", "acme",
        ],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("TeamLeader"));
    assert!(stdout.contains("Feasible: yes"));
}

#[test]
fn test_goal_calc_unreachable_warns() {
    let (home, catalog) = setup();
    let (code, stdout, _) = run_cli(
        home.path(),
        &[
            "--catalog", &catalog, "goal", "calc",
            "--type", "income", "--target", "1000000", "--horizon", "6",
            "--company", "acme", "--json",
        ],
    );
    assert_eq!(code, 0);
    let result: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(result["feasible"], false);
    let keys: Vec<&str> = result["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|w| w["key"].as_str())
        .collect();
    assert!(keys.contains(&"unreachable_goal"));
}

#[test]
fn test_goal_calc_unknown_company_fails() {
    let (home, catalog) = setup();
    let (code, _, stderr) = run_cli(
        home.path(),
        &[
            "--catalog", &catalog, "goal", "calc",
            "--type", "volume", "--target", "100", "--horizon", "1",
            "--company", "nope", "--vertical", "wellness",
        ],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("nope"));
}

#[test]
fn test_goal_calc_rejects_non_numeric_target() {
    let (home, catalog) = setup();
    let (code, _, stderr) = run_cli(
        home.path(),
        &[
            "--catalog", &catalog, "goal", "calc",
            "--type", "income", "--target", "lots", "--horizon", "1",
            "--company", "acme",
        ],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("not a number"));
}

#[test]
fn test_goal_calc_uses_config_defaults() {
    let (home, catalog) = setup();
    assert_eq!(run_cli(home.path(), &["config", "set", "catalog_path", &catalog]).0, 0);
    assert_eq!(run_cli(home.path(), &["config", "set", "goal.company_id", "acme"]).0, 0);
    assert_eq!(run_cli(home.path(), &["config", "set", "goal.horizon_months", "6"]).0, 0);

    let (code, stdout, stderr) = run_cli(
        home.path(),
        &["goal", "calc", "--type", "volume", "--target", "5000", "--json"],
    );
    assert_eq!(code, 0, "goal calc failed: {stderr}");
    let result: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(result["company_id"], "acme");
}

#[test]
fn test_plan_list_and_show() {
    let (home, catalog) = setup();
    let (code, stdout, _) = run_cli(home.path(), &["--catalog", &catalog, "plan", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("acme"));

    let (code, stdout, _) =
        run_cli(home.path(), &["--catalog", &catalog, "plan", "show", "acme", "--json"]);
    assert_eq!(code, 0);
    let plan: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(plan["ranks"].as_array().unwrap().len(), 2);

    let (code, _, _) = run_cli(home.path(), &["--catalog", &catalog, "plan", "show", "missing"]);
    assert_eq!(code, 1);
}

#[test]
fn test_vertical_list() {
    let (home, catalog) = setup();
    let (code, stdout, _) = run_cli(home.path(), &["--catalog", &catalog, "vertical", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("home-parties"));
    assert!(stdout.contains("adapter: flow"));
    assert!(stdout.contains("wellness"));
}

#[test]
fn test_missing_catalog_fails() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["plan", "list"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("no plan catalog"));
}

#[test]
fn test_config_get_set() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(home.path(), &["config", "set", "output.json", "true"]);
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "output.json"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "true");

    let (code, _, _) = run_cli(home.path(), &["config", "set", "no.such.key", "1"]);
    assert_eq!(code, 1);
}

#[test]
fn test_completions() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("repflow-cli"));
}
