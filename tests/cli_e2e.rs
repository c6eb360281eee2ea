use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde_json::Value;

const FIXTURE: &str = include_str!("fixtures/projects.yaml");

fn run_cli(dir: &Path, args: &[&str], stdin: Option<&str>) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_edgemap"));
    cmd.current_dir(dir)
        .args(args)
        .env("HOME", dir.join("home"))
        .env_remove("EDGEMAP_LOG");
    if stdin.is_none() {
        return cmd.output().expect("command runs");
    }

    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = cmd.spawn().expect("command spawns");
    {
        let mut pipe = child.stdin.take().expect("stdin pipe");
        pipe.write_all(stdin.expect("stdin content").as_bytes())
            .expect("stdin write");
    }
    child.wait_with_output().expect("command output")
}

fn run_json(dir: &Path, args: &[&str], stdin: Option<&str>) -> Value {
    let output = run_cli(dir, args, stdin);
    assert!(
        output.status.success(),
        "command failed: args={args:?}\nstdout={}\nstderr={}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("json stdout")
}

fn run_error(dir: &Path, args: &[&str]) -> Value {
    let output = run_cli(dir, args, None);
    assert_eq!(output.status.code(), Some(1), "args={args:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    let line = stderr
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .expect("error line");
    serde_json::from_str(line).expect("json error envelope")
}

fn ids(payload: &Value) -> Vec<i64> {
    payload["projects"]
        .as_array()
        .expect("projects array")
        .iter()
        .map(|card| card["id"].as_i64().expect("id"))
        .collect()
}

fn workspace() -> tempfile::TempDir {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(temp.path().join("home")).expect("home dir");
    fs::write(temp.path().join("projects.yaml"), FIXTURE).expect("seed catalog");
    temp
}

#[test]
fn view_defaults_rank_whole_catalog_by_ratio() {
    let temp = workspace();
    let view = run_json(temp.path(), &["view"], None);

    assert_eq!(ids(&view), vec![5, 3, 1, 2, 6, 4]);
    assert_eq!(view["shown"], 6);
    assert_eq!(view["query"]["category"], "all");
    assert_eq!(view["query"]["statuses"], Value::Null);
    assert_eq!(view["query"]["sort"], "ratio");
    assert_eq!(view["summary"]["total"], 6);
    assert_eq!(view["summary"]["complete"], 1);
    assert_eq!(view["summary"]["testing"], 1);
    assert_eq!(view["summary"]["in_progress"], 1);
    assert_eq!(view["summary"]["residual"], 3);
    assert!(view["generated_at"].as_str().is_some());

    let top = &view["projects"][0];
    assert_eq!(top["rank"], 1);
    assert_eq!(top["ratio_display"], "3.0×");
    assert_eq!(top["status_label"], "Complete");

    let fatigue = &view["projects"][5];
    assert_eq!(fatigue["status"], "planned");
    assert_eq!(fatigue["depends_on"][0]["id"], 42);
    assert_eq!(fatigue["depends_on"][0]["title"], "?");

    let series = view["scatter"]["series"].as_array().expect("series");
    assert_eq!(series.len(), 2);
    assert_eq!(series[0]["name"], "Best Practice");
    assert_eq!(series[0]["points"].as_array().map(Vec::len), Some(3));
    assert_eq!(series[1]["name"], "Radical");
}

#[test]
fn view_flags_filter_and_sort() {
    let temp = workspace();

    let radical = run_json(
        temp.path(),
        &["view", "--category", "radical", "--sort", "edge"],
        None,
    );
    assert_eq!(ids(&radical), vec![3, 4]);
    assert_eq!(radical["summary"]["total"], 6);

    let early = run_json(temp.path(), &["view", "--status", "planned,idea"], None);
    assert_eq!(ids(&early), vec![3, 4]);
    assert_eq!(early["query"]["statuses"], serde_json::json!(["idea", "planned"]));

    let sweet = run_json(
        temp.path(),
        &["view", "--min-edge", "8", "--max-complexity", "5"],
        None,
    );
    assert_eq!(ids(&sweet), vec![3, 1]);

    let shelved = run_json(temp.path(), &["view", "--status", "shelved"], None);
    assert_eq!(ids(&shelved), vec![6]);
    assert_eq!(shelved["query"]["statuses"], serde_json::json!(["shelved"]));

    let by_status = run_json(temp.path(), &["view", "--sort", "status"], None);
    assert_eq!(ids(&by_status), vec![5, 1, 2, 4, 3, 6]);

    let none = run_json(temp.path(), &["view", "--min-edge", "10"], None);
    assert_eq!(none["shown"], 0);
    assert_eq!(none["summary"]["total"], 6);
}

#[test]
fn view_pretty_prints_summary_and_cards() {
    let temp = workspace();
    let output = run_cli(temp.path(), &["view", "--pretty", "--category", "best-practice"], None);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    let lines = stdout.lines().collect::<Vec<_>>();
    assert_eq!(
        lines[0],
        "6 projects · 1 complete · 1 testing · 1 in progress · 3 planned/idea"
    );
    assert_eq!(lines[1], "projects: 3 shown (sort=ratio)");
    assert_eq!(lines[2], "1. #5 Polar Diagram Refresh  3.0× [Complete]");
    assert!(stdout.contains("   notes: Shipped with the spring release.\n"));
    assert!(stdout.contains("   depends on: #1 Weather Model Scoring Engine\n"));
}

#[test]
fn stats_and_deps_cover_full_catalog() {
    let temp = workspace();

    let stats = run_json(temp.path(), &["stats"], None);
    assert_eq!(stats["summary"]["total"], 6);
    assert_eq!(
        stats["summary"]["statuses"],
        serde_json::json!(["complete", "idea", "in-progress", "planned", "shelved", "testing"])
    );
    assert_eq!(stats["summary"]["by_status"]["shelved"], 1);

    let deps = run_json(temp.path(), &["deps"], None);
    let rows = deps["dependencies"].as_array().expect("dependency rows");
    assert_eq!(
        rows.iter()
            .map(|row| row["id"].as_i64().expect("id"))
            .collect::<Vec<_>>(),
        vec![2, 3, 4]
    );
    assert_eq!(
        rows[1]["line"],
        "#3 Ensemble Divergence Alerts ← depends on #1 Weather Model Scoring Engine, #2 Live GRIB Nudging"
    );
    assert_eq!(rows[2]["line"], "#4 Crew Fatigue Model ← depends on #42 ?");
    assert_eq!(rows[2]["depends_on"][0]["resolved"], false);

    let output = run_cli(temp.path(), &["deps", "--pretty"], None);
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert!(stdout.starts_with("dependencies: 3\n"));
}

#[test]
fn reads_catalog_from_stdin() {
    let temp = tempfile::tempdir().expect("tempdir");
    let view = run_json(
        temp.path(),
        &["view", "--catalog", "-"],
        Some("- {id: 5, title: Five, category: radical, edge: 8, complexity: 4}\n- {id: 3, title: Three, category: radical, edge: 6, complexity: 3}\n"),
    );
    assert_eq!(ids(&view), vec![3, 5]);
}

#[test]
fn config_layers_set_catalog_and_view_defaults() {
    let temp = workspace();
    let root = temp.path();
    fs::create_dir_all(root.join("data")).expect("data dir");
    fs::create_dir_all(root.join("nested/deeper")).expect("nested dir");
    fs::rename(root.join("projects.yaml"), root.join("data/portfolio.yaml")).expect("move catalog");
    fs::write(
        root.join(".edgemap.yml"),
        "catalog: data/portfolio.yaml\nview:\n  category: radical\n  sort: edge\n",
    )
    .expect("project config");

    let view = run_json(&root.join("nested/deeper"), &["view"], None);
    assert_eq!(ids(&view), vec![3, 4]);
    assert_eq!(view["query"]["sort"], "edge");

    let flagged = run_json(
        &root.join("nested/deeper"),
        &["view", "--category", "all", "--max-complexity", "4"],
        None,
    );
    assert_eq!(ids(&flagged), vec![3, 5]);

    fs::write(root.join("override.yml"), "view:\n  category: best-practice\n").expect("explicit config");
    let explicit = run_json(root, &["view", "--config", "override.yml"], None);
    assert_eq!(ids(&explicit), vec![1, 2, 5]);
}

#[test]
fn errors_use_json_envelope() {
    let temp = workspace();
    let root = temp.path();

    let err = run_error(root, &["view", "--min-edge", "11"]);
    assert_eq!(err["error"]["code"], "invalid_view_config");

    let err = run_error(root, &["view", "--sort", "easiest"]);
    assert_eq!(err["error"]["code"], "config_error");
    assert_eq!(err["error"]["message"], "unknown sort key `easiest`");


    let err = run_error(root, &["view", "--catalog", "missing.yaml"]);
    assert_eq!(err["error"]["code"], "catalog_error");

    fs::write(root.join("broken.yaml"), "- id: 1\n  title: [unclosed\n").expect("broken catalog");
    let err = run_error(root, &["stats", "--catalog", "broken.yaml"]);
    assert_eq!(err["error"]["code"], "catalog_error");

    fs::write(root.join("dupes.yaml"), "- {id: 1, title: A, category: radical, edge: 5, complexity: 5}\n- {id: 1, title: B, category: radical, edge: 5, complexity: 5}\n")
        .expect("duplicate catalog");
    let err = run_error(root, &["deps", "--catalog", "dupes.yaml"]);
    assert_eq!(err["error"]["code"], "catalog_error");

    let err = run_error(root, &["view", "--config", "absent.yml"]);
    assert_eq!(err["error"]["code"], "config_error");

    let err = run_error(root, &["watch", "--catalog", "-"]);
    assert_eq!(err["error"]["code"], "watch_error");
}
