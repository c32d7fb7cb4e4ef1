use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("taskboard-{nanos}-{file_name}"))
}

fn write_store(path: &Path, tasks: serde_json::Value) {
    let content = serde_json::json!({
        "schema_version": 1,
        "tasks": tasks
    });
    std::fs::write(path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

fn read_store(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn stored_ids(stored: &serde_json::Value) -> Vec<String> {
    stored["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["id"].as_str().unwrap().to_string())
        .collect()
}

fn run(store_path: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_taskboard"))
        .args(args)
        .env("TASKBOARD_STORE_PATH", store_path)
        .env("TASKBOARD_CONFIG_PATH", temp_path("no-config.json"))
        .output()
        .expect("failed to run taskboard")
}

fn three_todo_tasks() -> serde_json::Value {
    let tasks: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|id| {
            serde_json::json!({
                "id": id,
                "title": format!("task {id}"),
                "description": "d",
                "status": "todo",
                "priority": "medium",
                "createdAt": "2025-12-20T00:00:00Z"
            })
        })
        .collect();
    serde_json::Value::Array(tasks)
}

#[test]
fn move_command_changes_column() {
    let store_path = temp_path("cli-move.json");
    write_store(&store_path, three_todo_tasks());

    let output = run(&store_path, &["move", "b", "done"]);

    let stored = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Moved task: task b (b) to Done"));
    assert_eq!(stored["tasks"][1]["status"], "done");
    assert_eq!(stored_ids(&stored), vec!["a", "b", "c"]);
}

#[test]
fn move_command_to_same_column_is_noop() {
    let store_path = temp_path("cli-move-same.json");
    write_store(&store_path, three_todo_tasks());
    let before = std::fs::read_to_string(&store_path).unwrap();

    let output = run(&store_path, &["move", "a", "todo"]);

    let after = std::fs::read_to_string(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    assert_eq!(before, after);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Task already in To Do"));
}

#[test]
fn move_command_reports_missing_id() {
    let store_path = temp_path("cli-move-missing.json");
    write_store(&store_path, three_todo_tasks());

    let output = run(&store_path, &["move", "zzz", "done"]);
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input - task not found"));
}

#[test]
fn drop_command_reorders_within_column() {
    let store_path = temp_path("cli-drop-reorder.json");
    write_store(&store_path, three_todo_tasks());

    let output = run(
        &store_path,
        &["drop", "c", "--from", "todo", "--from-index", "2", "--to", "todo", "--index", "0"],
    );

    let stored = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    assert_eq!(stored_ids(&stored), vec!["c", "a", "b"]);
}

#[test]
fn drop_command_moves_across_columns() {
    let store_path = temp_path("cli-drop-move.json");
    write_store(&store_path, three_todo_tasks());

    let output = run(
        &store_path,
        &["--json", "drop", "a", "--from", "todo", "--to", "in-progress"],
    );

    let stored = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let printed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed["status"], "in-progress");
    assert_eq!(stored["tasks"][0]["status"], "in-progress");
}

#[test]
fn drop_command_in_place_changes_nothing() {
    let store_path = temp_path("cli-drop-noop.json");
    write_store(&store_path, three_todo_tasks());
    let before = std::fs::read_to_string(&store_path).unwrap();

    let output = run(
        &store_path,
        &["drop", "b", "--from", "todo", "--from-index", "1", "--to", "todo", "--index", "1"],
    );

    let after = std::fs::read_to_string(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    assert_eq!(before, after);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No change"));
}
