use super::TaskStorage;
use crate::error::AppError;
use crate::model::Task;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;
pub const STORE_ENV_VAR: &str = "TASKBOARD_STORE_PATH";
const STORE_FILE_NAME: &str = "tasks.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredTasks {
    schema_version: u32,
    tasks: Vec<Task>,
}

// A bare array is what the board used to keep under its storage key.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredPayload {
    Versioned(StoredTasks),
    Bare(Vec<Task>),
}

/// Resolution order: `TASKBOARD_STORE_PATH`, then the configured path, then
/// the per-user default.
pub fn store_path(configured: Option<&str>) -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if let Some(path) = configured
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path.trim()));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("taskboard")
            .join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("taskboard")
            .join(STORE_FILE_NAME))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<Vec<Task>>, AppError> {
        load_tasks(&self.path)
    }

    fn save(&self, tasks: &[Task]) -> Result<(), AppError> {
        save_tasks(&self.path, tasks)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

pub fn load_tasks(path: &Path) -> Result<Option<Vec<Task>>, AppError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let payload: StoredPayload = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid task data in {}: {}", path.display(), err))
    })?;

    match payload {
        StoredPayload::Versioned(stored) => {
            if !(1..=SCHEMA_VERSION).contains(&stored.schema_version) {
                return Err(AppError::invalid_data("schema_version mismatch"));
            }
            Ok(Some(stored.tasks))
        }
        StoredPayload::Bare(tasks) => Ok(Some(tasks)),
    }
}

pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let stored = StoredTasks {
        schema_version: SCHEMA_VERSION,
        tasks: tasks.to_vec(),
    };
    let content = serde_json::to_string_pretty(&stored)?;
    std::fs::write(path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{JsonFileStorage, SCHEMA_VERSION, load_tasks, save_tasks};
    use crate::model::{Priority, Task, TaskStatus};
    use crate::storage::TaskStorage;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("taskboard-{nanos}-{file_name}"))
    }

    fn sample_task() -> Task {
        Task {
            id: "task-1".to_string(),
            title: "demo".to_string(),
            description: "write the demo".to_string(),
            status: TaskStatus::InProgress,
            priority: Priority::High,
            created_at: "2025-12-20T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn missing_file_is_absent_state() {
        let path = temp_path("missing.json");
        assert_eq!(load_tasks(&path).unwrap(), None);
    }

    #[test]
    fn save_then_fresh_load_returns_equal_tasks() {
        let path = temp_path("reload.json");
        let task = sample_task();

        JsonFileStorage::new(&path)
            .save(std::slice::from_ref(&task))
            .unwrap();
        let loaded = JsonFileStorage::new(&path).load().unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded, Some(vec![task]));
    }

    #[test]
    fn empty_collection_round_trips_as_present() {
        let path = temp_path("empty.json");
        save_tasks(&path, &[]).unwrap();
        let loaded = load_tasks(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded, Some(Vec::new()));
    }

    #[test]
    fn stored_fields_use_board_wire_names() {
        let path = temp_path("wire.json");
        save_tasks(&path, &[sample_task()]).unwrap();
        let stored: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(stored["schema_version"], SCHEMA_VERSION);
        let task = &stored["tasks"][0];
        assert_eq!(task["status"], "in-progress");
        assert_eq!(task["priority"], "high");
        assert_eq!(task["createdAt"], "2025-12-20T00:00:00Z");
        assert!(task.get("created_at").is_none());
    }

    #[test]
    fn accepts_bare_task_array() {
        let path = temp_path("bare.json");
        let content = "[{\"id\":\"1\",\"title\":\"Design\",\"description\":\"mockups\",\"status\":\"todo\",\"priority\":\"low\",\"createdAt\":\"2024-01-15T00:00:00.000Z\"}]";
        fs::write(&path, content).unwrap();

        let loaded = load_tasks(&path).unwrap().unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].status, TaskStatus::Todo);
        assert_eq!(loaded[0].created_at, "2024-01-15T00:00:00.000Z");
    }

    #[test]
    fn rejects_unknown_status() {
        let path = temp_path("bad-status.json");
        let content = "{\"schema_version\":1,\"tasks\":[{\"id\":\"1\",\"title\":\"x\",\"description\":\"\",\"status\":\"blocked\",\"priority\":\"low\",\"createdAt\":\"2024-01-15T00:00:00Z\"}]}";
        fs::write(&path, content).unwrap();

        let err = load_tasks(&path).unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_data");
    }

    #[test]
    fn rejects_corrupted_payload() {
        let path = temp_path("corrupt.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_tasks(&path).unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_data");
    }

    #[test]
    fn schema_version_must_match() {
        let path = temp_path("bad-schema.json");
        let bad = format!(
            "{{\n  \"schema_version\": {},\n  \"tasks\": []\n}}",
            SCHEMA_VERSION + 1
        );
        fs::write(&path, bad).unwrap();

        let err = load_tasks(&path).unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_data");
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = temp_path("nested");
        let path = dir.join("board").join("tasks.json");

        save_tasks(&path, &[sample_task()]).unwrap();
        let loaded = load_tasks(&path).unwrap();
        fs::remove_dir_all(&dir).ok();

        assert_eq!(loaded.map(|tasks| tasks.len()), Some(1));
    }
}
