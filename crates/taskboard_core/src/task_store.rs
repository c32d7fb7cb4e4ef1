//! The authoritative in-memory task collection.
//!
//! Every applied mutation is followed by one full save through the storage
//! adapter. A failed save never undoes the mutation: the in-memory collection
//! stays authoritative for the session and the failure is kept for the
//! presentation layer to surface; the store itself only logs it at debug.
//!
//! Operations on an id that is not in the collection are no-ops. They report
//! that through their return value (`false` / `None`) instead of an error.

use crate::error::AppError;
use crate::model::{Task, TaskDraft, TaskStatus};
use crate::seed;
use crate::storage::TaskStorage;
use std::collections::HashSet;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Where a dragged card was picked up or released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropLocation {
    pub column: TaskStatus,
    pub index: usize,
}

/// A completed drag gesture. `destination` is `None` when the card was
/// released outside every column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropResult {
    pub task_id: String,
    pub source: DropLocation,
    pub destination: Option<DropLocation>,
}

pub struct TaskStore {
    tasks: Vec<Task>,
    storage: Box<dyn TaskStorage>,
    last_persist_error: Option<AppError>,
}

impl TaskStore {
    /// Opens the store, falling back to the example board when nothing has
    /// been saved yet.
    pub fn initialize(storage: impl TaskStorage + 'static) -> Self {
        Self::initialize_with_fallback(storage, seed::example_tasks())
    }

    /// Opens the store; `fallback` is used when storage holds nothing or
    /// cannot be read. Nothing is written until the first mutation.
    pub fn initialize_with_fallback(storage: impl TaskStorage + 'static, fallback: Vec<Task>) -> Self {
        let mut last_persist_error = None;
        let tasks = match storage.load() {
            Ok(Some(tasks)) => dedupe_ids(tasks),
            Ok(None) => {
                log::debug!("no saved tasks in {}, using fallback board", storage.describe());
                fallback
            }
            Err(err) => {
                log::debug!(
                    "could not load tasks from {}, using fallback board: {err}",
                    storage.describe()
                );
                last_persist_error = Some(err);
                fallback
            }
        };

        Self {
            tasks,
            storage: Box::new(storage),
            last_persist_error,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Tasks in `status`, in collection order.
    pub fn by_status(&self, status: TaskStatus) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.status == status)
            .collect()
    }

    pub fn last_persist_error(&self) -> Option<&AppError> {
        self.last_persist_error.as_ref()
    }

    pub fn take_persist_error(&mut self) -> Option<AppError> {
        self.last_persist_error.take()
    }

    pub fn add(&mut self, draft: TaskDraft) -> Result<Task, AppError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(AppError::invalid_input("title is required"));
        }
        let description = draft.description.trim();
        if description.is_empty() {
            return Err(AppError::invalid_input("description is required"));
        }

        let created_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|err| AppError::invalid_data(err.to_string()))?;

        let task = Task {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: description.to_string(),
            status: draft.status,
            priority: draft.priority,
            created_at,
        };

        log::debug!("add task {} to {}", task.id, task.status);
        self.tasks.push(task.clone());
        self.persist();

        Ok(task)
    }

    /// Replaces the stored task with the same id. `id` and `created_at` of the
    /// stored task are kept. Returns `Ok(false)` when the id is unknown.
    pub fn update(&mut self, task: Task) -> Result<bool, AppError> {
        let title = task.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::invalid_input("title is required"));
        }
        let description = task.description.trim().to_string();

        let Some(existing) = self.tasks.iter_mut().find(|existing| existing.id == task.id) else {
            return Ok(false);
        };

        let created_at = std::mem::take(&mut existing.created_at);
        *existing = Task {
            title,
            description,
            created_at,
            ..task
        };
        log::debug!("update task {}", existing.id);
        self.persist();

        Ok(true)
    }

    pub fn remove(&mut self, id: &str) -> Option<Task> {
        let index = self.position(id)?;
        let removed = self.tasks.remove(index);
        log::debug!("remove task {}", removed.id);
        self.persist();

        Some(removed)
    }

    /// Changes a task's column. Returns `false` when the id is unknown or the
    /// task is already in `status`.
    pub fn move_task(&mut self, id: &str, status: TaskStatus) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        if self.tasks[index].status == status {
            return false;
        }

        self.tasks[index].status = status;
        log::debug!("move task {id} to {status}");
        self.persist();

        true
    }

    /// Places a task at `index` among the tasks of its own column (clamped to
    /// the end of the column).
    pub fn reorder(&mut self, id: &str, index: usize) -> bool {
        let Some(from) = self.position(id) else {
            return false;
        };
        if !self.reposition(from, index) {
            return false;
        }

        log::debug!("reorder task {id} to position {index}");
        self.persist();

        true
    }

    /// Reacts to the end of a drag gesture with at most one save.
    pub fn apply_drop(&mut self, result: &DropResult) -> bool {
        let Some(destination) = result.destination else {
            return false;
        };
        if destination == result.source {
            return false;
        }
        let Some(from) = self.position(&result.task_id) else {
            return false;
        };

        let moved = self.tasks[from].status != destination.column;
        if moved {
            self.tasks[from].status = destination.column;
        }
        let repositioned = self.reposition(from, destination.index);
        if !moved && !repositioned {
            return false;
        }

        log::debug!(
            "drop task {} on {}[{}]",
            result.task_id,
            destination.column,
            destination.index
        );
        self.persist();

        true
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    // Moves the task at `from` so it becomes the `index`-th member of its
    // column. Returns whether its rank within the column changed; tasks of
    // other columns never count.
    fn reposition(&mut self, from: usize, index: usize) -> bool {
        let status = self.tasks[from].status;
        let peers = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(position, other)| *position != from && other.status == status)
            .count();
        let rank = self.tasks[..from]
            .iter()
            .filter(|other| other.status == status)
            .count();
        if index.min(peers) == rank {
            return false;
        }

        let task = self.tasks.remove(from);
        let members: Vec<usize> = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, other)| other.status == task.status)
            .map(|(position, _)| position)
            .collect();

        let to = match members.get(index) {
            Some(&position) => position,
            None => members.last().map_or(from, |&last| last + 1),
        };

        self.tasks.insert(to, task);
        true
    }

    fn persist(&mut self) {
        match self.storage.save(&self.tasks) {
            Ok(()) => self.last_persist_error = None,
            Err(err) => {
                log::debug!(
                    "could not save tasks to {}, keeping changes in memory: {err}",
                    self.storage.describe()
                );
                self.last_persist_error = Some(err);
            }
        }
    }
}

fn dedupe_ids(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::new();
    let before = tasks.len();
    let unique: Vec<Task> = tasks
        .into_iter()
        .filter(|task| seen.insert(task.id.clone()))
        .collect();

    if unique.len() != before {
        log::warn!(
            "dropped {} task(s) with duplicate ids from saved board",
            before - unique.len()
        );
    }
    unique
}
