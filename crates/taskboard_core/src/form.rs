//! Add and edit forms: the boundary where required fields are checked before
//! the store is asked to commit anything.

use crate::error::AppError;
use crate::model::{Priority, Task, TaskDraft, TaskStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            status: TaskStatus::Todo,
            priority: Priority::Medium,
        }
    }
}

impl TaskForm {
    pub fn submit(&self) -> Result<TaskDraft, AppError> {
        let (title, description) = required_fields(&self.title, &self.description)?;
        Ok(TaskDraft {
            title,
            description,
            status: self.status,
            priority: self.priority,
        })
    }
}

/// Edit form pre-populated from an existing task. `id` and `created_at`
/// are carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    original: Task,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
}

impl EditForm {
    pub fn new(task: &Task) -> Self {
        Self {
            original: task.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
        }
    }

    pub fn task_id(&self) -> &str {
        &self.original.id
    }

    pub fn submit(&self) -> Result<Task, AppError> {
        let (title, description) = required_fields(&self.title, &self.description)?;
        Ok(Task {
            title,
            description,
            status: self.status,
            priority: self.priority,
            ..self.original.clone()
        })
    }
}

fn required_fields(title: &str, description: &str) -> Result<(String, String), AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::invalid_input("title is required"));
    }
    let description = description.trim();
    if description.is_empty() {
        return Err(AppError::invalid_input("description is required"));
    }
    Ok((title.to_string(), description.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{EditForm, TaskForm};
    use crate::model::{Priority, Task, TaskStatus};

    #[test]
    fn add_form_defaults_to_todo_and_medium() {
        let form = TaskForm {
            title: " Write docs ".to_string(),
            description: "API reference".to_string(),
            ..TaskForm::default()
        };

        let draft = form.submit().unwrap();
        assert_eq!(draft.title, "Write docs");
        assert_eq!(draft.status, TaskStatus::Todo);
        assert_eq!(draft.priority, Priority::Medium);
    }

    #[test]
    fn add_form_requires_title_and_description() {
        let missing_title = TaskForm {
            description: "something".to_string(),
            ..TaskForm::default()
        };
        assert_eq!(missing_title.submit().unwrap_err().message(), "title is required");

        let missing_description = TaskForm {
            title: "something".to_string(),
            description: "   ".to_string(),
            ..TaskForm::default()
        };
        assert_eq!(
            missing_description.submit().unwrap_err().message(),
            "description is required"
        );
    }

    #[test]
    fn edit_form_keeps_identity_fields() {
        let task = Task {
            id: "task-1".to_string(),
            title: "old".to_string(),
            description: "old description".to_string(),
            status: TaskStatus::Todo,
            priority: Priority::Low,
            created_at: "2025-12-01T00:00:00Z".to_string(),
        };

        let mut form = EditForm::new(&task);
        assert_eq!(form.title, "old");
        form.title = "new".to_string();
        form.priority = Priority::High;

        let edited = form.submit().unwrap();
        assert_eq!(edited.id, "task-1");
        assert_eq!(edited.created_at, task.created_at);
        assert_eq!(edited.title, "new");
        assert_eq!(edited.description, "old description");
        assert_eq!(edited.priority, Priority::High);
    }

    #[test]
    fn unchanged_edit_form_reproduces_task() {
        let task = Task {
            id: "task-1".to_string(),
            title: "same".to_string(),
            description: "same".to_string(),
            status: TaskStatus::Done,
            priority: Priority::Medium,
            created_at: "2025-12-01T00:00:00Z".to_string(),
        };

        assert_eq!(EditForm::new(&task).submit().unwrap(), task);
    }
}
