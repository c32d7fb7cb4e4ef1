use crate::model::{Task, TaskStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumn<'a> {
    pub status: TaskStatus,
    pub title: &'static str,
    pub tasks: Vec<&'a Task>,
}

/// The three status columns, always in todo / in-progress / done order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board<'a> {
    pub columns: Vec<BoardColumn<'a>>,
}

impl<'a> Board<'a> {
    pub fn from_tasks(tasks: &'a [Task]) -> Self {
        let columns = TaskStatus::ALL
            .into_iter()
            .map(|status| BoardColumn {
                status,
                title: status.column_title(),
                tasks: tasks.iter().filter(|task| task.status == status).collect(),
            })
            .collect();
        Self { columns }
    }

    pub fn column(&self, status: TaskStatus) -> Option<&BoardColumn<'a>> {
        self.columns.iter().find(|column| column.status == status)
    }

    /// Length of the longest column.
    pub fn depth(&self) -> usize {
        self.columns
            .iter()
            .map(|column| column.tasks.len())
            .max()
            .unwrap_or(0)
    }
}
