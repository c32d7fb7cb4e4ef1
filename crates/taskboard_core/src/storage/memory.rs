use super::TaskStorage;
use crate::error::AppError;
use crate::model::Task;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct MemoryState {
    tasks: Option<Vec<Task>>,
    saves: usize,
}

/// Session-only storage. Clones share the same slot, so a caller can keep a
/// handle to inspect what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryStorage {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let storage = Self::default();
        storage.state.borrow_mut().tasks = Some(tasks);
        storage
    }

    pub fn snapshot(&self) -> Option<Vec<Task>> {
        self.state.borrow().tasks.clone()
    }

    pub fn save_count(&self) -> usize {
        self.state.borrow().saves
    }
}

impl TaskStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Vec<Task>>, AppError> {
        Ok(self.snapshot())
    }

    fn save(&self, tasks: &[Task]) -> Result<(), AppError> {
        let mut state = self.state.borrow_mut();
        state.tasks = Some(tasks.to_vec());
        state.saves += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
