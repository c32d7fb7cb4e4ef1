//! Persistence adapters for the task collection.
//!
//! Every adapter stores the whole collection at once; there is no partial
//! write. `load` distinguishes "nothing stored yet" (`Ok(None)`) from an
//! empty board (`Ok(Some(vec![]))`) so first-run seeding only happens once.

use crate::error::AppError;
use crate::model::Task;

pub mod json_store;
pub mod memory;

pub use json_store::JsonFileStorage;
pub use memory::MemoryStorage;

pub trait TaskStorage {
    fn load(&self) -> Result<Option<Vec<Task>>, AppError>;

    fn save(&self, tasks: &[Task]) -> Result<(), AppError>;

    /// Short human-readable location, used in log lines.
    fn describe(&self) -> String {
        "storage".to_string()
    }
}

impl<T: TaskStorage + ?Sized> TaskStorage for Box<T> {
    fn load(&self) -> Result<Option<Vec<Task>>, AppError> {
        (**self).load()
    }

    fn save(&self, tasks: &[Task]) -> Result<(), AppError> {
        (**self).save(tasks)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Resolves the JSON file adapter, falling back to session-only memory storage
/// when no store location can be determined.
pub fn storage_from_env(configured: Option<&str>) -> Box<dyn TaskStorage> {
    match json_store::store_path(configured) {
        Ok(path) => Box::new(JsonFileStorage::new(path)),
        Err(err) => {
            log::warn!("task store location unavailable, keeping tasks in memory: {err}");
            Box::new(MemoryStorage::default())
        }
    }
}
