pub mod board;
pub mod config;
pub mod error;
pub mod form;
pub mod model;
pub mod seed;
pub mod storage;
pub mod task_store;
