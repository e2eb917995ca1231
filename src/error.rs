//! Error types for the simulator.
//!
//! Failing to place a task is not an error: the scheduler defers such tasks to the next time
//! step. Errors here are faults which stop the simulation.

use thiserror::Error;

use crate::core::common::TaskId;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid task {task_id}: {reason}")]
    InvalidTask { task_id: TaskId, reason: String },

    #[error("time step limit {limit} exceeded with {pending} tasks still pending")]
    TimeStepLimitExceeded { limit: u64, pending: usize },
}
