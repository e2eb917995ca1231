//! Represents generic format for the trace: a plain yaml list of tasks.

use std::collections::HashSet;
use std::mem::swap;
use std::path::Path;

use serde::Deserialize;

use crate::core::common::TaskId;
use crate::core::task::Task;
use crate::error::SimulationError;
use crate::trace::interface::Trace;

/// Tasks in the order they were recorded. Example:
/// ```yaml
/// tasks:
/// - id: 0
///   arrival_time: 3
///   requests:
///     cpu: 4
///     ram: 8
///   duration: 2
/// ```
#[derive(Debug, Deserialize, PartialEq)]
pub struct GenericWorkloadTrace {
    pub tasks: Vec<Task>,
}

impl GenericWorkloadTrace {
    pub fn from_str(trace_yaml: &str) -> Result<Self, SimulationError> {
        let trace = serde_yaml::from_str::<GenericWorkloadTrace>(trace_yaml)?;
        trace.validate()?;
        Ok(trace)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SimulationError> {
        let trace_yaml = std::fs::read_to_string(path)?;
        Self::from_str(&trace_yaml)
    }

    fn validate(&self) -> Result<(), SimulationError> {
        let mut seen_ids: HashSet<TaskId> = HashSet::with_capacity(self.tasks.len());
        for task in self.tasks.iter() {
            let reason = if !seen_ids.insert(task.id) {
                "task id is not unique"
            } else if task.requests.cpu == 0 || task.requests.ram == 0 {
                "requested resources must be positive"
            } else if task.duration == 0 {
                "duration must be positive"
            } else {
                continue;
            };
            return Err(SimulationError::InvalidTask {
                task_id: task.id,
                reason: reason.to_string(),
            });
        }
        Ok(())
    }
}

impl Trace for GenericWorkloadTrace {
    fn tasks(&mut self) -> Vec<Task> {
        let mut tasks: Vec<Task> = vec![];
        swap(&mut tasks, &mut self.tasks);
        tasks
    }

    fn task_count(&self) -> usize {
        self.tasks.len()
    }
}
