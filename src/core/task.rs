//! Type definition for a task: an immutable request for a slice of cluster resources.

use serde::{Deserialize, Serialize};

use crate::core::common::{RuntimeResources, TaskId};

pub const HOURS_PER_DAY: u32 = 24;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    /// Arrival time in hours since the start of the trace.
    pub arrival_time: u32,
    pub requests: RuntimeResources,
    /// Execution time in hours.
    pub duration: u32,
}

impl Task {
    pub fn new(id: TaskId, arrival_time: u32, cpu: u32, ram: u32, duration: u32) -> Self {
        Self {
            id,
            arrival_time,
            requests: RuntimeResources { cpu, ram },
            duration,
        }
    }

    /// Resource "value" used by the smallest-first ordering: cpu * ram * duration.
    pub fn value(&self) -> u128 {
        self.requests.cpu as u128 * self.requests.ram as u128 * self.duration as u128
    }

    pub fn arrival_day(&self) -> u32 {
        self.arrival_time / HOURS_PER_DAY
    }

    pub fn arrival_hour(&self) -> u32 {
        self.arrival_time % HOURS_PER_DAY
    }
}

#[cfg(test)]
mod tests {
    use super::Task;

    #[test]
    fn test_value_does_not_overflow_u32() {
        let task = Task::new(0, 0, u32::MAX, 2, 2);
        assert_eq!(u32::MAX as u128 * 4, task.value());
    }

    #[test]
    fn test_value_does_not_overflow_u64() {
        let task = Task::new(0, 0, u32::MAX, u32::MAX, u32::MAX);
        let max = u32::MAX as u128;
        assert_eq!(max * max * max, task.value());

        let huge = Task::new(1, 0, 4_000_000_000, 4_000_000_000, 5);
        let small = Task::new(2, 0, 1, 1, 1);
        assert!(small.value() < huge.value());
    }

    #[test]
    fn test_arrival_day_and_hour() {
        let task = Task::new(1, 50, 1, 1, 1);
        assert_eq!(2, task.arrival_day());
        assert_eq!(2, task.arrival_hour());

        let task = Task::new(2, 23, 1, 1, 1);
        assert_eq!(0, task.arrival_day());
        assert_eq!(23, task.arrival_hour());
    }
}
