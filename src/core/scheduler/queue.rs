//! Ordering policies for the pending queue and helper struct for queued tasks.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::task::Task;

/// Total order the scheduler applies to the pending set at the start of every time step.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QueueOrder {
    /// First come, first served: ascending arrival time.
    #[serde(rename = "fcfs", alias = "arrival")]
    #[value(name = "fcfs", alias = "arrival")]
    Arrival,
    /// Smallest resource value (cpu * ram * duration) first.
    #[serde(rename = "smallest", alias = "value")]
    #[value(name = "smallest", alias = "value")]
    Value,
    /// Shortest duration first.
    #[serde(rename = "duration")]
    #[value(name = "duration")]
    Duration,
}

impl QueueOrder {
    /// Stable ascending sort, tasks with equal keys keep their relative order.
    pub fn sort(&self, queue: &mut [QueuedTaskInfo]) {
        match self {
            QueueOrder::Arrival => queue.sort_by_key(|info| info.task.arrival_time),
            QueueOrder::Value => queue.sort_by_key(|info| info.task.value()),
            QueueOrder::Duration => queue.sort_by_key(|info| info.task.duration),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueuedTaskInfo {
    pub task: Task,
    /// Number of placement attempts made so far, across all time steps.
    pub attempts: u64,
    /// Time step at which the task entered the queue for the first time.
    pub initial_time_step: u64,
}

impl QueuedTaskInfo {
    pub fn new(task: Task, initial_time_step: u64) -> Self {
        Self {
            task,
            attempts: 0,
            initial_time_step,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::task::Task;

    use super::{QueueOrder, QueuedTaskInfo};

    fn queue(tasks: Vec<Task>) -> Vec<QueuedTaskInfo> {
        tasks.into_iter().map(|t| QueuedTaskInfo::new(t, 0)).collect()
    }

    fn ids(queue: &[QueuedTaskInfo]) -> Vec<u64> {
        queue.iter().map(|info| info.task.id).collect()
    }

    fn tasks() -> Vec<Task> {
        vec![
            // id, arrival, cpu, ram, duration
            Task::new(0, 7, 2, 2, 3),  // value 12
            Task::new(1, 3, 1, 1, 5),  // value 5
            Task::new(2, 7, 3, 1, 1),  // value 3
            Task::new(3, 0, 4, 4, 5),  // value 80
            Task::new(4, 3, 1, 5, 1),  // value 5
        ]
    }

    #[test]
    fn test_arrival_order_is_stable() {
        let mut queue = queue(tasks());
        QueueOrder::Arrival.sort(&mut queue);
        assert_eq!(vec![3, 1, 4, 0, 2], ids(&queue));
    }

    #[test]
    fn test_value_order_is_stable() {
        let mut queue = queue(tasks());
        QueueOrder::Value.sort(&mut queue);
        assert_eq!(vec![2, 1, 4, 0, 3], ids(&queue));
    }

    #[test]
    fn test_duration_order_is_stable() {
        let mut queue = queue(tasks());
        QueueOrder::Duration.sort(&mut queue);
        assert_eq!(vec![2, 4, 0, 1, 3], ids(&queue));
    }

    #[test]
    fn test_queue_order_names() {
        let orders: Vec<QueueOrder> =
            serde_yaml::from_str("[fcfs, smallest, duration, arrival, value]").unwrap();
        assert_eq!(
            vec![
                QueueOrder::Arrival,
                QueueOrder::Value,
                QueueOrder::Duration,
                QueueOrder::Arrival,
                QueueOrder::Value
            ],
            orders
        );
    }
}
