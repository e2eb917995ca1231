//! Synthetic workload: tasks with independently uniform arrival time, requests and duration.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::core::common::TaskId;
use crate::core::task::Task;
use crate::error::SimulationError;
use crate::trace::interface::Trace;

/// Inclusive range of values.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct ValueRange {
    pub min: u32,
    pub max: u32,
}

impl ValueRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GeneratorConfig {
    #[serde(default = "task_count_default")]
    pub task_count: u64,
    /// Arrival time in hours.
    #[serde(default = "arrival_time_default")]
    pub arrival_time: ValueRange,
    #[serde(default = "cpu_default")]
    pub cpu: ValueRange,
    #[serde(default = "ram_default")]
    pub ram: ValueRange,
    /// Duration in hours.
    #[serde(default = "duration_default")]
    pub duration: ValueRange,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            task_count: task_count_default(),
            arrival_time: arrival_time_default(),
            cpu: cpu_default(),
            ram: ram_default(),
            duration: duration_default(),
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), SimulationError> {
        for (name, range, lowest) in [
            ("arrival_time", self.arrival_time, 0),
            ("cpu", self.cpu, 1),
            ("ram", self.ram, 1),
            ("duration", self.duration, 1),
        ] {
            if range.min < lowest || range.min > range.max {
                return Err(SimulationError::InvalidConfig(format!(
                    "generator range {} must satisfy {} <= min <= max, got {:?}",
                    name, lowest, range
                )));
            }
        }
        Ok(())
    }
}

fn task_count_default() -> u64 {
    5000
}

fn arrival_time_default() -> ValueRange {
    ValueRange::new(0, 10)
}

fn cpu_default() -> ValueRange {
    ValueRange::new(1, 24)
}

fn ram_default() -> ValueRange {
    ValueRange::new(1, 20)
}

fn duration_default() -> ValueRange {
    ValueRange::new(1, 5)
}

pub struct TaskGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl TaskGenerator {
    pub fn new(config: GeneratorConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn gen_value(&mut self, range: ValueRange) -> u32 {
        self.rng.random_range(range.min..=range.max)
    }

    pub fn generate(&mut self) -> Vec<Task> {
        let mut tasks = Vec::with_capacity(self.config.task_count as usize);
        for id in 0..self.config.task_count {
            let arrival_time = self.gen_value(self.config.arrival_time);
            let cpu = self.gen_value(self.config.cpu);
            let ram = self.gen_value(self.config.ram);
            let duration = self.gen_value(self.config.duration);
            tasks.push(Task::new(id as TaskId, arrival_time, cpu, ram, duration));
        }
        tasks
    }
}

impl Trace for TaskGenerator {
    fn tasks(&mut self) -> Vec<Task> {
        self.generate()
    }

    fn task_count(&self) -> usize {
        self.config.task_count as usize
    }
}

#[cfg(test)]
mod tests {
    use crate::error::SimulationError;
    use crate::trace::interface::Trace;

    use super::{GeneratorConfig, TaskGenerator, ValueRange};

    #[test]
    fn test_generated_tasks_are_within_ranges() {
        let config = GeneratorConfig::default();
        let mut generator = TaskGenerator::new(config.clone(), 42);
        let tasks = generator.tasks();

        assert_eq!(5000, tasks.len());
        for (idx, task) in tasks.iter().enumerate() {
            assert_eq!(idx as u64, task.id);
            assert!(task.arrival_time <= 10);
            assert!((1..=24).contains(&task.requests.cpu));
            assert!((1..=20).contains(&task.requests.ram));
            assert!((1..=5).contains(&task.duration));
        }
    }

    #[test]
    fn test_same_seed_same_tasks() {
        let config = GeneratorConfig {
            task_count: 100,
            ..Default::default()
        };
        let first = TaskGenerator::new(config.clone(), 7).generate();
        let second = TaskGenerator::new(config.clone(), 7).generate();
        let other = TaskGenerator::new(config, 8).generate();
        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn test_invalid_ranges() {
        let config = GeneratorConfig {
            cpu: ValueRange::new(0, 4),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimulationError::InvalidConfig(_))
        ));

        let config = GeneratorConfig {
            duration: ValueRange::new(5, 1),
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(GeneratorConfig::default().validate().is_ok());
    }
}
