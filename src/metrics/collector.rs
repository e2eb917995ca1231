//! Implements centralized storage for metrics. The scheduler reports placements and utilization
//! samples here while it drains the queue.

use average::{concatenate, Estimate, Max, Mean, Min, Variance};

use crate::metrics::utilization::UtilizationSample;

concatenate!(
    Estimator,
    [Min, min],
    [Max, max],
    [Mean, mean],
    [Variance, population_variance]
);

#[derive(Debug, Default)]
pub struct EstimatorWrapper {
    estimator: Estimator,
}

impl std::fmt::Debug for Estimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Estimator")
            .field("min", &self.min)
            .field("max", &self.max)
            .field("mean", &self.mean)
            .field("population_variance", &self.population_variance)
            .finish()
    }
}

impl EstimatorWrapper {
    pub fn new() -> Self {
        Self {
            estimator: Estimator::new(),
        }
    }

    pub fn add(&mut self, value: f64) {
        self.estimator.add(value);
    }

    pub fn min(&self) -> f64 {
        self.estimator.min()
    }

    pub fn max(&self) -> f64 {
        self.estimator.max()
    }

    pub fn mean(&self) -> f64 {
        self.estimator.mean()
    }

    pub fn population_variance(&self) -> f64 {
        self.estimator.population_variance()
    }
}

impl PartialEq for EstimatorWrapper {
    fn eq(&self, other: &Self) -> bool {
        self.min() == other.min()
            && self.max() == other.max()
            && self.mean() == other.mean()
            && self.population_variance() == other.population_variance()
    }
}

#[derive(Debug, Default)]
pub struct MetricsCollector {
    /// The number of tasks submitted to all scheduling passes.
    pub total_tasks: u64,
    /// The number of tasks which got a server.
    pub tasks_placed: u64,
    /// The number of tasks whose requests exceed the capacity of every server in the pool.
    /// Such tasks are never queued.
    pub tasks_unsatisfiable: u64,
    /// The number of tasks left pending when no further placement was possible.
    pub tasks_stranded: u64,
    /// The number of finished scheduling passes.
    pub passes: u64,
    /// The number of completed time steps over all passes.
    pub time_steps: u64,
    /// Total calls to placement strategies, including retries.
    pub placement_attempts: u64,

    /// Estimations for the number of time steps a task waited in the pending queue before it
    /// was placed. Zero for tasks placed in the step they were queued at.
    pub task_queue_time_stats: EstimatorWrapper,
    /// Estimations for the mean cpu utilization sampled after every time step.
    pub cpu_utilization_stats: EstimatorWrapper,
    /// Estimations for the mean ram utilization sampled after every time step.
    pub ram_utilization_stats: EstimatorWrapper,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            total_tasks: 0,
            tasks_placed: 0,
            tasks_unsatisfiable: 0,
            tasks_stranded: 0,
            passes: 0,
            time_steps: 0,
            placement_attempts: 0,
            task_queue_time_stats: EstimatorWrapper::new(),
            cpu_utilization_stats: EstimatorWrapper::new(),
            ram_utilization_stats: EstimatorWrapper::new(),
        }
    }

    pub fn increment_task_queue_time(&mut self, value: f64) {
        self.task_queue_time_stats.add(value);
    }

    pub fn add_utilization_sample(&mut self, sample: &UtilizationSample) {
        self.time_steps += 1;
        self.cpu_utilization_stats.add(sample.cpu_utilization);
        self.ram_utilization_stats.add(sample.ram_utilization);
    }

    /// Every submitted task ends up in exactly one of the terminal counters.
    pub fn tasks_accounted(&self) -> u64 {
        self.tasks_placed + self.tasks_unsatisfiable + self.tasks_stranded
    }
}
