//! Config fields definitions for the bin-packing simulation

use serde::Deserialize;

use crate::core::common::RuntimeResources;
use crate::core::scheduler::placement::FitStrategy;
use crate::core::scheduler::queue::QueueOrder;
use crate::error::SimulationError;
use crate::metrics::printer::MetricsPrinterConfig;
use crate::trace::generator::GeneratorConfig;

pub const DEFAULT_RETRY_LIMIT: u32 = 5;

#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct SimulationConfig {
    #[serde(default = "sim_name_default")]
    pub sim_name: String,
    #[serde(default)]
    pub seed: u64,
    /// If not set default output of logs is stdout/stderr
    pub logs_filepath: Option<String>,
    #[serde(default = "cluster_default")]
    pub cluster: Vec<ServerGroup>,
    /// How many times placement of one task is attempted within a single time step.
    #[serde(default = "retry_limit_default")]
    pub retry_limit: u32,
    /// Upper bound on time steps of a single pass, unbounded if not set.
    pub max_time_steps: Option<u64>,
    /// If set, a placed task gives its resources back `duration` time steps after placement.
    /// Otherwise allocations are kept until the end of the simulation.
    #[serde(default)]
    pub release_finished_tasks: bool,
    #[serde(default)]
    pub workload: WorkloadConfig,
    /// Scheduling passes which are run one after another against the same server pool.
    #[serde(default = "passes_default")]
    pub passes: Vec<PassConfig>,
    #[serde(default = "utilization_output_default")]
    pub utilization_output: std::path::PathBuf,
    pub metrics_printer: Option<MetricsPrinterConfig>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ServerGroup {
    pub server_count: u64,
    pub capacity: RuntimeResources,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct PassConfig {
    pub order: QueueOrder,
    pub fit: FitStrategy,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct WorkloadConfig {
    // should be one of, not both
    pub generator: Option<GeneratorConfig>,
    pub trace_path: Option<std::path::PathBuf>,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            generator: Some(GeneratorConfig::default()),
            trace_path: None,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sim_name: sim_name_default(),
            seed: 0,
            logs_filepath: None,
            cluster: cluster_default(),
            retry_limit: retry_limit_default(),
            max_time_steps: None,
            release_finished_tasks: false,
            workload: Default::default(),
            passes: passes_default(),
            utilization_output: utilization_output_default(),
            metrics_printer: None,
        }
    }
}

impl SimulationConfig {
    pub fn from_yaml(config_yaml: &str) -> Result<Self, SimulationError> {
        let config = serde_yaml::from_str::<SimulationConfig>(config_yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.retry_limit == 0 {
            return Err(SimulationError::InvalidConfig(
                "retry_limit must be positive".to_string(),
            ));
        }
        if self.max_time_steps == Some(0) {
            return Err(SimulationError::InvalidConfig(
                "max_time_steps must be positive if set".to_string(),
            ));
        }
        for group in self.cluster.iter() {
            if group.capacity.cpu == 0 || group.capacity.ram == 0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "server group capacity must be positive in both dimensions, got {:?}",
                    group.capacity
                )));
            }
        }
        match (&self.workload.generator, &self.workload.trace_path) {
            (Some(_), Some(_)) => Err(SimulationError::InvalidConfig(
                "workload must have either generator or trace_path, not both".to_string(),
            )),
            (None, None) => Err(SimulationError::InvalidConfig(
                "workload must have generator or trace_path".to_string(),
            )),
            (Some(generator), None) => generator.validate(),
            (None, Some(_)) => Ok(()),
        }
    }
}

fn sim_name_default() -> String {
    "packsim".to_string()
}

fn retry_limit_default() -> u32 {
    DEFAULT_RETRY_LIMIT
}

/// 128 servers with 24 cores and 64 memory units each.
fn cluster_default() -> Vec<ServerGroup> {
    vec![ServerGroup {
        server_count: 128,
        capacity: RuntimeResources { cpu: 24, ram: 64 },
    }]
}

/// Reference comparison: fcfs + first fit, smallest + best fit, duration + worst fit.
fn passes_default() -> Vec<PassConfig> {
    vec![
        PassConfig {
            order: QueueOrder::Arrival,
            fit: FitStrategy::First,
        },
        PassConfig {
            order: QueueOrder::Value,
            fit: FitStrategy::Best,
        },
        PassConfig {
            order: QueueOrder::Duration,
            fit: FitStrategy::Worst,
        },
    ]
}

fn utilization_output_default() -> std::path::PathBuf {
    "utilization.csv".into()
}
