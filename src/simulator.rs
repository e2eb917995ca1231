//! Represents entry point for simulator: builds the server pool, loads the workload and runs
//! configured scheduling passes one after another.

use log::info;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use crate::config::{PassConfig, SimulationConfig};
use crate::core::scheduler::scheduler::{PassSummary, Scheduler};
use crate::core::server_pool::ServerPool;
use crate::core::task::Task;
use crate::error::SimulationError;
use crate::metrics::collector::MetricsCollector;
use crate::metrics::utilization::UtilizationSink;
use crate::simulation_callbacks::{PrintMetricsCallbacks, SimulationCallbacks};
use crate::trace::generator::TaskGenerator;
use crate::trace::generic::GenericWorkloadTrace;
use crate::trace::interface::Trace;

pub struct BinPackingSimulation {
    pub config: Rc<SimulationConfig>,
    pub scheduler: Scheduler,
    pub metrics_collector: Rc<RefCell<MetricsCollector>>,

    /// Workload submitted to every pass.
    pub tasks: Vec<Task>,
    pub pass_summaries: Vec<PassSummary>,
}

/// Builds the task source described by workload config: either a seeded generator or a yaml
/// trace file.
pub fn workload_from_config(
    config: &SimulationConfig,
) -> Result<Box<dyn Trace>, SimulationError> {
    match (&config.workload.generator, &config.workload.trace_path) {
        (Some(generator), None) => Ok(Box::new(TaskGenerator::new(
            generator.clone(),
            config.seed,
        ))),
        (None, Some(trace_path)) => {
            info!("Path to workload trace file: {:?}", trace_path);
            Ok(Box::new(GenericWorkloadTrace::from_file(trace_path)?))
        }
        _ => Err(SimulationError::InvalidConfig(
            "workload must have either generator or trace_path".to_string(),
        )),
    }
}

impl BinPackingSimulation {
    pub fn new(config: Rc<SimulationConfig>) -> Self {
        info!(
            "Creating bin-packing simulation {:?} with config: {:?}",
            config.sim_name, config
        );

        let metrics_collector = Rc::new(RefCell::new(MetricsCollector::new()));
        let servers = ServerPool::new(&config.cluster);
        info!("Server pool of {} servers", servers.len());

        let scheduler = Scheduler::new(servers, config.clone(), metrics_collector.clone());

        BinPackingSimulation {
            config,
            scheduler,
            metrics_collector,
            tasks: Default::default(),
            pass_summaries: Default::default(),
        }
    }

    pub fn initialize(&mut self, trace: &mut dyn Trace) {
        self.tasks = trace.tasks();
        info!("Loaded {} tasks", self.tasks.len());
    }

    /// Runs a single pass over a copy of the loaded workload.
    pub fn run_pass(
        &mut self,
        pass: PassConfig,
        sink: &mut dyn UtilizationSink,
    ) -> Result<PassSummary, SimulationError> {
        let summary = self
            .scheduler
            .process_tasks(self.tasks.clone(), pass.order, pass.fit, sink)?;
        self.pass_summaries.push(summary.clone());
        Ok(summary)
    }

    pub fn run_with_callbacks(
        &mut self,
        callbacks: &mut dyn SimulationCallbacks,
        sink: &mut dyn UtilizationSink,
    ) -> Result<(), SimulationError> {
        callbacks.on_simulation_start(self);

        let t = Instant::now();
        let passes = self.config.passes.clone();
        for pass in passes {
            let summary = self.run_pass(pass, sink)?;
            if !callbacks.on_pass_finish(self, &summary) {
                break;
            }
        }
        let duration = t.elapsed().as_secs_f64();
        info!(
            "Processed {} time steps in {:.2?}s ({:.0} steps/s)",
            self.scheduler.time_step(),
            duration,
            self.scheduler.time_step() as f64 / duration
        );

        callbacks.on_simulation_finish(self)
    }

    pub fn run(&mut self, sink: &mut dyn UtilizationSink) -> Result<(), SimulationError> {
        let mut callbacks = PrintMetricsCallbacks {};
        self.run_with_callbacks(&mut callbacks, sink)
    }
}
