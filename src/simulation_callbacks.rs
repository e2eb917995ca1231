//! Simulation callbacks interface and implementations to define how simulator should behave on
//! start, after every pass, on finish and when it should stop running further passes.

use log::info;

use crate::core::scheduler::scheduler::PassSummary;
use crate::error::SimulationError;
use crate::metrics::printer::print_metrics;
use crate::simulator::BinPackingSimulation;

pub trait SimulationCallbacks {
    /// Runs before the first pass.
    fn on_simulation_start(&mut self, _sim: &mut BinPackingSimulation) {}

    /// Runs after every pass, returns false if no further passes must be run.
    fn on_pass_finish(&mut self, _sim: &mut BinPackingSimulation, _summary: &PassSummary) -> bool {
        true
    }

    /// Runs upon the completion of a simulation run.
    fn on_simulation_finish(
        &mut self,
        _sim: &mut BinPackingSimulation,
    ) -> Result<(), SimulationError> {
        Ok(())
    }
}

/// Checks that every task is accounted for and prints metrics if printer is configured.
pub struct PrintMetricsCallbacks {}

fn assert_and_print(sim: &mut BinPackingSimulation) -> Result<(), SimulationError> {
    let metrics = sim.metrics_collector.borrow();
    assert_eq!(metrics.total_tasks, metrics.tasks_accounted());
    info!(
        "Placed {} out of {} tasks, {} unsatisfiable, {} stranded",
        metrics.tasks_placed,
        metrics.total_tasks,
        metrics.tasks_unsatisfiable,
        metrics.tasks_stranded
    );
    drop(metrics);

    if let Some(printer_config) = sim.config.metrics_printer.as_ref() {
        print_metrics(sim.metrics_collector.clone(), printer_config)?;
    }
    Ok(())
}

impl SimulationCallbacks for PrintMetricsCallbacks {
    fn on_simulation_finish(
        &mut self,
        sim: &mut BinPackingSimulation,
    ) -> Result<(), SimulationError> {
        assert_and_print(sim)
    }
}

/// Stops running further passes once a pass left tasks which could not be placed.
pub struct StopOnStrandedTasksCallbacks {}

impl SimulationCallbacks for StopOnStrandedTasksCallbacks {
    fn on_pass_finish(&mut self, _sim: &mut BinPackingSimulation, summary: &PassSummary) -> bool {
        if !summary.stranded.is_empty() {
            info!(
                "Pass {} / {:?} stranded {} tasks, skipping remaining passes",
                summary.algorithm,
                summary.order,
                summary.stranded.len()
            );
            return false;
        }
        true
    }

    fn on_simulation_finish(
        &mut self,
        sim: &mut BinPackingSimulation,
    ) -> Result<(), SimulationError> {
        assert_and_print(sim)
    }
}
