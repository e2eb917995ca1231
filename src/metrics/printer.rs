use prettytable::{row, Table};
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, fs::File, io::Write, rc::Rc};

use crate::error::SimulationError;
use crate::metrics::collector::{EstimatorWrapper, MetricsCollector};

#[derive(Debug, Default, Deserialize, PartialEq, Clone)]
pub enum OutputFormat {
    #[default]
    JSON,
    PrettyTable,
}

#[derive(Debug, Default, Deserialize, PartialEq, Clone)]
pub struct MetricsPrinterConfig {
    #[serde(default)]
    pub format: OutputFormat,
    pub output_file: std::path::PathBuf,
}

pub fn print_metrics(
    collector: Rc<RefCell<MetricsCollector>>,
    config: &MetricsPrinterConfig,
) -> Result<(), SimulationError> {
    let mut metrics_file = File::create(&config.output_file)?;
    match config.format {
        OutputFormat::PrettyTable => print_metrics_as_pretty_table(collector, &mut metrics_file),
        OutputFormat::JSON => print_metrics_as_json(collector, &mut metrics_file),
    }
}

pub fn print_metrics_as_pretty_table(
    collector: Rc<RefCell<MetricsCollector>>,
    output: &mut dyn Write,
) -> Result<(), SimulationError> {
    let metrics = collector.borrow();

    let mut aggregated_table = Table::new();
    aggregated_table.add_row(row!["Metric", "Count"]);
    aggregated_table.add_row(row!["Total tasks", metrics.total_tasks]);
    aggregated_table.add_row(row!["Tasks placed", metrics.tasks_placed]);
    aggregated_table.add_row(row!["Tasks unsatisfiable", metrics.tasks_unsatisfiable]);
    aggregated_table.add_row(row!["Tasks stranded", metrics.tasks_stranded]);
    aggregated_table.add_row(row!["Passes", metrics.passes]);
    aggregated_table.add_row(row!["Time steps", metrics.time_steps]);
    aggregated_table.add_row(row!["Placement attempts", metrics.placement_attempts]);

    let mut stats_table = Table::new();
    stats_table.add_row(row!["Metric", "Min", "Max", "Mean", "Variance"]);
    for (name, stats) in [
        ("Task queue time", &metrics.task_queue_time_stats),
        ("CPU utilization", &metrics.cpu_utilization_stats),
        ("Memory utilization", &metrics.ram_utilization_stats),
    ] {
        stats_table.add_row(row![
            name,
            stats.min(),
            stats.max(),
            stats.mean(),
            stats.population_variance()
        ]);
    }

    write!(output, "{}{}", aggregated_table, stats_table)?;
    Ok(())
}

#[derive(Serialize)]
struct MetricsJSON {
    counters: Counters,
    stats: Stats,
}

#[derive(Serialize)]
struct Counters {
    total_tasks: u64,
    tasks_placed: u64,
    tasks_unsatisfiable: u64,
    tasks_stranded: u64,
    passes: u64,
    time_steps: u64,
    placement_attempts: u64,
}

#[derive(Serialize)]
struct Stats {
    task_queue_time: EstimatorStats,
    cpu_utilization: EstimatorStats,
    ram_utilization: EstimatorStats,
}

#[derive(Serialize)]
struct EstimatorStats {
    min: f64,
    max: f64,
    mean: f64,
    variance: f64,
}

impl From<&EstimatorWrapper> for EstimatorStats {
    fn from(stats: &EstimatorWrapper) -> Self {
        Self {
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            variance: stats.population_variance(),
        }
    }
}

pub fn print_metrics_as_json(
    collector: Rc<RefCell<MetricsCollector>>,
    output: &mut dyn Write,
) -> Result<(), SimulationError> {
    let metrics = collector.borrow();

    let metrics = MetricsJSON {
        counters: Counters {
            total_tasks: metrics.total_tasks,
            tasks_placed: metrics.tasks_placed,
            tasks_unsatisfiable: metrics.tasks_unsatisfiable,
            tasks_stranded: metrics.tasks_stranded,
            passes: metrics.passes,
            time_steps: metrics.time_steps,
            placement_attempts: metrics.placement_attempts,
        },
        stats: Stats {
            task_queue_time: (&metrics.task_queue_time_stats).into(),
            cpu_utilization: (&metrics.cpu_utilization_stats).into(),
            ram_utilization: (&metrics.ram_utilization_stats).into(),
        },
    };

    let serialized_json = serde_json::to_string_pretty(&metrics)?;
    output.write_all(serialized_json.as_bytes())?;
    Ok(())
}
