use std::rc::Rc;

use packsim::config::SimulationConfig;
use packsim::metrics::utilization::UtilizationSample;
use packsim::simulation_callbacks::StopOnStrandedTasksCallbacks;
use packsim::simulator::{workload_from_config, BinPackingSimulation};
use packsim::trace::generic::GenericWorkloadTrace;
use packsim::trace::interface::Trace;

const TRACE: &str = r#"
tasks:
- id: 1
  arrival_time: 0
  requests:
    cpu: 4
    ram: 4
  duration: 1
- id: 2
  arrival_time: 1
  requests:
    cpu: 4
    ram: 4
  duration: 1
- id: 3
  arrival_time: 2
  requests:
    cpu: 8
    ram: 8
  duration: 1
"#;

fn two_server_config(suffix: &str) -> SimulationConfig {
    let config_yaml = format!(
        r#"
sim_name: two_servers
cluster:
- server_count: 2
  capacity:
    cpu: 10
    ram: 10
{}"#,
        suffix
    );
    SimulationConfig::from_yaml(&config_yaml).unwrap()
}

fn create_simulation(config: SimulationConfig) -> BinPackingSimulation {
    let mut simulation = BinPackingSimulation::new(Rc::new(config));
    let mut trace = GenericWorkloadTrace::from_str(TRACE).unwrap();
    simulation.initialize(&mut trace);
    simulation
}

#[test]
fn test_reference_passes_share_server_pool() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut simulation = create_simulation(two_server_config(""));
    let mut samples: Vec<UtilizationSample> = vec![];

    simulation.run(&mut samples).unwrap();

    // the first pass fills both servers up to 8 of 10, later passes find no room
    assert_eq!(3, simulation.pass_summaries.len());
    assert_eq!(3, simulation.pass_summaries[0].placements.len());
    assert_eq!(3, simulation.pass_summaries[1].stranded.len());
    assert_eq!(3, simulation.pass_summaries[2].stranded.len());
    assert_eq!("first_fit", simulation.pass_summaries[0].algorithm);
    assert_eq!("best_fit", simulation.pass_summaries[1].algorithm);
    assert_eq!("worst_fit", simulation.pass_summaries[2].algorithm);

    assert_eq!(
        vec![1, 2, 3],
        samples.iter().map(|s| s.time_step).collect::<Vec<u64>>()
    );
    assert!(samples.iter().all(|s| s.cpu_utilization == 80.0));

    let metrics = simulation.metrics_collector.borrow();
    assert_eq!(9, metrics.total_tasks);
    assert_eq!(3, metrics.tasks_placed);
    assert_eq!(6, metrics.tasks_stranded);
    assert_eq!(0, metrics.tasks_unsatisfiable);
    assert_eq!(3, metrics.passes);
    assert_eq!(3, metrics.time_steps);
}

#[test]
fn test_stop_on_stranded_tasks() {
    let mut simulation = create_simulation(two_server_config(""));
    let mut callbacks = StopOnStrandedTasksCallbacks {};

    simulation
        .run_with_callbacks(&mut callbacks, &mut Vec::<UtilizationSample>::new())
        .unwrap();

    assert_eq!(2, simulation.pass_summaries.len());
    assert_eq!(2, simulation.metrics_collector.borrow().passes);
}

#[test]
fn test_single_pass_from_config() {
    let mut simulation = create_simulation(two_server_config(
        r#"
passes:
- order: smallest
  fit: best
"#,
    ));
    let mut samples: Vec<UtilizationSample> = vec![];

    simulation.run(&mut samples).unwrap();

    assert_eq!(1, simulation.pass_summaries.len());
    let summary = &simulation.pass_summaries[0];
    // both 4x4 tasks share the first server, the 8x8 one goes to the empty second server
    assert_eq!(
        vec![(1, 0), (2, 0), (3, 1)],
        summary
            .placements
            .iter()
            .map(|p| (p.task_id, p.server))
            .collect::<Vec<(u64, usize)>>()
    );
}

#[test]
fn test_trace_file_workload_and_json_metrics() {
    let dir = std::env::temp_dir().join(format!("packsim_test_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let trace_path = dir.join("tasks.yaml");
    let metrics_path = dir.join("metrics.json");
    std::fs::write(&trace_path, TRACE).unwrap();

    let config = two_server_config(&format!(
        r#"
workload:
  trace_path: {}
metrics_printer:
  format: JSON
  output_file: {}
"#,
        trace_path.display(),
        metrics_path.display()
    ));
    let config = Rc::new(config);
    let mut trace = workload_from_config(&config).unwrap();
    assert_eq!(3, trace.task_count());

    let mut simulation = BinPackingSimulation::new(config.clone());
    simulation.initialize(trace.as_mut());
    simulation
        .run(&mut Vec::<UtilizationSample>::new())
        .unwrap();

    let metrics: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&metrics_path).unwrap()).unwrap();
    assert_eq!(9, metrics["counters"]["total_tasks"]);
    assert_eq!(3, metrics["counters"]["tasks_placed"]);
    assert_eq!(80.0, metrics["stats"]["cpu_utilization"]["mean"]);

    std::fs::remove_dir_all(&dir).unwrap();
}
