use std::rc::Rc;

use packsim::config::{ServerGroup, SimulationConfig};
use packsim::core::common::RuntimeResources;
use packsim::metrics::utilization::{CsvUtilizationSink, UtilizationSample};
use packsim::simulator::{workload_from_config, BinPackingSimulation};
use packsim::test_util::helpers::default_test_simulation_config;
use packsim::trace::generator::GeneratorConfig;

fn small_config(seed: u64) -> SimulationConfig {
    let mut config = default_test_simulation_config(None);
    config.seed = seed;
    config.cluster = vec![ServerGroup {
        server_count: 16,
        capacity: RuntimeResources::new(24, 64),
    }];
    config.workload.generator = Some(GeneratorConfig {
        task_count: 300,
        ..Default::default()
    });
    config
}

fn run_simulation(config: SimulationConfig) -> (Vec<UtilizationSample>, Vec<u8>) {
    let config = Rc::new(config);
    let mut trace = workload_from_config(&config).unwrap();
    let mut simulation = BinPackingSimulation::new(config.clone());
    simulation.initialize(trace.as_mut());

    let mut samples: Vec<UtilizationSample> = vec![];
    simulation.run(&mut samples).unwrap();

    let mut sink = CsvUtilizationSink::new(Vec::<u8>::new());
    let mut simulation = BinPackingSimulation::new(config.clone());
    let mut trace = workload_from_config(&config).unwrap();
    simulation.initialize(trace.as_mut());
    simulation.run(&mut sink).unwrap();

    (samples, sink.into_inner().unwrap())
}

#[test]
fn test_same_seed_gives_same_utilization() {
    let (samples, csv) = run_simulation(small_config(42));
    let (other_samples, other_csv) = run_simulation(small_config(42));

    assert!(!samples.is_empty());
    assert_eq!(samples, other_samples);
    assert_eq!(csv, other_csv);
}

#[test]
fn test_different_seeds_give_different_workloads() {
    let (samples, _) = run_simulation(small_config(1));
    let (other_samples, _) = run_simulation(small_config(2));

    assert_ne!(samples, other_samples);
}

#[test]
fn test_csv_matches_recorded_samples() {
    let (samples, csv) = run_simulation(small_config(7));

    let mut reader = csv::Reader::from_reader(csv.as_slice());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        vec!["Time", "CPU Utilization", "Memory Utilization"],
        headers.iter().collect::<Vec<&str>>()
    );
    let read_back: Vec<UtilizationSample> = reader.deserialize().map(|r| r.unwrap()).collect();
    assert_eq!(samples, read_back);

    // time axis is continuous over all passes
    for (i, sample) in samples.iter().enumerate() {
        assert_eq!(i as u64 + 1, sample.time_step);
    }
}
