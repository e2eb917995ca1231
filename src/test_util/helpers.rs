use crate::config::SimulationConfig;
use crate::core::scheduler::scheduler::Scheduler;
use crate::core::server::Server;

pub fn default_test_simulation_config(with_suffix: Option<&str>) -> SimulationConfig {
    let mut default = r#"
    sim_name: "test_packsim"
    seed: 123
    retry_limit: 5
    max_time_steps: 1000
    "#
    .to_string();

    if let Some(suffix) = with_suffix {
        default.push_str(suffix);
    }

    SimulationConfig::from_yaml(&default).unwrap()
}

/// Asserts `0 <= allocatable <= capacity` on every server of the scheduler.
pub fn check_capacity_invariant(scheduler: &Scheduler) {
    for server in scheduler.servers().servers() {
        check_server_capacity_invariant(server);
    }
}

pub fn check_server_capacity_invariant(server: &Server) {
    assert!(
        server.status.allocatable.fits_into(&server.status.capacity),
        "server {} has allocatable {:?} over capacity {:?}",
        server.id,
        server.status.allocatable,
        server.status.capacity
    );
}

/// (server id, allocatable cpu, allocatable ram) for every server in pool order.
pub fn allocatable_by_server(scheduler: &Scheduler) -> Vec<(usize, u32, u32)> {
    scheduler
        .servers()
        .servers()
        .iter()
        .map(|s| (s.id, s.status.allocatable.cpu, s.status.allocatable.ram))
        .collect()
}
