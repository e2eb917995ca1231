use crate::core::common::ServerId;
use crate::core::server::Server;
use crate::core::task::Task;

#[derive(Debug, PartialEq)]
pub enum ScheduleError {
    NoServersInCluster,
    NoSufficientServers,
}

// Trait which should implement any placement strategy in the simulator.
pub trait PlacementAlgorithm {
    fn name(&self) -> &'static str;

    // Deterministic strategies always give the same answer for the same task and server state.
    // Scheduler relies on it to detect that nothing more can be placed.
    fn is_deterministic(&self) -> bool {
        true
    }

    // Selects a server for the task and commits exactly one allocation on it.
    // On error none of the servers is modified.
    //
    // Scheduler may call this several times for the same task within one time step (up to the
    // retry limit), so strategies which consult randomized or time-varying state get another
    // chance before the task is deferred to the next step.
    fn place(&self, task: &Task, servers: &mut [Server]) -> Result<ServerId, ScheduleError>;
}
