// Interface for any source of tasks which serves as input to the simulator.

use crate::core::task::Task;

// Trace is implemented by every workload format acceptable by simulator: synthetic generators
// as well as recorded task lists.
pub trait Trace {
    // Called once before the first scheduling pass to get the whole workload.
    fn tasks(&mut self) -> Vec<Task>;

    fn task_count(&self) -> usize;
}
