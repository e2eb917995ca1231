pub mod interface;
pub mod placement;
pub mod queue;
pub mod scheduler;
