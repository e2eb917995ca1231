//! Discrete-time simulator of bin-packing task placement onto a fixed pool of servers.

pub mod config;
pub mod core;
pub mod error;
pub mod metrics;
pub mod simulation_callbacks;
pub mod simulator;
pub mod test_util;
pub mod trace;
