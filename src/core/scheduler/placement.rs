//! Bin-packing placement strategies.
//!
//! All strategies scan servers in pool order. First fit commits the allocation on the first
//! server it succeeds on. Best and worst fit probe every server with a speculative
//! allocate/release pair, score it by waste (leftover cpu + leftover ram after the would-be
//! allocation) and commit a single real allocation on the winner after the scan.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::common::ServerId;
use crate::core::scheduler::interface::{PlacementAlgorithm, ScheduleError};
use crate::core::server::Server;
use crate::core::task::Task;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FitStrategy {
    First,
    Best,
    Worst,
}

impl FitStrategy {
    pub fn algorithm(&self) -> Box<dyn PlacementAlgorithm> {
        match self {
            FitStrategy::First => Box::new(FirstFit {}),
            FitStrategy::Best => Box::new(BestFit {}),
            FitStrategy::Worst => Box::new(WorstFit {}),
        }
    }
}

/// Probes every server and returns the one whose waste is preferred by `is_better` over the
/// current candidate, starting from `initial` waste. Every probe is rolled back before the next
/// server is looked at, so servers are unchanged on return.
fn scan_by_waste(
    task: &Task,
    servers: &mut [Server],
    initial: u64,
    is_better: impl Fn(u64, u64) -> bool,
) -> Option<ServerId> {
    let mut selected: Option<ServerId> = None;
    let mut selected_waste = initial;

    for (idx, server) in servers.iter_mut().enumerate() {
        if server.try_allocate(task) {
            let waste = server.leftover();
            if is_better(waste, selected_waste) {
                selected_waste = waste;
                selected = Some(idx);
            }
            server.release(task);
        }
    }
    selected
}

fn commit(
    task: &Task,
    servers: &mut [Server],
    selected: Option<ServerId>,
) -> Result<ServerId, ScheduleError> {
    match selected {
        Some(idx) if servers[idx].try_allocate(task) => Ok(servers[idx].id),
        _ => Err(ScheduleError::NoSufficientServers),
    }
}

pub struct FirstFit {}

impl PlacementAlgorithm for FirstFit {
    fn name(&self) -> &'static str {
        "first_fit"
    }

    fn place(&self, task: &Task, servers: &mut [Server]) -> Result<ServerId, ScheduleError> {
        if servers.is_empty() {
            return Err(ScheduleError::NoServersInCluster);
        }
        servers
            .iter_mut()
            .find_map(|server| server.try_allocate(task).then_some(server.id))
            .ok_or(ScheduleError::NoSufficientServers)
    }
}

/// Picks the fitting server with the least waste, the first scanned one on ties.
pub struct BestFit {}

impl PlacementAlgorithm for BestFit {
    fn name(&self) -> &'static str {
        "best_fit"
    }

    fn place(&self, task: &Task, servers: &mut [Server]) -> Result<ServerId, ScheduleError> {
        if servers.is_empty() {
            return Err(ScheduleError::NoServersInCluster);
        }
        let selected = scan_by_waste(task, servers, u64::MAX, |waste, least| waste < least);
        commit(task, servers, selected)
    }
}

/// Picks the fitting server with the most waste, the first scanned one on ties.
///
/// The best waste seen starts at zero and must be strictly exceeded, so a server the task
/// would fill exactly is never picked, even when it is the only one that fits.
pub struct WorstFit {}

impl PlacementAlgorithm for WorstFit {
    fn name(&self) -> &'static str {
        "worst_fit"
    }

    fn place(&self, task: &Task, servers: &mut [Server]) -> Result<ServerId, ScheduleError> {
        if servers.is_empty() {
            return Err(ScheduleError::NoServersInCluster);
        }
        let selected = scan_by_waste(task, servers, 0, |waste, most| waste > most);
        commit(task, servers, selected)
    }
}
