use serde::{Deserialize, Serialize};

/// Two-dimensional resource vector: compute units and memory units.
#[derive(Default, Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeResources {
    pub cpu: u32,
    pub ram: u32,
}

impl RuntimeResources {
    pub fn new(cpu: u32, ram: u32) -> Self {
        Self { cpu, ram }
    }

    /// True if both dimensions of `self` are not greater than those of `other`.
    pub fn fits_into(&self, other: &RuntimeResources) -> bool {
        self.cpu <= other.cpu && self.ram <= other.ram
    }
}

pub type ServerId = usize;
pub type TaskId = u64;
