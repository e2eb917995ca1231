//! Type definitions for a server: a fixed-capacity pool of cpu and ram.

use serde::{Deserialize, Serialize};

use crate::core::common::{RuntimeResources, ServerId};
use crate::core::task::Task;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ResourceDimension {
    Cpu,
    Ram,
}

#[derive(Default, Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerStatus {
    // How much resources left, equals to capacity when server is created.
    pub allocatable: RuntimeResources,
    // Total amount of resources
    pub capacity: RuntimeResources,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Server {
    pub id: ServerId,
    pub status: ServerStatus,
}

impl Server {
    pub fn new(id: ServerId, cpu: u32, ram: u32) -> Self {
        Self {
            id,
            status: ServerStatus {
                allocatable: RuntimeResources { cpu, ram },
                capacity: RuntimeResources { cpu, ram },
            },
        }
    }

    /// Deducts task requests from allocatable resources iff both dimensions fit.
    /// Leaves the server untouched otherwise.
    pub fn try_allocate(&mut self, task: &Task) -> bool {
        if !task.requests.fits_into(&self.status.allocatable) {
            return false;
        }
        self.status.allocatable.cpu -= task.requests.cpu;
        self.status.allocatable.ram -= task.requests.ram;
        true
    }

    /// Gives task requests back. Must be called only for a task which is allocated on this server.
    pub fn release(&mut self, task: &Task) {
        self.status.allocatable.cpu += task.requests.cpu;
        self.status.allocatable.ram += task.requests.ram;
        debug_assert!(
            self.status.allocatable.fits_into(&self.status.capacity),
            "server {} released more than it has allocated",
            self.id
        );
    }

    /// Sum of leftover cpu and ram.
    pub fn leftover(&self) -> u64 {
        self.status.allocatable.cpu as u64 + self.status.allocatable.ram as u64
    }

    /// True if the task fits into the total capacity, regardless of current allocations.
    pub fn can_ever_fit(&self, task: &Task) -> bool {
        task.requests.fits_into(&self.status.capacity)
    }

    /// Percentage of the dimension which is currently allocated.
    pub fn utilization(&self, dimension: ResourceDimension) -> f64 {
        let (allocatable, capacity) = match dimension {
            ResourceDimension::Cpu => (self.status.allocatable.cpu, self.status.capacity.cpu),
            ResourceDimension::Ram => (self.status.allocatable.ram, self.status.capacity.ram),
        };
        if capacity == 0 {
            return 0.0;
        }
        (1.0 - allocatable as f64 / capacity as f64) * 100.0
    }

    pub fn cpu_utilization(&self) -> f64 {
        self.utilization(ResourceDimension::Cpu)
    }

    pub fn ram_utilization(&self) -> f64 {
        self.utilization(ResourceDimension::Ram)
    }
}
