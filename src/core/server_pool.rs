//! Server pool is the fixed fleet of servers for the whole simulation.
//!
//! Servers are created once before the first scheduling pass and are never added or removed
//! afterwards, so allocations made by one pass are still in place when the next pass starts.

use crate::config::ServerGroup;
use crate::core::common::{RuntimeResources, ServerId};
use crate::core::server::Server;
use crate::core::task::Task;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ServerPool {
    servers: Vec<Server>,
}

impl ServerPool {
    /// Creates `server_count` servers for every group, ids are assigned sequentially across
    /// groups in config order.
    pub fn new(groups: &[ServerGroup]) -> Self {
        let total: u64 = groups.iter().map(|g| g.server_count).sum();
        let mut servers = Vec::with_capacity(total as usize);
        for group in groups {
            for _ in 0..group.server_count {
                let id: ServerId = servers.len();
                servers.push(Server::new(id, group.capacity.cpu, group.capacity.ram));
            }
        }
        Self { servers }
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    pub fn servers_mut(&mut self) -> &mut [Server] {
        &mut self.servers
    }

    pub fn get(&self, id: ServerId) -> Option<&Server> {
        self.servers.get(id)
    }

    pub fn get_mut(&mut self, id: ServerId) -> Option<&mut Server> {
        self.servers.get_mut(id)
    }

    /// True if at least one server could host the task when it is completely empty.
    pub fn can_ever_fit(&self, task: &Task) -> bool {
        self.servers.iter().any(|server| server.can_ever_fit(task))
    }

    /// Mean of per-server cpu and ram utilization percentages. Zeros for an empty pool.
    pub fn mean_utilization(&self) -> (f64, f64) {
        if self.servers.is_empty() {
            return (0.0, 0.0);
        }
        let mut total_cpu = 0.0;
        let mut total_ram = 0.0;
        for server in self.servers.iter() {
            total_cpu += server.cpu_utilization();
            total_ram += server.ram_utilization();
        }
        let count = self.servers.len() as f64;
        (total_cpu / count, total_ram / count)
    }

    /// Resources currently allocated across all servers.
    pub fn allocated_totals(&self) -> (u64, u64) {
        self.servers.iter().fold((0, 0), |(cpu, ram), server| {
            let RuntimeResources {
                cpu: capacity_cpu,
                ram: capacity_ram,
            } = server.status.capacity;
            (
                cpu + (capacity_cpu - server.status.allocatable.cpu) as u64,
                ram + (capacity_ram - server.status.allocatable.ram) as u64,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ServerGroup;
    use crate::core::common::RuntimeResources;
    use crate::core::task::Task;

    use super::ServerPool;

    fn groups() -> Vec<ServerGroup> {
        vec![
            ServerGroup {
                server_count: 2,
                capacity: RuntimeResources::new(10, 10),
            },
            ServerGroup {
                server_count: 1,
                capacity: RuntimeResources::new(24, 64),
            },
        ]
    }

    #[test]
    fn test_pool_from_groups_assigns_sequential_ids() {
        let pool = ServerPool::new(&groups());
        assert_eq!(3, pool.len());
        for (idx, server) in pool.servers().iter().enumerate() {
            assert_eq!(idx, server.id);
        }
        assert_eq!(RuntimeResources::new(24, 64), pool.get(2).unwrap().status.capacity);
    }

    #[test]
    fn test_can_ever_fit_checks_every_server_capacity() {
        let pool = ServerPool::new(&groups());
        assert!(pool.can_ever_fit(&Task::new(0, 0, 20, 60, 1)));
        assert!(!pool.can_ever_fit(&Task::new(1, 0, 25, 10, 1)));
        assert!(!pool.can_ever_fit(&Task::new(2, 0, 1, 65, 1)));
    }

    #[test]
    fn test_mean_utilization() {
        let mut pool = ServerPool::new(&groups());
        assert_eq!((0.0, 0.0), pool.mean_utilization());

        assert!(pool.get_mut(0).unwrap().try_allocate(&Task::new(0, 0, 10, 5, 1)));
        assert!(pool.get_mut(1).unwrap().try_allocate(&Task::new(1, 0, 5, 10, 1)));
        // cpu: (100 + 50 + 0) / 3, ram: (50 + 100 + 0) / 3
        assert_eq!((50.0, 50.0), pool.mean_utilization());
        assert_eq!((15, 15), pool.allocated_totals());
    }

    #[test]
    fn test_empty_pool_has_zero_utilization() {
        let pool = ServerPool::new(&[]);
        assert!(pool.is_empty());
        assert_eq!((0.0, 0.0), pool.mean_utilization());
    }
}
