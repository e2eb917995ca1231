//! Scheduling engine which drains a set of tasks onto the server pool in discrete time steps.
//!
//! Every time step the pending set is sorted by the pass's queue order, each task gets up to
//! `retry_limit` placement attempts, tasks which got no server are carried over to the next
//! step, and mean utilization of the pool is sampled once the step is over.
//!
//! Logical time is not reset between passes, neither are server allocations: every pass starts
//! with whatever capacity the previous one left behind.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::core::common::{ServerId, TaskId};
use crate::core::scheduler::interface::PlacementAlgorithm;
use crate::core::scheduler::placement::FitStrategy;
use crate::core::scheduler::queue::{QueueOrder, QueuedTaskInfo};
use crate::core::server_pool::ServerPool;
use crate::core::task::Task;
use crate::error::SimulationError;
use crate::metrics::collector::MetricsCollector;
use crate::metrics::utilization::{UtilizationSample, UtilizationSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Draining,
}

/// Task which holds resources on a server until `finish_time_step`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunningTask {
    pub task: Task,
    pub server: ServerId,
    pub finish_time_step: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub task_id: TaskId,
    pub server: ServerId,
    pub time_step: u64,
}

/// Outcome of one scheduling pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PassSummary {
    pub algorithm: &'static str,
    pub order: QueueOrder,
    /// Time steps completed during the pass.
    pub time_steps: u64,
    /// Successful placements in the order they happened.
    pub placements: Vec<Placement>,
    /// Tasks requesting more than the capacity of every server in the pool. They were never
    /// queued.
    pub unsatisfiable: Vec<Task>,
    /// Tasks still pending when the pool could not place anything more.
    pub stranded: Vec<Task>,
}

pub struct Scheduler {
    servers: ServerPool,
    state: SchedulerState,
    // Logical time, one unit per completed time step over all passes.
    time_step: u64,
    running_tasks: Vec<RunningTask>,

    config: Rc<SimulationConfig>,
    metrics_collector: Rc<RefCell<MetricsCollector>>,
}

impl Scheduler {
    pub fn new(
        servers: ServerPool,
        config: Rc<SimulationConfig>,
        metrics_collector: Rc<RefCell<MetricsCollector>>,
    ) -> Self {
        Self {
            servers,
            state: SchedulerState::Idle,
            time_step: 0,
            running_tasks: Default::default(),
            config,
            metrics_collector,
        }
    }

    pub fn servers(&self) -> &ServerPool {
        &self.servers
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn time_step(&self) -> u64 {
        self.time_step
    }

    pub fn running_tasks(&self) -> &[RunningTask] {
        &self.running_tasks
    }

    /// Runs one scheduling pass with one of the built-in placement strategies.
    pub fn process_tasks(
        &mut self,
        tasks: Vec<Task>,
        order: QueueOrder,
        fit: FitStrategy,
        sink: &mut dyn UtilizationSink,
    ) -> Result<PassSummary, SimulationError> {
        let algorithm = fit.algorithm();
        self.process_tasks_with_algorithm(tasks, order, algorithm.as_ref(), sink)
    }

    /// Runs one scheduling pass: returns when every task is either placed, classified as
    /// unsatisfiable or stranded.
    pub fn process_tasks_with_algorithm(
        &mut self,
        tasks: Vec<Task>,
        order: QueueOrder,
        algorithm: &dyn PlacementAlgorithm,
        sink: &mut dyn UtilizationSink,
    ) -> Result<PassSummary, SimulationError> {
        info!(
            "Starting pass at time step {} with {} tasks, order {:?}, placement {}",
            self.time_step,
            tasks.len(),
            order,
            algorithm.name()
        );
        self.state = SchedulerState::Draining;
        let result = self.drain(tasks, order, algorithm, sink);
        self.state = SchedulerState::Idle;

        let summary = result?;
        self.metrics_collector.borrow_mut().passes += 1;
        info!(
            "Finished pass {} / {:?} at time step {}: {} time steps, {} placed, {} unsatisfiable, {} stranded",
            summary.algorithm,
            summary.order,
            self.time_step,
            summary.time_steps,
            summary.placements.len(),
            summary.unsatisfiable.len(),
            summary.stranded.len()
        );
        Ok(summary)
    }

    fn drain(
        &mut self,
        tasks: Vec<Task>,
        order: QueueOrder,
        algorithm: &dyn PlacementAlgorithm,
        sink: &mut dyn UtilizationSink,
    ) -> Result<PassSummary, SimulationError> {
        let first_time_step = self.time_step;
        self.metrics_collector.borrow_mut().total_tasks += tasks.len() as u64;

        let (satisfiable, unsatisfiable): (Vec<Task>, Vec<Task>) = tasks
            .into_iter()
            .partition(|task| self.servers.can_ever_fit(task));
        for task in unsatisfiable.iter() {
            warn!(
                "Task {} requests {:?} which exceeds capacity of every server, it is never queued",
                task.id, task.requests
            );
        }
        self.metrics_collector.borrow_mut().tasks_unsatisfiable += unsatisfiable.len() as u64;

        let mut pending: Vec<QueuedTaskInfo> = satisfiable
            .into_iter()
            .map(|task| QueuedTaskInfo::new(task, self.time_step + 1))
            .collect();
        let mut placements: Vec<Placement> = vec![];
        let mut stranded: Vec<Task> = vec![];

        while !pending.is_empty() {
            if let Some(limit) = self.config.max_time_steps {
                if self.time_step - first_time_step >= limit {
                    return Err(SimulationError::TimeStepLimitExceeded {
                        limit,
                        pending: pending.len(),
                    });
                }
            }

            self.time_step += 1;
            self.release_finished_tasks();
            order.sort(&mut pending);

            let mut next_pending = Vec::with_capacity(pending.len());
            let mut placed_in_step = 0;
            for mut queued in pending.into_iter() {
                match self.place_with_retries(&mut queued, algorithm) {
                    Some(server) => {
                        placements.push(self.on_task_placed(queued, server));
                        placed_in_step += 1;
                    }
                    None => next_pending.push(queued),
                }
            }
            pending = next_pending;

            self.record_utilization(sink)?;

            // With static capacity and a deterministic strategy, a step which places nothing is
            // repeated forever unless some running task frees resources.
            if placed_in_step == 0
                && !pending.is_empty()
                && self.running_tasks.is_empty()
                && algorithm.is_deterministic()
            {
                warn!(
                    "No task could be placed at time step {} and no resources will be freed, {} tasks are stranded",
                    self.time_step,
                    pending.len()
                );
                stranded = pending.drain(..).map(|queued| queued.task).collect();
                self.metrics_collector.borrow_mut().tasks_stranded += stranded.len() as u64;
            }
        }

        Ok(PassSummary {
            algorithm: algorithm.name(),
            order,
            time_steps: self.time_step - first_time_step,
            placements,
            unsatisfiable,
            stranded,
        })
    }

    fn place_with_retries(
        &mut self,
        queued: &mut QueuedTaskInfo,
        algorithm: &dyn PlacementAlgorithm,
    ) -> Option<ServerId> {
        for _ in 0..self.config.retry_limit {
            queued.attempts += 1;
            self.metrics_collector.borrow_mut().placement_attempts += 1;
            match algorithm.place(&queued.task, self.servers.servers_mut()) {
                Ok(server) => return Some(server),
                Err(err) => debug!(
                    "Task {} attempt {} failed at time step {}: {:?}",
                    queued.task.id, queued.attempts, self.time_step, err
                ),
            }
        }
        None
    }

    fn on_task_placed(&mut self, queued: QueuedTaskInfo, server: ServerId) -> Placement {
        let task = queued.task;
        let placement = Placement {
            task_id: task.id,
            server,
            time_step: self.time_step,
        };
        info!(
            "TaskId: {} Arrival Day: {} Time Hour: {} MemReq: {} CPUReq: {} ExeTime: {}",
            task.id,
            task.arrival_day(),
            task.arrival_hour(),
            task.requests.ram,
            task.requests.cpu,
            task.duration
        );
        debug!(
            "Task {} has been assigned server {} at time step {}",
            task.id, server, self.time_step
        );

        let mut metrics = self.metrics_collector.borrow_mut();
        metrics.tasks_placed += 1;
        metrics.increment_task_queue_time((self.time_step - queued.initial_time_step) as f64);
        drop(metrics);

        if self.config.release_finished_tasks {
            self.running_tasks.push(RunningTask {
                finish_time_step: self.time_step + task.duration as u64,
                task,
                server,
            });
        }
        placement
    }

    fn release_finished_tasks(&mut self) {
        let time_step = self.time_step;
        let servers = &mut self.servers;
        self.running_tasks.retain(|running| {
            if running.finish_time_step > time_step {
                return true;
            }
            if let Some(server) = servers.get_mut(running.server) {
                server.release(&running.task);
            }
            debug!(
                "Task {} finished on server {} at time step {}",
                running.task.id, running.server, time_step
            );
            false
        });
    }

    fn record_utilization(
        &mut self,
        sink: &mut dyn UtilizationSink,
    ) -> Result<(), SimulationError> {
        let (cpu_utilization, ram_utilization) = self.servers.mean_utilization();
        let sample = UtilizationSample {
            time_step: self.time_step,
            cpu_utilization,
            ram_utilization,
        };
        self.metrics_collector
            .borrow_mut()
            .add_utilization_sample(&sample);
        sink.record(&sample)
    }
}
