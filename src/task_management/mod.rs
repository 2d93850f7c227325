//! # Task Management System
//!
//! Runs independent units of work on a pool of worker threads. Meshing one
//! sprite does not depend on any other, so a compile run publishes one task
//! per sprite and collects the models as they come back.
//!
//! ## Architecture Overview
//! - `TaskManager`: central coordinator for task distribution and worker management
//! - `Task`: a unit of work executed on a worker
//! - `TaskResult`: the result of a completed task, applied on the calling thread
//! - `TaskChannel`: communication channel between the calling thread and one worker
//!
//! ## Task Lifecycle
//! 1. Tasks are published via `TaskManager::publish_task()`
//! 2. The manager distributes tasks to worker channels using round-robin,
//!    queueing the rest
//! 3. Workers process tasks and send results back
//! 4. Results are applied to the [`ModelLibrary`] in `process_completed_tasks()`
//! 5. `run_to_completion()` repeats this until nothing is queued or in flight
//!
//! ## Ownership
//! Each task owns its inputs and each result owns its model, so no locks are
//! needed. Workers exit when the manager is dropped.
//!
//! ## Example Usage
//! ```no_run
//! use voxel_sprite_mesher::model::ModelLibrary;
//! use voxel_sprite_mesher::task_management::{SpriteMeshingTask, TaskManager};
//!
//! let mut library = ModelLibrary::new();
//! let mut task_manager = TaskManager::new(4)?;
//! task_manager.publish_task(Box::new(SpriteMeshingTask::new("tree", "models/slices")));
//! task_manager.run_to_completion(&mut library)?;
//! # Ok::<(), voxel_sprite_mesher::error::MesherError>(())
//! ```

pub mod sprite_meshing_task;
pub mod task;

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

use log::{debug, error, info};

use crate::error::{MesherError, Result};
use crate::model::ModelLibrary;

pub use sprite_meshing_task::SpriteMeshingTask;
pub use task::{Task, TaskResult};

/// A communication channel between the calling thread and a worker thread.
///
/// # Fields
/// - `task_sender`: Sends tasks to the worker
/// - `result_receiver`: Receives task results from the worker
/// - `num_tasks_in_flight`: Number of tasks sent but not yet collected
/// - `worker`: Handle to the worker thread, joined on drop
#[derive(Debug)]
struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    num_tasks_in_flight: usize,
    worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// # Fields
/// - `channels`: One channel per worker
/// - `queued_tasks`: Tasks waiting for an available worker
/// - `current_channel`: Index for round-robin scheduling
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
///
/// Keeping this at 1 leaves the remaining tasks in the shared queue, so an
/// idle worker picks up the next one instead of waiting behind a busy one.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl TaskManager {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// # Arguments
    /// * `num_workers` - Number of worker threads to create. With zero workers,
    ///   queued tasks are run on the calling thread by `run_to_completion()`.
    ///
    /// # Errors
    /// [`MesherError::Io`] if a thread cannot be spawned.
    pub fn new(num_workers: usize) -> Result<Self> {
        info!(
            "Starting {num_workers} workers (available parallelism: {:?})",
            thread::available_parallelism()
        );

        let mut channels = Vec::with_capacity(num_workers);
        for index in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

            let worker = thread::Builder::new()
                .name(format!("mesher-worker-{index}"))
                .spawn(move || {
                    while let Ok(task) = task_rx.recv() {
                        let result = task.process();
                        if result_tx.send(result).is_err() {
                            break;
                        }
                    }
                })?;

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                worker,
            });
        }

        Ok(TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        })
    }

    /// Number of worker threads.
    pub fn num_workers(&self) -> usize {
        self.channels.len()
    }

    /// Number of tasks waiting for a worker.
    pub fn num_queued(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Number of tasks sent to workers whose results have not been collected.
    pub fn num_in_flight(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| channel.num_tasks_in_flight)
            .sum()
    }

    /// `true` when nothing is queued or in flight.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty() && self.num_in_flight() == 0
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// - `Ok(())` if the task was sent
    /// - `Err(task)` if the worker disconnected, handing the task back
    fn try_send_task(
        &mut self,
        task: Box<dyn Task + Send>,
        channel_idx: usize,
    ) -> std::result::Result<(), Box<dyn Task + Send>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(()) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(returned) => Err(returned.0),
        }
    }

    /// Finds a worker channel that can accept a new task.
    ///
    /// Round-robin from the channel after the last one used; channels at
    /// `MAX_TASKS_IN_FLIGHT` are skipped.
    fn find_available_channel(&self) -> Option<usize> {
        let count = self.channels.len();
        (0..count)
            .map(|step| (self.current_channel + step) % count)
            .find(|&idx| self.channels[idx].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT)
    }

    /// Publishes a new task for execution.
    ///
    /// # Returns
    /// - `true` if the task was sent to a worker immediately
    /// - `false` if it was queued because all workers are busy
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        let Some(channel_idx) = self.find_available_channel() else {
            self.queued_tasks.push_back(task);
            return false;
        };

        match self.try_send_task(task, channel_idx) {
            Ok(()) => {
                self.current_channel = (channel_idx + 1) % self.channels.len();
                true
            }
            Err(task) => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Sends queued tasks, oldest first, until the queue is empty or every
    /// worker is busy.
    pub fn process_queued_tasks(&mut self) {
        while let Some(channel_idx) = self.find_available_channel() {
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(()) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => {
                    // Disconnected worker, keep the task for later.
                    self.queued_tasks.push_front(task);
                    break;
                }
            }
        }
    }

    /// Applies every result that has already arrived, without blocking.
    ///
    /// All available results are applied even if one of them fails.
    ///
    /// # Returns
    /// The number of results applied.
    ///
    /// # Errors
    /// The first error returned by a result's `handle_result()`.
    pub fn process_completed_tasks(&mut self, library: &mut ModelLibrary) -> Result<usize> {
        let mut results = Vec::new();
        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                results.push(result);
            }
        }
        apply_results(results, library)
    }

    /// Blocks until one in-flight result arrives and takes it.
    fn wait_for_result(&mut self) -> Result<Box<dyn TaskResult + Send>> {
        let channel = self
            .channels
            .iter_mut()
            .find(|channel| channel.num_tasks_in_flight > 0)
            .ok_or(MesherError::WorkerDisconnected)?;

        let result = channel
            .result_receiver
            .recv()
            .map_err(|_| MesherError::WorkerDisconnected)?;
        channel.num_tasks_in_flight -= 1;
        Ok(result)
    }

    /// Runs until every published task has finished and been applied.
    ///
    /// A failing task does not stop the others; every task runs and the first
    /// error is returned once the pool is idle.
    ///
    /// # Returns
    /// The number of results applied.
    pub fn run_to_completion(&mut self, library: &mut ModelLibrary) -> Result<usize> {
        let mut applied = 0;
        let mut first_error = None;
        let mut record = |outcome: Result<usize>| match outcome {
            Ok(count) => applied += count,
            Err(err) => {
                first_error.get_or_insert(err);
            }
        };

        if self.channels.is_empty() {
            let tasks: Vec<_> = self.queued_tasks.drain(..).collect();
            debug!("No workers, running {} tasks inline", tasks.len());
            record(apply_results(tasks.iter().map(|task| task.process()), library));
        }

        while !self.is_idle() {
            self.process_queued_tasks();
            if self.num_in_flight() == 0 {
                // Every worker refused the queued tasks.
                return Err(MesherError::WorkerDisconnected);
            }
            let outcome = self
                .wait_for_result()
                .and_then(|result| apply_results([result], library));
            if matches!(outcome, Err(MesherError::WorkerDisconnected)) {
                return outcome;
            }
            record(outcome);
            record(self.process_completed_tasks(library));
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(applied),
        }
    }
}

/// Applies results in order, logging and keeping only the first error.
fn apply_results(
    results: impl IntoIterator<Item = Box<dyn TaskResult + Send>>,
    library: &mut ModelLibrary,
) -> Result<usize> {
    let mut applied = 0;
    let mut first_error = None;
    for result in results {
        match result.handle_result(library) {
            Ok(()) => applied += 1,
            Err(err) => {
                error!("Task failed: {err}");
                first_error.get_or_insert(err);
            }
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(applied),
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        for channel in self.channels.drain(..) {
            let TaskChannel {
                task_sender,
                result_receiver,
                worker,
                ..
            } = channel;
            drop(task_sender);
            drop(result_receiver);
            if worker.join().is_err() {
                error!("A worker thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::model::Model;
    use crate::voxels::VoxelVolume;

    /// Builds a one-voxel model named after its index.
    struct DotTask(usize);

    struct DotResult(Result<Model>);

    impl Task for DotTask {
        fn process(&self) -> Box<dyn TaskResult + Send> {
            let outcome = VoxelVolume::new(2).and_then(|mut volume| {
                volume.populate(0, 0, 0, Color::new(self.0 as u8, 0, 0))?;
                Ok(Model::new(format!("dot{}", self.0), volume))
            });
            Box::new(DotResult(outcome))
        }
    }

    impl TaskResult for DotResult {
        fn handle_result(self: Box<Self>, library: &mut ModelLibrary) -> Result<()> {
            library.insert(self.0?);
            Ok(())
        }
    }

    struct FailingTask;

    impl Task for FailingTask {
        fn process(&self) -> Box<dyn TaskResult + Send> {
            Box::new(DotResult(Err(MesherError::MissingModel("broken".into()))))
        }
    }

    #[test]
    fn processes_every_published_task() {
        let mut manager = TaskManager::new(3).unwrap();
        let mut library = ModelLibrary::new();

        let sent = (0..20)
            .filter(|&i| manager.publish_task(Box::new(DotTask(i))))
            .count();
        assert_eq!(sent, 3);
        assert_eq!(manager.num_queued(), 17);

        assert_eq!(manager.run_to_completion(&mut library).unwrap(), 20);
        assert!(manager.is_idle());
        assert_eq!(library.len(), 20);
        assert_eq!(library.get("dot7").unwrap().faces.len(), 6);
    }

    #[test]
    fn zero_workers_run_inline() {
        let mut manager = TaskManager::new(0).unwrap();
        let mut library = ModelLibrary::new();
        assert!(!manager.publish_task(Box::new(DotTask(1))));

        assert_eq!(manager.run_to_completion(&mut library).unwrap(), 1);
        assert!(library.get("dot1").is_some());
    }

    #[test]
    fn one_failure_does_not_stop_the_rest() {
        let mut manager = TaskManager::new(2).unwrap();
        let mut library = ModelLibrary::new();
        manager.publish_task(Box::new(DotTask(0)));
        manager.publish_task(Box::new(FailingTask));
        for i in 1..5 {
            manager.publish_task(Box::new(DotTask(i)));
        }

        let err = manager.run_to_completion(&mut library).unwrap_err();
        assert!(matches!(err, MesherError::MissingModel(_)));
        assert!(manager.is_idle());
        assert_eq!(library.len(), 5);
    }

    #[test]
    fn round_robin_fills_each_worker_once() {
        let mut manager = TaskManager::new(2).unwrap();
        assert!(manager.publish_task(Box::new(DotTask(0))));
        assert!(manager.publish_task(Box::new(DotTask(1))));
        assert!(!manager.publish_task(Box::new(DotTask(2))));
        assert_eq!(manager.num_in_flight(), 2);
        assert_eq!(manager.num_queued(), 1);

        let mut library = ModelLibrary::new();
        manager.run_to_completion(&mut library).unwrap();
        assert_eq!(library.len(), 3);
    }
}
