//! # Task System Core Traits
//!
//! ## Core Components
//! - `Task`: a unit of work run on a worker thread
//! - `TaskResult`: what a task hands back to the calling thread
//!
//! ## Task Lifecycle
//! 1. A `Task` is scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` is called on the calling thread with the
//!    model library

use crate::error::Result;
use crate::model::ModelLibrary;

/// A unit of work that can be executed on a worker thread.
///
/// Tasks own all the data they need; nothing is shared with the calling thread
/// while they run.
pub trait Task: Send {
    /// Processes the task and returns a result.
    ///
    /// Errors are not returned here but carried inside the result, so a failing
    /// task still frees its worker slot.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// The result of processing a [`Task`], applied on the calling thread.
pub trait TaskResult: Send {
    /// Applies the result to the library.
    ///
    /// # Errors
    /// Whatever error the task itself ran into.
    fn handle_result(self: Box<Self>, library: &mut ModelLibrary) -> Result<()>;
}
