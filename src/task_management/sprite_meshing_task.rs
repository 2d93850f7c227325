//! Task that decodes and meshes one sprite on a worker thread.

use std::path::PathBuf;

use crate::error::Result;
use crate::model::{Model, ModelLibrary};

use super::task::{Task, TaskResult};

/// Loads `slices_dir/<name>.png` and meshes it into a model.
#[derive(Debug, Clone)]
pub struct SpriteMeshingTask {
    /// Sprite name, also the name of the resulting model
    name: String,
    /// Directory the sprite image is read from
    slices_dir: PathBuf,
}

impl SpriteMeshingTask {
    /// Creates a new sprite meshing task.
    ///
    /// # Arguments
    /// * `name` - The sprite to mesh
    /// * `slices_dir` - Directory holding `<name>.png`
    pub fn new(name: impl Into<String>, slices_dir: impl Into<PathBuf>) -> Self {
        SpriteMeshingTask {
            name: name.into(),
            slices_dir: slices_dir.into(),
        }
    }
}

impl Task for SpriteMeshingTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        Box::new(SpriteMeshingTaskResult {
            model: Model::from_sprite_file(&self.name, &self.slices_dir),
        })
    }
}

/// The meshed model, or the error that stopped it.
pub struct SpriteMeshingTaskResult {
    model: Result<Model>,
}

impl TaskResult for SpriteMeshingTaskResult {
    /// Inserts the model into the library, or returns the task's error.
    fn handle_result(self: Box<Self>, library: &mut ModelLibrary) -> Result<()> {
        library.insert(self.model?);
        Ok(())
    }
}
