//! # Model Compiler
//!
//! Drives a full compile run:
//!
//! 1. Clean the compiled directory
//! 2. Load the world file
//! 3. Mesh every referenced sprite on the worker pool
//! 4. Group terrain into chunk models
//! 5. Save every model as JSON
//!
//! Nothing is written if any sprite fails.

use log::info;
use web_time::Instant;

use crate::config::CompilerConfig;
use crate::error::Result;
use crate::model::world::{group_terrain, World};
use crate::model::{clean_directory, ModelLibrary};
use crate::task_management::{SpriteMeshingTask, TaskManager};

/// Summary of a finished compile run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileReport {
    /// Number of models written.
    pub models: usize,
    /// Number of faces across all written models.
    pub faces: usize,
}

/// Compiles the sprites and terrain of one world.
#[derive(Debug, Clone)]
pub struct ModelCompiler {
    config: CompilerConfig,
}

impl ModelCompiler {
    /// Creates a compiler for the given settings.
    pub fn new(config: CompilerConfig) -> Self {
        ModelCompiler { config }
    }

    /// The settings this compiler runs with.
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Runs every step and writes the models.
    pub fn compile(&self) -> Result<CompileReport> {
        let start = Instant::now();
        let library = self.build_library()?;
        library.save_models(&self.config.compiled_dir)?;

        let report = CompileReport {
            models: library.len(),
            faces: library.face_count(),
        };
        info!(
            "Compiled {} models ({} faces) in {:?}",
            report.models,
            report.faces,
            start.elapsed()
        );
        Ok(report)
    }

    /// Runs every step except saving.
    pub fn build_library(&self) -> Result<ModelLibrary> {
        self.config.validate()?;

        info!("Cleaning {}", self.config.compiled_dir.display());
        clean_directory(&self.config.compiled_dir)?;

        let world = World::load(&self.config.world_path)?;
        let mut library = ModelLibrary::new();

        let names = world.sprite_names();
        info!("Meshing {} sprites", names.len());
        let mut task_manager = TaskManager::new(self.config.workers)?;
        for name in names {
            task_manager.publish_task(Box::new(SpriteMeshingTask::new(
                name,
                self.config.slices_dir.clone(),
            )));
        }
        task_manager.run_to_completion(&mut library)?;

        group_terrain(&world, &mut library, &self.config)?;
        Ok(library)
    }
}
