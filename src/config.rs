//! # Compiler Configuration
//!
//! Settings come from an optional TOML file and are then overridden by
//! command-line flags. Every field has a default, so an empty file (or no
//! file) is a valid configuration.
//!
//! ```toml
//! slices_dir = "models/slices"
//! compiled_dir = "models/compiled"
//! world_path = "src/world.json"
//! grid_size = 16
//! chunk_size = 10
//! workers = 4
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::error::{MesherError, Result};

/// Edge length, in voxels, of one world grid cell.
pub const GRID_SIZE: usize = 16;

/// Edge length, in grid cells, of one terrain chunk.
pub const CHUNK_SIZE: usize = 10;

/// Settings for a compile run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Directory holding `<name>.png` sprite images.
    pub slices_dir: PathBuf,
    /// Directory the `<name>.json` models are written to. Cleaned before every run.
    pub compiled_dir: PathBuf,
    /// The world entity file.
    pub world_path: PathBuf,
    /// Voxels per grid cell; every sprite must be this size.
    pub grid_size: usize,
    /// Grid cells per terrain chunk edge.
    pub chunk_size: usize,
    /// Number of meshing worker threads.
    pub workers: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            slices_dir: PathBuf::from("models/slices"),
            compiled_dir: PathBuf::from("models/compiled"),
            world_path: PathBuf::from("src/world.json"),
            grid_size: GRID_SIZE,
            chunk_size: CHUNK_SIZE,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

impl CompilerConfig {
    /// Reads and validates a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config: CompilerConfig = toml::from_str(&fs::read_to_string(path)?)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values no compile run can use.
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            return Err(MesherError::InvalidConfig("grid_size must be positive".into()));
        }
        if self.chunk_size == 0 || i32::try_from(self.chunk_size).is_err() {
            return Err(MesherError::InvalidConfig(format!(
                "chunk_size must be in 1..={}",
                i32::MAX
            )));
        }
        if self.workers == 0 {
            return Err(MesherError::InvalidConfig("workers must be positive".into()));
        }
        Ok(())
    }
}

/// Compiles voxel sprites and world terrain into greedy-meshed JSON models.
#[derive(Debug, Default, Parser)]
#[command(name = "voxel-sprite-mesher", version, about)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// World entity file
    #[arg(long)]
    pub world: Option<PathBuf>,

    /// Directory of sprite images
    #[arg(long)]
    pub slices: Option<PathBuf>,

    /// Output directory for compiled models
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Number of worker threads
    #[arg(short, long)]
    pub workers: Option<usize>,
}

impl Cli {
    /// Builds the effective configuration: the file (or defaults), then flags.
    pub fn into_config(self) -> Result<CompilerConfig> {
        let mut config = match &self.config {
            Some(path) => CompilerConfig::load(path)?,
            None => CompilerConfig::default(),
        };

        if let Some(world) = self.world {
            config.world_path = world;
        }
        if let Some(slices) = self.slices {
            config.slices_dir = slices;
        }
        if let Some(out) = self.out {
            config.compiled_dir = out;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: CompilerConfig = toml::from_str("").unwrap();
        assert_eq!(config, CompilerConfig::default());
        assert_eq!(config.grid_size, 16);
        assert_eq!(config.chunk_size, 10);
        assert!(config.workers >= 1);
    }

    #[test]
    fn loads_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesher.toml");
        fs::write(&path, "compiled_dir = \"out\"\nworkers = 3\n").unwrap();

        let config = CompilerConfig::load(&path).unwrap();
        assert_eq!(config.compiled_dir, PathBuf::from("out"));
        assert_eq!(config.workers, 3);
        assert_eq!(config.slices_dir, PathBuf::from("models/slices"));
    }

    #[test]
    fn rejects_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesher.toml");

        fs::write(&path, "grid_size = \"big\"").unwrap();
        assert!(matches!(CompilerConfig::load(&path), Err(MesherError::Config(_))));

        fs::write(&path, "chunk_size = 0").unwrap();
        assert!(matches!(CompilerConfig::load(&path), Err(MesherError::InvalidConfig(_))));

        fs::write(&path, "colour = 1").unwrap();
        assert!(matches!(CompilerConfig::load(&path), Err(MesherError::Config(_))));
    }

    #[test]
    fn flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesher.toml");
        fs::write(&path, "workers = 3\nworld_path = \"a.json\"").unwrap();

        let cli = Cli::parse_from([
            "voxel-sprite-mesher",
            "--config",
            path.to_str().unwrap(),
            "--world",
            "b.json",
            "-w",
            "5",
        ]);
        let config = cli.into_config().unwrap();
        assert_eq!(config.world_path, PathBuf::from("b.json"));
        assert_eq!(config.workers, 5);
    }

    #[test]
    fn zero_workers_flag_is_rejected() {
        let cli = Cli::parse_from(["voxel-sprite-mesher", "--workers", "0"]);
        assert!(matches!(cli.into_config(), Err(MesherError::InvalidConfig(_))));
    }
}
