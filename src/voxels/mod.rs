//! # Voxel Storage
//!
//! This module contains everything that represents voxels before they are
//! turned into faces.
//!
//! ## Architecture
//!
//! * **Block side**: the six face directions and the neighbour each one looks at
//! * **Volume**: a dense cubic grid with an index of its populated cells
//! * **Visibility**: flags the faces that border empty space
//! * **Grouping**: places rotated volumes on a world grid and merges them
//!
//! ## Data Flow
//!
//! 1. A sprite is decoded into a [`VoxelVolume`]
//! 2. [`compute_visibility`] flags the faces that can be seen
//! 3. The greedy merger in [`crate::meshing`] reads the flags and colors
//!
//! ## Ownership
//!
//! A volume is owned by whichever pipeline stage is working on it. Nothing in
//! this module is shared between threads; meshing several sprites at once
//! means meshing several independent volumes.

pub mod block_side;
pub mod grouping;
pub mod visibility;
pub mod volume;
pub mod volume_iteration;

pub use block_side::{Axis, BlockSide};
pub use grouping::{group_volumes, GridPosition, PositionedVolume, Rotation};
pub use visibility::compute_visibility;
pub use volume::VoxelVolume;
pub use volume_iteration::OccupiedCells;
