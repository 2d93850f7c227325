//! # Voxel Grouping
//!
//! Combines several positioned sprite volumes into one larger volume so a
//! whole world chunk can be meshed as a single model.
//!
//! Each source volume sits at an integer grid position and is turned by a
//! multiple of 90° about the vertical axis. The combined volume is a cube
//! sized to the bounding box of the grid positions, `grid_size` voxels per
//! grid cell.

use cgmath::Point3;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{MesherError, Result};

use super::volume::VoxelVolume;

/// Quarter turns about the vertical (Y) axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, FromPrimitive, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rotation {
    /// No rotation.
    #[default]
    Turn0 = 0,
    /// One quarter turn.
    Turn1 = 1,
    /// Half turn.
    Turn2 = 2,
    /// Three quarter turns.
    Turn3 = 3,
}

impl TryFrom<u8> for Rotation {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Rotation::from_u8(value).ok_or_else(|| format!("rotation must be 0..=3, got {value}"))
    }
}

impl From<Rotation> for u8 {
    fn from(rotation: Rotation) -> Self {
        rotation as u8
    }
}

impl Rotation {
    /// Remaps a voxel position inside a cube of edge `size` by this rotation.
    ///
    /// The Y coordinate never changes. Every case maps `[0, size)³` onto itself.
    pub fn apply(self, x: usize, y: usize, z: usize, size: usize) -> (usize, usize, usize) {
        let invert = |value: usize| size - 1 - value;
        match self {
            Rotation::Turn0 => (x, y, z),
            Rotation::Turn1 => (z, y, invert(x)),
            Rotation::Turn2 => (invert(x), y, invert(z)),
            Rotation::Turn3 => (invert(z), y, x),
        }
    }
}

/// A position on the world grid plus a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPosition {
    /// Grid X.
    pub x: i32,
    /// Grid Y.
    pub y: i32,
    /// Grid Z.
    pub z: i32,
    /// Orientation about the Y axis.
    #[serde(default)]
    pub rotation: Rotation,
}

impl GridPosition {
    /// Creates a grid position.
    pub fn new(x: i32, y: i32, z: i32, rotation: Rotation) -> Self {
        GridPosition { x, y, z, rotation }
    }

    /// The grid coordinates without the rotation.
    pub fn point(&self) -> Point3<i32> {
        Point3::new(self.x, self.y, self.z)
    }
}

/// A volume placed on the world grid.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedVolume {
    /// Where the volume sits and how it is turned.
    pub position: GridPosition,
    /// The voxels.
    pub volume: VoxelVolume,
}

/// Merges positioned volumes into one volume covering their bounding box.
///
/// # Arguments
/// * `positioned_volumes` - The volumes to merge; all must be `grid_size` on a side
/// * `grid_size` - Edge length, in voxels, of one world grid cell
///
/// # Returns
/// A volume placed at the minimum grid corner with no rotation. Where two
/// sources overlap, the later one's color wins.
///
/// # Errors
/// * [`MesherError::EmptyGroup`] if there is nothing to merge
/// * [`MesherError::GridScaleMismatch`] if a volume is not `grid_size` on a side
pub fn group_volumes(
    positioned_volumes: &[PositionedVolume],
    grid_size: usize,
) -> Result<PositionedVolume> {
    let first = positioned_volumes.first().ok_or(MesherError::EmptyGroup)?;

    let mut min = first.position.point();
    let mut max = first.position.point();
    for positioned in positioned_volumes {
        if positioned.volume.size() != grid_size {
            return Err(MesherError::GridScaleMismatch {
                expected: grid_size,
                actual: positioned.volume.size(),
            });
        }
        let point = positioned.position.point();
        min = Point3::new(min.x.min(point.x), min.y.min(point.y), min.z.min(point.z));
        max = Point3::new(max.x.max(point.x), max.y.max(point.y), max.z.max(point.z));
    }

    let extent = (max.x - min.x).max(max.y - min.y).max(max.z - min.z) as usize + 1;
    let mut group = VoxelVolume::new(extent * grid_size)?;

    for positioned in positioned_volumes {
        let position = positioned.position;
        let x_offset = (position.x - min.x) as usize * grid_size;
        let y_offset = (position.y - min.y) as usize * grid_size;
        let z_offset = (position.z - min.z) as usize * grid_size;

        for cell in positioned.volume.occupied_cells() {
            let Some(color) = positioned.volume.color(cell.x, cell.y, cell.z) else {
                continue;
            };
            let (x, y, z) = position.rotation.apply(cell.x, cell.y, cell.z, grid_size);
            group.populate(x_offset + x, y_offset + y, z_offset + z, color)?;
        }
    }

    Ok(PositionedVolume {
        position: GridPosition::new(min.x, min.y, min.z, Rotation::Turn0),
        volume: group,
    })
}
