//! # Block Side Module
//!
//! This module defines the six faces/sides of a voxel and the axis each pair
//! of opposing sides shares. It is used by the visibility pass to find a
//! voxel's neighbours and by the greedy merger to pick a face list.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel.
///
/// Each variant is assigned a unique integer value which is also the index of
/// its visibility bit inside a [`crate::voxels::VoxelVolume`].
///
/// The order is: [LEFT, RIGHT, TOP, BOTTOM, FRONT, BACK]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The left face (facing negative X)
    Left = 0,

    /// The right face (facing positive X)
    Right = 1,

    /// The top face (facing positive Y)
    Top = 2,

    /// The bottom face (facing negative Y)
    Bottom = 3,

    /// The front face (facing positive Z)
    Front = 4,

    /// The back face (facing negative Z)
    Back = 5,
}

/// One of the three axes of the voxel grid.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum Axis {
    /// The X axis.
    X,
    /// The Y (vertical) axis.
    Y,
    /// The Z axis.
    Z,
}

impl BlockSide {
    /// Number of sides a voxel has.
    pub const COUNT: usize = 6;

    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [LEFT, RIGHT, TOP, BOTTOM, FRONT, BACK]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::Left,
            BlockSide::Right,
            BlockSide::Top,
            BlockSide::Bottom,
            BlockSide::Front,
            BlockSide::Back,
        ]
    }

    /// Offset from a voxel to the neighbour this face looks at.
    ///
    /// A face is visible exactly when the voxel at this offset is empty.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            BlockSide::Left => Vector3::new(-1, 0, 0),
            BlockSide::Right => Vector3::new(1, 0, 0),
            BlockSide::Top => Vector3::new(0, 1, 0),
            BlockSide::Bottom => Vector3::new(0, -1, 0),
            BlockSide::Front => Vector3::new(0, 0, 1),
            BlockSide::Back => Vector3::new(0, 0, -1),
        }
    }

    /// The axis this face is perpendicular to.
    pub fn axis(self) -> Axis {
        match self {
            BlockSide::Left | BlockSide::Right => Axis::X,
            BlockSide::Top | BlockSide::Bottom => Axis::Y,
            BlockSide::Front | BlockSide::Back => Axis::Z,
        }
    }

    /// The face pointing the other way along the same axis.
    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::Left => BlockSide::Right,
            BlockSide::Right => BlockSide::Left,
            BlockSide::Top => BlockSide::Bottom,
            BlockSide::Bottom => BlockSide::Top,
            BlockSide::Front => BlockSide::Back,
            BlockSide::Back => BlockSide::Front,
        }
    }
}
