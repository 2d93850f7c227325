//! # Voxel Volume Module
//!
//! This module provides the `VoxelVolume` struct: a dense, cubic grid of
//! colored voxels decoded from a sprite (or assembled by grouping several
//! sprites) together with the per-face visibility flags the mesher reads.
//!
//! ## Memory Layout
//!
//! The volume keeps its dense backing store separate from an index of the
//! cells that are actually populated:
//! - `solid_array`: one bit per cell, set when the cell holds a voxel
//! - `visible_array`: six bits per cell, one per [`BlockSide`]
//! - `colors`: one [`Color`] per cell, meaningful only where `solid_array` is set
//! - `populated_offsets`: offsets of the populated cells in population order
//!
//! Cells are stored in row-major order (x, then y, then z), so the offset of
//! `(x, y, z)` is `x + size * y + size² * z`.
//!
//! ### Performance Characteristics
//! - **Existence / visibility checks**: O(1), a single bit lookup
//! - **Iterating voxels**: O(populated cells) through `populated_offsets`
//! - **Memory Usage**: 7 bits + `size_of::<Color>()` per cell, plus one `usize`
//!   per populated cell

use bitvec::prelude::BitVec;
use cgmath::Point3;

use crate::color::Color;
use crate::error::{MesherError, Result};

use super::block_side::BlockSide;
use super::volume_iteration::OccupiedCells;

/// A cubic grid of `size³` voxels.
///
/// # Examples
///
/// ```
/// use voxel_sprite_mesher::color::Color;
/// use voxel_sprite_mesher::voxels::VoxelVolume;
///
/// let mut volume = VoxelVolume::new(4).unwrap();
/// volume.populate(1, 2, 3, Color::new(255, 0, 0)).unwrap();
///
/// assert!(volume.exists(1, 2, 3));
/// assert!(!volume.exists(-1, 2, 3));
/// assert_eq!(volume.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelVolume {
    /// Edge length of the cube.
    size: usize,

    /// Number of cells in one Y/X plane (`size²`).
    plane_size: usize,

    /// One bit per cell: `true` when the cell is populated.
    solid_array: BitVec,

    /// Six bits per cell, indexed by `offset * 6 + side`.
    visible_array: BitVec,

    /// Dense color storage. Only read where `solid_array` is set.
    colors: Vec<Color>,

    /// Offsets of populated cells, in the order they were first populated.
    ///
    /// Each offset appears once no matter how often its cell is populated.
    populated_offsets: Vec<usize>,
}

impl VoxelVolume {
    /// Creates a new, completely empty volume with the given edge length.
    ///
    /// # Errors
    /// [`MesherError::InvalidDimension`] if `size` is zero or `size³` overflows.
    pub fn new(size: usize) -> Result<Self> {
        let length = size
            .checked_mul(size)
            .and_then(|plane| plane.checked_mul(size))
            .filter(|length| *length > 0)
            .ok_or(MesherError::InvalidDimension(size))?;

        Ok(VoxelVolume {
            size,
            plane_size: size * size,
            solid_array: BitVec::repeat(false, length),
            visible_array: BitVec::repeat(false, length * BlockSide::COUNT),
            colors: vec![Color::default(); length],
            populated_offsets: Vec::new(),
        })
    }

    /// Edge length of the volume.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of populated cells.
    pub fn len(&self) -> usize {
        self.populated_offsets.len()
    }

    /// `true` when no cell is populated.
    pub fn is_empty(&self) -> bool {
        self.populated_offsets.is_empty()
    }

    /// Offsets of the populated cells, in population order.
    pub fn populated_offsets(&self) -> &[usize] {
        &self.populated_offsets
    }

    #[inline]
    fn in_bounds(&self, x: usize, y: usize, z: usize) -> bool {
        x < self.size && y < self.size && z < self.size
    }

    #[inline]
    fn offset(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.size * y + self.plane_size * z
    }

    /// Converts signed coordinates to an offset, or `None` outside the volume.
    #[inline]
    fn checked_offset(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        let (x, y, z) = (
            usize::try_from(x).ok()?,
            usize::try_from(y).ok()?,
            usize::try_from(z).ok()?,
        );
        self.in_bounds(x, y, z).then(|| self.offset(x, y, z))
    }

    /// Recovers the position of a cell from its offset.
    pub fn position_of(&self, offset: usize) -> Point3<usize> {
        Point3::new(
            offset % self.size,
            (offset / self.size) % self.size,
            offset / self.plane_size,
        )
    }

    /// Marks a cell as populated with the given color.
    ///
    /// Populating a cell twice overwrites its color; the cell is still listed
    /// once by [`VoxelVolume::occupied_cells`].
    ///
    /// # Errors
    /// [`MesherError::OutOfBounds`] if any coordinate is outside `[0, size)`.
    pub fn populate(&mut self, x: usize, y: usize, z: usize, color: Color) -> Result<()> {
        if !self.in_bounds(x, y, z) {
            return Err(MesherError::OutOfBounds {
                x,
                y,
                z,
                size: self.size,
            });
        }

        let offset = self.offset(x, y, z);
        if !self.solid_array[offset] {
            self.solid_array.set(offset, true);
            self.populated_offsets.push(offset);
        }
        self.colors[offset] = color;

        Ok(())
    }

    /// Checks whether the cell at the given coordinates holds a voxel.
    ///
    /// Coordinates outside the volume read as empty, so the volume's edge
    /// behaves like open air.
    pub fn exists(&self, x: i32, y: i32, z: i32) -> bool {
        self.checked_offset(x, y, z)
            .is_some_and(|offset| self.solid_array[offset])
    }

    /// [`VoxelVolume::exists`] for a point.
    pub fn exists_at(&self, position: Point3<i32>) -> bool {
        self.exists(position.x, position.y, position.z)
    }

    /// Color of the voxel at the given coordinates.
    ///
    /// # Returns
    /// `None` when the cell is empty or outside the volume.
    pub fn color(&self, x: usize, y: usize, z: usize) -> Option<Color> {
        if !self.in_bounds(x, y, z) {
            return None;
        }
        let offset = self.offset(x, y, z);
        self.solid_array[offset].then(|| self.colors[offset])
    }

    /// Flags one face of a cell as visible.
    ///
    /// Only the visibility pass and the grouping code call this, always with
    /// coordinates inside the volume.
    pub fn set_visible(&mut self, x: usize, y: usize, z: usize, side: BlockSide) {
        debug_assert!(
            self.in_bounds(x, y, z),
            "set_visible({x}, {y}, {z}) outside a volume of size {}",
            self.size
        );
        if self.in_bounds(x, y, z) {
            let index = self.offset(x, y, z) * BlockSide::COUNT + side as usize;
            self.visible_array.set(index, true);
        }
    }

    /// Whether a face of a cell is flagged visible. Out of bounds reads `false`.
    pub fn is_visible(&self, x: usize, y: usize, z: usize, side: BlockSide) -> bool {
        self.in_bounds(x, y, z)
            && self.visible_array[self.offset(x, y, z) * BlockSide::COUNT + side as usize]
    }

    /// The color to draw for one face of a cell, if that face is visible.
    pub fn visible_color(&self, x: usize, y: usize, z: usize, side: BlockSide) -> Option<Color> {
        if self.is_visible(x, y, z, side) {
            self.color(x, y, z)
        } else {
            None
        }
    }

    /// Resets every visibility flag, e.g. before re-running the visibility pass.
    pub fn clear_visibility(&mut self) {
        self.visible_array.fill(false);
    }

    /// Iterates the positions of all populated cells in population order.
    ///
    /// Every call starts a fresh iterator.
    pub fn occupied_cells(&self) -> OccupiedCells<'_> {
        OccupiedCells::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::new(255, 0, 0);
    const BLUE: Color = Color::new(0, 0, 255);

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(
            VoxelVolume::new(0),
            Err(MesherError::InvalidDimension(0))
        ));
    }

    #[test]
    fn new_volume_is_empty() {
        let volume = VoxelVolume::new(3).unwrap();
        assert!(volume.is_empty());
        assert_eq!(volume.size(), 3);
        for z in 0..3 {
            for y in 0..3 {
                for x in 0..3 {
                    assert!(!volume.exists(x, y, z));
                }
            }
        }
    }

    #[test]
    fn populate_rejects_out_of_bounds() {
        let mut volume = VoxelVolume::new(2).unwrap();
        let err = volume.populate(0, 2, 0, RED).unwrap_err();
        assert!(matches!(
            err,
            MesherError::OutOfBounds {
                x: 0,
                y: 2,
                z: 0,
                size: 2
            }
        ));
        assert!(volume.is_empty());
    }

    #[test]
    fn out_of_bounds_reads_as_empty() {
        let mut volume = VoxelVolume::new(2).unwrap();
        volume.populate(0, 0, 0, RED).unwrap();
        assert!(volume.exists(0, 0, 0));
        assert!(!volume.exists(-1, 0, 0));
        assert!(!volume.exists(0, -1, 0));
        assert!(!volume.exists(0, 0, 2));
        assert_eq!(volume.color(2, 0, 0), None);
        assert!(!volume.is_visible(0, 0, 5, BlockSide::Top));
    }

    #[test]
    fn repopulating_overwrites_without_duplicating() {
        let mut volume = VoxelVolume::new(2).unwrap();
        volume.populate(1, 1, 1, RED).unwrap();
        volume.populate(1, 1, 1, BLUE).unwrap();

        assert_eq!(volume.len(), 1);
        assert_eq!(volume.color(1, 1, 1), Some(BLUE));
        assert_eq!(volume.occupied_cells().count(), 1);
    }

    #[test]
    fn color_of_empty_cell_is_none() {
        let volume = VoxelVolume::new(2).unwrap();
        assert_eq!(volume.color(1, 0, 1), None);
    }

    #[test]
    fn axes_do_not_alias() {
        let mut volume = VoxelVolume::new(3).unwrap();
        volume.populate(2, 0, 1, RED).unwrap();

        assert!(volume.exists(2, 0, 1));
        assert!(!volume.exists(1, 0, 2));
        assert!(!volume.exists(2, 1, 0));
        assert_eq!(volume.position_of(volume.populated_offsets()[0]), Point3::new(2, 0, 1));
    }

    #[test]
    fn visibility_flags_are_per_side() {
        let mut volume = VoxelVolume::new(2).unwrap();
        volume.populate(0, 1, 0, RED).unwrap();
        volume.set_visible(0, 1, 0, BlockSide::Top);

        assert!(volume.is_visible(0, 1, 0, BlockSide::Top));
        assert!(!volume.is_visible(0, 1, 0, BlockSide::Bottom));
        assert_eq!(volume.visible_color(0, 1, 0, BlockSide::Top), Some(RED));
        assert_eq!(volume.visible_color(0, 1, 0, BlockSide::Left), None);

        volume.clear_visibility();
        assert!(!volume.is_visible(0, 1, 0, BlockSide::Top));
    }
}
