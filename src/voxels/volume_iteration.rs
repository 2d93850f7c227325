//! # Volume Iteration Module
//!
//! This module provides an iterator over the populated cells of a
//! [`VoxelVolume`].
//!
//! ## Index-Driven Iteration
//!
//! Rather than scanning all `size³` cells, `OccupiedCells` walks the volume's
//! list of populated offsets and converts each one back into a position. The
//! visibility pass depends on this to stay proportional to the number of
//! voxels instead of the volume of the cube.

use cgmath::Point3;

use super::volume::VoxelVolume;

/// An iterator over the positions of all populated cells in a volume.
///
/// Positions come out in population order, which for decoded sprites is the
/// decoder's scan order. The iterator borrows the volume, so a new one has to
/// be requested after every mutation.
pub struct OccupiedCells<'a> {
    /// Reference to the volume being iterated over
    volume_ref: &'a VoxelVolume,
    /// Current position in the populated offsets list
    current_index: usize,
}

impl<'a> OccupiedCells<'a> {
    /// Creates a new iterator positioned at the first populated cell.
    pub fn new(volume_ref: &'a VoxelVolume) -> Self {
        OccupiedCells {
            volume_ref,
            current_index: 0,
        }
    }
}

impl Iterator for OccupiedCells<'_> {
    type Item = Point3<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = *self
            .volume_ref
            .populated_offsets()
            .get(self.current_index)?;
        self.current_index += 1;
        Some(self.volume_ref.position_of(offset))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.volume_ref.len() - self.current_index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for OccupiedCells<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn yields_population_order() {
        let mut volume = VoxelVolume::new(4).unwrap();
        let positions = [(3, 0, 0), (0, 3, 1), (1, 1, 3), (0, 0, 0)];
        for (x, y, z) in positions {
            volume.populate(x, y, z, Color::new(1, 2, 3)).unwrap();
        }

        let cells: Vec<_> = volume.occupied_cells().collect();
        let expected: Vec<_> = positions
            .iter()
            .map(|&(x, y, z)| Point3::new(x, y, z))
            .collect();
        assert_eq!(cells, expected);
    }

    #[test]
    fn is_restartable() {
        let mut volume = VoxelVolume::new(2).unwrap();
        volume.populate(1, 0, 1, Color::new(9, 9, 9)).unwrap();

        assert_eq!(volume.occupied_cells().len(), 1);
        assert_eq!(volume.occupied_cells().count(), 1);
    }

    #[test]
    fn empty_volume_yields_nothing() {
        let volume = VoxelVolume::new(5).unwrap();
        assert_eq!(volume.occupied_cells().next(), None);
    }
}
