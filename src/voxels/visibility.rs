//! # Visibility Pass
//!
//! Flags every face of every voxel that borders empty space. The volume edge
//! counts as empty space, so faces on the boundary are always visible.

use cgmath::Point3;

use super::block_side::BlockSide;
use super::volume::VoxelVolume;

/// Marks the visible faces of every populated cell in `volume`.
///
/// Runs in O(populated cells): it walks [`VoxelVolume::occupied_cells`] and
/// probes the six neighbours of each voxel. Flags are only ever set, so
/// running it twice on the same volume is harmless.
pub fn compute_visibility(volume: &mut VoxelVolume) {
    let cells: Vec<Point3<usize>> = volume.occupied_cells().collect();

    for cell in cells {
        let position = Point3::new(cell.x as i32, cell.y as i32, cell.z as i32);
        for side in BlockSide::all() {
            if !volume.exists_at(position + side.offset()) {
                volume.set_visible(cell.x, cell.y, cell.z, side);
            }
        }
    }
}
