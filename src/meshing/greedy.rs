//! Greedy meshing implementation for voxel volumes.
//!
//! This module turns a volume's visible voxel faces into as few same-colored
//! rectangles as the greedy strategy finds. The volume is cut into slices
//! along each axis; every slice is projected onto a [`FaceMask`] once per
//! direction and the mask is merged by the single routine in
//! [`super::mask::merge_mask`]. The three slice families only differ in how
//! mask coordinates map back into the volume.

use cgmath::Point3;
use log::debug;
use web_time::Instant;

use crate::color::{from_hex_triplet, to_hex_triplet};
use crate::voxels::{compute_visibility, Axis, BlockSide, VoxelVolume};

use super::face::{Face, Faces};
use super::mask::{merge_mask, FaceMask, EMPTY};

/// A set of parallel slices and the two face directions that lie in them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceFamily {
    /// The axis the slices are stacked along.
    pub axis: Axis,
    /// The two opposing sides whose faces lie in these slices.
    pub sides: [BlockSide; 2],
}

/// The three slice families, in the order they are meshed.
pub const SLICE_FAMILIES: [SliceFamily; 3] = [
    SliceFamily {
        axis: Axis::Y,
        sides: [BlockSide::Top, BlockSide::Bottom],
    },
    SliceFamily {
        axis: Axis::X,
        sides: [BlockSide::Left, BlockSide::Right],
    },
    SliceFamily {
        axis: Axis::Z,
        sides: [BlockSide::Front, BlockSide::Back],
    },
];

impl SliceFamily {
    /// Maps a mask cell of slice `slice` back to a voxel position.
    ///
    /// `u` is the axis a face's width runs along and `v` its height:
    /// * Y slices: `u = x`, `v = z`
    /// * X slices: `u = z`, `v = y`
    /// * Z slices: `u = x`, `v = y`
    #[inline]
    pub fn embed(&self, slice: usize, u: usize, v: usize) -> Point3<usize> {
        match self.axis {
            Axis::Y => Point3::new(u, slice, v),
            Axis::X => Point3::new(slice, v, u),
            Axis::Z => Point3::new(u, v, slice),
        }
    }
}

/// Computes visibility and generates the face lists for a volume.
///
/// # Arguments
/// * `volume` - The volume to mesh; its visibility flags are set in place
///
/// # Returns
/// The merged faces for all six sides.
///
/// # Performance
/// Visibility is O(populated voxels); merging is O(size³) overall, each mask
/// cell being visited a constant number of times.
pub fn voxels_to_faces(volume: &mut VoxelVolume) -> Faces {
    let start = Instant::now();
    compute_visibility(volume);
    let faces = faces_from_visible(volume);

    debug!(
        "Meshed {} voxels (size {}) into {} faces in {:?}",
        volume.len(),
        volume.size(),
        faces.len(),
        start.elapsed()
    );

    faces
}

/// Generates the face lists from a volume whose visibility is already set.
pub fn faces_from_visible(volume: &VoxelVolume) -> Faces {
    let size = volume.size();
    let mut faces = Faces::new();
    let mut mask = FaceMask::new(size);

    for family in SLICE_FAMILIES {
        for slice in 0..size {
            for side in family.sides {
                mask.fill(|u, v| {
                    let position = family.embed(slice, u, v);
                    volume
                        .visible_color(position.x, position.y, position.z, side)
                        .map_or(EMPTY, to_hex_triplet)
                });

                let target = faces.side_mut(side);
                merge_mask(&mut mask, |rect| {
                    let origin = family.embed(slice, rect.u, rect.v);
                    target.push(Face::new(
                        Point3::new(origin.x as u32, origin.y as u32, origin.z as u32),
                        rect.width as u32,
                        rect.height as u32,
                        from_hex_triplet(rect.color),
                    ));
                });
            }
        }
    }

    faces
}
