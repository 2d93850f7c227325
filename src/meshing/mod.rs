//! # Meshing
//!
//! Converts a voxel volume's visible faces into merged rectangles.
//!
//! * [`face`]: the output records and the six per-side lists
//! * [`mask`]: per-slice color masks and the greedy rectangle merge
//! * [`greedy`]: slices a volume along each axis and drives the merge

pub mod face;
pub mod greedy;
pub mod mask;

pub use face::{Face, Faces};
pub use greedy::{faces_from_visible, voxels_to_faces, SliceFamily, SLICE_FAMILIES};
pub use mask::{merge_mask, FaceMask, MaskRect, EMPTY};
