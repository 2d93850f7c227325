use cgmath::Point3;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::voxels::block_side::BlockSide;

/// Represents a single merged rectangle of voxel faces.
///
/// A face lies on one axis-aligned plane and is described by the voxel at its
/// minimum corner plus its extent along the two axes of that plane. Which
/// axes `width` and `height` run along depends on the side the face belongs to:
///
/// | Side          | `width` along | `height` along |
/// |---------------|---------------|----------------|
/// | Top / Bottom  | X             | Z              |
/// | Left / Right  | Z             | Y              |
/// | Front / Back  | X             | Y              |
///
/// The serialized form, `{x, y, z, width, height, r, g, b}`, is the on-disk
/// model format read by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Face {
    /// X of the minimum-corner voxel
    pub x: u32,
    /// Y of the minimum-corner voxel
    pub y: u32,
    /// Z of the minimum-corner voxel
    pub z: u32,
    /// Extent along the side's width axis, at least 1
    pub width: u32,
    /// Extent along the side's height axis, at least 1
    pub height: u32,
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Face {
    /// Creates a new face with its minimum corner at `origin`.
    pub fn new(origin: Point3<u32>, width: u32, height: u32, color: Color) -> Self {
        Face {
            x: origin.x,
            y: origin.y,
            z: origin.z,
            width,
            height,
            r: color.r,
            g: color.g,
            b: color.b,
        }
    }

    /// The minimum-corner voxel.
    pub fn origin(&self) -> Point3<u32> {
        Point3::new(self.x, self.y, self.z)
    }

    /// The face's flat color.
    pub fn color(&self) -> Color {
        Color::new(self.r, self.g, self.b)
    }

    /// Number of voxel faces this rectangle covers.
    pub fn area(&self) -> u32 {
        self.width * self.height
    }

    /// Enumerates the voxels whose `side` face this rectangle covers.
    ///
    /// # Arguments
    /// * `side` - The side list this face was taken from
    pub fn covered_voxels(&self, side: BlockSide) -> impl Iterator<Item = Point3<u32>> {
        let origin = self.origin();
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |v| {
            (0..width).map(move |u| match side {
                BlockSide::Top | BlockSide::Bottom => {
                    Point3::new(origin.x + u, origin.y, origin.z + v)
                }
                BlockSide::Left | BlockSide::Right => {
                    Point3::new(origin.x, origin.y + v, origin.z + u)
                }
                BlockSide::Front | BlockSide::Back => {
                    Point3::new(origin.x + u, origin.y + v, origin.z)
                }
            })
        })
    }
}

/// The six face lists that make up a meshed model.
///
/// Faces within a list are in scan order: slice index, then height axis, then
/// width axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faces {
    /// Faces pointing +Y
    pub top_faces: Vec<Face>,
    /// Faces pointing -Y
    pub bottom_faces: Vec<Face>,
    /// Faces pointing -X
    pub left_faces: Vec<Face>,
    /// Faces pointing +X
    pub right_faces: Vec<Face>,
    /// Faces pointing +Z
    pub front_faces: Vec<Face>,
    /// Faces pointing -Z
    pub back_faces: Vec<Face>,
}

impl Faces {
    /// Creates an empty set of face lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// The list holding faces of the given side.
    pub fn side(&self, side: BlockSide) -> &[Face] {
        match side {
            BlockSide::Top => &self.top_faces,
            BlockSide::Bottom => &self.bottom_faces,
            BlockSide::Left => &self.left_faces,
            BlockSide::Right => &self.right_faces,
            BlockSide::Front => &self.front_faces,
            BlockSide::Back => &self.back_faces,
        }
    }

    /// Mutable access to the list holding faces of the given side.
    pub fn side_mut(&mut self, side: BlockSide) -> &mut Vec<Face> {
        match side {
            BlockSide::Top => &mut self.top_faces,
            BlockSide::Bottom => &mut self.bottom_faces,
            BlockSide::Left => &mut self.left_faces,
            BlockSide::Right => &mut self.right_faces,
            BlockSide::Front => &mut self.front_faces,
            BlockSide::Back => &mut self.back_faces,
        }
    }

    /// Total number of faces across all six lists.
    pub fn len(&self) -> usize {
        BlockSide::all()
            .into_iter()
            .map(|side| self.side(side).len())
            .sum()
    }

    /// `true` when no list holds a face.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of voxel faces covered by all rectangles.
    pub fn covered_area(&self) -> u64 {
        BlockSide::all()
            .into_iter()
            .flat_map(|side| self.side(side).iter())
            .map(|face| u64::from(face.area()))
            .sum()
    }
}
