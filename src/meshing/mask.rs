//! Face masks and the greedy rectangle merge.
//!
//! A mask is one slice of a volume seen from one direction: a `size × size`
//! grid holding, per cell, the packed color of the visible voxel face there or
//! [`EMPTY`]. The merge consumes the mask and reports the rectangles it finds.

use crate::color::{HexTriplet, HEX_TRIPLET_BIAS};

/// Marks a mask cell with no visible face.
///
/// Packed colors always carry [`HEX_TRIPLET_BIAS`], so they are never `EMPTY`.
pub const EMPTY: HexTriplet = 0;

const _: () = assert!(HEX_TRIPLET_BIAS != EMPTY);

/// A square grid of packed colors stored row-major, indexed by `u + v * size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceMask {
    size: usize,
    cells: Vec<HexTriplet>,
}

/// One rectangle found by [`merge_mask`], in mask coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskRect {
    /// Starting column.
    pub u: usize,
    /// Starting row.
    pub v: usize,
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Packed color shared by every cell of the rectangle.
    pub color: HexTriplet,
}

impl FaceMask {
    /// Creates an all-empty mask.
    pub fn new(size: usize) -> Self {
        FaceMask {
            size,
            cells: vec![EMPTY; size * size],
        }
    }

    /// Edge length of the mask.
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn index(&self, u: usize, v: usize) -> usize {
        debug_assert!(u < self.size && v < self.size);
        u + v * self.size
    }

    /// Refills every cell from `sample(u, v)`.
    ///
    /// The mask is reused across slices to avoid reallocating it.
    pub fn fill(&mut self, mut sample: impl FnMut(usize, usize) -> HexTriplet) {
        let size = self.size;
        for v in 0..size {
            for u in 0..size {
                self.cells[u + v * size] = sample(u, v);
            }
        }
    }

    /// The packed color at `(u, v)`, or [`EMPTY`].
    #[inline]
    pub fn get(&self, u: usize, v: usize) -> HexTriplet {
        self.cells[self.index(u, v)]
    }

    /// Sets the packed color at `(u, v)`.
    #[inline]
    pub fn set(&mut self, u: usize, v: usize, color: HexTriplet) {
        let index = self.index(u, v);
        self.cells[index] = color;
    }

    /// Returns the value at `(u, v)` and leaves the cell empty.
    #[inline]
    pub fn take(&mut self, u: usize, v: usize) -> HexTriplet {
        let index = self.index(u, v);
        std::mem::replace(&mut self.cells[index], EMPTY)
    }

    /// `true` when every cell is empty.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&cell| cell == EMPTY)
    }

    /// Whether `width` cells starting at `(u, v)` all hold `color`.
    fn row_matches(&self, u: usize, v: usize, width: usize, color: HexTriplet) -> bool {
        let start = self.index(u, v);
        self.cells[start..start + width]
            .iter()
            .all(|&cell| cell == color)
    }
}

/// Greedily covers the mask with same-color rectangles, consuming it.
///
/// Cells are visited row by row (`u` increasing within `v` increasing). The
/// first non-empty cell found starts a rectangle which grows:
/// 1. along `u` while the next cell holds the same color, then
/// 2. along `v` while the whole `width`-long row below matches.
///
/// Width never shrinks once height starts growing. Every accepted cell is
/// cleared, so no two rectangles share a cell and the mask ends up empty.
///
/// # Arguments
/// * `mask` - The mask to consume
/// * `emit` - Called once per rectangle, in scan order
pub fn merge_mask(mask: &mut FaceMask, mut emit: impl FnMut(MaskRect)) {
    let size = mask.size();

    for v in 0..size {
        for u in 0..size {
            let color = mask.take(u, v);
            if color == EMPTY {
                continue;
            }

            let mut width = 1;
            while u + width < size && mask.get(u + width, v) == color {
                mask.take(u + width, v);
                width += 1;
            }

            let mut height = 1;
            while v + height < size && mask.row_matches(u, v + height, width, color) {
                for i in 0..width {
                    mask.take(u + i, v + height);
                }
                height += 1;
            }

            emit(MaskRect {
                u,
                v,
                width,
                height,
                color,
            });
        }
    }
}
