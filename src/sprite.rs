//! # Sprite Decoding
//!
//! A sprite is a cube of voxels stored as a "cube-unrolled" image: an image
//! `size` pixels wide and `size * size` pixels tall, made of `size` square
//! layers stacked on top of each other. Within a layer, columns are X and rows
//! are Z. The first layer in the image is the top of the cube.
//!
//! Fully transparent pixels are empty cells.

use std::path::Path;

use log::debug;

use crate::color::Color;
use crate::error::{MesherError, Result};
use crate::voxels::VoxelVolume;

/// Raw RGBA pixels of a cube-unrolled sprite image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    /// Edge length of the cube (the image width).
    size: usize,
    /// RGBA8 pixels, row-major, `4 * size * size * size` bytes.
    data: Vec<u8>,
}

impl Sprite {
    /// Number of bytes per RGBA pixel.
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Wraps an RGBA8 buffer of the given image dimensions.
    ///
    /// # Errors
    /// * [`MesherError::InvalidDimension`] if the image has no width
    /// * [`MesherError::NotCubic`] if `height != width²`
    /// * [`MesherError::BufferSize`] if `data` is not `4 * width * height` bytes
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 {
            return Err(MesherError::InvalidDimension(0));
        }
        if u64::from(height) != u64::from(width) * u64::from(width) {
            return Err(MesherError::NotCubic { width, height });
        }

        let expected = width as usize * height as usize * Self::BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(MesherError::BufferSize {
                expected,
                actual: data.len(),
            });
        }

        Ok(Sprite {
            size: width as usize,
            data,
        })
    }

    /// Reads and decodes an image file into a sprite.
    ///
    /// # Errors
    /// [`MesherError::Image`] if the file cannot be read or decoded, plus every
    /// error of [`Sprite::from_rgba`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| MesherError::Image {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let (width, height) = image.dimensions();
        debug!("Decoded {} ({width}x{height})", path.display());

        Self::from_rgba(width, height, image.into_raw())
    }

    /// Edge length of the cube.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The raw RGBA8 pixels.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Builds a voxel volume from the sprite.
    ///
    /// Columns are visited in `(x, z)` order and each column from the top image
    /// layer down, so the first layer of the image becomes the top of the
    /// volume (`y = size - 1`). Transparent pixels are skipped.
    pub fn to_volume(&self) -> Result<VoxelVolume> {
        let size = self.size;
        let mut volume = VoxelVolume::new(size)?;

        for x in 0..size {
            for z in 0..size {
                for y in 0..size {
                    let pixel_index = x + z * size + y * size * size;
                    let start = pixel_index * Self::BYTES_PER_PIXEL;
                    let [r, g, b, a] = [
                        self.data[start],
                        self.data[start + 1],
                        self.data[start + 2],
                        self.data[start + 3],
                    ];

                    if a != 0 {
                        volume.populate(x, size - (y + 1), z, Color::new(r, g, b))?;
                    }
                }
            }
        }

        Ok(volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(size: usize) -> Vec<u8> {
        vec![0; size * size * size * Sprite::BYTES_PER_PIXEL]
    }

    fn paint(data: &mut [u8], size: usize, column: usize, row: usize, rgba: [u8; 4]) {
        let start = (column + row * size) * Sprite::BYTES_PER_PIXEL;
        data[start..start + 4].copy_from_slice(&rgba);
    }

    #[test]
    fn rejects_non_cubic_images() {
        let err = Sprite::from_rgba(4, 8, vec![0; 4 * 8 * 4]).unwrap_err();
        assert!(matches!(err, MesherError::NotCubic { width: 4, height: 8 }));
    }

    #[test]
    fn rejects_short_buffers() {
        let err = Sprite::from_rgba(2, 4, vec![0; 10]).unwrap_err();
        assert!(matches!(
            err,
            MesherError::BufferSize {
                expected: 32,
                actual: 10
            }
        ));
    }

    #[test]
    fn rejects_empty_images() {
        assert!(matches!(
            Sprite::from_rgba(0, 0, Vec::new()),
            Err(MesherError::InvalidDimension(0))
        ));
    }

    #[test]
    fn transparent_sprite_is_empty() {
        let sprite = Sprite::from_rgba(3, 9, blank(3)).unwrap();
        assert!(sprite.to_volume().unwrap().is_empty());
    }

    #[test]
    fn first_layer_is_the_top() {
        let size = 2;
        let mut data = blank(size);
        // Layer 0 (image rows 0..2), column x = 1, row z = 0.
        paint(&mut data, size, 1, 0, [10, 20, 30, 255]);
        // Layer 1 (image rows 2..4), column x = 0, row z = 1.
        paint(&mut data, size, 0, 3, [40, 50, 60, 1]);

        let volume = Sprite::from_rgba(2, 4, data).unwrap().to_volume().unwrap();

        assert_eq!(volume.len(), 2);
        assert_eq!(volume.color(1, 1, 0), Some(Color::new(10, 20, 30)));
        assert_eq!(volume.color(0, 0, 1), Some(Color::new(40, 50, 60)));
    }

    #[test]
    fn alpha_only_decides_presence() {
        let size = 1;
        let mut data = blank(size);
        paint(&mut data, size, 0, 0, [0, 0, 0, 128]);

        let volume = Sprite::from_rgba(1, 1, data).unwrap().to_volume().unwrap();
        assert_eq!(volume.color(0, 0, 0), Some(Color::new(0, 0, 0)));
    }

    #[test]
    fn loads_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        let mut image = image::RgbaImage::new(2, 4);
        image.put_pixel(0, 0, image::Rgba([1, 2, 3, 255]));
        image.save(&path).unwrap();

        let sprite = Sprite::load(&path).unwrap();
        assert_eq!(sprite.size(), 2);
        let volume = sprite.to_volume().unwrap();
        assert_eq!(volume.color(0, 1, 0), Some(Color::new(1, 2, 3)));
    }

    #[test]
    fn missing_file_is_an_image_error() {
        let err = Sprite::load("definitely/not/here.png").unwrap_err();
        assert!(matches!(err, MesherError::Image { .. }));
    }
}
