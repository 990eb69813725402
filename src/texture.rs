use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, GenericImageView, Rgb, RgbaImage};

use crate::screen::pixel_offset;

/// RGBA texel grid. Row 0 is the bottom of the image (v = 0).
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Texture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let img: DynamicImage = image::open(path)
            .with_context(|| format!("failed to open texture {}", path.display()))?;
        let (width, height) = img.dimensions();
        log::debug!("loaded texture {} ({width}x{height})", path.display());
        Ok(Self::from_image(&img.to_rgba8()))
    }

    pub fn from_image(rgba_img: &RgbaImage) -> Self {
        let (width, height) = rgba_img.dimensions();
        let row_len = width as usize * 4;
        let mut rgba = Vec::with_capacity(row_len * height as usize);
        for y in (0..height).rev() {
            let row_start = y as usize * row_len;
            let row_end = row_start + row_len;
            rgba.extend_from_slice(&rgba_img.as_raw()[row_start..row_end]);
        }
        Self { width, height, rgba }
    }

    /// `size`x`size` texture with `cells`x`cells` alternating squares.
    pub fn checkerboard(size: u32, cells: u32, a: Rgb<u8>, b: Rgb<u8>) -> Self {
        let cell = (size / cells.max(1)).max(1);
        let mut rgba = Vec::with_capacity(size as usize * size as usize * 4);
        for y in 0..size {
            for x in 0..size {
                let Rgb([r, g, bl]) = if (x / cell + y / cell) % 2 == 0 { a } else { b };
                rgba.extend_from_slice(&[r, g, bl, 255]);
            }
        }
        Self { width: size, height: size, rgba }
    }

    /// Nearest-texel lookup. Coordinates tile: both are wrapped into [0, 1)
    /// first, negative values included.
    pub fn sample(&self, u: f32, v: f32) -> Rgb<u8> {
        if self.width == 0 || self.height == 0 {
            return Rgb([0, 0, 0]);
        }
        let u = wrap(u);
        let v = wrap(v);
        let x = ((u * (self.width as f32 - 1.0)).round() as u32).min(self.width - 1);
        let y = ((v * (self.height as f32 - 1.0)).round() as u32).min(self.height - 1);
        let idx = pixel_offset(x, y, self.width) * 4;
        Rgb([self.rgba[idx], self.rgba[idx + 1], self.rgba[idx + 2]])
    }
}

fn wrap(t: f32) -> f32 {
    let wrapped = t.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}
