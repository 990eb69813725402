//! Light description and the lighting terms shared by the shaded draw calls.

use image::Rgb;

use crate::point3d::{Point3D, dot3, normalize};

/// Added to every channel (0..255 scale) after Gouraud lighting so unlit
/// regions are not pure black.
pub const GOURAUD_AMBIENT: f32 = 10.0;

/// Added to the Lambert term before toon banding.
pub const TOON_AMBIENT: f32 = 0.2;
pub const TOON_SHADOW_THRESHOLD: f32 = 0.4;
pub const TOON_HIGHLIGHT_THRESHOLD: f32 = 0.7;
pub const TOON_SHADOW_FACTOR: f32 = 0.3;
pub const TOON_HIGHLIGHT_FACTOR: f32 = 1.3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Light {
    pub position: Point3D,
    pub color: Rgb<u8>,
    /// 0.0 - 1.0
    pub intensity: f32,
}

impl Light {
    pub fn white(position: Point3D, intensity: f32) -> Self {
        Self { position, color: Rgb([255, 255, 255]), intensity }
    }
}

/// Diffuse term `max(0, n . l)` with `l` pointing from `world_pos` to the light.
/// `normal` must already be unit length.
#[inline(always)]
pub fn lambert(normal: Point3D, world_pos: Point3D, light: &Light) -> f32 {
    let light_dir = normalize(light.position - world_pos);
    dot3(normal, light_dir).max(0.0)
}

/// Quantizes a diffuse value into shadow, base and highlight bands.
pub fn toon_band(diff: f32) -> f32 {
    if diff < TOON_SHADOW_THRESHOLD {
        diff * TOON_SHADOW_FACTOR
    } else if diff < TOON_HIGHLIGHT_THRESHOLD {
        diff
    } else {
        diff * TOON_HIGHLIGHT_FACTOR
    }
}

/// `channel * factor + ambient`, saturated to 0..=255.
#[inline(always)]
pub fn scale_color(color: Rgb<u8>, factor: f32, ambient: f32) -> Rgb<u8> {
    let scale = |c: u8| (c as f32 * factor + ambient).clamp(0.0, 255.0) as u8;
    Rgb([scale(color[0]), scale(color[1]), scale(color[2])])
}

/// Shading policy for a whole draw batch.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ShadingMode {
    /// One solid color per triangle.
    Flat { color: Rgb<u8>, cull_backfaces: bool },
    /// Samples the rasterizer's bound texture with interpolated UVs.
    Textured { cull_backfaces: bool },
    /// Lambert lighting per vertex, intensity interpolated per pixel.
    Gouraud { color: Rgb<u8> },
    /// Lambert lighting per pixel, quantized into three bands.
    Toon { color: Rgb<u8> },
}

impl ShadingMode {
    pub fn needs_normals(&self) -> bool {
        matches!(self, ShadingMode::Gouraud { .. } | ShadingMode::Toon { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShadingMode::Flat { .. } => "flat",
            ShadingMode::Textured { .. } => "textured",
            ShadingMode::Gouraud { .. } => "gouraud",
            ShadingMode::Toon { .. } => "toon",
        }
    }
}
