use bytemuck::try_cast_slice_mut;
use image::{Rgb, RgbImage};

/// Row-major offset of pixel `(x, y)`, computed in `usize` so images past
/// `u32::MAX` pixels do not wrap.
#[inline(always)]
pub(crate) fn pixel_offset(x: u32, y: u32, width: u32) -> usize {
    y as usize * width as usize + x as usize
}

/// Color and depth images of the same size.
///
/// After a `clear`, each depth value is the smallest z written to that pixel
/// and the color is the one written together with it.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub depth: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size_calc = width as usize * height as usize;
        Self {
            width,
            height,
            rgba: vec![0; size_calc * 4],
            depth: vec![f32::INFINITY; size_calc],
        }
    }

    pub fn clear(&mut self, background: Rgb<u8>) {
        let Rgb([r, g, b]) = background;
        let color: u32 = u32::from_le_bytes([r, g, b, 255]);
        match try_cast_slice_mut::<u8, u32>(&mut self.rgba) {
            Ok(buf_as_u32) => buf_as_u32.fill(color),
            // unaligned allocation
            Err(_) => self
                .rgba
                .chunks_exact_mut(4)
                .for_each(|px| px.copy_from_slice(&[r, g, b, 255])),
        }
        self.depth.fill(f32::INFINITY);
    }

    #[inline(always)]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(pixel_offset(x, y, self.width))
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb<u8>) {
        let Some(i) = self.index(x, y) else { return };
        let Rgb([r, g, b]) = color;
        self.rgba[i * 4..i * 4 + 4].copy_from_slice(&[r, g, b, 255]);
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        let i = self.index(x, y)? * 4;
        Some(Rgb([self.rgba[i], self.rgba[i + 1], self.rgba[i + 2]]))
    }

    /// Depth at `(x, y)`; +inf outside the buffer.
    pub fn get_depth(&self, x: u32, y: u32) -> f32 {
        self.index(x, y).map_or(f32::INFINITY, |i| self.depth[i])
    }

    /// Writes color and depth if `z` is nearer than the stored depth.
    /// `shade` only runs for pixels that pass the test.
    #[inline(always)]
    pub fn test_and_set(&mut self, x: u32, y: u32, z: f32, shade: impl FnOnce() -> Rgb<u8>) -> bool {
        let Some(i) = self.index(x, y) else { return false };
        if !(z < self.depth[i]) {
            return false;
        }
        self.depth[i] = z;
        let Rgb([r, g, b]) = shade();
        self.rgba[i * 4..i * 4 + 4].copy_from_slice(&[r, g, b, 255]);
        true
    }

    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            self.get_pixel(x, y).unwrap_or(Rgb([0, 0, 0]))
        })
    }

    /// Grayscale view of the depth image: the finite depth range maps
    /// linearly onto 0..=255, untouched pixels are black.
    pub fn depth_visualization(&self) -> RgbImage {
        let (min_z, max_z) = self
            .depth
            .iter()
            .filter(|z| z.is_finite())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &z| (lo.min(z), hi.max(z)));

        let mut range = max_z - min_z;
        if !(range > 0.0) {
            range = 1.0;
        }

        RgbImage::from_fn(self.width, self.height, |x, y| {
            let z = self.get_depth(x, y);
            if !z.is_finite() {
                return Rgb([0, 0, 0]);
            }
            let intensity = (255.0 * (z - min_z) / range).clamp(0.0, 255.0) as u8;
            Rgb([intensity, intensity, intensity])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_resets_color_and_depth() {
        let mut fb = FrameBuffer::new(4, 3);
        fb.set_pixel(1, 1, Rgb([1, 2, 3]));
        assert!(fb.test_and_set(2, 2, 0.5, || Rgb([9, 9, 9])));
        fb.clear(Rgb([10, 20, 30]));
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(fb.get_pixel(x, y), Some(Rgb([10, 20, 30])));
                assert_eq!(fb.get_depth(x, y), f32::INFINITY);
            }
        }
    }

    #[test]
    fn depth_test_keeps_nearest() {
        let mut fb = FrameBuffer::new(2, 2);
        assert!(fb.test_and_set(0, 0, 0.7, || Rgb([255, 0, 0])));
        assert!(!fb.test_and_set(0, 0, 0.9, || Rgb([0, 255, 0])));
        assert!(!fb.test_and_set(0, 0, 0.7, || Rgb([0, 255, 0])));
        assert!(fb.test_and_set(0, 0, 0.2, || Rgb([0, 0, 255])));
        assert_eq!(fb.get_pixel(0, 0), Some(Rgb([0, 0, 255])));
        assert_eq!(fb.get_depth(0, 0), 0.2);
    }

    #[test]
    fn writes_outside_are_ignored() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.set_pixel(5, 0, Rgb([1, 1, 1]));
        assert!(!fb.test_and_set(0, 9, 0.0, || Rgb([1, 1, 1])));
        assert_eq!(fb.get_pixel(5, 0), None);
        assert_eq!(fb.get_depth(0, 9), f32::INFINITY);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn pixel_offset_does_not_wrap_at_u32() {
        assert_eq!(pixel_offset(5, 70_000, 70_000), 4_900_000_005);
        assert_eq!(pixel_offset(3, 2, 10), 23);
    }

    #[test]
    fn depth_visualization_spans_observed_range() {
        let mut fb = FrameBuffer::new(3, 1);
        fb.test_and_set(0, 0, 0.25, || Rgb([0, 0, 0]));
        fb.test_and_set(1, 0, 0.75, || Rgb([0, 0, 0]));
        let img = fb.depth_visualization();
        assert_eq!(img.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(img.get_pixel(1, 0), &Rgb([255, 255, 255]));
        assert_eq!(img.get_pixel(2, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn to_image_copies_colors() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.clear(Rgb([5, 5, 5]));
        fb.set_pixel(1, 0, Rgb([200, 100, 50]));
        let img = fb.to_image();
        assert_eq!(img.get_pixel(0, 0), &Rgb([5, 5, 5]));
        assert_eq!(img.get_pixel(1, 0), &Rgb([200, 100, 50]));
    }
}
