/// Inclusive pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

// helper methods
impl Rect {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }
    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Bounding box of integer points clamped to a `width`x`height` image.
    /// `None` when the box lies entirely outside the image.
    pub fn clamped_bounds(xs: [i32; 3], ys: [i32; 3], width: u32, height: u32) -> Option<Rect> {
        if width == 0 || height == 0 {
            return None;
        }
        let max_x_limit = width as i32 - 1;
        let max_y_limit = height as i32 - 1;

        let min_x = xs.iter().copied().min()?.max(0);
        let max_x = xs.iter().copied().max()?.min(max_x_limit);
        let min_y = ys.iter().copied().min()?.max(0);
        let max_y = ys.iter().copied().max()?.min(max_y_limit);

        if min_x > max_x || min_y > max_y {
            return None;
        }
        Some(Rect {
            min_x: min_x as u32,
            min_y: min_y as u32,
            max_x: max_x as u32,
            max_y: max_y as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_clamped_to_image() {
        let rect = Rect::clamped_bounds([-10, 50, 400], [5, -3, 20], 300, 200).unwrap();
        assert_eq!(rect, Rect { min_x: 0, min_y: 0, max_x: 299, max_y: 20 });
        assert_eq!(rect.width(), 300);
        assert_eq!(rect.height(), 21);
    }

    #[test]
    fn off_screen_bounds_are_empty() {
        assert_eq!(Rect::clamped_bounds([310, 320, 330], [0, 1, 2], 300, 200), None);
        assert_eq!(Rect::clamped_bounds([0, 1, 2], [-9, -5, -1], 300, 200), None);
    }
}
