//! Frame buffers: RGB float images and crop windows.

use shadekit_math::{UVec2, Vec3};

/// Color type alias (linear RGB values, typically 0-1)
pub type Color = Vec3;

/// Inclusive pixel rectangle, `min..=max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    pub min: UVec2,
    pub max: UVec2,
}

impl CropWindow {
    pub fn new(min: UVec2, max: UVec2) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y);
        Self { min, max }
    }

    pub fn width(&self) -> u32 {
        self.max.x - self.min.x + 1
    }

    pub fn height(&self) -> u32 {
        self.max.y - self.min.y + 1
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.min.x..=self.max.x).contains(&x) && (self.min.y..=self.max.y).contains(&y)
    }

    /// Pixel coordinates in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> {
        let (min, max) = (self.min, self.max);
        (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| (x, y)))
    }
}

/// RGB float image addressed by integer pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Image {
    /// Create a new image filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The window covering every pixel of the image, `None` if the image
    /// has no pixels.
    pub fn full_crop_window(&self) -> Option<CropWindow> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(CropWindow::new(
            UVec2::ZERO,
            UVec2::new(self.width - 1, self.height - 1),
        ))
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y * self.width + x) as usize
    }

    /// Get the pixel at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Convert to 8-bit RGBA bytes, clamping to [0, 1]. No gamma is applied.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            let c = color.clamp(Color::ZERO, Color::ONE) * 255.0;
            bytes.extend_from_slice(&[c.x as u8, c.y as u8, c.z as u8, 255]);
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_get_set() {
        let mut image = Image::new(4, 3);
        image.set_pixel(3, 2, Color::new(1.0, 0.5, 0.25));

        assert_eq!(image.get_pixel(3, 2), Color::new(1.0, 0.5, 0.25));
        assert_eq!(image.get_pixel(0, 0), Color::ZERO);
        assert_eq!(image.pixels()[11], Color::new(1.0, 0.5, 0.25));
    }

    #[test]
    fn test_crop_window_iteration() {
        let window = CropWindow::new(UVec2::new(1, 2), UVec2::new(2, 3));
        let pixels: Vec<_> = window.pixels().collect();

        assert_eq!(window.width(), 2);
        assert_eq!(window.height(), 2);
        assert_eq!(pixels, vec![(1, 2), (2, 2), (1, 3), (2, 3)]);
        assert!(window.contains(2, 3));
        assert!(!window.contains(0, 3));
    }

    #[test]
    fn test_full_crop_window() {
        let image = Image::new(8, 5);
        let window = image.full_crop_window().unwrap();
        assert_eq!(window.pixels().count(), 40);
        assert_eq!(window.max, UVec2::new(7, 4));
    }

    #[test]
    fn test_empty_image_has_no_crop_window() {
        assert_eq!(Image::new(0, 0).full_crop_window(), None);
        assert_eq!(Image::new(4, 0).full_crop_window(), None);
        assert_eq!(Image::new(0, 3).full_crop_window(), None);
    }

    #[test]
    fn test_to_rgba8_clamps() {
        let mut image = Image::new(1, 1);
        image.set_pixel(0, 0, Color::new(2.0, -1.0, 1.0));
        assert_eq!(image.to_rgba8(), vec![255, 0, 255, 255]);
    }
}
