//! Arbitrary output variables: extra images produced alongside the beauty.

pub mod pixel_variation;

use shadekit_core::{CropWindow, Image};

pub use pixel_variation::{PixelVariationAov, PixelVariationAovFactory};

/// An auxiliary frame buffer with an optional post-processing step.
pub trait Aov: Send + Sync {
    /// Name of the image this AOV produces.
    fn name(&self) -> &str;

    fn model(&self) -> &'static str;

    /// Rewrite the pixels of `image` inside `crop_window` once rendering
    /// has finished. Pixels outside the window are left untouched.
    fn post_process_image(&self, _image: &mut Image, _crop_window: &CropWindow) {}
}
