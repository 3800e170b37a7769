use shadekit_core::{Color, CropWindow, Image, ParamArray};
use shadekit_math::scalar::fit;

use super::Aov;
use crate::factory::{AovFactory, EntityFactory, ModelMetadata};

pub const MODEL: &str = "pixel_variation_aov";

/// Turns a per-pixel variance image into a blue-to-red heat map.
///
/// The renderer writes the variance into the red channel; post-processing
/// normalizes it by the maximum over the crop window.
#[derive(Debug, Clone, Default)]
pub struct PixelVariationAov;

impl PixelVariationAov {
    pub fn new() -> Self {
        Self
    }
}

impl Aov for PixelVariationAov {
    fn name(&self) -> &str {
        "pixel_variation"
    }

    fn model(&self) -> &'static str {
        MODEL
    }

    fn post_process_image(&self, image: &mut Image, crop_window: &CropWindow) {
        const BLUE: Color = Color::new(0.0, 0.0, 1.0);
        const RED: Color = Color::new(1.0, 0.0, 0.0);

        // Window pixels past the image edge are skipped.
        let (width, height) = (image.width(), image.height());
        let pixels = || {
            crop_window
                .pixels()
                .filter(move |&(x, y)| x < width && y < height)
        };

        let max_variation = pixels()
            .map(|(x, y)| image.get_pixel(x, y).x)
            .fold(0.0_f32, f32::max);

        if max_variation == 0.0 {
            for (x, y) in pixels() {
                image.set_pixel(x, y, BLUE);
            }
            return;
        }

        for (x, y) in pixels() {
            let c = fit(image.get_pixel(x, y).x, 0.0, max_variation, 0.0, 1.0);
            image.set_pixel(x, y, BLUE.lerp(RED, c));
        }
    }
}

/// Creates [`PixelVariationAov`] instances.
pub struct PixelVariationAovFactory;

impl EntityFactory for PixelVariationAovFactory {
    fn model(&self) -> &'static str {
        MODEL
    }

    fn model_metadata(&self) -> ModelMetadata {
        ModelMetadata {
            name: MODEL,
            label: "Pixel Variation",
        }
    }
}

impl AovFactory for PixelVariationAovFactory {
    fn create(&self, _params: &ParamArray) -> Box<dyn Aov> {
        Box::new(PixelVariationAov::new())
    }
}
