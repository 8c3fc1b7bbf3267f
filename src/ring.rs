/// Planetary ring texture generation
///
/// A ring is rendered as a horizontal strip where each column is either a
/// translucent band of tinted ring material or a fully transparent gap.

use image::{Rgba, RgbaImage};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::color::offset;
use crate::error::{Result, TextureError};
use crate::request::RingRequest;

/// Fixed strip height of every ring texture
pub const RING_HEIGHT: u32 = 64;
/// Chance that a column is left empty
pub const GAP_PROBABILITY: f64 = 0.1;
/// Maximum per-column tint applied to the base color
pub const TINT_RANGE: i32 = 15;

#[derive(Debug, Clone, Copy)]
pub struct RingSynthesizer {
    width: u32,
}

impl RingSynthesizer {
    pub fn new(width: u32) -> Self {
        RingSynthesizer { width }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Render a ring strip seeded from `seed`
    pub fn render(&self, request: &RingRequest, seed: u64) -> Result<RgbaImage> {
        if self.width == 0 {
            return Err(TextureError::InvalidDimensions {
                width: self.width,
                height: RING_HEIGHT,
            });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut img = RgbaImage::new(self.width, RING_HEIGHT);

        for x in 0..self.width {
            let Some(pixel) = ring_column(request, &mut rng) else {
                continue;
            };
            for y in 0..RING_HEIGHT {
                img.put_pixel(x, y, pixel);
            }
        }

        Ok(img)
    }
}

/// Pick the color of one column, or `None` for a gap
fn ring_column<R: Rng + ?Sized>(request: &RingRequest, rng: &mut R) -> Option<Rgba<u8>> {
    if rng.r#gen::<f64>() <= GAP_PROBABILITY {
        return None;
    }

    let alpha = (rng.gen_range(0.5..1.0) * request.opacity * 255.0).clamp(0.0, 255.0) as u8;
    let tint = rng.gen_range(-TINT_RANGE..=TINT_RANGE);
    let [r, g, b] = offset(request.base_color, tint);

    Some(Rgba([r, g, b, alpha]))
}
