/// Surface texture synthesis
///
/// One strategy per `ObjectKind`, each a single pass of noise sampling and
/// per-pixel compositing followed by an optional post-process (blur, smoothing
/// or crater stamping). Rows are rendered in parallel over the contiguous
/// pixel buffer; no per-pixel allocation happens inside the loops.

use image::RgbImage;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::blur::{gaussian_blur, smooth_more};
use crate::color::{self, Rgb};
use crate::craters::stamp_craters;
use crate::error::{Result, TextureError};
use crate::noise_field::NoiseField;
use crate::request::{ObjectKind, SurfaceRequest};

pub const DEFAULT_WIDTH: u32 = 1024;
pub const DEFAULT_HEIGHT: u32 = 512;

/// How a strategy maps a pixel position into noise space
#[derive(Debug, Clone, Copy)]
enum Coords {
    /// Normalized to [0, 1) across the image, then scaled
    Normalized(f64),
    /// Raw pixel coordinates divided by a feature size
    Pixels(f64),
}

#[derive(Clone)]
pub struct SurfaceSynthesizer {
    width: u32,
    height: u32,
    field: NoiseField,
}

impl Default for SurfaceSynthesizer {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl SurfaceSynthesizer {
    pub fn new(width: u32, height: u32) -> Self {
        SurfaceSynthesizer {
            width,
            height,
            field: NoiseField::default(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Render the surface for `request`
    ///
    /// `seed` drives the random parts of a strategy (craters), so identical
    /// requests with identical seeds produce identical images.
    pub fn render(&self, request: &SurfaceRequest, seed: u64) -> Result<RgbImage> {
        if self.width == 0 || self.height == 0 {
            return Err(TextureError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let base = request.base_color;
        let img = match request.kind {
            ObjectKind::Star => {
                let img = self.fill(Coords::Normalized(10.0), 3, |n| color::star_pixel(base, n));
                gaussian_blur(&img, 1)
            }
            ObjectKind::Gas => {
                let img = self.fill(Coords::Pixels(100.0), 4, |n| color::gas_pixel(base, n));
                gaussian_blur(&img, 2)
            }
            ObjectKind::Rocky => {
                let mut img = self.fill(Coords::Pixels(50.0), 5, |n| color::rocky_pixel(base, n));
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                stamp_craters(&mut img, &mut rng);
                img
            }
            ObjectKind::Ice => {
                // Cracks cover every pixel, so no backdrop fill is needed
                let img = self.fill(Coords::Pixels(20.0), 6, color::ice_pixel);
                smooth_more(&img)
            }
            ObjectKind::Terrestrial => self.fill(Coords::Normalized(3.0), 3, color::terrestrial_pixel),
        };

        Ok(img)
    }

    /// Sample the noise field once per pixel and composite with `pixel`
    fn fill<F>(&self, coords: Coords, octaves: u32, pixel: F) -> RgbImage
    where
        F: Fn(f64) -> [u8; 3] + Sync,
    {
        let (width, height) = (self.width, self.height);
        let (sx, sy, frequency) = match coords {
            Coords::Normalized(scale) => (1.0 / width as f64, 1.0 / height as f64, scale),
            Coords::Pixels(feature) => (1.0, 1.0, 1.0 / feature),
        };

        let mut img = RgbImage::new(width, height);
        img.par_chunks_exact_mut(width as usize * 3)
            .enumerate()
            .for_each(|(y, row)| {
                let ny = y as f64 * sy;
                for (x, px) in row.chunks_exact_mut(3).enumerate() {
                    let n = self.field.sample(x as f64 * sx, ny, frequency, octaves);
                    px.copy_from_slice(&pixel(n));
                }
            });

        img
    }
}
