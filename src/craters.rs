use glam::Vec2;
use image::RgbImage;
use rand::Rng;

/// Number of craters stamped onto every rocky surface
pub const CRATER_COUNT: usize = 50;
pub const MIN_RADIUS: i32 = 5;
pub const MAX_RADIUS: i32 = 20;
/// Darkening applied at a crater's center, falling off linearly to the rim
pub const MAX_DARKEN: f32 = 80.0;

/// A single circular impact site
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crater {
    pub center: Vec2,
    pub radius: i32,
}

impl Crater {
    /// Pick a crater uniformly inside an image of the given size
    pub fn random<R: Rng + ?Sized>(rng: &mut R, width: u32, height: u32) -> Self {
        let cx = rng.gen_range(0..width);
        let cy = rng.gen_range(0..height);
        let radius = rng.gen_range(MIN_RADIUS..=MAX_RADIUS);
        Crater {
            center: Vec2::new(cx as f32, cy as f32),
            radius,
        }
    }

    /// Darkening to subtract at `point`, or zero outside the rim
    pub fn darken_at(&self, point: Vec2) -> u8 {
        let radius = self.radius as f32;
        let dist = point.distance(self.center);
        if dist >= radius {
            return 0;
        }
        ((1.0 - dist / radius) * MAX_DARKEN) as u8
    }

    /// Subtract this crater's darkening from every pixel it covers
    pub fn stamp(&self, image: &mut RgbImage) {
        let (width, height) = image.dimensions();
        let cx = self.center.x as i64;
        let cy = self.center.y as i64;
        let r = self.radius as i64;

        let y0 = (cy - r).max(0);
        let y1 = (cy + r).min(height as i64);
        let x0 = (cx - r).max(0);
        let x1 = (cx + r).min(width as i64);

        for y in y0..y1 {
            for x in x0..x1 {
                let darken = self.darken_at(Vec2::new(x as f32, y as f32));
                if darken == 0 {
                    continue;
                }
                let pixel = image.get_pixel_mut(x as u32, y as u32);
                for channel in pixel.0.iter_mut() {
                    *channel = channel.saturating_sub(darken);
                }
            }
        }
    }
}

/// Stamp `CRATER_COUNT` craters onto a rocky surface
///
/// Craters may overlap; later craters darken on top of earlier ones.
pub fn stamp_craters<R: Rng + ?Sized>(image: &mut RgbImage, rng: &mut R) {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    for _ in 0..CRATER_COUNT {
        Crater::random(rng, width, height).stamp(image);
    }
}
