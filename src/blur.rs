/// Smoothing filters applied to rendered surfaces
///
/// All filters weight neighbouring pixels with non-negative weights that sum
/// to one, so channels never leave [0, 255]. Out-of-bounds samples clamp to
/// the nearest edge pixel.

use image::RgbImage;
use rayon::prelude::*;

/// Classic 5x5 "smooth more" kernel, normalized by 100
const SMOOTH_MORE: [[u32; 5]; 5] = [
    [1, 1, 1, 1, 1],
    [1, 5, 5, 5, 1],
    [1, 5, 44, 5, 1],
    [1, 5, 5, 5, 1],
    [1, 1, 1, 1, 1],
];
const SMOOTH_MORE_SCALE: u32 = 100;

fn clamp_index(i: isize, len: u32) -> u32 {
    i.clamp(0, len as isize - 1) as u32
}

/// Apply a simple box blur to the image
///
/// * `image` - The image to blur
/// * `radius` - Blur radius; zero returns a copy
///
/// Returns a new blurred image
pub fn box_blur(image: &RgbImage, radius: u32) -> RgbImage {
    let size = 2 * radius as usize + 1;
    let weights = vec![1.0 / size as f32; size];
    separable(image, &weights)
}

/// Gaussian blur with sigma equal to `radius`
///
/// The kernel is truncated at three standard deviations.
pub fn gaussian_blur(image: &RgbImage, radius: u32) -> RgbImage {
    if radius == 0 {
        return image.clone();
    }

    let sigma = radius as f32;
    let half = (3.0 * sigma).ceil() as isize;
    let mut weights: Vec<f32> = (-half..=half)
        .map(|i| (-(i * i) as f32 / (2.0 * sigma * sigma)).exp())
        .collect();
    let total: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= total;
    }

    separable(image, &weights)
}

/// Two-pass (horizontal then vertical) convolution with a symmetric kernel
fn separable(image: &RgbImage, weights: &[f32]) -> RgbImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }
    let half = (weights.len() / 2) as isize;
    let row_len = width as usize * 3;

    let mut horizontal = RgbImage::new(width, height);
    horizontal
        .par_chunks_exact_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                let mut acc = [0.0f32; 3];
                for (k, w) in weights.iter().enumerate() {
                    let sx = clamp_index(x as isize + k as isize - half, width);
                    let p = image.get_pixel(sx, y as u32);
                    for c in 0..3 {
                        acc[c] += p[c] as f32 * w;
                    }
                }
                let i = x as usize * 3;
                for c in 0..3 {
                    row[i + c] = acc[c].round().clamp(0.0, 255.0) as u8;
                }
            }
        });

    let mut result = RgbImage::new(width, height);
    result
        .par_chunks_exact_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                let mut acc = [0.0f32; 3];
                for (k, w) in weights.iter().enumerate() {
                    let sy = clamp_index(y as isize + k as isize - half, height);
                    let p = horizontal.get_pixel(x, sy);
                    for c in 0..3 {
                        acc[c] += p[c] as f32 * w;
                    }
                }
                let i = x as usize * 3;
                for c in 0..3 {
                    row[i + c] = acc[c].round().clamp(0.0, 255.0) as u8;
                }
            }
        });

    result
}

/// Apply the 5x5 "smooth more" kernel
pub fn smooth_more(image: &RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }
    let row_len = width as usize * 3;

    let mut result = RgbImage::new(width, height);
    result
        .par_chunks_exact_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                let mut acc = [0u32; 3];
                for (ky, kernel_row) in SMOOTH_MORE.iter().enumerate() {
                    let sy = clamp_index(y as isize + ky as isize - 2, height);
                    for (kx, weight) in kernel_row.iter().enumerate() {
                        let sx = clamp_index(x as isize + kx as isize - 2, width);
                        let p = image.get_pixel(sx, sy);
                        for c in 0..3 {
                            acc[c] += p[c] as u32 * weight;
                        }
                    }
                }
                let i = x as usize * 3;
                for c in 0..3 {
                    // Round to nearest
                    row[i + c] = ((acc[c] + SMOOTH_MORE_SCALE / 2) / SMOOTH_MORE_SCALE).min(255) as u8;
                }
            }
        });

    result
}
