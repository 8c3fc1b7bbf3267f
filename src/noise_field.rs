/// Coherent 2D noise shared by every surface strategy
///
/// Multi-octave Perlin noise (fractional Brownian motion) with the standard
/// persistence of 0.5 and lacunarity of 2.0. The octave sum is normalized by
/// the total amplitude, so samples stay in [-1, 1] regardless of octave count.

use noise::{NoiseFn, Perlin};

/// Fixed permutation seed; every texture samples the same field
pub const FIELD_SEED: u32 = 0;

const PERSISTENCE: f64 = 0.5;
const LACUNARITY: f64 = 2.0;

#[derive(Clone)]
pub struct NoiseField {
    perlin: Perlin,
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::new(FIELD_SEED)
    }
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        NoiseField {
            perlin: Perlin::new(seed),
        }
    }

    /// Sample fBm noise at `(x * frequency, y * frequency)`
    ///
    /// # Arguments
    /// * `x`, `y` - Coordinates in caller space
    /// * `frequency` - Scale applied to both coordinates before sampling
    /// * `octaves` - Number of layers to sum; zero yields 0.0
    ///
    /// # Returns
    /// * `f64` - Noise value in [-1, 1]
    pub fn sample(&self, x: f64, y: f64, frequency: f64, octaves: u32) -> f64 {
        let mut total = 0.0;
        let mut max_amplitude = 0.0;
        let mut amplitude = 1.0;
        let mut freq = frequency;

        for _ in 0..octaves {
            total += amplitude * self.perlin.get([x * freq, y * freq]);
            max_amplitude += amplitude;
            amplitude *= PERSISTENCE;
            freq *= LACUNARITY;
        }

        if max_amplitude == 0.0 {
            return 0.0;
        }
        (total / max_amplitude).clamp(-1.0, 1.0)
    }
}
