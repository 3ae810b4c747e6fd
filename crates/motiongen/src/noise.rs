use noise::{NoiseFn, Perlin};

/// Seeded 2D gradient noise with frequency/amplitude scaling.
///
/// The basis for any variation that should look organic rather than random:
/// the same seed always produces the same field.
#[derive(Debug, Clone)]
pub struct NoiseField {
    perlin: Perlin,
    frequency: f32,
    amplitude: f32,
}

impl NoiseField {
    pub fn new(seed: u32, frequency: f32, amplitude: f32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            frequency,
            amplitude,
        }
    }

    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let sx = (x * self.frequency) as f64;
        let sy = (y * self.frequency) as f64;
        self.perlin.get([sx, sy]) as f32 * self.amplitude
    }

    /// Octave composition: each octave doubles the frequency and scales the
    /// amplitude by `persistence`.
    pub fn octave(&self, x: f32, y: f32, octaves: usize, persistence: f32) -> f32 {
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        for _ in 0..octaves {
            value += self.sample(x * frequency, y * frequency) * amplitude;
            amplitude *= persistence;
            frequency *= 2.0;
        }
        value
    }
}
