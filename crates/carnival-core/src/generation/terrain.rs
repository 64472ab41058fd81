//! Terrain generation - smoothed noise altitude map

use rand::Rng;

use crate::biome::Field;

/// Number of 3x3 averaging passes applied to the raw noise
pub const SMOOTHING_PASSES: usize = 3;

/// Uniform noise smoothed by repeated 3x3 box averaging.
///
/// Edge cells average over their in-bounds neighbours only; there is no
/// wraparound. Values stay within [0, 1].
pub fn generate_altitude(width: usize, height: usize, rng: &mut impl Rng) -> Field {
    let mut field = Field::filled(width, height, 0.0);
    for x in 0..width {
        for y in 0..height {
            field.set(x, y, rng.gen::<f64>());
        }
    }

    for _ in 0..SMOOTHING_PASSES {
        field = smooth(&field);
    }
    field
}

/// One 3x3 box-average pass
pub fn smooth(field: &Field) -> Field {
    let (width, height) = (field.width(), field.height());
    let mut out = Field::filled(width, height, 0.0);

    for x in 0..width {
        for y in 0..height {
            let mut sum = 0.0;
            let mut count = 0u32;
            for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
                    if let Some(v) = field.get(nx, ny) {
                        sum += v;
                        count += 1;
                    }
                }
            }
            out.set(x, y, sum / f64::from(count.max(1)));
        }
    }

    out
}
