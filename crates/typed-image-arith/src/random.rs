//! Random fills.

use std::f64::consts::TAU;

use rand::Rng;
use typed_image_core::{Depth, Scalar};

/// Fill interleaved `a` with per-channel uniform samples in `[low, high)`.
pub fn fill_uniform<D: Depth, R: Rng + ?Sized>(
    rng: &mut R,
    a: &mut [D],
    channels: usize,
    low: &Scalar,
    high: &Scalar,
) {
    for px in a.chunks_exact_mut(channels) {
        for (c, x) in px.iter_mut().enumerate() {
            let u: f64 = rng.gen();
            *x = D::saturate(low[c] + (high[c] - low[c]) * u);
        }
    }
}

/// Fill interleaved `a` with per-channel normal samples (Box-Muller).
pub fn fill_normal<D: Depth, R: Rng + ?Sized>(
    rng: &mut R,
    a: &mut [D],
    channels: usize,
    mean: &Scalar,
    std_dev: &Scalar,
) {
    for px in a.chunks_exact_mut(channels) {
        for (c, x) in px.iter_mut().enumerate() {
            *x = D::saturate(mean[c] + std_dev[c] * standard_normal(rng));
        }
    }
}

fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // 1 - u keeps the log argument in (0, 1].
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn uniform_respects_per_channel_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut buf = vec![0.0f32; 3 * 1000];
        let low = Scalar::new(0.0, 10.0, -5.0, 0.0);
        let high = Scalar::new(1.0, 20.0, 5.0, 0.0);
        fill_uniform(&mut rng, &mut buf, 3, &low, &high);
        for px in buf.chunks_exact(3) {
            for c in 0..3 {
                let v = f64::from(px[c]);
                assert!(v >= low[c] && v <= high[c], "channel {c}: {v}");
            }
        }
    }

    #[test]
    fn normal_fill_has_expected_moments() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut buf = vec![0.0f64; 20_000];
        fill_normal(&mut rng, &mut buf, 1, &Scalar::all(100.0), &Scalar::all(50.0));
        let n = buf.len() as f64;
        let mean = buf.iter().sum::<f64>() / n;
        let var = buf.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        approx::assert_abs_diff_eq!(mean, 100.0, epsilon = 2.0);
        approx::assert_abs_diff_eq!(var.sqrt(), 50.0, epsilon = 2.0);
    }
}
