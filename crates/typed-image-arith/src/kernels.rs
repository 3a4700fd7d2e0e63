//! Flat-slice kernels.
//!
//! Every kernel works on equally long runs of interleaved elements (one ROI
//! row at a time when called from [`crate::ImageArith`]). Arithmetic goes
//! through `f64` and saturates into the destination depth, which for `f32`
//! gives the same result as native `f32` arithmetic.

use typed_image_core::{Depth, Scalar};

#[inline]
fn zip_with<D: Depth, F: Fn(f64, f64) -> f64>(a: &[D], b: &[D], out: &mut [D], f: F) {
    debug_assert!(a.len() == b.len() && a.len() == out.len());
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = D::saturate(f(x.to_f64(), y.to_f64()));
    }
}

pub fn add<D: Depth>(a: &[D], b: &[D], out: &mut [D]) {
    zip_with(a, b, out, |x, y| x + y);
}

pub fn sub<D: Depth>(a: &[D], b: &[D], out: &mut [D]) {
    zip_with(a, b, out, |x, y| x - y);
}

pub fn abs_diff<D: Depth>(a: &[D], b: &[D], out: &mut [D]) {
    zip_with(a, b, out, |x, y| (x - y).abs());
}

/// Elementwise maximum.
pub fn max<D: Depth>(a: &[D], b: &[D], out: &mut [D]) {
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = if y > x { y } else { x };
    }
}

/// Elementwise minimum.
pub fn min<D: Depth>(a: &[D], b: &[D], out: &mut [D]) {
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = if y < x { y } else { x };
    }
}

/// `out = a * scale + shift`, saturated to `D2`.
pub fn scale_shift<D: Depth, D2: Depth>(a: &[D], scale: f64, shift: f64, out: &mut [D2]) {
    for (o, &x) in out.iter_mut().zip(a) {
        *o = D2::saturate(x.to_f64() * scale + shift);
    }
}

/// `out = a + s` with one scalar component per channel.
pub fn add_scalar<D: Depth>(a: &[D], s: &Scalar, channels: usize, out: &mut [D]) {
    for (po, pa) in out.chunks_exact_mut(channels).zip(a.chunks_exact(channels)) {
        for (c, (o, &x)) in po.iter_mut().zip(pa).enumerate() {
            *o = D::saturate(x.to_f64() + s[c]);
        }
    }
}

/// `out = s - a` with one scalar component per channel.
pub fn sub_from_scalar<D: Depth>(a: &[D], s: &Scalar, channels: usize, out: &mut [D]) {
    for (po, pa) in out.chunks_exact_mut(channels).zip(a.chunks_exact(channels)) {
        for (c, (o, &x)) in po.iter_mut().zip(pa).enumerate() {
            *o = D::saturate(s[c] - x.to_f64());
        }
    }
}

pub fn not<D: Depth>(a: &[D], out: &mut [D]) {
    for (o, &x) in out.iter_mut().zip(a) {
        *o = x.not_bits();
    }
}

/// In place `a = max(a, v)`.
pub fn max_scalar_assign<D: Depth>(a: &mut [D], v: f64) {
    let v = D::saturate(v);
    for x in a {
        if *x < v {
            *x = v;
        }
    }
}

/// In place `a = min(a, v)`.
pub fn min_scalar_assign<D: Depth>(a: &mut [D], v: f64) {
    let v = D::saturate(v);
    for x in a {
        if *x > v {
            *x = v;
        }
    }
}

/// In place `acc = (1 - alpha) * acc + alpha * src`.
pub fn accumulate_weighted<D: Depth>(acc: &mut [D], src: &[D], alpha: f64) {
    for (a, &s) in acc.iter_mut().zip(src) {
        *a = D::saturate((1.0 - alpha) * a.to_f64() + alpha * s.to_f64());
    }
}

/// Add per-channel sums of `a` into `acc`.
pub fn sum_channels<D: Depth>(a: &[D], channels: usize, acc: &mut Scalar) {
    for px in a.chunks_exact(channels) {
        for (c, &x) in px.iter().enumerate() {
            acc[c] += x.to_f64();
        }
    }
}
