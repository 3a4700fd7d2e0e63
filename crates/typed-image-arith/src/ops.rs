use rand::Rng;
use typed_image_core::{ColorType, Depth, Image, ImageError, Scalar};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{kernels, random};

/// Arithmetic fast paths on typed images.
///
/// Image/image operations work on the operands' ROIs, which must have equal
/// sizes, and return compact images the size of the ROI. In-place
/// operations (`*_assign`, `running_avg`, `rand_*`) modify the ROI only.
pub trait ImageArith<C: ColorType, D: Depth> {
    fn add(&self, other: &Image<C, D>) -> Result<Image<C, D>, ImageError>;

    fn sub(&self, other: &Image<C, D>) -> Result<Image<C, D>, ImageError>;

    fn abs_diff(&self, other: &Image<C, D>) -> Result<Image<C, D>, ImageError>;

    /// Elementwise maximum of the two images.
    fn max_with(&self, other: &Image<C, D>) -> Result<Image<C, D>, ImageError>;

    /// Elementwise minimum of the two images.
    fn min_with(&self, other: &Image<C, D>) -> Result<Image<C, D>, ImageError>;

    fn mul_scalar(&self, scale: f64) -> Image<C, D>;

    fn add_scalar(&self, value: Scalar) -> Image<C, D>;

    /// `value - self`, per channel.
    fn sub_from_scalar(&self, value: Scalar) -> Image<C, D>;

    /// Bitwise complement of every element.
    fn not(&self) -> Image<C, D>;

    /// Clamp from below: every element becomes at least `value`.
    fn max_assign_scalar(&mut self, value: f64);

    /// Clamp from above: every element becomes at most `value`.
    fn min_assign_scalar(&mut self, value: f64);

    /// Per-channel sum of the ROI, accumulated in `f64`.
    fn sum(&self) -> C;

    /// `self = (1 - alpha) * self + alpha * other`.
    fn running_avg(&mut self, other: &Image<C, D>, alpha: f64) -> Result<(), ImageError>;

    /// `scale * self + shift`, saturated into depth `D2`.
    fn convert_scale<D2: Depth>(&self, scale: f64, shift: f64) -> Image<C, D2>;

    fn convert_depth<D2: Depth>(&self) -> Image<C, D2> {
        self.convert_scale(1.0, 0.0)
    }

    /// Fill with per-channel uniform noise in `[low, high)`.
    fn rand_uniform<R: Rng + ?Sized>(&mut self, rng: &mut R, low: Scalar, high: Scalar);

    /// Fill with per-channel normal noise.
    fn rand_normal<R: Rng + ?Sized>(&mut self, rng: &mut R, mean: Scalar, std_dev: Scalar);
}

fn binary<C: ColorType, D: Depth>(
    a: &Image<C, D>,
    b: &Image<C, D>,
    kernel: fn(&[D], &[D], &mut [D]),
) -> Result<Image<C, D>, ImageError> {
    let (expected, actual) = (a.roi().size(), b.roi().size());
    if expected != actual {
        log::warn!("arithmetic operands differ in shape: {expected} vs {actual}");
        return Err(ImageError::ShapeMismatch { expected, actual });
    }
    let mut out = a.new_like::<D>();
    for ((ra, rb), ro) in a.rows().zip(b.rows()).zip(out.rows_mut()) {
        kernel(ra, rb, ro);
    }
    Ok(out)
}

fn unary<C: ColorType, D: Depth, D2: Depth, K>(a: &Image<C, D>, mut kernel: K) -> Image<C, D2>
where
    K: FnMut(&[D], &mut [D2]),
{
    let mut out = a.new_like::<D2>();
    for (ra, ro) in a.rows().zip(out.rows_mut()) {
        kernel(ra, ro);
    }
    out
}

impl<C: ColorType, D: Depth> ImageArith<C, D> for Image<C, D> {
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
    fn add(&self, other: &Image<C, D>) -> Result<Image<C, D>, ImageError> {
        binary(self, other, kernels::add)
    }

    fn sub(&self, other: &Image<C, D>) -> Result<Image<C, D>, ImageError> {
        binary(self, other, kernels::sub)
    }

    fn abs_diff(&self, other: &Image<C, D>) -> Result<Image<C, D>, ImageError> {
        binary(self, other, kernels::abs_diff)
    }

    fn max_with(&self, other: &Image<C, D>) -> Result<Image<C, D>, ImageError> {
        binary(self, other, kernels::max)
    }

    fn min_with(&self, other: &Image<C, D>) -> Result<Image<C, D>, ImageError> {
        binary(self, other, kernels::min)
    }

    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    fn mul_scalar(&self, scale: f64) -> Image<C, D> {
        unary(self, |a, out| kernels::scale_shift(a, scale, 0.0, out))
    }

    fn add_scalar(&self, value: Scalar) -> Image<C, D> {
        unary(self, |a, out| kernels::add_scalar(a, &value, C::CHANNELS, out))
    }

    fn sub_from_scalar(&self, value: Scalar) -> Image<C, D> {
        unary(self, |a, out| {
            kernels::sub_from_scalar(a, &value, C::CHANNELS, out)
        })
    }

    fn not(&self) -> Image<C, D> {
        unary(self, kernels::not)
    }

    fn max_assign_scalar(&mut self, value: f64) {
        for row in self.rows_mut() {
            kernels::max_scalar_assign(row, value);
        }
    }

    fn min_assign_scalar(&mut self, value: f64) {
        for row in self.rows_mut() {
            kernels::min_scalar_assign(row, value);
        }
    }

    fn sum(&self) -> C {
        let mut acc = Scalar::default();
        for row in self.rows() {
            kernels::sum_channels(row, C::CHANNELS, &mut acc);
        }
        C::from_scalar(acc)
    }

    fn running_avg(&mut self, other: &Image<C, D>, alpha: f64) -> Result<(), ImageError> {
        let (expected, actual) = (self.roi().size(), other.roi().size());
        if expected != actual {
            return Err(ImageError::ShapeMismatch { expected, actual });
        }
        for (acc, src) in self.rows_mut().zip(other.rows()) {
            kernels::accumulate_weighted(acc, src, alpha);
        }
        Ok(())
    }

    fn convert_scale<D2: Depth>(&self, scale: f64, shift: f64) -> Image<C, D2> {
        unary(self, |a, out| kernels::scale_shift(a, scale, shift, out))
    }

    fn rand_uniform<R: Rng + ?Sized>(&mut self, rng: &mut R, low: Scalar, high: Scalar) {
        log::debug!("uniform fill of {} roi, low={low:?} high={high:?}", self.roi());
        for row in self.rows_mut() {
            random::fill_uniform(rng, row, C::CHANNELS, &low, &high);
        }
    }

    fn rand_normal<R: Rng + ?Sized>(&mut self, rng: &mut R, mean: Scalar, std_dev: Scalar) {
        log::debug!(
            "normal fill of {} roi, mean={mean:?} std={std_dev:?}",
            self.roi()
        );
        for row in self.rows_mut() {
            random::fill_normal(rng, row, C::CHANNELS, &mean, &std_dev);
        }
    }
}
