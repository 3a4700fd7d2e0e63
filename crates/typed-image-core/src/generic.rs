//! Generic per-element and per-pixel operators.
//!
//! Every operator walks the ROI in row-major order, channels innermost, so
//! stateful closures see a deterministic sequence. Results are new compact
//! images the size of the ROI.

use std::ops::Sub;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::image::pixel_of;
use crate::{ColorType, Depth, Image, ImageError, ImageView};

fn check_shape<C: ColorType, A: Depth, B: Depth>(
    a: &ImageView<'_, C, A>,
    b: &ImageView<'_, C, B>,
) -> Result<(), ImageError> {
    let (expected, actual) = (a.roi().size(), b.roi().size());
    if expected != actual {
        log::warn!("operand shape mismatch: {expected} vs {actual}");
        return Err(ImageError::ShapeMismatch { expected, actual });
    }
    Ok(())
}

impl<'a, C: ColorType, D: Depth> ImageView<'a, C, D> {
    /// Map every element through `f` into a new image of depth `D2`.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(roi = %self.roi()))
    )]
    pub fn convert<D2, F>(&self, mut f: F) -> Image<C, D2>
    where
        D2: Depth,
        F: FnMut(D) -> D2,
    {
        let data = self.elements().map(&mut f).collect();
        Image::from_parts(self.roi().size(), data)
    }

    /// Map every pixel (all channels at once) to a color of another layout.
    pub fn map_pixels<C2, D2, F>(&self, mut f: F) -> Image<C2, D2>
    where
        C2: ColorType,
        D2: Depth,
        F: FnMut(&[D]) -> C2,
    {
        let mut data = Vec::with_capacity(self.roi().size().area() * C2::CHANNELS);
        for px in self.pixels() {
            data.extend(pixel_of::<C2, D2>(&f(px)));
        }
        Image::from_parts(self.roi().size(), data)
    }

    /// Zip with `other` elementwise. ROI sizes must match.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(roi = %self.roi()))
    )]
    pub fn combine<D2, D3, F>(
        &self,
        other: &ImageView<'_, C, D2>,
        mut f: F,
    ) -> Result<Image<C, D3>, ImageError>
    where
        D2: Depth,
        D3: Depth,
        F: FnMut(D, D2) -> D3,
    {
        check_shape(self, other)?;
        let data = self
            .elements()
            .zip(other.elements())
            .map(|(a, b)| f(a, b))
            .collect();
        Ok(Image::from_parts(self.roi().size(), data))
    }

    /// Zip with two other images elementwise. ROI sizes must match.
    pub fn combine3<D2, D3, D4, F>(
        &self,
        second: &ImageView<'_, C, D2>,
        third: &ImageView<'_, C, D3>,
        mut f: F,
    ) -> Result<Image<C, D4>, ImageError>
    where
        D2: Depth,
        D3: Depth,
        D4: Depth,
        F: FnMut(D, D2, D3) -> D4,
    {
        check_shape(self, second)?;
        check_shape(self, third)?;
        let data = self
            .elements()
            .zip(second.elements())
            .zip(third.elements())
            .map(|((a, b), c)| f(a, b, c))
            .collect();
        Ok(Image::from_parts(self.roi().size(), data))
    }

    /// Left fold over all elements.
    pub fn reduce<A, F>(&self, seed: A, f: F) -> A
    where
        F: FnMut(A, D) -> A,
    {
        self.elements().fold(seed, f)
    }

    /// Visit every element for its side effects.
    pub fn action<F>(&self, f: F)
    where
        F: FnMut(D),
    {
        self.elements().for_each(f);
    }
}

impl<C: ColorType, D: Depth> Image<C, D> {
    /// See [`ImageView::convert`].
    pub fn convert<D2, F>(&self, f: F) -> Image<C, D2>
    where
        D2: Depth,
        F: FnMut(D) -> D2,
    {
        self.view().convert(f)
    }

    /// See [`ImageView::map_pixels`].
    pub fn map_pixels<C2, D2, F>(&self, f: F) -> Image<C2, D2>
    where
        C2: ColorType,
        D2: Depth,
        F: FnMut(&[D]) -> C2,
    {
        self.view().map_pixels(f)
    }

    /// See [`ImageView::combine`].
    pub fn combine<D2, D3, F>(&self, other: &Image<C, D2>, f: F) -> Result<Image<C, D3>, ImageError>
    where
        D2: Depth,
        D3: Depth,
        F: FnMut(D, D2) -> D3,
    {
        self.view().combine(&other.view(), f)
    }

    /// See [`ImageView::combine3`].
    pub fn combine3<D2, D3, D4, F>(
        &self,
        second: &Image<C, D2>,
        third: &Image<C, D3>,
        f: F,
    ) -> Result<Image<C, D4>, ImageError>
    where
        D2: Depth,
        D3: Depth,
        D4: Depth,
        F: FnMut(D, D2, D3) -> D4,
    {
        self.view().combine3(&second.view(), &third.view(), f)
    }

    pub fn reduce<A, F>(&self, seed: A, f: F) -> A
    where
        F: FnMut(A, D) -> A,
    {
        self.view().reduce(seed, f)
    }

    pub fn action<F>(&self, f: F)
    where
        F: FnMut(D),
    {
        self.view().action(f)
    }
}

/// `s - img`, saturated, applied to every channel.
impl<C: ColorType, D: Depth> Sub<&Image<C, D>> for f64 {
    type Output = Image<C, D>;

    fn sub(self, rhs: &Image<C, D>) -> Image<C, D> {
        rhs.convert(|v| D::saturate(self - v.to_f64()))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Bgr, Gray, Image, ImageError, Rect};

    fn ramp(width: usize, height: usize) -> Image<Gray, f32> {
        let data = (0..width * height).map(|i| (i % 97) as f32 * 0.25).collect();
        Image::from_vec(width, height, data).expect("valid buffer")
    }

    #[test]
    fn stateful_convert_follows_channel_order() {
        let img1 = Image::<Bgr, u8>::new(20, 40).expect("valid size");
        let mut flag = 0usize;
        let img2 = img1.convert(|_| {
            let v = if flag % 3 == 0 { 255u8 } else { 0 };
            flag += 1;
            v
        });
        let img3 = Image::<Bgr, u8>::filled(20, 40, Bgr::new(255.0, 0.0, 0.0)).expect("valid size");
        assert_eq!(img2, img3);
    }

    #[test]
    fn convert_changes_depth() {
        let gimg = Image::<Gray, u8>::filled(40, 30, Gray::new(30.0)).expect("valid size");
        let inverted = gimg.convert(|b| 255 - b);
        assert!(inverted.data().iter().all(|&v| v == 225));
        let widened: Image<Gray, f64> = gimg.convert(f64::from);
        assert_eq!(widened.get(3, 3).expect("in range").intensity, 30.0);
    }

    #[test]
    fn combine_rejects_mismatched_shapes() {
        let a = Image::<Gray, f32>::new(5, 5).expect("valid size");
        let b = Image::<Gray, f32>::new(5, 6).expect("valid size");
        let err = a.combine(&b, |x, y| x + y).unwrap_err();
        assert!(matches!(err, ImageError::ShapeMismatch { .. }));
        assert!(a.combine3(&a, &b, |x, y, z| x + y + z).is_err());
    }

    #[test]
    fn combine_uses_roi_extents() {
        let mut a = Image::<Gray, f32>::new(50, 20).expect("valid size");
        a.set_roi(Some(Rect::new(10, 1, 40, 18))).expect("roi fits");
        a.set_value(Gray::new(5.0));
        let mut b = Image::<Gray, f32>::new(50, 20).expect("valid size");
        b.set_roi(Some(Rect::new(0, 2, 40, 18))).expect("roi fits");
        b.set_value(Gray::new(2.0));

        let sum = a.combine(&b, |x, y| x + y).expect("same roi size");
        assert_eq!(sum.width(), 40);
        assert_eq!(sum.height(), 18);
        assert!(sum.data().iter().all(|&v| v == 7.0));
    }

    #[test]
    fn three_way_combine_matches_chained_pairs() {
        let a = ramp(31, 17);
        let twice = a.combine(&a, |x, y| x + y).expect("same shape");
        let thrice = twice.combine(&a, |x, y| x + y).expect("same shape");
        let direct = a.combine3(&a, &a, |x, y, z| x + y + z).expect("same shape");
        assert_eq!(direct, thrice);
    }

    #[test]
    fn reduce_and_action_agree() {
        let a = ramp(13, 11);
        let folded = a.reduce(0.0f64, |acc, v| acc + f64::from(v));
        let mut visited = 0.0f64;
        a.action(|v| visited += f64::from(v));
        approx::assert_abs_diff_eq!(folded, visited);
        let count = a.reduce(0usize, |n, _| n + 1);
        assert_eq!(count, 13 * 11);
    }

    #[test]
    fn map_pixels_changes_layout() {
        let img = Image::<Bgr, u8>::filled(4, 3, Bgr::new(10.0, 20.0, 30.0)).expect("valid size");
        let gray: Image<Gray, f32> = img.map_pixels(|px| {
            let sum: f64 = px.iter().map(|&v| f64::from(v)).sum();
            Gray::new(sum / px.len() as f64)
        });
        assert_eq!(gray.size(), img.size());
        assert!(gray.data().iter().all(|&v| v == 20.0));
    }

    #[test]
    fn scalar_minus_image_saturates() {
        let img = Image::<Gray, u8>::filled(3, 3, Gray::new(100.0)).expect("valid size");
        assert!((255.0 - &img).data().iter().all(|&v| v == 155));
        assert!((50.0 - &img).data().iter().all(|&v| v == 0));
    }
}
