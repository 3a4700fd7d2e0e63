//! Channel (de)interleaving.

use crate::{ColorType, Depth, Gray, Image, ImageError, ImageView, Size};

impl<C: ColorType, D: Depth> ImageView<'_, C, D> {
    /// One single-channel image per channel, in buffer order.
    pub fn split(&self) -> Vec<Image<Gray, D>> {
        let size = self.roi().size();
        let mut planes: Vec<Vec<D>> = (0..C::CHANNELS)
            .map(|_| Vec::with_capacity(size.area()))
            .collect();
        for px in self.pixels() {
            for (plane, &v) in planes.iter_mut().zip(px) {
                plane.push(v);
            }
        }
        planes
            .into_iter()
            .map(|plane| Image::from_parts(size, plane))
            .collect()
    }
}

impl<C: ColorType, D: Depth> Image<C, D> {
    /// See [`ImageView::split`].
    pub fn split(&self) -> Vec<Image<Gray, D>> {
        self.view().split()
    }

    /// Interleave `C::CHANNELS` single-channel images (their ROIs) into one image.
    pub fn from_channels(channels: &[Image<Gray, D>]) -> Result<Self, ImageError> {
        if channels.len() != C::CHANNELS {
            return Err(ImageError::ChannelCount {
                expected: C::CHANNELS,
                actual: channels.len(),
            });
        }
        let views: Vec<ImageView<'_, Gray, D>> = channels.iter().map(Image::view).collect();
        let size: Size = views[0].roi().size();
        if let Some(bad) = views.iter().find(|v| v.roi().size() != size) {
            return Err(ImageError::ShapeMismatch {
                expected: size,
                actual: bad.roi().size(),
            });
        }

        let mut out = Image::<C, D>::new(size.width, size.height)?;
        for (c, view) in views.iter().enumerate() {
            let dst = out.data_mut().chunks_exact_mut(C::CHANNELS);
            for (px, v) in dst.zip(view.elements()) {
                px[c] = v;
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Bgr, Bgra, Gray, Image, ImageError, Rect};

    fn patterned() -> Image<Bgr, u8> {
        let data = (0..7 * 5 * 3).map(|i| (i * 37 % 251) as u8).collect();
        Image::from_vec(7, 5, data).expect("valid buffer")
    }

    #[test]
    fn split_merge_is_identity() {
        let img = patterned();
        let channels = img.split();
        assert_eq!(channels.len(), 3);
        assert_eq!(channels[2].get(1, 0).expect("in range").intensity, f64::from(img[(1, 0)][2]));

        let merged = Image::<Bgr, u8>::from_channels(&channels).expect("matching planes");
        assert_eq!(merged, img);
    }

    #[test]
    fn split_does_not_alias_source() {
        let mut img = patterned();
        let channels = img.split();
        img.set_value(Bgr::new(0.0, 0.0, 0.0));
        assert_ne!(channels[0].data()[1], 0);
    }

    #[test]
    fn split_respects_roi() {
        let mut img = patterned();
        img.set_roi(Some(Rect::new(2, 1, 3, 2))).expect("roi fits");
        let channels = img.split();
        assert_eq!(channels[1].width(), 3);
        assert_eq!(channels[1].height(), 2);
        assert_eq!(channels[1][(0, 0)][0], img[(0, 0)][1]);
    }

    #[test]
    fn merge_validates_inputs() {
        let a = Image::<Gray, u8>::new(4, 4).expect("valid size");
        let b = Image::<Gray, u8>::new(4, 5).expect("valid size");
        assert_eq!(
            Image::<Bgr, u8>::from_channels(&[a.clone(), a.clone()]).unwrap_err(),
            ImageError::ChannelCount {
                expected: 3,
                actual: 2
            }
        );
        assert!(matches!(
            Image::<Bgr, u8>::from_channels(&[a.clone(), b, a.clone()]),
            Err(ImageError::ShapeMismatch { .. })
        ));
        let bgra = Image::<Bgra, u8>::from_channels(&[a.clone(), a.clone(), a.clone(), a])
            .expect("four planes");
        assert_eq!(bgra.channels(), 4);
    }
}
