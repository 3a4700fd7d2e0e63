//! Owned images and borrowed views.
//!
//! Both types store pixels row-major with interleaved channels, so the
//! element stride of a row is `width * C::CHANNELS`. A region of interest
//! (ROI) restricts indexing and every pixel operator to a sub-rectangle while
//! the buffer itself stays shared. `width()`/`height()` always report the
//! full extents.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use crate::{ColorType, Depth, ImageError, Rect, Size};

/// Dense image with color layout `C` and element type `D`.
#[derive(Clone)]
pub struct Image<C: ColorType, D: Depth> {
    size: Size,
    roi: Option<Rect>,
    data: Vec<D>,
    color: PhantomData<C>,
}

/// Read-only view over image data owned elsewhere.
#[derive(Clone, Copy)]
pub struct ImageView<'a, C: ColorType, D: Depth> {
    size: Size,
    roi: Rect,
    data: &'a [D],
    color: PhantomData<C>,
}

/// Element count for a `width x height` image with `channels` channels.
///
/// The buffer must also stay within `isize::MAX` bytes, the allocation limit.
pub(crate) fn buffer_len<D: Depth>(
    width: usize,
    height: usize,
    channels: usize,
) -> Result<usize, ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::InvalidDimension { width, height });
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .filter(|n| {
            n.checked_mul(std::mem::size_of::<D>())
                .is_some_and(|bytes| bytes <= isize::MAX as usize)
        })
        .ok_or(ImageError::InvalidDimension { width, height })
}

/// Offset of the first element of pixel `(row, col)` relative to `roi`.
fn pixel_offset(
    size: Size,
    roi: Rect,
    channels: usize,
    row: usize,
    col: usize,
) -> Result<usize, ImageError> {
    if row >= roi.height || col >= roi.width {
        return Err(ImageError::OutOfRange {
            row: row as i64,
            col: col as i64,
            width: roi.width,
            height: roi.height,
        });
    }
    Ok(((roi.y + row) * size.width + roi.x + col) * channels)
}

pub(crate) fn color_of<C: ColorType, D: Depth>(px: &[D]) -> C {
    let mut values = [0.0; 4];
    for (v, d) in values.iter_mut().zip(px) {
        *v = d.to_f64();
    }
    C::from_channels(&values[..C::CHANNELS])
}

pub(crate) fn pixel_of<C: ColorType, D: Depth>(color: &C) -> Vec<D> {
    let s = color.to_scalar();
    s.0[..C::CHANNELS].iter().map(|&v| D::saturate(v)).collect()
}

impl<C: ColorType, D: Depth> Image<C, D> {
    /// Zero-initialized image.
    pub fn new(width: usize, height: usize) -> Result<Self, ImageError> {
        let len = buffer_len::<D>(width, height, C::CHANNELS)?;
        log::debug!(
            "allocating {width}x{height} {}/{} image ({len} elements)",
            C::TAG,
            D::TAG
        );
        Ok(Self {
            size: Size::new(width, height),
            roi: None,
            data: vec![D::default(); len],
            color: PhantomData,
        })
    }

    /// Image with every pixel set to `color` (saturated to `D`).
    pub fn filled(width: usize, height: usize, color: C) -> Result<Self, ImageError> {
        let mut img = Self::new(width, height)?;
        img.set_value(color);
        Ok(img)
    }

    /// Take ownership of a flat row-major buffer.
    pub fn from_vec(width: usize, height: usize, data: Vec<D>) -> Result<Self, ImageError> {
        let expected = buffer_len::<D>(width, height, C::CHANNELS)?;
        if data.len() != expected {
            return Err(ImageError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            size: Size::new(width, height),
            roi: None,
            data,
            color: PhantomData,
        })
    }

    /// Copy nested `rows x cols x channels` data, e.g. `[[[255, 0, 0]], [[0, 255, 0]]]`.
    pub fn from_array3<R, P>(rows: &[R]) -> Result<Self, ImageError>
    where
        R: AsRef<[P]>,
        P: AsRef<[D]>,
    {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let len = buffer_len::<D>(width, height, C::CHANNELS)?;

        let mut data = Vec::with_capacity(len);
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return Err(ImageError::ShapeMismatch {
                    expected: Size::new(width, height),
                    actual: Size::new(row.len(), height),
                });
            }
            for px in row {
                let px = px.as_ref();
                if px.len() != C::CHANNELS {
                    return Err(ImageError::ChannelCount {
                        expected: C::CHANNELS,
                        actual: px.len(),
                    });
                }
                data.extend_from_slice(px);
            }
        }
        Self::from_vec(width, height, data)
    }

    /// Internal constructor for buffers whose length is already known to be
    /// `size.area() * C::CHANNELS`.
    pub(crate) fn from_parts(size: Size, data: Vec<D>) -> Self {
        debug_assert_eq!(data.len(), size.area() * C::CHANNELS);
        Self {
            size,
            roi: None,
            data,
            color: PhantomData,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.size.height
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub fn channels(&self) -> usize {
        C::CHANNELS
    }

    /// Elements per row of the full image.
    #[inline]
    pub fn stride(&self) -> usize {
        self.size.width * C::CHANNELS
    }

    /// The whole backing buffer, ignoring the ROI.
    pub fn data(&self) -> &[D] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [D] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<D> {
        self.data
    }

    /// Effective region of interest (the full image when none is set).
    pub fn roi(&self) -> Rect {
        self.roi.unwrap_or(Rect::full(self.size))
    }

    pub fn has_roi(&self) -> bool {
        self.roi.is_some()
    }

    /// Restrict subsequent operations to `roi`, or lift the restriction with `None`.
    pub fn set_roi(&mut self, roi: Option<Rect>) -> Result<(), ImageError> {
        if let Some(r) = roi {
            if !r.fits_in(self.size) {
                return Err(ImageError::InvalidRoi {
                    roi: r,
                    size: self.size,
                });
            }
        }
        self.roi = roi;
        Ok(())
    }

    pub fn reset_roi(&mut self) {
        self.roi = None;
    }

    pub fn view(&self) -> ImageView<'_, C, D> {
        ImageView {
            size: self.size,
            roi: self.roi(),
            data: &self.data,
            color: PhantomData,
        }
    }

    /// Raw channel values of the pixel at `(row, col)` inside the ROI.
    pub fn pixel(&self, row: usize, col: usize) -> Result<&[D], ImageError> {
        let idx = pixel_offset(self.size, self.roi(), C::CHANNELS, row, col)?;
        Ok(&self.data[idx..idx + C::CHANNELS])
    }

    pub fn pixel_mut(&mut self, row: usize, col: usize) -> Result<&mut [D], ImageError> {
        let idx = pixel_offset(self.size, self.roi(), C::CHANNELS, row, col)?;
        Ok(&mut self.data[idx..idx + C::CHANNELS])
    }

    /// Pixel at `(row, col)` inside the ROI as a color value.
    pub fn get(&self, row: usize, col: usize) -> Result<C, ImageError> {
        self.pixel(row, col).map(color_of::<C, D>)
    }

    /// Overwrite the pixel at `(row, col)` inside the ROI.
    pub fn set(&mut self, row: usize, col: usize, color: C) -> Result<(), ImageError> {
        let px = pixel_of::<C, D>(&color);
        self.pixel_mut(row, col)?.copy_from_slice(&px);
        Ok(())
    }

    /// Fill the current ROI with `color`.
    pub fn set_value(&mut self, color: C) {
        let roi = self.roi();
        self.fill_rect(roi, &pixel_of::<C, D>(&color));
    }

    /// Fill `rect` (in full-image coordinates) with `color`, ignoring the ROI.
    pub fn set_value_in(&mut self, color: C, rect: Rect) -> Result<(), ImageError> {
        if !rect.fits_in(self.size) {
            return Err(ImageError::InvalidRoi {
                roi: rect,
                size: self.size,
            });
        }
        self.fill_rect(rect, &pixel_of::<C, D>(&color));
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, px: &[D]) {
        let ch = C::CHANNELS;
        let stride = self.stride();
        for row in self
            .data
            .chunks_exact_mut(stride)
            .skip(rect.y)
            .take(rect.height)
        {
            for dst in row[rect.x * ch..rect.right() * ch].chunks_exact_mut(ch) {
                dst.copy_from_slice(px);
            }
        }
    }

    /// ROI rows, each `roi.width * C::CHANNELS` elements long.
    pub fn rows(&self) -> impl Iterator<Item = &[D]> + '_ {
        self.view().rows()
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [D]> + '_ {
        let roi = self.roi();
        let stride = self.stride();
        let (x0, x1) = (roi.x * C::CHANNELS, roi.right() * C::CHANNELS);
        self.data
            .chunks_exact_mut(stride)
            .skip(roi.y)
            .take(roi.height)
            .map(move |row| &mut row[x0..x1])
    }

    /// Visit every element inside the ROI mutably, row-major.
    pub fn apply<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut D),
    {
        for row in self.rows_mut() {
            row.iter_mut().for_each(&mut f);
        }
    }

    /// Zero-initialized image the size of this image's ROI.
    pub fn new_like<D2: Depth>(&self) -> Image<C, D2> {
        self.view().new_like()
    }

    /// Compact owned copy of the ROI.
    pub fn copy(&self) -> Self {
        self.view().to_image()
    }

    /// Elementwise comparison with an absolute tolerance.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.view().approx_eq(&other.view(), tol)
    }

    /// Drop the pixel buffer now rather than at end of scope.
    pub fn release(self) {
        log::debug!(
            "releasing {} {}/{} image",
            self.size,
            C::TAG,
            D::TAG
        );
    }
}

impl<'a, C: ColorType, D: Depth> ImageView<'a, C, D> {
    /// Borrow a caller-owned flat row-major buffer.
    pub fn from_slice(width: usize, height: usize, data: &'a [D]) -> Result<Self, ImageError> {
        let expected = buffer_len::<D>(width, height, C::CHANNELS)?;
        if data.len() != expected {
            return Err(ImageError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        let size = Size::new(width, height);
        Ok(Self {
            size,
            roi: Rect::full(size),
            data,
            color: PhantomData,
        })
    }

    /// Same buffer, restricted to `roi` (full-image coordinates).
    pub fn with_roi(self, roi: Rect) -> Result<Self, ImageError> {
        if !roi.fits_in(self.size) {
            return Err(ImageError::InvalidRoi {
                roi,
                size: self.size,
            });
        }
        Ok(Self { roi, ..self })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.size.height
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub fn roi(&self) -> Rect {
        self.roi
    }

    #[inline]
    pub fn channels(&self) -> usize {
        C::CHANNELS
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.size.width * C::CHANNELS
    }

    pub fn pixel(&self, row: usize, col: usize) -> Result<&'a [D], ImageError> {
        let idx = pixel_offset(self.size, self.roi, C::CHANNELS, row, col)?;
        Ok(&self.data[idx..idx + C::CHANNELS])
    }

    pub fn get(&self, row: usize, col: usize) -> Result<C, ImageError> {
        self.pixel(row, col).map(color_of::<C, D>)
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a [D]> + 'a {
        let roi = self.roi;
        let (x0, x1) = (roi.x * C::CHANNELS, roi.right() * C::CHANNELS);
        self.data
            .chunks_exact(self.stride())
            .skip(roi.y)
            .take(roi.height)
            .map(move |row| &row[x0..x1])
    }

    /// ROI pixels in row-major order, one slice of channel values each.
    pub fn pixels(&self) -> impl Iterator<Item = &'a [D]> + 'a {
        self.rows().flat_map(|row| row.chunks_exact(C::CHANNELS))
    }

    /// ROI elements in row-major, channel order.
    pub fn elements(&self) -> impl Iterator<Item = D> + 'a {
        self.rows().flat_map(|row| row.iter().copied())
    }

    /// Zero-initialized image the size of the ROI.
    pub fn new_like<D2: Depth>(&self) -> Image<C, D2> {
        let size = self.roi.size();
        Image::from_parts(size, vec![D2::default(); size.area() * C::CHANNELS])
    }

    pub fn to_image(&self) -> Image<C, D> {
        Image::from_parts(self.roi.size(), self.elements().collect())
    }

    pub fn approx_eq(&self, other: &ImageView<'_, C, D>, tol: f64) -> bool {
        self.roi.size() == other.roi.size()
            && self
                .elements()
                .zip(other.elements())
                .all(|(a, b)| (a.to_f64() - b.to_f64()).abs() <= tol)
    }
}

impl<C: ColorType, D: Depth> PartialEq for ImageView<'_, C, D> {
    /// Same ROI extents and bit-identical elements (NaN equals itself).
    fn eq(&self, other: &Self) -> bool {
        self.roi.size() == other.roi.size()
            && self
                .elements()
                .zip(other.elements())
                .all(|(a, b)| a.bits_eq(b))
    }
}

impl<C: ColorType, D: Depth> PartialEq for Image<C, D> {
    fn eq(&self, other: &Self) -> bool {
        self.view() == other.view()
    }
}

/// `img[(row, col)]` yields the channel values of a pixel inside the ROI.
///
/// Panics when out of range; use [`Image::pixel`] for a checked lookup.
impl<C: ColorType, D: Depth> Index<(usize, usize)> for Image<C, D> {
    type Output = [D];

    fn index(&self, (row, col): (usize, usize)) -> &[D] {
        match self.pixel(row, col) {
            Ok(px) => px,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<C: ColorType, D: Depth> IndexMut<(usize, usize)> for Image<C, D> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut [D] {
        match self.pixel_mut(row, col) {
            Ok(px) => px,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<C: ColorType, D: Depth> fmt::Debug for Image<C, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("color", &C::TAG)
            .field("depth", &D::TAG)
            .field("size", &self.size)
            .field("roi", &self.roi)
            .finish_non_exhaustive()
    }
}

impl<C: ColorType, D: Depth> fmt::Debug for ImageView<'_, C, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageView")
            .field("color", &C::TAG)
            .field("depth", &D::TAG)
            .field("size", &self.size)
            .field("roi", &self.roi)
            .finish_non_exhaustive()
    }
}
