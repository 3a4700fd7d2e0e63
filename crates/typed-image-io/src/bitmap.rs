//! Interop with the `image` crate.
//!
//! Typed images keep color channels in blue-green-red order while `image`
//! buffers are red-green-blue, so conversions swap the first and third
//! channel of every 3- and 4-channel pixel.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageBuffer, ImageFormat, Luma, Rgb, Rgba};
use typed_image_core::{Bgr, Bgra, ColorType, Depth, Gray, Image};

use crate::CodecError;

/// Layouts that have a lossless `image::DynamicImage` counterpart.
pub trait Bitmap: Sized {
    /// Copy the ROI into a `DynamicImage`.
    fn to_dynamic(&self) -> Result<DynamicImage, CodecError>;

    /// Convert any decoded bitmap into this layout. Sources with a different
    /// channel count or depth are converted by the `image` crate first.
    fn from_dynamic(img: &DynamicImage) -> Result<Self, CodecError>;
}

fn swap_red_blue<T>(data: &mut [T], channels: usize) {
    if channels >= 3 {
        for px in data.chunks_exact_mut(channels) {
            px.swap(0, 2);
        }
    }
}

fn bitmap_dims<C: ColorType, D: Depth>(img: &Image<C, D>) -> Result<(u32, u32), CodecError> {
    let roi = img.roi();
    match (u32::try_from(roi.width), u32::try_from(roi.height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(CodecError::SerializationFailure(format!(
            "{} image is too large for a bitmap",
            roi.size()
        ))),
    }
}

fn roi_elements<C: ColorType, D: Depth>(img: &Image<C, D>) -> Vec<D> {
    img.rows().flat_map(|row| row.iter().copied()).collect()
}

macro_rules! bitmap_layout {
    ($color:ty, $depth:ty, $pixel:ident, $variant:ident, $to_buffer:ident) => {
        impl Bitmap for Image<$color, $depth> {
            fn to_dynamic(&self) -> Result<DynamicImage, CodecError> {
                let (width, height) = bitmap_dims(self)?;
                let mut data = roi_elements(self);
                swap_red_blue(&mut data, <$color>::CHANNELS);
                let buffer =
                    ImageBuffer::<$pixel<$depth>, Vec<$depth>>::from_raw(width, height, data)
                        .ok_or_else(|| {
                            CodecError::SerializationFailure("bitmap buffer length mismatch".into())
                        })?;
                Ok(DynamicImage::$variant(buffer))
            }

            fn from_dynamic(img: &DynamicImage) -> Result<Self, CodecError> {
                let buffer = img.$to_buffer();
                let (width, height) = (buffer.width() as usize, buffer.height() as usize);
                let mut data = buffer.into_raw();
                if width == 0 || height == 0 {
                    return Err(CodecError::corrupt(format!(
                        "bitmap has empty extent {width}x{height}"
                    )));
                }
                swap_red_blue(&mut data, <$color>::CHANNELS);
                Image::from_vec(width, height, data).map_err(|e| CodecError::corrupt(e.to_string()))
            }
        }
    };
}

bitmap_layout!(Gray, u8, Luma, ImageLuma8, to_luma8);
bitmap_layout!(Gray, u16, Luma, ImageLuma16, to_luma16);
bitmap_layout!(Bgr, u8, Rgb, ImageRgb8, to_rgb8);
bitmap_layout!(Bgra, u8, Rgba, ImageRgba8, to_rgba8);
bitmap_layout!(Bgr, u16, Rgb, ImageRgb16, to_rgb16);
bitmap_layout!(Bgr, f32, Rgb, ImageRgb32F, to_rgb32f);
bitmap_layout!(Bgra, f32, Rgba, ImageRgba32F, to_rgba32f);

/// PNG-encode the ROI. Float layouts have no PNG representation.
pub fn encode_png<C: ColorType, D: Depth>(img: &Image<C, D>) -> Result<Vec<u8>, CodecError>
where
    Image<C, D>: Bitmap,
{
    if D::TAG.is_float() {
        return Err(CodecError::UnsupportedLayout {
            color: C::TAG,
            depth: D::TAG,
            format: "png",
        });
    }
    let mut out = Cursor::new(Vec::new());
    img.to_dynamic()?.write_to(&mut out, ImageFormat::Png)?;
    log::debug!(
        "png-encoded {} image, {} bytes",
        img.roi().size(),
        out.get_ref().len()
    );
    Ok(out.into_inner())
}

pub fn decode_png<C: ColorType, D: Depth>(bytes: &[u8]) -> Result<Image<C, D>, CodecError>
where
    Image<C, D>: Bitmap,
{
    let dynamic = image::load_from_memory_with_format(bytes, ImageFormat::Png)?;
    <Image<C, D> as Bitmap>::from_dynamic(&dynamic)
}

/// Save the ROI; the file format follows the path's extension.
pub fn save_bitmap<C: ColorType, D: Depth>(
    path: impl AsRef<Path>,
    img: &Image<C, D>,
) -> Result<(), CodecError>
where
    Image<C, D>: Bitmap,
{
    img.to_dynamic()?.save(path)?;
    Ok(())
}

pub fn open_bitmap<C: ColorType, D: Depth>(
    path: impl AsRef<Path>,
) -> Result<Image<C, D>, CodecError>
where
    Image<C, D>: Bitmap,
{
    let dynamic = image::open(path)?;
    <Image<C, D> as Bitmap>::from_dynamic(&dynamic)
}
