//! Runtime-typed images for code that learns the layout from a file.

use std::fmt;
use std::fs;
use std::path::Path;

use image::DynamicImage;
use rand::Rng;
use typed_image_arith::ImageArith;
use typed_image_core::{
    Bgr, Bgra, ColorTag, ColorType, Depth, DepthTag, Gray, Image, Scalar, Size,
};

use crate::{binary, json, Bitmap, CodecError};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// On-disk formats, chosen by file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    /// `.timg`: the binary schema.
    Binary,
    /// `.json`: the serde document.
    Json,
    /// `.png`, `.bmp`, `.tif`, ...: anything the `image` crate handles.
    Bitmap,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self, CodecError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| CodecError::UnknownFormat(path.display().to_string()))?;
        match ext.as_str() {
            "timg" => Ok(FileFormat::Binary),
            "json" => Ok(FileFormat::Json),
            _ if image::ImageFormat::from_extension(&ext).is_some() => Ok(FileFormat::Bitmap),
            _ => Err(CodecError::UnknownFormat(path.display().to_string())),
        }
    }
}

/// One of the layouts the codecs and the command line know about.
#[derive(Clone, Debug, PartialEq)]
pub enum AnyImage {
    GrayU8(Image<Gray, u8>),
    GrayU16(Image<Gray, u16>),
    GrayF32(Image<Gray, f32>),
    GrayF64(Image<Gray, f64>),
    BgrU8(Image<Bgr, u8>),
    BgrU16(Image<Bgr, u16>),
    BgrF32(Image<Bgr, f32>),
    BgraU8(Image<Bgra, u8>),
    BgraF32(Image<Bgra, f32>),
}

macro_rules! dispatch {
    ($value:expr, $img:ident => $body:expr) => {
        match $value {
            AnyImage::GrayU8($img) => $body,
            AnyImage::GrayU16($img) => $body,
            AnyImage::GrayF32($img) => $body,
            AnyImage::GrayF64($img) => $body,
            AnyImage::BgrU8($img) => $body,
            AnyImage::BgrU16($img) => $body,
            AnyImage::BgrF32($img) => $body,
            AnyImage::BgraU8($img) => $body,
            AnyImage::BgraF32($img) => $body,
        }
    };
}

/// Match a `(ColorTag, DepthTag)` pair to a variant, evaluating `$make` with
/// the concrete color and depth types bound to `$c` and `$d`.
macro_rules! by_layout {
    ($color:expr, $depth:expr, $format:expr, |$c:ident, $d:ident| $make:expr) => {
        match ($color, $depth) {
            (ColorTag::Gray, DepthTag::U8) => {
                type $c = Gray;
                type $d = u8;
                AnyImage::GrayU8($make)
            }
            (ColorTag::Gray, DepthTag::U16) => {
                type $c = Gray;
                type $d = u16;
                AnyImage::GrayU16($make)
            }
            (ColorTag::Gray, DepthTag::F32) => {
                type $c = Gray;
                type $d = f32;
                AnyImage::GrayF32($make)
            }
            (ColorTag::Gray, DepthTag::F64) => {
                type $c = Gray;
                type $d = f64;
                AnyImage::GrayF64($make)
            }
            (ColorTag::Bgr, DepthTag::U8) => {
                type $c = Bgr;
                type $d = u8;
                AnyImage::BgrU8($make)
            }
            (ColorTag::Bgr, DepthTag::U16) => {
                type $c = Bgr;
                type $d = u16;
                AnyImage::BgrU16($make)
            }
            (ColorTag::Bgr, DepthTag::F32) => {
                type $c = Bgr;
                type $d = f32;
                AnyImage::BgrF32($make)
            }
            (ColorTag::Bgra, DepthTag::U8) => {
                type $c = Bgra;
                type $d = u8;
                AnyImage::BgraU8($make)
            }
            (ColorTag::Bgra, DepthTag::F32) => {
                type $c = Bgra;
                type $d = f32;
                AnyImage::BgraF32($make)
            }
            (color, depth) => {
                return Err(CodecError::UnsupportedLayout {
                    color,
                    depth,
                    format: $format,
                })
            }
        }
    };
}

impl AnyImage {
    /// Zero-filled image of the requested layout.
    pub fn new(
        color: ColorTag,
        depth: DepthTag,
        width: usize,
        height: usize,
    ) -> Result<Self, CodecError> {
        Ok(by_layout!(color, depth, "runtime", |C, D| Image::<C, D>::new(
            width, height
        )?))
    }

    pub fn color(&self) -> ColorTag {
        dispatch!(self, img => img.document_header().color)
    }

    pub fn depth(&self) -> DepthTag {
        dispatch!(self, img => img.document_header().depth)
    }

    /// Full extents of the underlying buffer.
    pub fn size(&self) -> Size {
        dispatch!(self, img => img.size())
    }

    /// Per-channel sum of the ROI.
    pub fn sum(&self) -> Scalar {
        dispatch!(self, img => img.sum().to_scalar())
    }

    /// Per-channel minimum and maximum of the ROI.
    pub fn min_max(&self) -> (Scalar, Scalar) {
        dispatch!(self, img => channel_extrema(img))
    }

    pub fn set_value(&mut self, value: Scalar) {
        dispatch!(self, img => img.set_value(ColorType::from_scalar(value)))
    }

    pub fn rand_uniform<R: Rng + ?Sized>(&mut self, rng: &mut R, low: Scalar, high: Scalar) {
        dispatch!(self, img => img.rand_uniform(rng, low, high))
    }

    pub fn rand_normal<R: Rng + ?Sized>(&mut self, rng: &mut R, mean: Scalar, std_dev: Scalar) {
        dispatch!(self, img => img.rand_normal(rng, mean, std_dev))
    }

    /// Saturating depth conversion keeping the color layout.
    pub fn convert_depth(&self, depth: DepthTag) -> Result<Self, CodecError> {
        let color = self.color();
        dispatch!(self, img => {
            Ok(by_layout!(color, depth, "runtime", |C, D| relayout::<_, _, C, D>(img)))
        })
    }

    pub fn encode_binary(&self) -> Result<Vec<u8>, CodecError> {
        dispatch!(self, img => binary::encode_binary(img))
    }

    /// Decode a binary image of any supported layout.
    pub fn decode_binary(bytes: &[u8]) -> Result<Self, CodecError> {
        let header = binary::read_header(bytes)?;
        Ok(by_layout!(header.color, header.depth, "binary", |C, D| {
            binary::decode_binary::<C, D>(bytes)?
        }))
    }

    pub fn to_json(&self) -> Result<String, CodecError> {
        dispatch!(self, img => json::to_json(img))
    }

    pub fn from_json(text: &str) -> Result<Self, CodecError> {
        let header = json::read_json_header(text)?;
        Ok(by_layout!(header.color, header.depth, "json", |C, D| {
            json::from_json::<C, D>(text)?
        }))
    }

    pub fn to_dynamic(&self) -> Result<DynamicImage, CodecError> {
        match self {
            AnyImage::GrayU8(img) => img.to_dynamic(),
            AnyImage::GrayU16(img) => img.to_dynamic(),
            AnyImage::BgrU8(img) => img.to_dynamic(),
            AnyImage::BgrU16(img) => img.to_dynamic(),
            AnyImage::BgrF32(img) => img.to_dynamic(),
            AnyImage::BgraU8(img) => img.to_dynamic(),
            AnyImage::BgraF32(img) => img.to_dynamic(),
            other => Err(CodecError::UnsupportedLayout {
                color: other.color(),
                depth: other.depth(),
                format: "bitmap",
            }),
        }
    }

    /// Pick the layout closest to a decoded bitmap.
    pub fn from_dynamic(img: &DynamicImage) -> Result<Self, CodecError> {
        Ok(match img {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageLumaA8(_) => {
                AnyImage::GrayU8(Bitmap::from_dynamic(img)?)
            }
            DynamicImage::ImageLuma16(_) | DynamicImage::ImageLumaA16(_) => {
                AnyImage::GrayU16(Bitmap::from_dynamic(img)?)
            }
            DynamicImage::ImageRgb8(_) => AnyImage::BgrU8(Bitmap::from_dynamic(img)?),
            DynamicImage::ImageRgb16(_) => AnyImage::BgrU16(Bitmap::from_dynamic(img)?),
            DynamicImage::ImageRgb32F(_) => AnyImage::BgrF32(Bitmap::from_dynamic(img)?),
            DynamicImage::ImageRgba32F(_) => AnyImage::BgraF32(Bitmap::from_dynamic(img)?),
            _ => AnyImage::BgraU8(Bitmap::from_dynamic(img)?),
        })
    }

    /// Read a file, choosing the codec from its extension.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CodecError> {
        let path = path.as_ref();
        log::debug!("opening {}", path.display());
        match FileFormat::from_path(path)? {
            FileFormat::Binary => Self::decode_binary(&fs::read(path)?),
            FileFormat::Json => Self::from_json(&fs::read_to_string(path)?),
            FileFormat::Bitmap => Self::from_dynamic(&image::open(path)?),
        }
    }

    /// Write a file, choosing the codec from its extension.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CodecError> {
        let path = path.as_ref();
        log::debug!("saving {self} to {}", path.display());
        match FileFormat::from_path(path)? {
            FileFormat::Binary => fs::write(path, self.encode_binary()?)?,
            FileFormat::Json => dispatch!(self, img => json::write_json(path, img)?),
            FileFormat::Bitmap => {
                if self.depth().is_float() && is_png(path) {
                    return Err(CodecError::UnsupportedLayout {
                        color: self.color(),
                        depth: self.depth(),
                        format: "png",
                    });
                }
                self.to_dynamic()?.save(path)?
            }
        }
        Ok(())
    }
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

/// Rebuild `img` with layout `C2`/`D2`; callers only pass `C2 == C`, so the
/// channel values carry over and the depth saturates.
fn relayout<C: ColorType, D: Depth, C2: ColorType, D2: Depth>(img: &Image<C, D>) -> Image<C2, D2> {
    img.map_pixels(|px| {
        let mut s = Scalar::default();
        for (c, v) in px.iter().enumerate() {
            s[c] = v.to_f64();
        }
        C2::from_scalar(s)
    })
}

fn channel_extrema<C: ColorType, D: Depth>(img: &Image<C, D>) -> (Scalar, Scalar) {
    let mut lo = Scalar::all(f64::INFINITY);
    let mut hi = Scalar::all(f64::NEG_INFINITY);
    for px in img.view().pixels() {
        for (c, v) in px.iter().enumerate() {
            let v = v.to_f64();
            lo[c] = lo[c].min(v);
            hi[c] = hi[c].max(v);
        }
    }
    (lo, hi)
}

impl fmt::Display for AnyImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.color(), self.depth(), self.size())
    }
}

/// Convert a typed image into its runtime wrapper.
pub trait IntoAny {
    fn into_any(self) -> AnyImage;
}

macro_rules! into_any {
    ($color:ty, $depth:ty, $variant:ident) => {
        impl IntoAny for Image<$color, $depth> {
            fn into_any(self) -> AnyImage {
                AnyImage::$variant(self)
            }
        }
    };
}

into_any!(Gray, u8, GrayU8);
into_any!(Gray, u16, GrayU16);
into_any!(Gray, f32, GrayF32);
into_any!(Gray, f64, GrayF64);
into_any!(Bgr, u8, BgrU8);
into_any!(Bgr, u16, BgrU16);
into_any!(Bgr, f32, BgrF32);
into_any!(Bgra, u8, BgraU8);
into_any!(Bgra, f32, BgraF32);
