//! Typed multi-channel image container.
//!
//! [`Image<C, D>`] stores a dense row-major grid of pixels whose channel
//! layout `C` (e.g. [`Gray`], [`Bgr`]) and element type `D` (e.g. `u8`,
//! `f32`) are fixed at compile time. On top of the container sit generic
//! pixel operators that take plain closures:
//!
//! - [`Image::convert`] / [`Image::map_pixels`]: unary maps,
//! - [`Image::combine`] / [`Image::combine3`]: elementwise zips,
//! - [`Image::reduce`] / [`Image::action`]: folds and visits,
//! - [`Image::split`] / [`Image::from_channels`]: channel (de)interleaving,
//! - [`Image::sample`]: Bresenham line profiles.
//!
//! ## Regions of interest
//!
//! An image may carry a ROI. Indexing and every operator are relative to it,
//! while `width()`/`height()` keep reporting the full extents. Operators
//! produce compact images the size of the ROI.
//!
//! ```
//! use typed_image_core::{Gray, Image, Rect};
//!
//! # fn main() -> Result<(), typed_image_core::ImageError> {
//! let mut img = Image::<Gray, f32>::new(50, 20)?;
//! img.set_roi(Some(Rect::new(10, 1, 40, 18)))?;
//! img.set_value(Gray::new(5.0));
//! let doubled = img.convert(|v| v * 2.0);
//! assert_eq!(doubled.width(), 40);
//! assert_eq!(img.width(), 50);
//! # Ok(())
//! # }
//! ```

mod channels;
mod color;
mod depth;
mod document;
mod error;
mod generic;
mod geom;
mod image;
mod logger;
mod sample;

pub use color::{Bgr, Bgra, ColorTag, ColorType, Gray, Hsv, Lab, Scalar, Xyz};
pub use depth::{Depth, DepthTag};
pub use document::{DocumentHeader, DOCUMENT_VERSION};
pub use error::ImageError;
pub use geom::{LineSegment, LineWalk, Rect, Size};
pub use image::{Image, ImageView};
pub use sample::LineProfile;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
