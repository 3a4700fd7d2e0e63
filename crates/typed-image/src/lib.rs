//! High-level facade crate for the `typed-image-*` workspace.
//!
//! This crate re-exports:
//! - [`core`]: the typed [`Image`] container, ROI handling and the generic
//!   closure-based operators (`convert`, `combine`, `combine3`, `reduce`,
//!   `action`, `split`, `sample`),
//! - [`arith`]: saturating arithmetic fast paths through [`ImageArith`],
//! - [`io`]: binary, JSON and bitmap codecs plus the runtime-typed
//!   [`AnyImage`].
//!
//! With the default `cli` feature it also builds the `typed-image` binary
//! (`synth`, `info`, `convert`).
//!
//! ## Quickstart
//!
//! ```
//! use typed_image::{Bgr, Gray, Image, ImageArith};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = Image::<Bgr, u8>::filled(320, 240, Bgr::new(10.0, 20.0, 30.0))?;
//! let planes = img.split();
//! let brighter = planes[2].add(&planes[1])?;
//! assert_eq!(brighter.get(0, 0)?, Gray::new(50.0));
//!
//! let bytes = typed_image::io::encode_binary(&img)?;
//! let back: Image<Bgr, u8> = typed_image::io::decode_binary(&bytes)?;
//! assert_eq!(back, img);
//! # Ok(())
//! # }
//! ```

pub use typed_image_arith as arith;
pub use typed_image_core as core;
pub use typed_image_io as io;

pub use typed_image_arith::ImageArith;
pub use typed_image_core::{
    Bgr, Bgra, ColorTag, ColorType, Depth, DepthTag, Gray, Image, ImageError, ImageView,
    LineSegment, Rect, Scalar, Size,
};
pub use typed_image_io::{AnyImage, CodecError, SynthConfig};
