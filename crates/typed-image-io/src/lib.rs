//! Codecs for `typed-image-core` images.
//!
//! - [`binary`]: a compact versioned schema (`TIMG` magic, tags, extents,
//!   raw little-endian elements),
//! - [`json`]: the serde document of [`typed_image_core::Image`],
//! - [`bitmap`]: conversion to and from `image::DynamicImage`, PNG helpers,
//! - [`AnyImage`]: a runtime-typed wrapper that picks the concrete layout
//!   from a file header or extension,
//! - [`SynthConfig`]: JSON job description for synthetic test images.
//!
//! ```
//! use typed_image_core::{Bgr, Image};
//! use typed_image_io::{decode_binary, encode_binary};
//!
//! # fn main() -> Result<(), typed_image_io::CodecError> {
//! let img = Image::<Bgr, u8>::filled(4, 3, Bgr::new(1.0, 2.0, 3.0))?;
//! let bytes = encode_binary(&img)?;
//! let back: Image<Bgr, u8> = decode_binary(&bytes)?;
//! assert_eq!(back, img);
//! # Ok(())
//! # }
//! ```

mod any;
pub mod binary;
pub mod bitmap;
mod config;
mod error;
pub mod json;

pub use any::{AnyImage, FileFormat, IntoAny};
pub use binary::{decode_binary, encode_binary, read_header, BinaryHeader};
pub use bitmap::{decode_png, encode_png, open_bitmap, save_bitmap, Bitmap};
pub use config::{FillSpec, SynthConfig};
pub use error::CodecError;
pub use json::{from_json, load_json, to_json, write_json};
