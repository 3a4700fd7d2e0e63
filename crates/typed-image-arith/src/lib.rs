//! Hand-written elementwise kernels for `typed-image-core` images.
//!
//! The generic operators in the core crate take closures and cover anything.
//! This crate adds the common arithmetic as named methods on
//! [`typed_image_core::Image`] through the [`ImageArith`] extension trait.
//! Integer results saturate; float results match native arithmetic.
//!
//! ```
//! use typed_image_arith::ImageArith;
//! use typed_image_core::{Gray, Image};
//!
//! # fn main() -> Result<(), typed_image_core::ImageError> {
//! let a = Image::<Gray, u8>::filled(4, 4, Gray::new(200.0))?;
//! let b = a.add(&a)?;
//! assert_eq!(b.get(0, 0)?, Gray::new(255.0));
//! # Ok(())
//! # }
//! ```

pub mod kernels;
mod ops;
pub mod random;

pub use ops::ImageArith;
