//! Color layouts: compile-time channel counts plus f64 pixel values.
//!
//! A color type plays two roles. As a type parameter of [`crate::Image`] it
//! fixes the channel count and channel order of the buffer. As a value it is
//! a pixel read from or written to an image, one `f64` per channel.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// Up to four channel values, the common currency of fills and per-channel
/// reductions. Unused trailing channels are zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scalar(pub [f64; 4]);

impl Scalar {
    pub const fn new(v0: f64, v1: f64, v2: f64, v3: f64) -> Self {
        Self([v0, v1, v2, v3])
    }

    /// Same value in every channel.
    pub const fn all(v: f64) -> Self {
        Self([v; 4])
    }

    pub fn from_slice(values: &[f64]) -> Self {
        let mut out = [0.0; 4];
        for (dst, src) in out.iter_mut().zip(values) {
            *dst = *src;
        }
        Self(out)
    }
}

impl Index<usize> for Scalar {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

impl IndexMut<usize> for Scalar {
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        &mut self.0[i]
    }
}

/// Runtime tag for a color layout; stored in serialized images.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTag {
    Gray,
    Bgr,
    Bgra,
    Hsv,
    Xyz,
    Lab,
}

impl ColorTag {
    pub const ALL: [ColorTag; 6] = [
        ColorTag::Gray,
        ColorTag::Bgr,
        ColorTag::Bgra,
        ColorTag::Hsv,
        ColorTag::Xyz,
        ColorTag::Lab,
    ];

    pub fn channels(self) -> usize {
        match self {
            ColorTag::Gray => 1,
            ColorTag::Bgr | ColorTag::Hsv | ColorTag::Xyz | ColorTag::Lab => 3,
            ColorTag::Bgra => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorTag::Gray => "gray",
            ColorTag::Bgr => "bgr",
            ColorTag::Bgra => "bgra",
            ColorTag::Hsv => "hsv",
            ColorTag::Xyz => "xyz",
            ColorTag::Lab => "lab",
        }
    }

    /// Stable on-disk code.
    pub fn code(self) -> u8 {
        match self {
            ColorTag::Gray => 0,
            ColorTag::Bgr => 1,
            ColorTag::Bgra => 2,
            ColorTag::Hsv => 3,
            ColorTag::Xyz => 4,
            ColorTag::Lab => 5,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }
}

impl fmt::Display for ColorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A color layout with a fixed number of channels.
pub trait ColorType: Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    const CHANNELS: usize;
    const TAG: ColorTag;

    /// Build a color from per-channel values; missing channels read as 0.
    fn from_channels(values: &[f64]) -> Self;

    /// Channel values in buffer order, padded with zeros.
    fn to_scalar(&self) -> Scalar;

    fn from_scalar(s: Scalar) -> Self {
        Self::from_channels(&s.0[..Self::CHANNELS])
    }
}

macro_rules! color_type {
    ($(#[$meta:meta])* $name:ident, $tag:expr, [$($field:ident),+]) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            $(pub $field: f64,)+
        }

        impl $name {
            pub const fn new($($field: f64),+) -> Self {
                Self { $($field),+ }
            }
        }

        impl ColorType for $name {
            const CHANNELS: usize = [$(stringify!($field)),+].len();
            const TAG: ColorTag = $tag;

            fn from_channels(values: &[f64]) -> Self {
                let mut it = values.iter().copied();
                Self {
                    $($field: it.next().unwrap_or(0.0),)+
                }
            }

            fn to_scalar(&self) -> Scalar {
                Scalar::from_slice(&[$(self.$field),+])
            }
        }
    };
}

color_type!(
    /// Single-channel intensity.
    Gray, ColorTag::Gray, [intensity]
);
color_type!(
    /// Blue, green, red; the default 3-channel layout.
    Bgr, ColorTag::Bgr, [blue, green, red]
);
color_type!(
    /// Blue, green, red, alpha.
    Bgra, ColorTag::Bgra, [blue, green, red, alpha]
);
color_type!(Hsv, ColorTag::Hsv, [hue, saturation, value]);
color_type!(Xyz, ColorTag::Xyz, [x, y, z]);
color_type!(Lab, ColorTag::Lab, [l, a, b]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_counts_match_tags() {
        assert_eq!(Gray::CHANNELS, 1);
        assert_eq!(Bgr::CHANNELS, 3);
        assert_eq!(Bgra::CHANNELS, 4);
        assert_eq!(Lab::CHANNELS, 3);
        assert_eq!(Bgr::TAG.channels(), Bgr::CHANNELS);
        for tag in ColorTag::ALL {
            assert_eq!(ColorTag::from_code(tag.code()), Some(tag));
        }
    }

    #[test]
    fn scalar_conversions_keep_channel_order() {
        let c = Bgr::new(8.0, 1.0, 2.0);
        assert_eq!(c.to_scalar(), Scalar::new(8.0, 1.0, 2.0, 0.0));
        assert_eq!(Bgr::from_scalar(Scalar::new(8.0, 1.0, 2.0, 9.0)), c);
        assert_eq!(Bgra::from_channels(&[1.0, 2.0]), Bgra::new(1.0, 2.0, 0.0, 0.0));
        assert_eq!(Gray::from_scalar(Scalar::all(5.0)).intensity, 5.0);
    }
}
