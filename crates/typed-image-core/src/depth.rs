//! Per-channel element types ("depths").

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Runtime tag for an element type; stored in serialized images.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthTag {
    U8,
    I8,
    U16,
    I16,
    I32,
    F32,
    F64,
}

impl DepthTag {
    pub const ALL: [DepthTag; 7] = [
        DepthTag::U8,
        DepthTag::I8,
        DepthTag::U16,
        DepthTag::I16,
        DepthTag::I32,
        DepthTag::F32,
        DepthTag::F64,
    ];

    /// Size of one element in bytes.
    pub fn size(self) -> usize {
        match self {
            DepthTag::U8 | DepthTag::I8 => 1,
            DepthTag::U16 | DepthTag::I16 => 2,
            DepthTag::I32 | DepthTag::F32 => 4,
            DepthTag::F64 => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DepthTag::U8 => "u8",
            DepthTag::I8 => "i8",
            DepthTag::U16 => "u16",
            DepthTag::I16 => "i16",
            DepthTag::I32 => "i32",
            DepthTag::F32 => "f32",
            DepthTag::F64 => "f64",
        }
    }

    /// Stable on-disk code.
    pub fn code(self) -> u8 {
        match self {
            DepthTag::U8 => 0,
            DepthTag::I8 => 1,
            DepthTag::U16 => 2,
            DepthTag::I16 => 3,
            DepthTag::I32 => 4,
            DepthTag::F32 => 5,
            DepthTag::F64 => 6,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    pub fn is_float(self) -> bool {
        matches!(self, DepthTag::F32 | DepthTag::F64)
    }
}

impl fmt::Display for DepthTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Element type of an image channel.
///
/// Conversions from `f64` saturate: integer depths round half to even and
/// clamp to their range (NaN becomes 0), float depths use a plain cast.
pub trait Depth:
    Copy
    + Default
    + PartialEq
    + PartialOrd
    + fmt::Debug
    + Send
    + Sync
    + Serialize
    + DeserializeOwned
    + 'static
{
    const TAG: DepthTag;

    fn to_f64(self) -> f64;

    fn saturate(value: f64) -> Self;

    /// Bitwise complement of the element's representation.
    fn not_bits(self) -> Self;

    /// Exact equality of the stored representation.
    fn bits_eq(self, other: Self) -> bool;

    /// Append the little-endian encoding to `out`.
    fn write_le(self, out: &mut Vec<u8>);

    /// Decode from exactly `Self::TAG.size()` little-endian bytes.
    fn read_le(bytes: &[u8]) -> Option<Self>;
}

macro_rules! int_depth {
    ($t:ty, $tag:expr) => {
        impl Depth for $t {
            const TAG: DepthTag = $tag;

            #[inline]
            fn to_f64(self) -> f64 {
                f64::from(self)
            }

            #[inline]
            fn saturate(value: f64) -> Self {
                // `as` saturates out-of-range values and maps NaN to 0.
                value.round_ties_even() as $t
            }

            #[inline]
            fn not_bits(self) -> Self {
                !self
            }

            #[inline]
            fn bits_eq(self, other: Self) -> bool {
                self == other
            }

            fn write_le(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            fn read_le(bytes: &[u8]) -> Option<Self> {
                Some(<$t>::from_le_bytes(bytes.try_into().ok()?))
            }
        }
    };
}

int_depth!(u8, DepthTag::U8);
int_depth!(i8, DepthTag::I8);
int_depth!(u16, DepthTag::U16);
int_depth!(i16, DepthTag::I16);
int_depth!(i32, DepthTag::I32);

impl Depth for f32 {
    const TAG: DepthTag = DepthTag::F32;

    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    fn saturate(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn not_bits(self) -> Self {
        f32::from_bits(!self.to_bits())
    }

    #[inline]
    fn bits_eq(self, other: Self) -> bool {
        self.to_bits() == other.to_bits()
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn read_le(bytes: &[u8]) -> Option<Self> {
        Some(f32::from_le_bytes(bytes.try_into().ok()?))
    }
}

impl Depth for f64 {
    const TAG: DepthTag = DepthTag::F64;

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn saturate(value: f64) -> Self {
        value
    }

    #[inline]
    fn not_bits(self) -> Self {
        f64::from_bits(!self.to_bits())
    }

    #[inline]
    fn bits_eq(self, other: Self) -> bool {
        self.to_bits() == other.to_bits()
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn read_le(bytes: &[u8]) -> Option<Self> {
        Some(f64::from_le_bytes(bytes.try_into().ok()?))
    }
}
