//! Serde representation of an image.
//!
//! Images serialize as a flat document carrying a schema version, the color
//! and depth tags, the ROI extents and the ROI elements row-major:
//!
//! ```json
//! { "version": 1, "color": "bgr", "depth": "u8", "width": 2, "height": 1,
//!   "data": [255, 0, 0, 0, 255, 0] }
//! ```
//!
//! Deserialization checks the tags against the target type, so a document
//! written for `Image<Bgr, u8>` cannot be read back as `Image<Gray, f32>`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{ColorTag, ColorType, Depth, DepthTag, Image};

/// Current document schema version.
pub const DOCUMENT_VERSION: u32 = 1;

/// Metadata fields of a serialized image, readable without knowing its type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentHeader {
    pub version: u32,
    pub color: ColorTag,
    pub depth: DepthTag,
    pub width: usize,
    pub height: usize,
}

#[derive(Serialize)]
struct DocumentRef<'a, D: Serialize> {
    version: u32,
    color: ColorTag,
    depth: DepthTag,
    width: usize,
    height: usize,
    data: &'a [D],
}

#[derive(Deserialize)]
struct DocumentOwned<D> {
    version: u32,
    color: ColorTag,
    depth: DepthTag,
    width: usize,
    height: usize,
    data: Vec<D>,
}

impl<C: ColorType, D: Depth> Image<C, D> {
    /// Header describing this image's serialized form.
    pub fn document_header(&self) -> DocumentHeader {
        let roi = self.roi();
        DocumentHeader {
            version: DOCUMENT_VERSION,
            color: C::TAG,
            depth: D::TAG,
            width: roi.width,
            height: roi.height,
        }
    }
}

impl<C: ColorType, D: Depth> Serialize for Image<C, D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let compact;
        let data = if self.has_roi() {
            compact = self.copy();
            compact.data()
        } else {
            self.data()
        };
        let h = self.document_header();
        DocumentRef {
            version: h.version,
            color: h.color,
            depth: h.depth,
            width: h.width,
            height: h.height,
            data,
        }
        .serialize(serializer)
    }
}

impl<'de, C: ColorType, D: Depth> Deserialize<'de> for Image<C, D> {
    fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
        let h = DocumentOwned::<D>::deserialize(deserializer)?;
        if h.version != DOCUMENT_VERSION {
            return Err(De::Error::custom(format!(
                "unsupported image document version {} (expected {DOCUMENT_VERSION})",
                h.version
            )));
        }
        if h.color != C::TAG || h.depth != D::TAG {
            return Err(De::Error::custom(format!(
                "image document is {}/{}, expected {}/{}",
                h.color,
                h.depth,
                C::TAG,
                D::TAG
            )));
        }
        Image::from_vec(h.width, h.height, h.data).map_err(De::Error::custom)
    }
}
