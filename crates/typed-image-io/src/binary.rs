//! Compact binary schema.
//!
//! Layout (all integers little-endian):
//!
//! | offset | size | field                          |
//! |--------|------|--------------------------------|
//! | 0      | 4    | magic `TIMG`                   |
//! | 4      | 2    | schema version (`1`)           |
//! | 6      | 1    | color tag code                 |
//! | 7      | 1    | depth tag code                 |
//! | 8      | 4    | width                          |
//! | 12     | 4    | height                         |
//! | 16     | ..   | ROI elements, row-major        |
//!
//! Only the ROI is written, so a decoded image never carries a ROI.

use std::fs;
use std::path::Path;

use typed_image_core::{ColorTag, ColorType, Depth, DepthTag, Image};

use crate::CodecError;

#[cfg(feature = "tracing")]
use tracing::instrument;

pub const MAGIC: [u8; 4] = *b"TIMG";
pub const BINARY_VERSION: u16 = 1;
pub const HEADER_LEN: usize = 16;

/// Fixed-size prefix of a binary image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BinaryHeader {
    pub version: u16,
    pub color: ColorTag,
    pub depth: DepthTag,
    pub width: usize,
    pub height: usize,
}

impl BinaryHeader {
    /// Expected payload length in bytes, `None` on overflow.
    pub fn payload_len(&self) -> Option<usize> {
        self.width
            .checked_mul(self.height)?
            .checked_mul(self.color.channels())?
            .checked_mul(self.depth.size())
    }
}

/// Parse and validate the header at the start of `bytes`.
pub fn read_header(bytes: &[u8]) -> Result<BinaryHeader, CodecError> {
    let (magic, rest) = bytes
        .split_first_chunk::<4>()
        .ok_or_else(|| CodecError::corrupt("buffer shorter than the magic"))?;
    if *magic != MAGIC {
        return Err(CodecError::corrupt(format!("bad magic {magic:02x?}")));
    }
    let (version, rest) = rest
        .split_first_chunk::<2>()
        .ok_or_else(|| CodecError::corrupt("truncated header"))?;
    let version = u16::from_le_bytes(*version);
    if version != BINARY_VERSION {
        return Err(CodecError::corrupt(format!(
            "unsupported schema version {version}"
        )));
    }
    let (tags, rest) = rest
        .split_first_chunk::<2>()
        .ok_or_else(|| CodecError::corrupt("truncated header"))?;
    let color = ColorTag::from_code(tags[0])
        .ok_or_else(|| CodecError::corrupt(format!("unknown color tag {}", tags[0])))?;
    let depth = DepthTag::from_code(tags[1])
        .ok_or_else(|| CodecError::corrupt(format!("unknown depth tag {}", tags[1])))?;
    let (width, rest) = rest
        .split_first_chunk::<4>()
        .ok_or_else(|| CodecError::corrupt("truncated header"))?;
    let (height, _) = rest
        .split_first_chunk::<4>()
        .ok_or_else(|| CodecError::corrupt("truncated header"))?;

    Ok(BinaryHeader {
        version,
        color,
        depth,
        width: u32::from_le_bytes(*width) as usize,
        height: u32::from_le_bytes(*height) as usize,
    })
}

/// Serialize the image's ROI.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
pub fn encode_binary<C: ColorType, D: Depth>(img: &Image<C, D>) -> Result<Vec<u8>, CodecError> {
    let roi = img.roi();
    let to_u32 = |v: usize| {
        u32::try_from(v).map_err(|_| {
            CodecError::SerializationFailure(format!("dimension {v} does not fit the schema"))
        })
    };
    let (width, height) = (to_u32(roi.width)?, to_u32(roi.height)?);

    let payload = roi.size().area() * C::CHANNELS * D::TAG.size();
    let mut out = Vec::with_capacity(HEADER_LEN + payload);
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&BINARY_VERSION.to_le_bytes());
    out.push(C::TAG.code());
    out.push(D::TAG.code());
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    for row in img.rows() {
        for &v in row {
            v.write_le(&mut out);
        }
    }
    log::debug!(
        "encoded {}/{} {} image into {} bytes",
        C::TAG,
        D::TAG,
        roi.size(),
        out.len()
    );
    Ok(out)
}

/// Deserialize an image whose tags must match `C` and `D`.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, fields(len = bytes.len())))]
pub fn decode_binary<C: ColorType, D: Depth>(bytes: &[u8]) -> Result<Image<C, D>, CodecError> {
    let header = read_header(bytes)?;
    if header.color != C::TAG || header.depth != D::TAG {
        return Err(CodecError::corrupt(format!(
            "buffer holds {}/{}, expected {}/{}",
            header.color,
            header.depth,
            C::TAG,
            D::TAG
        )));
    }
    let payload = &bytes[HEADER_LEN..];
    match header.payload_len() {
        Some(n) if n == payload.len() => {}
        _ => {
            return Err(CodecError::corrupt(format!(
                "payload of {} bytes does not match a {}x{} {}/{} image",
                payload.len(),
                header.width,
                header.height,
                header.color,
                header.depth
            )))
        }
    }
    let data = payload
        .chunks_exact(D::TAG.size())
        .map(D::read_le)
        .collect::<Option<Vec<D>>>()
        .ok_or_else(|| CodecError::corrupt("malformed element"))?;
    Image::from_vec(header.width, header.height, data)
        .map_err(|e| CodecError::corrupt(e.to_string()))
}

pub fn write_binary<C: ColorType, D: Depth>(
    path: impl AsRef<Path>,
    img: &Image<C, D>,
) -> Result<(), CodecError> {
    fs::write(path, encode_binary(img)?)?;
    Ok(())
}

pub fn read_binary<C: ColorType, D: Depth>(
    path: impl AsRef<Path>,
) -> Result<Image<C, D>, CodecError> {
    decode_binary(&fs::read(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use typed_image_core::{Bgr, Gray, Rect};

    #[test]
    fn header_layout() {
        let img = Image::<Bgr, u16>::new(3, 2).expect("valid size");
        let bytes = encode_binary(&img).expect("encode");
        assert_eq!(&bytes[..4], b"TIMG");
        assert_eq!(bytes.len(), HEADER_LEN + 3 * 2 * 3 * 2);
        let header = read_header(&bytes).expect("header");
        assert_eq!(
            header,
            BinaryHeader {
                version: 1,
                color: ColorTag::Bgr,
                depth: DepthTag::U16,
                width: 3,
                height: 2,
            }
        );
    }

    #[test]
    fn roi_only_is_written() {
        let mut img =
            Image::<Gray, i16>::from_vec(3, 2, vec![1, -2, 3, -4, 5, -6]).expect("valid buffer");
        img.set_roi(Some(Rect::new(0, 1, 2, 1))).expect("roi fits");
        let bytes = encode_binary(&img).expect("encode");
        let back: Image<Gray, i16> = decode_binary(&bytes).expect("decode");
        assert_eq!(back.data(), &[-4, 5]);
        assert!(!back.has_roi());
    }

    #[test]
    fn corrupt_buffers_fail() {
        let img = Image::<Gray, f32>::filled(4, 4, Gray::new(0.5)).expect("valid size");
        let bytes = encode_binary(&img).expect("encode");

        let is_failure = |r: Result<Image<Gray, f32>, CodecError>| {
            matches!(r, Err(CodecError::SerializationFailure(_)))
        };
        assert!(is_failure(decode_binary(&bytes[..10])));
        assert!(is_failure(decode_binary(&bytes[..bytes.len() - 1])));
        assert!(is_failure(decode_binary(b"not an image at all")));

        let mut wrong_version = bytes.clone();
        wrong_version[4] = 7;
        assert!(is_failure(decode_binary(&wrong_version)));

        let mut bad_tag = bytes.clone();
        bad_tag[7] = 200;
        assert!(is_failure(decode_binary(&bad_tag)));

        assert!(matches!(
            decode_binary::<Gray, u8>(&bytes),
            Err(CodecError::SerializationFailure(_))
        ));
    }
}
