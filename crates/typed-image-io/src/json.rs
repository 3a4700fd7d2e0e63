//! JSON documents through serde.
//!
//! JSON has no NaN or infinity, so float images holding them do not round
//! trip through this format; use the binary schema for those.

use std::fs;
use std::path::Path;

use typed_image_core::{ColorType, Depth, DocumentHeader, Image};

use crate::CodecError;

pub fn to_json<C: ColorType, D: Depth>(img: &Image<C, D>) -> Result<String, CodecError> {
    Ok(serde_json::to_string(img)?)
}

/// Parse a document written for `Image<C, D>`.
pub fn from_json<C: ColorType, D: Depth>(text: &str) -> Result<Image<C, D>, CodecError> {
    serde_json::from_str(text).map_err(|e| CodecError::corrupt(e.to_string()))
}

/// Read only the metadata of a document.
pub fn read_json_header(text: &str) -> Result<DocumentHeader, CodecError> {
    serde_json::from_str(text).map_err(|e| CodecError::corrupt(e.to_string()))
}

/// Write the image to disk as pretty JSON.
pub fn write_json<C: ColorType, D: Depth>(
    path: impl AsRef<Path>,
    img: &Image<C, D>,
) -> Result<(), CodecError> {
    let json = serde_json::to_string_pretty(img)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_json<C: ColorType, D: Depth>(
    path: impl AsRef<Path>,
) -> Result<Image<C, D>, CodecError> {
    let raw = fs::read_to_string(path)?;
    from_json(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use typed_image_core::{Bgr, ColorTag, DepthTag, Gray};

    #[test]
    fn floats_survive_text() {
        let img = Image::<Gray, f64>::from_vec(2, 2, vec![0.1, 1.0 / 3.0, -2.5e-300, 7.0])
            .expect("valid buffer");
        let back: Image<Gray, f64> = from_json(&to_json(&img).expect("encode")).expect("decode");
        assert_eq!(back, img);
    }

    #[test]
    fn header_is_readable_without_type() {
        let img = Image::<Bgr, u16>::new(5, 4).expect("valid size");
        let header = read_json_header(&to_json(&img).expect("encode")).expect("header");
        assert_eq!(header.color, ColorTag::Bgr);
        assert_eq!(header.depth, DepthTag::U16);
        assert_eq!((header.width, header.height), (5, 4));
    }

    #[test]
    fn garbage_is_a_serialization_failure() {
        assert!(matches!(
            from_json::<Gray, u8>("{\"version\": 1"),
            Err(CodecError::SerializationFailure(_))
        ));
        let text = to_json(&Image::<Gray, u8>::new(1, 1).expect("valid size")).expect("encode");
        assert!(matches!(
            from_json::<Bgr, u8>(&text),
            Err(CodecError::SerializationFailure(_))
        ));
    }
}
