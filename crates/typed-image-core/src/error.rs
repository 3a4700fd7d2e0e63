use crate::{Rect, Size};

/// Errors returned by image construction, indexing and pixel operators.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("invalid image dimensions (width={width}, height={height})")]
    InvalidDimension { width: usize, height: usize },

    #[error("pixel (row={row}, col={col}) is outside the {width}x{height} region")]
    OutOfRange {
        row: i64,
        col: i64,
        width: usize,
        height: usize,
    },

    #[error("region {roi} does not fit in a {size} image")]
    InvalidRoi { roi: Rect, size: Size },

    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: Size, actual: Size },

    #[error("expected {expected} channels, got {actual}")]
    ChannelCount { expected: usize, actual: usize },

    #[error("buffer length mismatch: expected {expected} elements, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}
