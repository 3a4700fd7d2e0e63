use typed_image_core::{ColorTag, DepthTag, ImageError};

/// Errors raised while encoding, decoding or storing images.
#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    /// Input is corrupt, truncated, or describes a different layout.
    #[error("serialization failure: {0}")]
    SerializationFailure(String),

    #[error("{color}/{depth} images are not supported by the {format} codec")]
    UnsupportedLayout {
        color: ColorTag,
        depth: DepthTag,
        format: &'static str,
    },

    #[error("unrecognized file extension in {0}")]
    UnknownFormat(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Bitmap(#[from] image::ImageError),

    #[error(transparent)]
    Image(#[from] ImageError),
}

impl CodecError {
    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        log::warn!("rejecting serialized image: {msg}");
        CodecError::SerializationFailure(msg)
    }
}
