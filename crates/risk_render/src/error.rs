//! Error types for texture loading.

use std::path::PathBuf;

use risk_core::ResourceError;
use thiserror::Error;

use crate::texture::TextureId;

#[derive(Error, Debug)]
pub enum TextureError {
    /// The image resource could not be read.
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// The resource is not a decodable PNG.
    #[error("failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The handle was never issued by this store, or was already unloaded.
    #[error("unknown texture {0}")]
    UnknownTexture(TextureId),

    /// Every id this store can issue has been handed out.
    #[error("texture ids exhausted")]
    IdsExhausted,

    /// The GPU rejected the upload.
    #[error("texture upload failed: {0}")]
    Gpu(String),
}

pub type TextureResult<T> = Result<T, TextureError>;
