use std::collections::TryReserveError;

use risk_core::ResourceError;
use risk_render::TextureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FontError {
    /// The font payload declares lengths or offsets that do not fit the
    /// bytes actually present.
    #[error("malformed font asset: {0}")]
    MalformedAsset(String),

    #[error("out of memory while building font atlas: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("font asset holds {0} fonts, the format allows at most 65535")]
    TooManyFonts(usize),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

impl FontError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedAsset(reason.into())
    }
}

pub type FontResult<T> = Result<T, FontError>;
