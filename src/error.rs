use alloc::string::String;
use enough::StopReason;

/// Which sprite addressing mode a draw call needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteMode {
    /// [`crate::BmpLoader::draw_indexed`], needs a sprite width.
    Indexed,
    /// [`crate::BmpLoader::draw_cropped`], needs a sprite height.
    Cropped,
}

/// Image axis named in [`BmpError::DimensionOutOfRange`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

/// Errors from BMP loading and sprite drawing.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BmpError {
    #[error("invalid BMP: {0}")]
    InvalidFormat(String),

    #[error("unsupported BMP compression {0} (only uncompressed is supported)")]
    UnsupportedCompression(u32),

    #[error("unsupported BMP bit depth {0} (only 4 and 8 are supported)")]
    UnsupportedBitDepth(u16),

    #[error("sprite {axis:?} {requested} is outside the image (1..={available})")]
    DimensionOutOfRange {
        axis: Axis,
        requested: u32,
        available: u32,
    },

    #[error("unexpected end of input")]
    TruncatedData,

    #[error("{0:?} sprite mode was not enabled when the loader was built")]
    NotInitialized(SpriteMode),

    #[error("pixel buffer holds {actual} pixels, {width}x{height} needs {needed}")]
    BufferSizeMismatch {
        width: u32,
        height: u32,
        needed: usize,
        actual: usize,
    },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),

    #[cfg(feature = "std")]
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StopReason> for BmpError {
    fn from(r: StopReason) -> Self {
        BmpError::Cancelled(r)
    }
}
