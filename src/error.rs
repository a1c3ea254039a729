use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistError {
    #[error("image dimensions cannot be zero")]
    ZeroDimension,

    #[error("pixel buffer length {len} does not match dimensions {width}x{height}")]
    DimensionMismatch {
        len: usize,
        width: usize,
        height: usize,
    },

    #[error("max_colors must be at least 1")]
    InvalidMaxColors,

    #[error("ignorebits must be between 0 and 7, got {0}")]
    InvalidIgnoreBits(u32),

    #[error("importance map length {len} does not match pixel count {expected}")]
    ImportanceMapMismatch { len: usize, expected: usize },

    #[error("image has more than {max_colors} distinct posterized colors")]
    TooManyColors { max_colors: u32 },

    #[error("out of memory while building the color hash table")]
    OutOfMemory,

    #[error("palette has no entries")]
    EmptyPalette,
}
