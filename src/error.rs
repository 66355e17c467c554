use std::io;

use thiserror::Error;

/// Result alias used throughout the decoder.
pub type Result<T> = std::result::Result<T, RhsError>;

/// Errors raised while decoding an RHS file.
///
/// Every variant is fatal: a decode either returns a complete [`RhsFile`](crate::RhsFile)
/// or one of these, never a partial result.
#[derive(Debug, Error)]
pub enum RhsError {
    /// The magic number does not identify an Intan RHS file
    #[error("unrecognized file format: magic number {found:#010x}")]
    UnrecognizedFormat { found: u32 },

    /// A channel record carries a signal type that is not valid for RHS files
    #[error("unknown channel type {0}")]
    UnknownChannelType(i16),

    /// A QString length prefix does not fit in the remaining stream
    #[error("corrupt string: declared {declared} bytes with {remaining} remaining")]
    CorruptString { declared: u32, remaining: u64 },

    /// Bytes remain after the last full data block
    #[error("file size mismatch: {remaining} bytes left after the last data block")]
    FileSizeMismatch { remaining: u64 },

    /// A digital channel's native order does not address a bit of a 16-bit word
    #[error("digital channel {channel} has native order {order}, expected 0..=15")]
    InvalidDigitalOrder { channel: String, order: i32 },

    /// Underlying read or open failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
