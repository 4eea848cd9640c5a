use std::io;

/// Errors reported by the stream transforms.
///
/// Only argument validation and I/O failures are errors. Uncorrectable
/// codewords, dropped packets and ambiguous erasures are absorbed into the
/// output and surfaced through the report structs instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A frame length outside `{0, 1} ∪ [8, 65535]`.
    #[error("invalid frame length {0}: expected 0, 1 or 8..=65535")]
    InvalidLength(usize),

    /// A payload length that must be at least one byte.
    #[error("invalid payload length {0}: must be at least 1")]
    InvalidPayloadLength(usize),

    /// A noise stride or shift outside its range.
    #[error("noise stride {0} out of range")]
    InvalidStride(usize),

    /// A Reed-Solomon parity coefficient of zero, which would make the
    /// parity payload independent of one of the data payloads.
    #[error("parity coefficients must be nonzero")]
    ZeroCoefficient,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
