//! Error types for the delta crate.

/// Errors that can occur while building, writing or decoding a delta.
#[derive(Debug, thiserror::Error)]
pub enum DeltaError {
    /// I/O error while reading an input or writing the delta.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The delta stream ended inside a record or carried an unknown opcode.
    #[error("corrupt delta stream at offset {offset}: {reason}")]
    StreamCorruption { offset: u64, reason: String },

    /// A buffer is too large for the 32-bit offset and length fields.
    #[error("input of {len} bytes exceeds the 32-bit delta format limit")]
    InputTooLarge { len: usize },

    /// The diff configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An operation sequence does not describe the buffers it was checked against.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

/// Convenience alias for delta results.
pub type DeltaResult<T> = Result<T, DeltaError>;
