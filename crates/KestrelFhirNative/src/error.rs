use thiserror::Error;

/// Failure reported by the native parser while building the arena.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input bytes do not form a valid native payload.
    #[error("malformed native payload at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: String },

    /// The input ended before the payload was complete.
    #[error("native payload truncated: expected at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// Reading the input failed.
    #[error("failed to read native payload")]
    Io(#[from] std::io::Error),
}

/// Failure while decoding an arena into domain resources.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The root record's type tag matches no known resource.
    #[error("unknown resource tag {tag}")]
    UnknownTag { tag: u32 },

    /// The parse that produced the arena failed.
    #[error("native parse failed")]
    Parse(#[from] ParseError),
}
