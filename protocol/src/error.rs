use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("length prefix {declared} exceeds {remaining} remaining bytes")]
    LengthOverflow { declared: u64, remaining: usize },

    #[error("non-canonical varint encoding")]
    NonCanonicalVarint,

    #[error("string field is not valid UTF-8")]
    InvalidUtf8,

    #[error("invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("unknown {kind} tag {tag}")]
    UnknownTag { kind: &'static str, tag: u64 },

    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),

    #[error("encoded size mismatch: computed {computed}, wrote {written}")]
    SizeMismatch { computed: usize, written: usize },
}

impl CodecError {
    /// Whether the input bytes were at fault, as opposed to the sink or the encoder.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::SizeMismatch { .. })
    }
}
