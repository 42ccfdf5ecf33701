//! Error types shared by the codecs in [`crate::cs`].

use thiserror::Error;

/// Errors reported by the encoders and decoders.
///
/// Every failure is local and synchronous; the codecs are deterministic, so
/// retrying with the same input always fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The operation needs at least one symbol.
    #[error("input is empty")]
    EmptyInput,

    /// LZ77 search window smaller than one symbol.
    #[error("invalid window size {0} (must be at least 1)")]
    InvalidWindowSize(usize),

    /// A symbol has no entry in the supplied code table.
    #[error("symbol {0:#04x} has no code in the table")]
    UnknownSymbol(u8),

    /// A Huffman bit stream that does not end on a leaf or holds non-bit characters.
    #[error("malformed stream: {0}")]
    MalformedStream(String),

    /// An LZ77 token pointing outside the data decoded so far.
    #[error(
        "invalid back-reference in token {token}: offset {offset}, length {length} \
         with {available} bytes decoded"
    )]
    InvalidBackReference {
        /// Position of the offending token in the stream.
        token: usize,
        offset: usize,
        length: usize,
        /// Output length when the token was read.
        available: usize,
    },

    /// An LZ78 token referencing a dictionary slot that does not exist yet.
    #[error("dictionary index {index} out of range in token {token} (dictionary holds {size} entries)")]
    InvalidDictionaryIndex {
        token: usize,
        index: usize,
        size: usize,
    },
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(Error::EmptyInput.to_string(), "input is empty");
        assert_eq!(
            Error::UnknownSymbol(b'z').to_string(),
            "symbol 0x7a has no code in the table"
        );
        let err = Error::InvalidDictionaryIndex {
            token: 2,
            index: 9,
            size: 3,
        };
        assert!(err.to_string().contains("index 9"));
    }
}
