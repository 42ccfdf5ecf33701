//! Compression algorithms implementation.
//!
//! This module provides three classical lossless text codecs:
//! - Huffman coding (entropy coding with an optimal prefix-code tree)
//! - LZ77 (sliding-window back-references)
//! - LZ78 (adaptive growing dictionary)
//!
//! Each codec is independent of the others and works on in-memory byte
//! sequences. Intermediate steps can be observed through the `*_traced`
//! variants, which take a closure called once per step.
//!
//! # Examples
//!
//! ```rust
//! use classic_codecs::cs::compression::{lz78, Codec, Lz78Coder};
//!
//! let coder = Lz78Coder;
//! let tokens = coder.encode(b"pablito clavo un clavito").unwrap();
//! assert_eq!(coder.decode(&tokens).unwrap(), b"pablito clavo un clavito");
//! assert_eq!(lz78::decode(&tokens).unwrap(), b"pablito clavo un clavito");
//! ```

pub use crate::cs::error::Result;

/// Trait for the encode/decode pair of a codec.
///
/// The encoded form is codec specific (code strings, token lists); no byte
/// serialization is implied.
pub trait Codec {
    /// Short display name.
    const NAME: &'static str;

    /// Encoded representation produced by [`Codec::encode`].
    type Encoded;

    /// Encode the input data.
    fn encode(&self, data: &[u8]) -> Result<Self::Encoded>;

    /// Decode previously encoded data.
    fn decode(&self, encoded: &Self::Encoded) -> Result<Vec<u8>>;

    /// Number of output units (codes or tokens) in an encoded value.
    fn encoded_units(encoded: &Self::Encoded) -> usize;
}

pub mod harness;
pub mod huffman;
pub mod lz77;
pub mod lz78;

pub use harness::{round_trip, run_all, RoundTripReport};
pub use huffman::{
    build_code_table, build_frequency_table, build_huffman_tree, huffman_decode, huffman_encode,
    CodeTable, FrequencyTable, HuffmanCoder, HuffmanEncoded, HuffmanNode, Statistics,
};
pub use lz77::{Lz77Coder, Lz77Config};
pub use lz78::{Dictionary, Lz78Coder};
