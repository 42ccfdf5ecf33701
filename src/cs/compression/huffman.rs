//! Huffman coding.
//!
//! Builds an optimal prefix-code tree from symbol frequencies, assigns each
//! symbol the path from the root to its leaf ('0' for left, '1' for right)
//! and maps input bytes to those code strings. Decoding walks the tree one
//! bit at a time.
//!
//! Codes are produced as strings of '0'/'1' characters; packing them into a
//! bit stream is left to the caller.
//!
//! # Example
//!
//! ```
//! use classic_codecs::cs::compression::huffman::{
//!     build_code_table, build_frequency_table, build_huffman_tree, decode_codes, encode,
//!     format_encoded,
//! };
//!
//! let input = b"aabb";
//! let freq = build_frequency_table(input);
//! let tree = build_huffman_tree(&freq).unwrap();
//! let codes = build_code_table(&tree);
//! let encoded = encode(input, &codes).unwrap();
//! assert_eq!(format_encoded(&encoded), "0 0 1 1 ");
//! assert_eq!(decode_codes(&encoded, &tree).unwrap(), input);
//! ```

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use bitvec::prelude::*;
use log::{debug, trace};

use crate::cs::compression::{Codec, Result};
use crate::cs::error::Error;

/// Occurrence count of every symbol in an input.
pub type FrequencyTable = BTreeMap<u8, usize>;

/// Code string ('0'/'1' characters) of every symbol in a tree.
pub type CodeTable = BTreeMap<u8, String>;

/// Represents a node in the Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    /// A leaf node contains a symbol and its frequency.
    Leaf { symbol: u8, freq: usize },
    /// An internal node with left and right children and combined frequency.
    ///
    /// `symbols` holds the left subtree's symbols followed by the right
    /// subtree's, for display only.
    Internal {
        symbols: Vec<u8>,
        freq: usize,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    /// Returns the frequency of the node.
    pub fn freq(&self) -> usize {
        match self {
            HuffmanNode::Leaf { freq, .. } => *freq,
            HuffmanNode::Internal { freq, .. } => *freq,
        }
    }

    /// Returns the symbols under this node, in left-to-right leaf order.
    pub fn symbols(&self) -> &[u8] {
        match self {
            HuffmanNode::Leaf { symbol, .. } => std::slice::from_ref(symbol),
            HuffmanNode::Internal { symbols, .. } => symbols,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }

    /// Returns the `(left, right)` children of an internal node.
    pub fn children(&self) -> Option<(&HuffmanNode, &HuffmanNode)> {
        match self {
            HuffmanNode::Leaf { .. } => None,
            HuffmanNode::Internal { left, right, .. } => Some((left, right)),
        }
    }

    /// Number of leaves in the subtree.
    pub fn leaf_count(&self) -> usize {
        match self.children() {
            None => 1,
            Some((left, right)) => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Number of internal nodes in the subtree.
    pub fn internal_count(&self) -> usize {
        match self.children() {
            None => 0,
            Some((left, right)) => 1 + left.internal_count() + right.internal_count(),
        }
    }
}

/// A helper wrapper for HuffmanNode for use in a BinaryHeap.
/// We want the node with the smallest frequency to have highest priority;
/// among equal frequencies, the node created first wins.
#[derive(Debug)]
struct NodeWrapper {
    node: HuffmanNode,
    order: usize,
}

impl Ord for NodeWrapper {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse: lower frequency (then lower order) should come first.
        other
            .node
            .freq()
            .cmp(&self.node.freq())
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for NodeWrapper {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NodeWrapper {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NodeWrapper {}

/// Build a frequency table mapping each byte in `input` to its frequency.
pub fn build_frequency_table(input: &[u8]) -> FrequencyTable {
    let mut freq = FrequencyTable::new();
    for &symbol in input {
        *freq.entry(symbol).or_insert(0) += 1;
    }
    freq
}

/// Build the Huffman tree given a frequency table.
///
/// Returns [`Error::EmptyInput`] if the frequency table is empty. A table
/// with a single symbol yields a lone leaf.
pub fn build_huffman_tree(freq_table: &FrequencyTable) -> Result<HuffmanNode> {
    build_huffman_tree_traced(freq_table, |_, _| {})
}

/// Same as [`build_huffman_tree`], calling `on_merge(step, node)` with every
/// newly merged internal node. Steps are numbered from 1.
pub fn build_huffman_tree_traced<F>(
    freq_table: &FrequencyTable,
    mut on_merge: F,
) -> Result<HuffmanNode>
where
    F: FnMut(usize, &HuffmanNode),
{
    let mut heap = BinaryHeap::with_capacity(freq_table.len());
    for (order, (&symbol, &freq)) in freq_table.iter().enumerate() {
        heap.push(NodeWrapper {
            node: HuffmanNode::Leaf { symbol, freq },
            order,
        });
    }
    let mut order = heap.len();
    let mut step = 0;

    // Combine nodes until only one tree remains.
    loop {
        let left = heap.pop().ok_or(Error::EmptyInput)?.node;
        let Some(NodeWrapper { node: right, .. }) = heap.pop() else {
            debug!(
                "huffman tree built: {} leaves, {} merges",
                left.leaf_count(),
                step
            );
            return Ok(left);
        };

        step += 1;
        let mut symbols = Vec::with_capacity(left.symbols().len() + right.symbols().len());
        symbols.extend_from_slice(left.symbols());
        symbols.extend_from_slice(right.symbols());
        let merged = HuffmanNode::Internal {
            symbols,
            freq: left.freq() + right.freq(),
            left: Box::new(left),
            right: Box::new(right),
        };
        trace!(
            "merge {}: [{}:{}]",
            step,
            String::from_utf8_lossy(merged.symbols()),
            merged.freq()
        );
        on_merge(step, &merged);

        heap.push(NodeWrapper {
            node: merged,
            order,
        });
        order += 1;
    }
}

/// Recursively build the code table mapping symbols to their Huffman codes.
///
/// If the tree consists of a single leaf (i.e. one unique symbol), the code "0" is assigned.
pub fn build_code_table(node: &HuffmanNode) -> CodeTable {
    let mut table = CodeTable::new();
    build_code_table_helper(node, String::new(), &mut table);
    table
}

fn build_code_table_helper(node: &HuffmanNode, prefix: String, table: &mut CodeTable) {
    match node {
        HuffmanNode::Leaf { symbol, .. } => {
            let code = if prefix.is_empty() {
                "0".to_string()
            } else {
                prefix
            };
            table.insert(*symbol, code);
        }
        HuffmanNode::Internal { left, right, .. } => {
            let mut left_prefix = prefix.clone();
            left_prefix.push('0');
            build_code_table_helper(left, left_prefix, table);
            let mut right_prefix = prefix;
            right_prefix.push('1');
            build_code_table_helper(right, right_prefix, table);
        }
    }
}

/// Encode the input using the provided code table.
/// Each byte is replaced with its Huffman code.
///
/// Fails with [`Error::UnknownSymbol`] when the table has no code for a byte.
pub fn encode(input: &[u8], code_table: &CodeTable) -> Result<Vec<String>> {
    let encoded = input
        .iter()
        .map(|&symbol| {
            code_table
                .get(&symbol)
                .cloned()
                .ok_or(Error::UnknownSymbol(symbol))
        })
        .collect::<Result<Vec<_>>>()?;
    debug!("huffman encoded {} symbols", encoded.len());
    Ok(encoded)
}

/// Render codes as text, each code followed by a single space.
pub fn format_encoded(encoded: &[String]) -> String {
    encoded.iter().fold(String::new(), |mut out, code| {
        out.push_str(code);
        out.push(' ');
        out
    })
}

/// Parse a textual bit string into bits. ASCII whitespace is skipped.
pub fn parse_bits(text: &str) -> Result<BitVec<u8, Msb0>> {
    let mut bits = BitVec::with_capacity(text.len());
    for (position, ch) in text.chars().enumerate() {
        match ch {
            '0' => bits.push(false),
            '1' => bits.push(true),
            c if c.is_ascii_whitespace() => {}
            other => {
                return Err(Error::MalformedStream(format!(
                    "unexpected character {other:?} at position {position}"
                )))
            }
        }
    }
    Ok(bits)
}

/// Decode a bit sequence using the Huffman tree.
/// Traverses the tree according to each bit until a leaf is reached.
///
/// Fails with [`Error::MalformedStream`] when the bits run out between the
/// root and a leaf.
pub fn decode(bits: &BitSlice<u8, Msb0>, tree: &HuffmanNode) -> Result<Vec<u8>> {
    // Single-symbol tree: every '0' is one occurrence.
    if let HuffmanNode::Leaf { symbol, .. } = tree {
        return bits
            .iter()
            .by_vals()
            .enumerate()
            .map(|(position, bit)| {
                if bit {
                    Err(Error::MalformedStream(format!(
                        "bit 1 at position {position} in a single-symbol stream"
                    )))
                } else {
                    Ok(*symbol)
                }
            })
            .collect();
    }

    let mut result = Vec::new();
    let mut current = tree;
    let mut code_start = 0;
    for (position, bit) in bits.iter().by_vals().enumerate() {
        if let HuffmanNode::Internal { left, right, .. } = current {
            current = if bit { right } else { left };
        }
        if let HuffmanNode::Leaf { symbol, .. } = current {
            result.push(*symbol);
            current = tree;
            code_start = position + 1;
        }
    }

    if code_start != bits.len() {
        return Err(Error::MalformedStream(format!(
            "stream ends inside the code starting at bit {code_start}"
        )));
    }
    debug!("huffman decoded {} bits into {} symbols", bits.len(), result.len());
    Ok(result)
}

/// Decode a sequence of code strings using the Huffman tree.
pub fn decode_codes(encoded: &[String], tree: &HuffmanNode) -> Result<Vec<u8>> {
    let bits = parse_bits(&encoded.concat())?;
    decode(&bits, tree)
}

/// Size comparison between the raw input and its Huffman codes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    /// Eight bits per input byte.
    pub original_bits: usize,
    /// Sum of the code lengths.
    pub compressed_bits: usize,
    /// `compressed_bits / original_bits`, or 0.0 for empty input.
    pub ratio: f64,
}

impl Statistics {
    pub fn ratio_percent(&self) -> f64 {
        self.ratio * 100.0
    }
}

/// Compute the encoded size of `input` under `code_table`.
pub fn statistics(input: &[u8], code_table: &CodeTable) -> Result<Statistics> {
    let original_bits = input.len() * 8;
    let compressed_bits = input.iter().try_fold(0usize, |total, symbol| {
        code_table
            .get(symbol)
            .map(|code| total + code.len())
            .ok_or(Error::UnknownSymbol(*symbol))
    })?;
    let ratio = if original_bits == 0 {
        0.0
    } else {
        compressed_bits as f64 / original_bits as f64
    };
    Ok(Statistics {
        original_bits,
        compressed_bits,
        ratio,
    })
}

/// Convenience function: builds the Huffman tree from input, encodes the input,
/// and returns (code strings, Huffman tree).
pub fn huffman_encode(input: &[u8]) -> Result<(Vec<String>, HuffmanNode)> {
    let freq_table = build_frequency_table(input);
    let tree = build_huffman_tree(&freq_table)?;
    let code_table = build_code_table(&tree);
    let encoded = encode(input, &code_table)?;
    Ok((encoded, tree))
}

/// Convenience function: decodes code strings using the provided Huffman tree.
pub fn huffman_decode(encoded: &[String], tree: &HuffmanNode) -> Result<Vec<u8>> {
    decode_codes(encoded, tree)
}

/// Everything a Huffman encode produces.
#[derive(Debug, Clone, PartialEq)]
pub struct HuffmanEncoded {
    pub tree: HuffmanNode,
    pub codes: CodeTable,
    pub encoded: Vec<String>,
}

impl HuffmanEncoded {
    pub fn compressed_bits(&self) -> usize {
        self.encoded.iter().map(String::len).sum()
    }
}

/// Huffman coding behind the [`Codec`] trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct HuffmanCoder;

impl Codec for HuffmanCoder {
    const NAME: &'static str = "huffman";
    type Encoded = HuffmanEncoded;

    fn encode(&self, data: &[u8]) -> Result<HuffmanEncoded> {
        let tree = build_huffman_tree(&build_frequency_table(data))?;
        let codes = build_code_table(&tree);
        let encoded = encode(data, &codes)?;
        Ok(HuffmanEncoded {
            tree,
            codes,
            encoded,
        })
    }

    fn decode(&self, encoded: &HuffmanEncoded) -> Result<Vec<u8>> {
        decode_codes(&encoded.encoded, &encoded.tree)
    }

    fn encoded_units(encoded: &HuffmanEncoded) -> usize {
        encoded.encoded.len()
    }
}
