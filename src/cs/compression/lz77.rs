//! LZ77 sliding-window compression.
//!
//! The encoder keeps a search window of at most `window_size` already-seen
//! bytes behind the cursor. At each step it looks for the longest prefix of
//! the lookahead buffer that also occurs inside the window, trying lengths
//! from the longest possible down to 1, and emits `(offset, length, next)`.
//! When a length occurs several times in the window the rightmost occurrence
//! is used, which gives the smallest offset.
//!
//! Matches never extend past the window into the lookahead buffer.

use log::{debug, trace};

use crate::cs::compression::{Codec, Result};
use crate::cs::error::Error;

/// Search window size used when none is given.
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// An LZ77 token.
///
/// When a match is found, the token is:
///   (offset, length, next)
///
/// If no match is found, then offset and length are zero, and `next` is the literal.
/// `next` is `None` only when the match runs to the end of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub offset: usize,
    pub length: usize,
    pub next: Option<u8>,
}

/// Snapshot handed to the trace callback of [`encode_traced`].
#[derive(Debug, Clone, Copy)]
pub struct Lz77Step<'a> {
    /// Index of the first byte of the search window.
    pub search_start: usize,
    /// Cursor position; the lookahead buffer starts here.
    pub position: usize,
    pub search_window: &'a [u8],
    pub lookahead: &'a [u8],
    pub token: Token,
}

/// LZ77 parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lz77Config {
    /// Maximum number of previous bytes searched for a match.
    pub window_size: usize,
}

impl Lz77Config {
    /// Create a configuration, rejecting windows smaller than one byte.
    pub fn new(window_size: usize) -> Result<Self> {
        check_window_size(window_size)?;
        Ok(Self { window_size })
    }
}

impl Default for Lz77Config {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

fn check_window_size(window_size: usize) -> Result<()> {
    if window_size < 1 {
        return Err(Error::InvalidWindowSize(window_size));
    }
    Ok(())
}

/// The search window `[max(0, pos - window_size), pos)`.
///
/// `pos` is clamped to the input length.
pub fn search_window(input: &[u8], pos: usize, window_size: usize) -> &[u8] {
    let pos = pos.min(input.len());
    &input[pos.saturating_sub(window_size)..pos]
}

/// The lookahead buffer `[pos, n)`.
pub fn lookahead(input: &[u8], pos: usize) -> &[u8] {
    &input[pos.min(input.len())..]
}

/// Start of the last occurrence of `needle` in `haystack`.
fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .rposition(|candidate| candidate == needle)
}

/// Find the longest prefix of `input[pos..]` occurring in `window`.
///
/// `window` must be the bytes immediately before `pos`, as returned by
/// [`search_window`]; the offset is measured from its end.
pub fn find_longest_match(input: &[u8], pos: usize, window: &[u8]) -> Token {
    let max_length = window.len().min(input.len().saturating_sub(pos));

    // Probe decreasing lengths; the first hit is the longest match.
    let (offset, length) = (1..=max_length)
        .rev()
        .find_map(|length| {
            rfind(window, &input[pos..pos + length]).map(|start| (window.len() - start, length))
        })
        .unwrap_or((0, 0));

    Token {
        offset,
        length,
        next: input.get(pos + length).copied(),
    }
}

/// Compress the input data using the LZ77 algorithm.
///
/// # Parameters
///
/// - `input`: the data to compress as a byte slice.
/// - `window_size`: the maximum number of previous bytes to search for a match.
///
/// # Returns
///
/// A vector of `Token` representing the compressed data, or
/// [`Error::InvalidWindowSize`] when `window_size` is zero.
///
/// # Example
///
/// ```
/// use classic_codecs::cs::compression::lz77::{encode, Token};
///
/// let tokens = encode(b"aaaa", 3).unwrap();
/// assert_eq!(tokens[0], Token { offset: 0, length: 0, next: Some(b'a') });
/// assert_eq!(tokens[1], Token { offset: 1, length: 1, next: Some(b'a') });
/// ```
pub fn encode(input: &[u8], window_size: usize) -> Result<Vec<Token>> {
    encode_traced(input, window_size, |_, _| {})
}

/// Same as [`encode`], calling `on_step(step, snapshot)` for every emitted
/// token. Steps are numbered from 1.
pub fn encode_traced<F>(input: &[u8], window_size: usize, mut on_step: F) -> Result<Vec<Token>>
where
    F: FnMut(usize, &Lz77Step<'_>),
{
    check_window_size(window_size)?;

    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < input.len() {
        let window = search_window(input, pos, window_size);
        let token = find_longest_match(input, pos, window);
        let step = tokens.len() + 1;
        trace!(
            "step {}: pos {}, window {:?} -> ({}, {}, {:?})",
            step,
            pos,
            String::from_utf8_lossy(window),
            token.offset,
            token.length,
            token.next.map(char::from)
        );
        on_step(
            step,
            &Lz77Step {
                search_start: pos - window.len(),
                position: pos,
                search_window: window,
                lookahead: lookahead(input, pos),
                token,
            },
        );

        // The match plus the literal that follows it.
        pos += token.length + 1;
        tokens.push(token);
    }

    debug!(
        "lz77 encoded {} bytes into {} tokens (window {})",
        input.len(),
        tokens.len(),
        window_size
    );
    Ok(tokens)
}

/// Decompress a sequence of LZ77 tokens into the original data.
///
/// # Parameters
///
/// - `tokens`: a slice of `Token` produced by the `encode` function.
/// - `window_size`: the window the tokens were produced with.
///
/// # Returns
///
/// A `Vec<u8>` containing the decompressed data. A token whose back-reference
/// is zero, reaches before the start of the output, or whose length cannot be
/// allocated yields [`Error::InvalidBackReference`]. `window_size` is only
/// checked to be at least 1; offsets are bounded by the output decoded so far.
///
/// # Example
///
/// ```
/// use classic_codecs::cs::compression::lz77::{decode, encode};
///
/// let data = b"abracadabra abracadabra";
/// let tokens = encode(data, 16).unwrap();
/// assert_eq!(decode(&tokens, 16).unwrap(), data);
/// ```
pub fn decode(tokens: &[Token], window_size: usize) -> Result<Vec<u8>> {
    check_window_size(window_size)?;

    let mut output = Vec::new();
    for (index, token) in tokens.iter().enumerate() {
        // If length > 0, copy the matching substring from output.
        if token.length > 0 {
            let invalid = Error::InvalidBackReference {
                token: index,
                offset: token.offset,
                length: token.length,
                available: output.len(),
            };
            if token.offset == 0 || token.offset > output.len() {
                return Err(invalid);
            }
            output.try_reserve(token.length).map_err(|_| invalid)?;
            let start = output.len() - token.offset;
            // Byte by byte, so a copy may overlap the bytes it produces.
            for i in 0..token.length {
                output.push(output[start + i]);
            }
        }
        // Append the literal (if present).
        if let Some(byte) = token.next {
            output.push(byte);
        }
    }

    debug!("lz77 decoded {} tokens into {} bytes", tokens.len(), output.len());
    Ok(output)
}

/// LZ77 behind the [`Codec`] trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lz77Coder {
    pub config: Lz77Config,
}

impl Lz77Coder {
    pub fn new(window_size: usize) -> Result<Self> {
        Ok(Self {
            config: Lz77Config::new(window_size)?,
        })
    }
}

impl Codec for Lz77Coder {
    const NAME: &'static str = "lz77";
    type Encoded = Vec<Token>;

    fn encode(&self, data: &[u8]) -> Result<Vec<Token>> {
        encode(data, self.config.window_size)
    }

    fn decode(&self, encoded: &Vec<Token>) -> Result<Vec<u8>> {
        decode(encoded, self.config.window_size)
    }

    fn encoded_units(encoded: &Vec<Token>) -> usize {
        encoded.len()
    }
}
