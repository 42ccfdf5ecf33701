//! LZ78 adaptive-dictionary compression.
//!
//! The dictionary starts with the empty phrase at index 0 and grows by one
//! phrase per emitted token. Encoder and decoder append in the same order, so
//! the decoder rebuilds an identical dictionary from the tokens alone.

use std::collections::HashMap;

use log::{debug, trace};

use crate::cs::compression::{Codec, Result};
use crate::cs::error::Error;

/// An LZ78 token.
///
/// Each token is a pair (index, next), where:
/// - `index` is the dictionary index of the longest previously seen phrase that is a prefix of the current input.
/// - `next` is the next byte that did not match (or `None` if the input ended exactly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub index: usize,
    pub next: Option<u8>,
}

/// Append-only phrase dictionary.
///
/// Phrases are addressed by insertion index; index 0 is always the empty
/// phrase. A phrase appended twice keeps its first index for lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    /// Index -> phrase.
    entries: Vec<Vec<u8>>,
    /// Reverse lookup: phrase -> first index holding it.
    index: HashMap<Vec<u8>, usize>,
    longest: usize,
}

impl Dictionary {
    pub fn new() -> Self {
        let mut index = HashMap::new();
        index.insert(Vec::new(), 0);
        Self {
            entries: vec![Vec::new()],
            index,
            longest: 0,
        }
    }

    /// Number of entries, including the empty phrase.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the empty phrase is present from the start.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.entries.get(index).map(Vec::as_slice)
    }

    /// Index of `phrase`, if present.
    pub fn lookup(&self, phrase: &[u8]) -> Option<usize> {
        self.index.get(phrase).copied()
    }

    /// Append a phrase and return its index.
    pub fn push(&mut self, phrase: Vec<u8>) -> usize {
        let slot = self.entries.len();
        self.longest = self.longest.max(phrase.len());
        self.index.entry(phrase.clone()).or_insert(slot);
        self.entries.push(phrase);
        slot
    }

    /// All phrases in index order.
    pub fn entries(&self) -> &[Vec<u8>] {
        &self.entries
    }

    /// Length of the longest phrase.
    pub fn longest_phrase(&self) -> usize {
        self.longest
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot handed to the trace callback of [`encode_traced`].
#[derive(Debug, Clone, Copy)]
pub struct Lz78Step<'a> {
    /// Cursor position; the lookahead buffer starts here.
    pub position: usize,
    /// Longest dictionary phrase matching at `position` (possibly empty).
    pub matched: &'a [u8],
    pub token: Token,
    /// Index of the phrase appended by this step, if any.
    pub new_entry: Option<usize>,
    /// Dictionary after this step's append.
    pub dictionary: &'a Dictionary,
}

/// Find the longest dictionary phrase that prefixes `input[pos..]`.
///
/// Returns `(index, length)`; `(0, 0)` when only the empty phrase matches.
pub fn find_longest_match(input: &[u8], pos: usize, dictionary: &Dictionary) -> (usize, usize) {
    let remaining = input.len().saturating_sub(pos);
    // No phrase is longer than `longest`, so shorter caps give the same result.
    let max_length = remaining.min(dictionary.longest_phrase());

    (1..=max_length)
        .rev()
        .find_map(|length| {
            dictionary
                .lookup(&input[pos..pos + length])
                .map(|index| (index, length))
        })
        .unwrap_or((0, 0))
}

/// Compress input data using the LZ78 algorithm.
///
/// # Algorithm
///
/// 1. Start with a dictionary containing only the empty string at index 0.
/// 2. At the cursor, find the longest phrase `w` (possibly empty) already in
///    the dictionary.
/// 3. Let `c` be the byte after `w` (if any). Output the token `(index(w), c)`.
/// 4. Append `w+c` (or `w` alone at the end of input) to the dictionary.
/// 5. Advance past `w` and `c`, and repeat until the input is consumed.
///
/// Returns the tokens together with the final dictionary.
///
/// # Example
///
/// ```
/// use classic_codecs::cs::compression::lz78::{encode, Token};
///
/// let (tokens, dictionary) = encode(b"aaaa");
/// assert_eq!(tokens[0], Token { index: 0, next: Some(b'a') });
/// assert_eq!(tokens[1], Token { index: 1, next: Some(b'a') });
/// assert_eq!(dictionary.get(2), Some(&b"aa"[..]));
/// ```
pub fn encode(input: &[u8]) -> (Vec<Token>, Dictionary) {
    encode_traced(input, |_, _| {})
}

/// Same as [`encode`], calling `on_step(step, snapshot)` for every emitted
/// token. Steps are numbered from 1.
pub fn encode_traced<F>(input: &[u8], mut on_step: F) -> (Vec<Token>, Dictionary)
where
    F: FnMut(usize, &Lz78Step<'_>),
{
    let mut dictionary = Dictionary::new();
    let mut tokens = Vec::new();

    let mut pos = 0;
    while pos < input.len() {
        let (index, length) = find_longest_match(input, pos, &dictionary);
        let next = input.get(pos + length).copied();
        let token = Token { index, next };

        let matched = &input[pos..pos + length];
        let new_entry = match next {
            Some(byte) => {
                let mut phrase = Vec::with_capacity(length + 1);
                phrase.extend_from_slice(matched);
                phrase.push(byte);
                Some(dictionary.push(phrase))
            }
            None if length > 0 => Some(dictionary.push(matched.to_vec())),
            None => None,
        };

        let step = tokens.len() + 1;
        trace!(
            "step {}: pos {}, w {:?} (index {}), next {:?}",
            step,
            pos,
            String::from_utf8_lossy(matched),
            index,
            next.map(char::from)
        );
        on_step(
            step,
            &Lz78Step {
                position: pos,
                matched,
                token,
                new_entry,
                dictionary: &dictionary,
            },
        );

        tokens.push(token);
        pos += length + 1;
    }

    debug!(
        "lz78 encoded {} bytes into {} tokens ({} dictionary entries)",
        input.len(),
        tokens.len(),
        dictionary.len()
    );
    (tokens, dictionary)
}

/// Decompress a sequence of LZ78 tokens back into the original data.
///
/// # Example
///
/// ```
/// use classic_codecs::cs::compression::lz78::{decode, encode};
///
/// let data = b"TOBEORNOTTOBE";
/// let (tokens, _) = encode(data);
/// assert_eq!(decode(&tokens).unwrap(), data);
/// ```
pub fn decode(tokens: &[Token]) -> Result<Vec<u8>> {
    decode_with_dictionary(tokens).map(|(output, _)| output)
}

/// Decompress tokens and also return the rebuilt dictionary.
///
/// For each token (index, next), the phrase `dictionary[index]` followed by
/// `next` (if any) is appended to the output and to the dictionary. An index
/// not yet in the dictionary yields [`Error::InvalidDictionaryIndex`].
pub fn decode_with_dictionary(tokens: &[Token]) -> Result<(Vec<u8>, Dictionary)> {
    let mut dictionary = Dictionary::new();
    let mut output = Vec::new();

    for (position, token) in tokens.iter().enumerate() {
        let mut phrase = dictionary
            .get(token.index)
            .ok_or(Error::InvalidDictionaryIndex {
                token: position,
                index: token.index,
                size: dictionary.len(),
            })?
            .to_vec();
        if let Some(b) = token.next {
            phrase.push(b);
        }
        output.extend_from_slice(&phrase);
        dictionary.push(phrase);
    }

    debug!("lz78 decoded {} tokens into {} bytes", tokens.len(), output.len());
    Ok((output, dictionary))
}

/// LZ78 behind the [`Codec`] trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lz78Coder;

impl Codec for Lz78Coder {
    const NAME: &'static str = "lz78";
    type Encoded = Vec<Token>;

    fn encode(&self, data: &[u8]) -> Result<Vec<Token>> {
        Ok(encode(data).0)
    }

    fn decode(&self, encoded: &Vec<Token>) -> Result<Vec<u8>> {
        decode(encoded)
    }

    fn encoded_units(encoded: &Vec<Token>) -> usize {
        encoded.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_empty_input() {
        let input = b"";
        let (tokens, dictionary) = encode(input);
        // For empty input, expect no tokens.
        assert!(tokens.is_empty());
        assert_eq!(dictionary.len(), 1);
        let decompressed = decode(&tokens).unwrap();
        assert_eq!(decompressed, input);
    }

    #[test]
    fn test_single_character() {
        let input = b"aaaa";
        let (tokens, dictionary) = encode(input);
        assert_eq!(
            tokens,
            vec![
                Token { index: 0, next: Some(b'a') },
                Token { index: 1, next: Some(b'a') },
                Token { index: 1, next: None },
            ]
        );
        let expected = vec![b"".to_vec(), b"a".to_vec(), b"aa".to_vec(), b"a".to_vec()];
        assert_eq!(dictionary.entries(), expected.as_slice());
        // The repeated phrase still resolves to its first slot.
        assert_eq!(dictionary.lookup(b"a"), Some(1));

        let (decoded, rebuilt) = decode_with_dictionary(&tokens).unwrap();
        assert_eq!(decoded, input);
        assert_eq!(rebuilt.entries(), dictionary.entries());
    }

    #[test]
    fn test_simple_string() {
        let input = b"TOBEORNOTTOBE";
        let (tokens, _) = encode(input);
        let decompressed = decode(&tokens).unwrap();
        assert_eq!(decompressed, input);
    }

    #[test]
    fn test_longer_input() {
        let input = b"abracadabra abracadabra abracadabra";
        let (tokens, _) = encode(input);
        assert!(tokens.len() < input.len());
        let decompressed = decode(&tokens).unwrap();
        assert_eq!(decompressed, input);
    }

    #[test]
    fn test_non_ascii() {
        let input = "这是一段测试".as_bytes();
        let (tokens, _) = encode(input);
        let decompressed = decode(&tokens).unwrap();
        assert_eq!(decompressed, input);
    }

    #[test]
    fn test_find_longest_match() {
        let mut dictionary = Dictionary::new();
        assert_eq!(find_longest_match(b"abc", 0, &dictionary), (0, 0));
        dictionary.push(b"a".to_vec());
        dictionary.push(b"ab".to_vec());
        assert_eq!(find_longest_match(b"abc", 0, &dictionary), (2, 2));
        assert_eq!(find_longest_match(b"xab", 1, &dictionary), (2, 2));
        assert_eq!(find_longest_match(b"xa", 1, &dictionary), (1, 1));
        assert_eq!(find_longest_match(b"abc", 3, &dictionary), (0, 0));
    }

    #[test]
    fn test_invalid_dictionary_index() {
        let tokens = [
            Token { index: 0, next: Some(b'a') },
            Token { index: 3, next: None },
        ];
        assert_eq!(
            decode(&tokens).unwrap_err(),
            Error::InvalidDictionaryIndex {
                token: 1,
                index: 3,
                size: 2
            }
        );
    }

    #[test]
    fn test_trace_steps() {
        let input = b"pablito clavo un clavito";
        let mut sizes = Vec::new();
        let (tokens, dictionary) = encode_traced(input, |step, snapshot| {
            let phrase = snapshot.dictionary.get(snapshot.token.index);
            assert_eq!(phrase, Some(snapshot.matched));
            sizes.push((step, snapshot.new_entry, snapshot.dictionary.len()));
        });
        assert_eq!(sizes.len(), tokens.len());
        assert_eq!(sizes[0], (1, Some(1), 2));
        assert_eq!(sizes.last().map(|s| s.2), Some(dictionary.len()));
        assert_eq!(encode(input).0, tokens);
    }

    #[test]
    fn test_coder_trait() {
        let coder = Lz78Coder;
        let tokens = coder.encode(b"pablito clavo un clavito").unwrap();
        assert_eq!(Lz78Coder::encoded_units(&tokens), tokens.len());
        assert_eq!(coder.decode(&tokens).unwrap(), b"pablito clavo un clavito");
    }

    #[test]
    fn test_random_round_trip_and_parity() {
        let mut rng = StdRng::seed_from_u64(78);
        for _ in 0..60 {
            let len = rng.gen_range(0..200);
            let alphabet = rng.gen_range(1..=5u8);
            let input: Vec<u8> = (0..len).map(|_| b'a' + rng.gen_range(0..alphabet)).collect();

            let (tokens, dictionary) = encode(&input);

            // Each token covers its phrase plus the next byte.
            let mut covered = Vec::new();
            for t in &tokens {
                covered.extend_from_slice(dictionary.get(t.index).unwrap());
                covered.extend(t.next);
            }
            assert_eq!(covered, input);

            let (decoded, rebuilt) = decode_with_dictionary(&tokens).unwrap();
            assert_eq!(decoded, input);
            assert_eq!(rebuilt.entries(), dictionary.entries());
        }
    }
}
