//! Encode → report → decode → verify runs over any [`Codec`].

use log::{debug, info, warn};

use crate::cs::compression::{Codec, HuffmanCoder, Lz77Coder, Lz78Coder, Result};

/// Outcome of one round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTripReport {
    pub codec: &'static str,
    pub input_len: usize,
    /// Codes (Huffman) or tokens (LZ77, LZ78) produced.
    pub encoded_units: usize,
    /// Whether decoding reproduced the input exactly.
    pub verified: bool,
}

/// Encode `input`, decode the result and check it matches.
///
/// Encoder and decoder errors are returned as is; a decoded value that
/// differs from the input is reported through [`RoundTripReport::verified`].
///
/// # Example
///
/// ```
/// use classic_codecs::cs::compression::{round_trip, Lz78Coder};
///
/// let report = round_trip(&Lz78Coder, b"aaaa").unwrap();
/// assert_eq!(report.encoded_units, 3);
/// assert!(report.verified);
/// ```
pub fn round_trip<C: Codec>(codec: &C, input: &[u8]) -> Result<RoundTripReport> {
    let encoded = codec.encode(input)?;
    let encoded_units = C::encoded_units(&encoded);
    debug!("{}: {} bytes -> {} units", C::NAME, input.len(), encoded_units);

    let decoded = codec.decode(&encoded)?;
    let verified = decoded == input;
    if verified {
        info!("{}: round trip of {} bytes verified", C::NAME, input.len());
    } else {
        warn!(
            "{}: decoded {} bytes that differ from the {} byte input",
            C::NAME,
            decoded.len(),
            input.len()
        );
    }

    Ok(RoundTripReport {
        codec: C::NAME,
        input_len: input.len(),
        encoded_units,
        verified,
    })
}

/// Round-trip `input` through Huffman, LZ77 (with `window_size`) and LZ78.
pub fn run_all(input: &[u8], window_size: usize) -> Result<Vec<RoundTripReport>> {
    Ok(vec![
        round_trip(&HuffmanCoder, input)?,
        round_trip(&Lz77Coder::new(window_size)?, input)?,
        round_trip(&Lz78Coder, input)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::error::Error;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    /// Decodes to something other than the input.
    struct LossyCoder;

    impl Codec for LossyCoder {
        const NAME: &'static str = "lossy";
        type Encoded = Vec<u8>;

        fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
            Ok(data.to_vec())
        }

        fn decode(&self, encoded: &Vec<u8>) -> Result<Vec<u8>> {
            Ok(encoded.iter().skip(1).copied().collect())
        }

        fn encoded_units(encoded: &Vec<u8>) -> usize {
            encoded.len()
        }
    }

    #[test]
    fn test_run_all() {
        let reports = run_all(b"pablito clavo un clavito", 5).unwrap();
        let names: Vec<_> = reports.iter().map(|r| r.codec).collect();
        assert_eq!(names, ["huffman", "lz77", "lz78"]);
        assert!(reports.iter().all(|r| r.verified && r.input_len == 24));
        assert_eq!(reports[0].encoded_units, 24);
    }

    #[test]
    fn test_run_all_errors() {
        assert_eq!(run_all(b"", 5).unwrap_err(), Error::EmptyInput);
        assert_eq!(run_all(b"abc", 0).unwrap_err(), Error::InvalidWindowSize(0));
    }

    #[test]
    fn test_mismatch_detected() {
        let report = round_trip(&LossyCoder, b"abc").unwrap();
        assert!(!report.verified);
        assert_eq!(report.input_len, 3);
        assert_eq!(report.encoded_units, 3);
    }

    #[test]
    fn test_random_inputs() {
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..30 {
            let len = rng.gen_range(1..300);
            let input: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            let window_size = rng.gen_range(1..=32);
            let reports = run_all(&input, window_size).unwrap();
            assert_eq!(reports.len(), 3);
            assert!(reports.iter().all(|r| r.verified));
        }
    }
}
