//! Interchangeable postings-list codecs.
//!
//! Every codec implements the same narrow contract: `encode` turns a
//! sorted, deduplicated list of document IDs into bytes; `decode` turns
//! those bytes back into the same list given the document frequency (the
//! number of IDs that were encoded), which the on-disk index format always
//! stores alongside the postings bytes. Passing the count explicitly
//! rather than inferring stream end from buffer length avoids the
//! byte-boundary ambiguity the bit-packed codec below would otherwise have
//! at decode time.
//!
//! The four codecs are represented as an enum rather than a trait object:
//! there are exactly four, the set is closed, and callers dispatch on
//! codec identity at the index-format layer anyway (it is recorded
//! per-build, not per-term), so a tagged variant is the simpler fit.

mod elias_gamma;
mod fixed32;
mod simple8b;
mod vbyte;

use crate::error::Result;

/// Which postings-list codec an index was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    /// Four bytes per posting, native byte order, no gap transform.
    Fixed32,
    /// Gap-encoded, base-128 variable byte encoding.
    VariableByte,
    /// Gap-encoded, Simple8b bit-packed 64-bit words.
    Simple8b,
    /// Gap-encoded, Elias-Gamma bit-level universal code.
    EliasGamma,
}

impl Codec {
    /// Encodes a sorted, deduplicated postings list to bytes.
    pub fn encode(&self, postings: &[u32]) -> Result<Vec<u8>> {
        match self {
            Codec::Fixed32 => Ok(fixed32::encode(postings)),
            Codec::VariableByte => Ok(vbyte::encode(postings)),
            Codec::Simple8b => simple8b::encode(postings),
            Codec::EliasGamma => Ok(elias_gamma::encode(postings)),
        }
    }

    /// Decodes `count` postings from `bytes`, which must have been
    /// produced by a matching call to [`Codec::encode`].
    pub fn decode(&self, bytes: &[u8], count: usize) -> Result<Vec<u32>> {
        match self {
            Codec::Fixed32 => fixed32::decode(bytes, count),
            Codec::VariableByte => vbyte::decode(bytes, count),
            Codec::Simple8b => simple8b::decode(bytes, count),
            Codec::EliasGamma => elias_gamma::decode(bytes, count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Codec; 4] = [
        Codec::Fixed32,
        Codec::VariableByte,
        Codec::Simple8b,
        Codec::EliasGamma,
    ];

    #[test]
    fn round_trips_the_worked_example() {
        let postings = vec![34, 67, 89, 454, 2345738];
        for codec in ALL {
            let encoded = codec.encode(&postings).unwrap();
            let decoded = codec.decode(&encoded, postings.len()).unwrap();
            assert_eq!(decoded, postings, "{codec:?} round trip mismatch");
        }
    }

    #[test]
    fn round_trips_empty_and_singleton_lists() {
        for codec in ALL {
            assert_eq!(
                codec.decode(&codec.encode(&[]).unwrap(), 0).unwrap(),
                Vec::<u32>::new()
            );
            assert_eq!(
                codec.decode(&codec.encode(&[1]).unwrap(), 1).unwrap(),
                vec![1u32]
            );
        }
    }
}
