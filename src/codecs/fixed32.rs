//! Fixed 32-bit postings representation: four bytes per document ID, in
//! the host's native byte order, stored as-is with no gap transform.
//!
//! This is the baseline codec every other codec is measured against: it
//! has no compression ratio to speak of, but encode/decode are a single
//! pass with no branching.

use crate::error::{Error, Result};

pub fn encode(postings: &[u32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(postings.len() * 4);
    for &id in postings {
        bytes.extend_from_slice(&id.to_ne_bytes());
    }
    bytes
}

pub fn decode(bytes: &[u8], count: usize) -> Result<Vec<u32>> {
    if bytes.len() != count * 4 {
        return Err(Error::Format {
            message: "fixed32 postings length does not match document frequency".to_string(),
            expected: Some(format!("{} bytes", count * 4)),
            actual: Some(format!("{} bytes", bytes.len())),
        });
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| u32::from_ne_bytes(chunk.try_into().unwrap()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let postings = vec![1, 2, 3, 1_000_000, u32::MAX];
        let encoded = encode(&postings);
        assert_eq!(encoded.len(), postings.len() * 4);
        assert_eq!(decode(&encoded, postings.len()).unwrap(), postings);
    }

    #[test]
    fn rejects_length_mismatch() {
        let encoded = encode(&[1, 2, 3]);
        assert!(decode(&encoded, 2).is_err());
    }
}
