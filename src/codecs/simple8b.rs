//! Gap-encoded Simple8b postings representation.
//!
//! Each 64-bit word packs a selector (the top 4 bits, naming how many
//! values follow and at what bit width) plus that many fixed-width values.
//! The encoder greedily picks, at each position, the selector packing the
//! most values the remaining gaps fit in; the two widest selectors (240
//! and 120 slots) special-case runs of literal `1`s instead of storing
//! redundant 1-bit fields.

use crate::error::{Error, Result};

/// `(values_per_word, bits_per_value)` for selectors `0..16`. A `bits` of
/// `0` marks a selector whose slots are implicitly all `1`.
const SELECTORS: [(usize, u32); 16] = [
    (240, 0),
    (120, 0),
    (60, 1),
    (30, 2),
    (20, 3),
    (15, 4),
    (12, 5),
    (10, 6),
    (8, 7),
    (7, 8),
    (6, 10),
    (5, 12),
    (4, 15),
    (3, 20),
    (2, 30),
    (1, 60),
];

/// Largest value a single slot can hold, one less than `1 << 60`.
pub const MAX_VALUE: u64 = (1u64 << 60) - 1;

fn can_pack(remaining: &[u64], n: usize, bits: u32) -> bool {
    if remaining.len() < n {
        return false;
    }
    if bits == 0 {
        remaining[..n].iter().all(|&v| v == 1)
    } else {
        let max_val = (1u64 << bits) - 1;
        remaining[..n].iter().all(|&v| v <= max_val)
    }
}

fn pack(selector: u8, n: usize, bits: u32, values: &[u64]) -> u64 {
    let mut word = (selector as u64) << 60;
    if bits > 0 {
        for (i, &v) in values.iter().enumerate().take(n) {
            word |= (v & ((1u64 << bits) - 1)) << (bits as usize * i);
        }
    }
    word
}

fn unpack(word: u64) -> Result<Vec<u64>> {
    let selector = (word >> 60) as usize;
    let (n, bits) = *SELECTORS.get(selector).ok_or_else(|| Error::Format {
        message: "invalid simple8b selector".to_string(),
        expected: Some("0..16".to_string()),
        actual: Some(selector.to_string()),
    })?;
    if bits == 0 {
        Ok(vec![1u64; n])
    } else {
        let mask = (1u64 << bits) - 1;
        Ok((0..n).map(|i| (word >> (bits as usize * i)) & mask).collect())
    }
}

fn encode_all(src: &[u64]) -> Result<Vec<u64>> {
    let mut dst = Vec::new();
    let mut i = 0;
    while i < src.len() {
        let remaining = &src[i..];
        let mut matched = false;
        for (selector, &(n, bits)) in SELECTORS.iter().enumerate() {
            if can_pack(remaining, n, bits) {
                dst.push(pack(selector as u8, n, bits, remaining));
                i += n;
                matched = true;
                break;
            }
        }
        if !matched {
            return Err(Error::EncodeError(format!(
                "value {} exceeds the simple8b representable range (max {})",
                remaining[0], MAX_VALUE
            )));
        }
    }
    Ok(dst)
}

fn decode_all(words: &[u64]) -> Result<Vec<u64>> {
    let mut out = Vec::new();
    for &word in words {
        out.extend(unpack(word)?);
    }
    Ok(out)
}

fn words_to_bytes(words: &[u64]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(words.len() * 8);
    for &word in words {
        bytes.extend_from_slice(&word.to_be_bytes());
    }
    bytes
}

fn bytes_to_words(bytes: &[u8]) -> Result<Vec<u64>> {
    if bytes.len() % 8 != 0 {
        return Err(Error::Format {
            message: "simple8b postings are not a multiple of 8 bytes".to_string(),
            expected: None,
            actual: Some(bytes.len().to_string()),
        });
    }
    Ok(bytes
        .chunks_exact(8)
        .map(|chunk| u64::from_be_bytes(chunk.try_into().unwrap()))
        .collect())
}

pub fn encode(postings: &[u32]) -> Result<Vec<u8>> {
    let mut gaps = Vec::with_capacity(postings.len());
    let mut prev = 0u32;
    for &id in postings {
        gaps.push((id - prev) as u64);
        prev = id;
    }
    let words = encode_all(&gaps)?;
    Ok(words_to_bytes(&words))
}

pub fn decode(bytes: &[u8], count: usize) -> Result<Vec<u32>> {
    let words = bytes_to_words(bytes)?;
    let gaps = decode_all(&words)?;
    if gaps.len() != count {
        return Err(Error::Format {
            message: "simple8b postings do not contain the expected number of values".to_string(),
            expected: Some(count.to_string()),
            actual: Some(gaps.len().to_string()),
        });
    }

    let mut postings = Vec::with_capacity(count);
    let mut prev: u64 = 0;
    for gap in gaps {
        prev += gap;
        postings.push(prev as u32);
    }
    Ok(postings)
}
