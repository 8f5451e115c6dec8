//! Gap-encoded Variable-Byte postings representation.
//!
//! Each gap is written as a sequence of base-128 groups, most-significant
//! group first; the final (least-significant) byte of each number has its
//! high bit set, every preceding byte has it clear. This lets the decoder
//! recognize a number's end without a separate length field.

use crate::error::{Error, Result};

fn gaps(postings: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(postings.len());
    let mut prev = 0u32;
    for &id in postings {
        out.push(id - prev);
        prev = id;
    }
    out
}

fn encode_number(mut n: u32) -> Vec<u8> {
    let mut digits = Vec::new();
    loop {
        digits.push((n % 128) as u8);
        if n < 128 {
            break;
        }
        n /= 128;
    }
    digits.reverse();
    let last = digits.len() - 1;
    digits[last] += 128;
    digits
}

pub fn encode(postings: &[u32]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for gap in gaps(postings) {
        bytes.extend(encode_number(gap));
    }
    bytes
}

pub fn decode(bytes: &[u8], count: usize) -> Result<Vec<u32>> {
    let mut gaps = Vec::with_capacity(count);
    let mut n: u32 = 0;
    for &byte in bytes {
        if byte < 128 {
            n = 128 * n + byte as u32;
        } else {
            n = 128 * n + (byte - 128) as u32;
            gaps.push(n);
            n = 0;
        }
    }
    if gaps.len() != count {
        return Err(Error::Format {
            message: "variable-byte postings do not contain the expected number of values"
                .to_string(),
            expected: Some(count.to_string()),
            actual: Some(gaps.len().to_string()),
        });
    }

    let mut postings = Vec::with_capacity(count);
    let mut prev = 0u32;
    for gap in gaps {
        prev += gap;
        postings.push(prev);
    }
    Ok(postings)
}
