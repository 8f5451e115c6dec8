//! Gap-encoded Elias-Gamma postings representation.
//!
//! Each gap `n` (always `>= 1`) is written as `floor(log2(n))` zero bits
//! followed by the `floor(log2(n)) + 1`-bit binary representation of `n`,
//! packed most-significant-bit-first across byte boundaries. The last
//! partial byte of the stream is zero-padded.
//!
//! A gamma stream does not self-delimit at a byte boundary: trailing
//! padding bits are indistinguishable from the start of another zero
//! prefix. Rather than guess where the stream ends, [`decode`] takes the
//! number of values to recover explicitly — the on-disk index format
//! already stores each term's document frequency alongside its postings
//! bytes, so this is never a value the caller has to invent.

use crate::error::{Error, Result};

struct BitWriter {
    bytes: Vec<u8>,
    cur: u8,
    filled: u8,
}

impl BitWriter {
    fn new() -> Self {
        Self {
            bytes: Vec::new(),
            cur: 0,
            filled: 0,
        }
    }

    fn push_bit(&mut self, bit: u8) {
        self.cur = (self.cur << 1) | (bit & 1);
        self.filled += 1;
        if self.filled == 8 {
            self.bytes.push(self.cur);
            self.cur = 0;
            self.filled = 0;
        }
    }

    fn finish(mut self) -> Vec<u8> {
        if self.filled > 0 {
            self.cur <<= 8 - self.filled;
            self.bytes.push(self.cur);
        }
        self.bytes
    }
}

struct BitReader<'a> {
    bytes: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, bit_pos: 0 }
    }

    fn read_bit(&mut self) -> Result<u8> {
        let byte_idx = self.bit_pos / 8;
        let byte = *self.bytes.get(byte_idx).ok_or_else(|| Error::Format {
            message: "elias-gamma stream ended before the expected number of codes".to_string(),
            expected: None,
            actual: None,
        })?;
        let bit = (byte >> (7 - (self.bit_pos % 8))) & 1;
        self.bit_pos += 1;
        Ok(bit)
    }
}

fn encode_one(n: u64, writer: &mut BitWriter) {
    debug_assert!(n > 0);
    let msb_pos = 63 - n.leading_zeros();
    for _ in 0..msb_pos {
        writer.push_bit(0);
    }
    for i in (0..=msb_pos).rev() {
        writer.push_bit(((n >> i) & 1) as u8);
    }
}

fn decode_one(reader: &mut BitReader) -> Result<u64> {
    let mut zero_count = 0u32;
    while reader.read_bit()? == 0 {
        zero_count += 1;
    }
    let mut value: u64 = 1;
    for _ in 0..zero_count {
        value = (value << 1) | reader.read_bit()? as u64;
    }
    Ok(value)
}

pub fn encode(postings: &[u32]) -> Vec<u8> {
    if postings.is_empty() {
        return Vec::new();
    }
    let mut gaps = Vec::with_capacity(postings.len());
    let mut prev = 0u32;
    for &id in postings {
        gaps.push((id - prev) as u64);
        prev = id;
    }

    let mut writer = BitWriter::new();
    for gap in gaps {
        encode_one(gap, &mut writer);
    }
    writer.finish()
}

pub fn decode(bytes: &[u8], count: usize) -> Result<Vec<u32>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let mut reader = BitReader::new(bytes);
    let mut postings = Vec::with_capacity(count);
    let mut prev: u64 = 0;
    for _ in 0..count {
        prev += decode_one(&mut reader)?;
        postings.push(prev as u32);
    }
    Ok(postings)
}
