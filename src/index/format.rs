//! On-disk record header: a sequence of
//! `(term ID: u32, document frequency: u32, postings byte length: u32)`
//! triples, each immediately followed by that many postings bytes, in
//! strictly ascending term-ID order. All header fields are big-endian.
//!
//! There is no file-level magic number or version: the format is exactly
//! the sequence of records above, nothing more, matching the minimal
//! contract the rest of the crate builds against.
//!
//! Alongside the main file sits a sidecar: a flat
//! `(term ID, postings offset, postings length, document frequency)`
//! table, written once at writer close and loaded eagerly by
//! [`super::reader::RandomAccessReader`] on open, so random lookup never
//! has to re-derive offsets by scanning the main file's headers.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, Result};

/// Byte length of one record header (three `u32` fields).
pub const HEADER_LEN: u64 = 12;

pub fn write_header<W: Write>(w: &mut W, term_id: u32, df: u32, postings_len: u32) -> io::Result<()> {
    w.write_u32::<BigEndian>(term_id)?;
    w.write_u32::<BigEndian>(df)?;
    w.write_u32::<BigEndian>(postings_len)?;
    Ok(())
}

pub fn read_header<R: Read>(r: &mut R) -> io::Result<(u32, u32, u32)> {
    let term_id = r.read_u32::<BigEndian>()?;
    let df = r.read_u32::<BigEndian>()?;
    let postings_len = r.read_u32::<BigEndian>()?;
    Ok((term_id, df, postings_len))
}

/// One sidecar entry: where a term's postings bytes live in the main
/// file, how long they are, and how many docIDs they decode to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidecarEntry {
    pub term_id: u32,
    pub postings_offset: u64,
    pub postings_len: u32,
    pub document_frequency: u32,
}

/// The sidecar file path for a given main index file: the same path with
/// `.sidecar` appended.
pub fn sidecar_path(index_path: &Path) -> PathBuf {
    let mut os_path = index_path.as_os_str().to_owned();
    os_path.push(".sidecar");
    PathBuf::from(os_path)
}

/// Writes `entries` to `path` as a flat `u32` count followed by that many
/// fixed-width records, each big-endian.
pub fn write_sidecar(path: &Path, entries: &[SidecarEntry]) -> io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_u32::<BigEndian>(entries.len() as u32)?;
    for entry in entries {
        w.write_u32::<BigEndian>(entry.term_id)?;
        w.write_u64::<BigEndian>(entry.postings_offset)?;
        w.write_u32::<BigEndian>(entry.postings_len)?;
        w.write_u32::<BigEndian>(entry.document_frequency)?;
    }
    w.flush()
}

/// Loads a sidecar previously written by [`write_sidecar`]. A trailing
/// byte past the declared entry count is a [`Error::Format`] — the
/// sidecar's own internal framing is inconsistent, independent of
/// whether it matches its main file.
pub fn read_sidecar(path: &Path) -> Result<Vec<SidecarEntry>> {
    let mut r = BufReader::new(File::open(path)?);
    let count = r.read_u32::<BigEndian>()?;
    let mut entries = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let term_id = r.read_u32::<BigEndian>()?;
        let postings_offset = r.read_u64::<BigEndian>()?;
        let postings_len = r.read_u32::<BigEndian>()?;
        let document_frequency = r.read_u32::<BigEndian>()?;
        entries.push(SidecarEntry {
            term_id,
            postings_offset,
            postings_len,
            document_frequency,
        });
    }

    let mut probe = [0u8; 1];
    if r.read(&mut probe)? != 0 {
        return Err(Error::Format {
            message: format!("sidecar {} has trailing bytes past its declared entry count", path.display()),
            expected: Some(format!("{count} entries")),
            actual: Some("additional trailing bytes".to_string()),
        });
    }

    Ok(entries)
}
