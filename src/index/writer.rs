//! Append-only writer for the on-disk inverted-index file format.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::format::{self, SidecarEntry};
use crate::codecs::Codec;
use crate::error::{Error, Result};

/// Writes term records in strictly ascending term-ID order. Used both for
/// each block's intermediate index and for the final merged index — the
/// format and the ordering invariant are identical in both cases.
///
/// Accumulates a `(term ID, offset, length, document frequency)` entry
/// per appended term as it writes, and persists the accumulated table as
/// a sidecar file next to the main file when [`IndexWriter::finish`]
/// closes it — this is the table [`super::reader::RandomAccessReader`]
/// loads on open instead of re-deriving it by scanning.
pub struct IndexWriter {
    path: PathBuf,
    file: BufWriter<File>,
    codec: Codec,
    last_term_id: Option<u32>,
    pos: u64,
    sidecar: Vec<SidecarEntry>,
}

impl IndexWriter {
    pub fn create(path: &Path, codec: Codec) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file: BufWriter::new(file),
            codec,
            last_term_id: None,
            pos: 0,
            sidecar: Vec::new(),
        })
    }

    /// Appends one term's postings list. `postings` must be strictly
    /// ascending, and `term_id` must be strictly greater than the term ID
    /// of the previous call — both are caller-upheld invariants of the
    /// on-disk format, not recoverable runtime conditions.
    pub fn append(&mut self, term_id: u32, postings: &[u32]) -> Result<()> {
        if let Some(last) = self.last_term_id {
            if term_id <= last {
                return Err(Error::ProgrammingError(format!(
                    "index writer requires strictly ascending term IDs: got {term_id} after {last}"
                )));
            }
        }
        if !postings.windows(2).all(|w| w[0] < w[1]) {
            return Err(Error::ProgrammingError(
                "postings list passed to the index writer must be strictly ascending".to_string(),
            ));
        }

        let bytes = self.codec.encode(postings)?;
        format::write_header(&mut self.file, term_id, postings.len() as u32, bytes.len() as u32)?;
        self.file.write_all(&bytes)?;

        let postings_offset = self.pos + format::HEADER_LEN;
        self.sidecar.push(SidecarEntry {
            term_id,
            postings_offset,
            postings_len: bytes.len() as u32,
            document_frequency: postings.len() as u32,
        });
        self.pos = postings_offset + bytes.len() as u64;
        self.last_term_id = Some(term_id);
        Ok(())
    }

    /// Flushes and closes the main file, then persists the accumulated
    /// sidecar table to its adjacent file. A clean return leaves both
    /// files on disk and readable.
    pub fn finish(mut self) -> Result<()> {
        self.file.flush()?;
        format::write_sidecar(&format::sidecar_path(&self.path), &self.sidecar)?;
        Ok(())
    }
}
