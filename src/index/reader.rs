//! Readers for the on-disk inverted-index file format.
//!
//! Two access paths, matching two different callers:
//!
//! - [`SequentialReader`] reads records front-to-back and decodes each as
//!   it goes. The BSBI merge step uses this against every intermediate
//!   index, since a merge visits every record of every input exactly once
//!   in order.
//! - [`RandomAccessReader`] loads the main file's sidecar (`term ID ->
//!   (offset, length, document frequency)`) from its adjacent `.sidecar`
//!   file at open time, without decoding or even reading any postings
//!   bytes, then seeks directly to a term's bytes on lookup. Query
//!   serving against the final merged index uses this, since a query
//!   touches a handful of terms, not all of them.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use super::format;
use crate::codecs::Codec;
use crate::error::{Error, Result};

pub struct SequentialReader {
    reader: BufReader<File>,
    codec: Codec,
    pos: u64,
    len: u64,
}

impl SequentialReader {
    pub fn open(path: &Path, codec: Codec) -> Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        Ok(Self {
            reader: BufReader::new(file),
            codec,
            pos: 0,
            len,
        })
    }

    /// Reads and decodes the next record, or `None` at end of file.
    pub fn next_term(&mut self) -> Result<Option<(u32, Vec<u32>)>> {
        if self.pos >= self.len {
            return Ok(None);
        }
        let (term_id, df, postings_len) = format::read_header(&mut self.reader)?;
        let mut bytes = vec![0u8; postings_len as usize];
        self.reader.read_exact(&mut bytes)?;
        self.pos += format::HEADER_LEN + postings_len as u64;
        let postings = self.codec.decode(&bytes, df as usize)?;
        Ok(Some((term_id, postings)))
    }
}

struct TermEntry {
    postings_offset: u64,
    postings_len: u32,
    document_frequency: u32,
}

pub struct RandomAccessReader {
    file: File,
    codec: Codec,
    sidecar: HashMap<u32, TermEntry>,
}

impl RandomAccessReader {
    /// Opens `path` for random-access lookup by loading its sidecar file
    /// (`path` with `.sidecar` appended, written by
    /// [`super::writer::IndexWriter::finish`]) rather than rebuilding the
    /// offset table by scanning `path` itself. Every sidecar entry's
    /// postings span is checked against the main file's actual length;
    /// an entry reaching past the end of the file is a sidecar that
    /// disagrees with its main file, reported as [`Error::Format`].
    pub fn open(path: &Path, codec: Codec) -> Result<Self> {
        let entries = format::read_sidecar(&format::sidecar_path(path))?;

        let file = File::open(path)?;
        let file_len = file.metadata()?.len();

        let mut sidecar = HashMap::with_capacity(entries.len());
        for entry in entries {
            let postings_end = entry.postings_offset + entry.postings_len as u64;
            if postings_end > file_len {
                return Err(Error::Format {
                    message: format!(
                        "sidecar entry for term {} in {} extends past the end of {}",
                        entry.term_id,
                        format::sidecar_path(path).display(),
                        path.display()
                    ),
                    expected: Some(format!("offset + length <= {file_len}")),
                    actual: Some(postings_end.to_string()),
                });
            }
            sidecar.insert(
                entry.term_id,
                TermEntry {
                    postings_offset: entry.postings_offset,
                    postings_len: entry.postings_len,
                    document_frequency: entry.document_frequency,
                },
            );
        }

        Ok(Self {
            file,
            codec,
            sidecar,
        })
    }

    /// Returns the postings for `term_id`, or `None` if the term was never
    /// indexed. Callers that want "unknown term behaves like an empty
    /// postings list" (as boolean retrieval does) map `None` to `&[]`
    /// themselves — this layer distinguishes the two cases so a caller
    /// that cares about the difference still can.
    pub fn get_postings(&mut self, term_id: u32) -> Result<Option<Vec<u32>>> {
        let Some(entry) = self.sidecar.get(&term_id) else {
            return Ok(None);
        };
        let (offset, len, df) = (
            entry.postings_offset,
            entry.postings_len,
            entry.document_frequency,
        );
        self.file.seek(SeekFrom::Start(offset))?;
        let mut bytes = vec![0u8; len as usize];
        self.file.read_exact(&mut bytes)?;
        Ok(Some(self.codec.decode(&bytes, df as usize)?))
    }

    pub fn document_frequency(&self, term_id: u32) -> Option<u32> {
        self.sidecar.get(&term_id).map(|e| e.document_frequency)
    }

    pub fn term_count(&self) -> usize {
        self.sidecar.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::writer::IndexWriter;

    #[test]
    fn random_access_matches_sequential_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idx");
        let mut writer = IndexWriter::create(&path, Codec::Simple8b).unwrap();
        writer.append(2, &[10, 20, 30]).unwrap();
        writer.append(9, &[5]).unwrap();
        writer.finish().unwrap();

        let mut random = RandomAccessReader::open(&path, Codec::Simple8b).unwrap();
        assert_eq!(random.term_count(), 2);
        assert_eq!(random.get_postings(2).unwrap(), Some(vec![10, 20, 30]));
        assert_eq!(random.get_postings(9).unwrap(), Some(vec![5]));
        assert_eq!(random.get_postings(1).unwrap(), None);
        assert_eq!(random.document_frequency(2), Some(3));
    }

    #[test]
    fn open_without_a_sidecar_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idx");
        std::fs::write(&path, []).unwrap();

        assert!(RandomAccessReader::open(&path, Codec::Fixed32).is_err());
    }

    #[test]
    fn sidecar_entry_past_the_end_of_a_truncated_main_file_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idx");
        let mut writer = IndexWriter::create(&path, Codec::Fixed32).unwrap();
        writer.append(1, &[1, 2, 3]).unwrap();
        writer.append(2, &[4]).unwrap();
        writer.finish().unwrap();

        // Truncate the main file so the sidecar's second entry now
        // points past the end of it, simulating a sidecar that has
        // drifted out of sync with its main file.
        let full_len = std::fs::metadata(&path).unwrap().len();
        let file = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
        file.set_len(full_len - 1).unwrap();

        let err = RandomAccessReader::open(&path, Codec::Fixed32).unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
    }
}
