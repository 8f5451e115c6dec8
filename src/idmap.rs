//! Bidirectional string <-> positive-integer identifier map.
//!
//! IDs are 1-based and assigned in insertion order: the first distinct
//! string seen gets ID 1, the second distinct string gets ID 2, and so on.
//! Once assigned, an ID is immutable — re-inserting an already-known string
//! returns its existing ID rather than allocating a new one.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};

/// A bidirectional string <-> ID map, grown with [`IdMap::get_or_assign`]
/// while a corpus or vocabulary is being scanned.
#[derive(Debug, Default, Clone)]
pub struct IdMap {
    str_to_id: HashMap<String, u32>,
    id_to_str: Vec<String>,
}

impl IdMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct strings currently assigned an ID.
    pub fn len(&self) -> usize {
        self.id_to_str.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_str.is_empty()
    }

    /// Returns `s`'s ID, assigning the next one in sequence if `s` has not
    /// been seen before.
    pub fn get_or_assign(&mut self, s: &str) -> u32 {
        if let Some(&id) = self.str_to_id.get(s) {
            return id;
        }
        let id = (self.id_to_str.len() + 1) as u32;
        self.id_to_str.push(s.to_string());
        self.str_to_id.insert(s.to_string(), id);
        id
    }

    /// Looks up an already-assigned ID without creating one.
    pub fn id_of(&self, s: &str) -> Option<u32> {
        self.str_to_id.get(s).copied()
    }

    /// Looks up the string for an ID previously returned by this map.
    ///
    /// # Panics
    ///
    /// Panics if `id` was never assigned by this map — this indicates a
    /// caller bug (an ID minted elsewhere, or from a different map), not a
    /// recoverable runtime condition.
    pub fn str_of(&self, id: u32) -> &str {
        &self.id_to_str[(id - 1) as usize]
    }

    /// Serializes the map to `path` as two sections: a sorted FST mapping
    /// string -> ID (for compact on-disk storage of the forward
    /// direction), followed by a postcard-encoded `Vec<String>` giving the
    /// reverse direction in ID order. Either direction can be reconstructed
    /// from the other; both are stored so neither needs reconstruction at
    /// load time.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut sorted: Vec<(&String, u32)> =
            self.str_to_id.iter().map(|(s, &id)| (s, id)).collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let mut builder = fst::MapBuilder::memory();
        for (s, id) in sorted {
            builder.insert(s, id as u64).map_err(Error::from)?;
        }
        let fst_bytes = builder.into_inner().map_err(Error::from)?;

        let reverse_bytes = postcard::to_allocvec(&self.id_to_str)?;

        let mut file = std::fs::File::create(path)?;
        file.write_all(&(fst_bytes.len() as u64).to_be_bytes())?;
        file.write_all(&fst_bytes)?;
        file.write_all(&(reverse_bytes.len() as u64).to_be_bytes())?;
        file.write_all(&reverse_bytes)?;
        Ok(())
    }

    /// Loads a map previously written by [`IdMap::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let mut cursor = 0usize;

        let read_u64 = |bytes: &[u8], at: usize| -> Result<u64> {
            let slice = bytes.get(at..at + 8).ok_or_else(|| Error::Format {
                message: "identifier map truncated before length prefix".to_string(),
                expected: None,
                actual: None,
            })?;
            Ok(u64::from_be_bytes(slice.try_into().unwrap()))
        };

        let fst_len = read_u64(&bytes, cursor)? as usize;
        cursor += 8;
        let fst_bytes = bytes.get(cursor..cursor + fst_len).ok_or_else(|| Error::Format {
            message: "identifier map truncated in fst section".to_string(),
            expected: None,
            actual: None,
        })?;
        let map = fst::Map::new(fst_bytes.to_vec()).map_err(Error::from)?;
        cursor += fst_len;

        let reverse_len = read_u64(&bytes, cursor)? as usize;
        cursor += 8;
        let reverse_bytes =
            bytes
                .get(cursor..cursor + reverse_len)
                .ok_or_else(|| Error::Format {
                    message: "identifier map truncated in reverse section".to_string(),
                    expected: None,
                    actual: None,
                })?;
        let id_to_str: Vec<String> = postcard::from_bytes(reverse_bytes)?;

        let mut str_to_id = HashMap::with_capacity(id_to_str.len());
        let mut fst_stream = fst::Streamer::into_stream(map.stream());
        use fst::Streamer as _;
        while let Some((key, value)) = fst_stream.next() {
            let s = String::from_utf8(key.to_vec()).map_err(|_| Error::Format {
                message: "identifier map contains non-UTF-8 key".to_string(),
                expected: None,
                actual: None,
            })?;
            str_to_id.insert(s, value as u32);
        }

        Ok(Self {
            str_to_id,
            id_to_str,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_dense_one_based_ids_in_insertion_order() {
        let mut map = IdMap::new();
        let ids: Vec<u32> = ["halo", "semua", "selamat", "pagi", "semua"]
            .iter()
            .map(|s| map.get_or_assign(s))
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 2]);
        assert_eq!(map.str_of(2), "semua");
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn id_of_does_not_mint_new_ids() {
        let mut map = IdMap::new();
        map.get_or_assign("term");
        assert_eq!(map.id_of("term"), Some(1));
        assert_eq!(map.id_of("unseen"), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn round_trips_through_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ids.map");

        let mut map = IdMap::new();
        for s in ["alpha", "beta", "gamma", "beta", "delta"] {
            map.get_or_assign(s);
        }
        map.save(&path).unwrap();

        let loaded = IdMap::load(&path).unwrap();
        assert_eq!(loaded.len(), map.len());
        for id in 1..=map.len() as u32 {
            assert_eq!(loaded.str_of(id), map.str_of(id));
        }
        for s in ["alpha", "beta", "gamma", "delta", "missing"] {
            assert_eq!(loaded.id_of(s), map.id_of(s));
        }
    }
}
