//! Per-block parsing and local inversion: the first half of BSBI.
//!
//! Each immediate subdirectory of the corpus root is one block; each
//! regular file within it is one document. Blocks are processed in
//! lexicographic name order, and documents within a block in
//! lexicographic filename order, so that identifier assignment is
//! reproducible across runs over the same corpus.

use std::fs;
use std::path::{Path, PathBuf};

use crate::codecs::Codec;
use crate::error::{Error, Result};
use crate::idmap::IdMap;
use crate::index::writer::IndexWriter;
use crate::query::{Stemmer, Stopwords};

use super::tokenizer;

/// One block's intermediate index, named after the block for
/// traceability.
pub struct Block {
    pub name: String,
    pub path: PathBuf,
}

fn sorted_dir_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    entries.sort();
    Ok(entries)
}

fn utf8_file_name(path: &Path) -> Result<&str> {
    path.file_name().and_then(|n| n.to_str()).ok_or_else(|| Error::Format {
        message: format!("{} is not valid UTF-8", path.display()),
        expected: None,
        actual: None,
    })
}

/// Decodes `raw` as UTF-8, dropping malformed byte sequences outright
/// rather than substituting a replacement character for them. A
/// replacement character would otherwise act as a tokenizer word
/// boundary, fusing together what should be one token across the bad
/// bytes.
fn decode_utf8_dropping_invalid(raw: &[u8]) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while !rest.is_empty() {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                out.push_str(valid);
                break;
            }
            Err(err) => {
                let valid_len = err.valid_up_to();
                if valid_len > 0 {
                    out.push_str(std::str::from_utf8(&rest[..valid_len]).unwrap());
                }
                match err.error_len() {
                    Some(bad_len) => rest = &rest[valid_len + bad_len..],
                    None => break,
                }
            }
        }
    }
    out
}

/// Sorts `pairs` by `(term_id, doc_id)`, then groups into one ascending,
/// deduplicated postings list per term.
fn invert_block(mut pairs: Vec<(u32, u32)>) -> Vec<(u32, Vec<u32>)> {
    pairs.sort_unstable();
    pairs.dedup();
    let mut grouped: Vec<(u32, Vec<u32>)> = Vec::new();
    for (term_id, doc_id) in pairs {
        match grouped.last_mut() {
            Some((last_term, docs)) if *last_term == term_id => docs.push(doc_id),
            _ => grouped.push((term_id, vec![doc_id])),
        }
    }
    grouped
}

/// Parses every block under `data_path`, in lexicographic block-name
/// order, assigning term and document IDs into `term_ids`/`doc_ids` as
/// new strings are encountered. Each block is inverted in memory and
/// written to its own intermediate index under `output_path` before the
/// next block is parsed, so only one block's postings accumulate in
/// memory at a time. Returns the blocks in processing order.
pub fn build_blocks(
    data_path: &Path,
    output_path: &Path,
    codec: Codec,
    stemmer: &dyn Stemmer,
    stopwords: &Stopwords,
    term_ids: &mut IdMap,
    doc_ids: &mut IdMap,
) -> Result<Vec<Block>> {
    let mut blocks = Vec::new();

    for block_dir in sorted_dir_entries(data_path)? {
        if !block_dir.is_dir() {
            continue;
        }
        let block_name = utf8_file_name(&block_dir)?.to_string();
        let mut pairs: Vec<(u32, u32)> = Vec::new();

        for doc_path in sorted_dir_entries(&block_dir)? {
            if !doc_path.is_file() {
                continue;
            }
            let filename = utf8_file_name(&doc_path)?;
            let relative_path = format!("{block_name}/{filename}");
            let doc_id = doc_ids.get_or_assign(&relative_path);

            let raw = fs::read(&doc_path)?;
            let text = decode_utf8_dropping_invalid(&raw);

            for token in tokenizer::tokenize(&text) {
                if stopwords.contains(&token) {
                    continue;
                }
                let stemmed = stemmer.stem(&token);
                let term_id = term_ids.get_or_assign(&stemmed);
                pairs.push((term_id, doc_id));
            }
        }

        let block_path = output_path.join(format!("intermediate_index_{block_name}"));
        let mut writer = IndexWriter::create(&block_path, codec)?;
        for (term_id, docs) in invert_block(pairs) {
            writer.append(term_id, &docs)?;
        }
        writer.finish()?;

        blocks.push(Block {
            name: block_name,
            path: block_path,
        });
    }

    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::reader::SequentialReader;
    use crate::query::NoopStemmer;

    fn write_doc(dir: &Path, block: &str, file: &str, contents: &str) {
        let block_dir = dir.join(block);
        fs::create_dir_all(&block_dir).unwrap();
        fs::write(block_dir.join(file), contents).unwrap();
    }

    #[test]
    fn drops_malformed_utf8_instead_of_substituting_a_replacement_character() {
        // "cat" + a lone continuation byte (invalid on its own) + "dog",
        // with no surrounding whitespace. A replacement character would
        // split this into two tokens; dropping the bad byte fuses them
        // into one "catdog" token, matching `errors='ignore'` semantics.
        let mut raw = b"cat".to_vec();
        raw.push(0x80);
        raw.extend_from_slice(b"dog");
        assert_eq!(decode_utf8_dropping_invalid(&raw), "catdog");
    }

    #[test]
    fn decode_passes_through_valid_utf8_unchanged() {
        let raw = "café résumé".as_bytes();
        assert_eq!(decode_utf8_dropping_invalid(raw), "café résumé");
    }

    #[test]
    fn builds_one_intermediate_index_per_block_with_deterministic_ids() {
        let corpus = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_doc(corpus.path(), "b0", "d0.txt", "cat dog");
        write_doc(corpus.path(), "b1", "d1.txt", "dog fish");

        let mut term_ids = IdMap::new();
        let mut doc_ids = IdMap::new();
        let blocks = build_blocks(
            corpus.path(),
            output.path(),
            Codec::VariableByte,
            &NoopStemmer,
            &Stopwords::empty(),
            &mut term_ids,
            &mut doc_ids,
        )
        .unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].name, "b0");
        assert_eq!(blocks[1].name, "b1");
        assert_eq!(doc_ids.id_of("b0/d0.txt"), Some(1));
        assert_eq!(doc_ids.id_of("b1/d1.txt"), Some(2));

        let cat = term_ids.id_of("cat").unwrap();
        let dog = term_ids.id_of("dog").unwrap();
        let fish = term_ids.id_of("fish").unwrap();

        let mut b0_reader = SequentialReader::open(&blocks[0].path, Codec::VariableByte).unwrap();
        let mut b0_terms = Vec::new();
        while let Some(entry) = b0_reader.next_term().unwrap() {
            b0_terms.push(entry);
        }
        assert_eq!(b0_terms, vec![(cat.min(dog), vec![1]), (cat.max(dog), vec![1])]);

        let mut b1_reader = SequentialReader::open(&blocks[1].path, Codec::VariableByte).unwrap();
        let mut b1_terms = Vec::new();
        while let Some(entry) = b1_reader.next_term().unwrap() {
            b1_terms.push(entry);
        }
        assert_eq!(b1_terms, vec![(dog.min(fish), vec![2]), (dog.max(fish), vec![2])]);
    }

    #[test]
    fn stopwords_are_dropped_before_stemming() {
        let corpus = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_doc(corpus.path(), "b0", "d0.txt", "the cat sat");

        let mut term_ids = IdMap::new();
        let mut doc_ids = IdMap::new();
        let stopwords = Stopwords::new(["the".to_string()]);
        build_blocks(
            corpus.path(),
            output.path(),
            Codec::Fixed32,
            &NoopStemmer,
            &stopwords,
            &mut term_ids,
            &mut doc_ids,
        )
        .unwrap();

        assert_eq!(term_ids.id_of("the"), None);
        assert!(term_ids.id_of("cat").is_some());
        assert!(term_ids.id_of("sat").is_some());
    }
}
