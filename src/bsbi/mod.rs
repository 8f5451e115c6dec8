//! BSBI (blocked sort-based indexing) build pipeline.
//!
//! [`build`] runs the whole pipeline: parse and locally invert every
//! block ([`builder::build_blocks`]), merge the intermediate indices
//! into one final index ([`merge::merge_blocks`]), and persist both
//! identifier maps. Intermediate indices are left on disk under
//! `output_path` after the merge completes — they are transient inputs
//! a caller is free to clean up, not something this pipeline deletes on
//! the caller's behalf.

mod builder;
mod merge;
mod tokenizer;

use std::path::PathBuf;

use crate::codecs::Codec;
use crate::error::Result;
use crate::idmap::IdMap;
use crate::query::{Stemmer, Stopwords};

pub use builder::Block;

/// Construction parameters for a build, mirroring the driver-supplied
/// `(data_path, output_path, codec, index_name?)` surface: a corpus
/// directory in, a directory of build artifacts out.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub data_path: PathBuf,
    pub output_path: PathBuf,
    pub codec: Codec,
    pub index_name: Option<String>,
}

impl BuildConfig {
    pub fn new(data_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>, codec: Codec) -> Self {
        Self {
            data_path: data_path.into(),
            output_path: output_path.into(),
            codec,
            index_name: None,
        }
    }

    /// The final index's file name, defaulting to `main_index`.
    pub fn index_name(&self) -> &str {
        self.index_name.as_deref().unwrap_or("main_index")
    }

    pub fn final_index_path(&self) -> PathBuf {
        self.output_path.join(self.index_name())
    }
}

/// What a completed build produced: the grown identifier maps and the
/// path of the final merged index.
pub struct BuildResult {
    pub term_ids: IdMap,
    pub doc_ids: IdMap,
    pub final_index_path: PathBuf,
}

/// Runs a full build over `config.data_path`: parses and inverts every
/// block, merges the intermediate indices into the final index, and
/// writes `terms.dict`/`docs.dict` under `config.output_path`.
pub fn build(config: &BuildConfig, stemmer: &dyn Stemmer, stopwords: &Stopwords) -> Result<BuildResult> {
    std::fs::create_dir_all(&config.output_path)?;

    let mut term_ids = IdMap::new();
    let mut doc_ids = IdMap::new();

    let blocks = builder::build_blocks(
        &config.data_path,
        &config.output_path,
        config.codec,
        stemmer,
        stopwords,
        &mut term_ids,
        &mut doc_ids,
    )?;

    let final_index_path = config.final_index_path();
    merge::merge_blocks(&blocks, config.codec, &final_index_path)?;

    term_ids.save(&config.output_path.join("terms.dict"))?;
    doc_ids.save(&config.output_path.join("docs.dict"))?;

    Ok(BuildResult {
        term_ids,
        doc_ids,
        final_index_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::NoopStemmer;
    use std::fs;

    #[test]
    fn end_to_end_build_produces_the_expected_postings() {
        let corpus = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::create_dir_all(corpus.path().join("b0")).unwrap();
        fs::create_dir_all(corpus.path().join("b1")).unwrap();
        fs::write(corpus.path().join("b0/d0.txt"), "cat dog").unwrap();
        fs::write(corpus.path().join("b1/d1.txt"), "dog fish").unwrap();

        let config = BuildConfig::new(corpus.path(), output.path(), Codec::Simple8b);
        let result = build(&config, &NoopStemmer, &Stopwords::empty()).unwrap();

        assert_eq!(result.doc_ids.id_of("b0/d0.txt"), Some(1));
        assert_eq!(result.doc_ids.id_of("b1/d1.txt"), Some(2));

        let mut reader =
            crate::index::reader::RandomAccessReader::open(&result.final_index_path, Codec::Simple8b)
                .unwrap();
        let cat_id = result.term_ids.id_of("cat").unwrap();
        let dog_id = result.term_ids.id_of("dog").unwrap();
        let fish_id = result.term_ids.id_of("fish").unwrap();

        assert_eq!(reader.get_postings(cat_id).unwrap(), Some(vec![1]));
        assert_eq!(reader.get_postings(dog_id).unwrap(), Some(vec![1, 2]));
        assert_eq!(reader.get_postings(fish_id).unwrap(), Some(vec![2]));

        assert!(output.path().join("terms.dict").exists());
        assert!(output.path().join("docs.dict").exists());
    }

    #[test]
    fn building_twice_over_the_same_corpus_is_byte_identical() {
        let corpus = tempfile::tempdir().unwrap();
        fs::create_dir_all(corpus.path().join("b0")).unwrap();
        fs::write(corpus.path().join("b0/d0.txt"), "cat dog cat fish").unwrap();

        let output_a = tempfile::tempdir().unwrap();
        let output_b = tempfile::tempdir().unwrap();
        let config_a = BuildConfig::new(corpus.path(), output_a.path(), Codec::VariableByte);
        let config_b = BuildConfig::new(corpus.path(), output_b.path(), Codec::VariableByte);

        let result_a = build(&config_a, &NoopStemmer, &Stopwords::empty()).unwrap();
        let result_b = build(&config_b, &NoopStemmer, &Stopwords::empty()).unwrap();

        let bytes_a = fs::read(result_a.final_index_path).unwrap();
        let bytes_b = fs::read(result_b.final_index_path).unwrap();
        assert_eq!(bytes_a, bytes_b);
    }
}
