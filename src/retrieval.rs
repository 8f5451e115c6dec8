//! Boolean retrieval: evaluating a parsed query's postfix token stream
//! against the final index, and the read-only facade a caller opens to
//! run queries over a completed build.

use std::path::Path;

use crate::algebra;
use crate::error::{Error, Result};
use crate::idmap::IdMap;
use crate::index::reader::RandomAccessReader;
use crate::query::{self, Stemmer, Stopwords, Token};
use crate::Codec;

/// Evaluates a postfix token stream with a stack: operands fetch
/// postings (an unknown term contributes an empty list, not an error),
/// operators fold the top two entries with the matching sorted-list
/// algebra operation. An empty postfix stream evaluates to an empty
/// result.
pub fn evaluate(postfix: &[Token], reader: &mut RandomAccessReader, term_ids: &IdMap) -> Result<Vec<u32>> {
    let mut stack: Vec<Vec<u32>> = Vec::new();

    for token in postfix {
        match token {
            Token::Operand(term) => {
                let postings = match term_ids.id_of(term) {
                    Some(id) => reader.get_postings(id)?.unwrap_or_default(),
                    None => Vec::new(),
                };
                stack.push(postings);
            }
            Token::And | Token::Or | Token::Diff => {
                let b = stack
                    .pop()
                    .ok_or_else(|| Error::ProgrammingError("postfix stream underflowed an operator".to_string()))?;
                let a = stack
                    .pop()
                    .ok_or_else(|| Error::ProgrammingError("postfix stream underflowed an operator".to_string()))?;
                let result = match token {
                    Token::And => algebra::intersect(&a, &b),
                    Token::Or => algebra::union(&a, &b),
                    Token::Diff => algebra::diff(&a, &b),
                    _ => unreachable!(),
                };
                stack.push(result);
            }
            Token::LParen | Token::RParen => {
                return Err(Error::ProgrammingError(
                    "postfix token stream must not contain parentheses".to_string(),
                ))
            }
        }
    }

    match stack.len() {
        0 => Ok(Vec::new()),
        1 => Ok(stack.pop().unwrap()),
        _ => Err(Error::ProgrammingError(
            "postfix token stream left more than one value on the evaluation stack".to_string(),
        )),
    }
}

/// A completed build, opened read-only for querying: the two persisted
/// identifier maps plus a random-access reader over the final index.
pub struct Index {
    term_ids: IdMap,
    doc_ids: IdMap,
    reader: RandomAccessReader,
}

impl Index {
    /// Opens the build artifacts under `output_path`. Fails with
    /// [`Error::NotIndexed`] if any of `terms.dict`, `docs.dict`, or the
    /// final index file (named `index_name`, defaulting to
    /// `main_index`) is missing.
    pub fn open(output_path: &Path, codec: Codec, index_name: Option<&str>) -> Result<Self> {
        let terms_path = output_path.join("terms.dict");
        let docs_path = output_path.join("docs.dict");
        let index_path = output_path.join(index_name.unwrap_or("main_index"));

        for path in [&terms_path, &docs_path, &index_path] {
            if !path.exists() {
                return Err(Error::NotIndexed(format!(
                    "build artifact missing at {}; run a build before querying",
                    path.display()
                )));
            }
        }

        Ok(Self {
            term_ids: IdMap::load(&terms_path)?,
            doc_ids: IdMap::load(&docs_path)?,
            reader: RandomAccessReader::open(&index_path, codec)?,
        })
    }

    /// Parses, validates, and evaluates `query`, returning the matching
    /// document paths in ascending document-ID order.
    pub fn search(&mut self, query: &str, stemmer: &dyn Stemmer, stopwords: &Stopwords) -> Result<Vec<String>> {
        let postfix = query::parse(query, stemmer, stopwords)?;
        let doc_ids = evaluate(&postfix, &mut self.reader, &self.term_ids)?;
        Ok(doc_ids
            .into_iter()
            .map(|id| self.doc_ids.str_of(id).to_string())
            .collect())
    }

    pub fn term_ids(&self) -> &IdMap {
        &self.term_ids
    }

    pub fn doc_ids(&self) -> &IdMap {
        &self.doc_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsbi::{build, BuildConfig};
    use crate::index::writer::IndexWriter;
    use crate::query::NoopStemmer;
    use std::fs;

    #[test]
    fn unknown_operand_contributes_empty_postings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idx");
        let mut writer = IndexWriter::create(&path, Codec::Fixed32).unwrap();
        writer.append(1, &[1, 2]).unwrap();
        writer.finish().unwrap();

        let mut reader = RandomAccessReader::open(&path, Codec::Fixed32).unwrap();
        let mut term_ids = IdMap::new();
        term_ids.get_or_assign("known");

        let postfix = vec![Token::Operand("unknown".to_string())];
        assert_eq!(evaluate(&postfix, &mut reader, &term_ids).unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn evaluates_and_or_diff_over_fetched_postings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idx");
        let mut writer = IndexWriter::create(&path, Codec::Fixed32).unwrap();
        writer.append(1, &[1, 2, 3]).unwrap();
        writer.append(2, &[2, 3, 4]).unwrap();
        writer.finish().unwrap();

        let mut term_ids = IdMap::new();
        assert_eq!(term_ids.get_or_assign("a"), 1);
        assert_eq!(term_ids.get_or_assign("b"), 2);

        let mut reader = RandomAccessReader::open(&path, Codec::Fixed32).unwrap();

        let and_postfix = vec![
            Token::Operand("a".to_string()),
            Token::Operand("b".to_string()),
            Token::And,
        ];
        assert_eq!(evaluate(&and_postfix, &mut reader, &term_ids).unwrap(), vec![2, 3]);

        let or_postfix = vec![
            Token::Operand("a".to_string()),
            Token::Operand("b".to_string()),
            Token::Or,
        ];
        assert_eq!(evaluate(&or_postfix, &mut reader, &term_ids).unwrap(), vec![1, 2, 3, 4]);

        let diff_postfix = vec![
            Token::Operand("a".to_string()),
            Token::Operand("b".to_string()),
            Token::Diff,
        ];
        assert_eq!(evaluate(&diff_postfix, &mut reader, &term_ids).unwrap(), vec![1]);
    }

    #[test]
    fn opening_before_a_build_reports_not_indexed() {
        let dir = tempfile::tempdir().unwrap();
        let err = Index::open(dir.path(), Codec::Fixed32, None).unwrap_err();
        assert!(matches!(err, Error::NotIndexed(_)));
    }

    #[test]
    fn end_to_end_build_and_query() {
        let corpus = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::create_dir_all(corpus.path().join("b0")).unwrap();
        fs::create_dir_all(corpus.path().join("b1")).unwrap();
        fs::write(corpus.path().join("b0/d0.txt"), "cat dog").unwrap();
        fs::write(corpus.path().join("b1/d1.txt"), "dog fish").unwrap();

        let config = BuildConfig::new(corpus.path(), output.path(), Codec::EliasGamma);
        build(&config, &NoopStemmer, &Stopwords::empty()).unwrap();

        let mut index = Index::open(output.path(), Codec::EliasGamma, None).unwrap();
        let stopwords = Stopwords::empty();

        assert_eq!(
            index.search("cat AND dog", &NoopStemmer, &stopwords).unwrap(),
            vec!["b0/d0.txt".to_string()]
        );
        assert_eq!(
            index.search("cat OR fish", &NoopStemmer, &stopwords).unwrap(),
            vec!["b0/d0.txt".to_string(), "b1/d1.txt".to_string()]
        );
        assert_eq!(
            index.search("dog DIFF cat", &NoopStemmer, &stopwords).unwrap(),
            vec!["b1/d1.txt".to_string()]
        );
    }
}
