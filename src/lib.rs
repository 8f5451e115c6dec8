//! Disk-resident inverted index with boolean (AND/OR/DIFF) retrieval.
//!
//! Builds an inverted index over a corpus of English text documents
//! using BSBI (blocked sort-based indexing): each immediate
//! subdirectory of the corpus root is parsed and inverted as one block,
//! written to an intermediate index, and all blocks are then merged by
//! an external k-way merge into a single final index. Postings lists
//! are stored in one of four interchangeable codecs and looked up
//! through a random-access reader at query time.
//!
//! # Quick start
//!
//! ```no_run
//! use lex_retrieve::{bsbi, query::{NoopStemmer, Stopwords}, Codec, Index};
//!
//! let config = bsbi::BuildConfig::new("corpus/", "index/", Codec::VariableByte);
//! bsbi::build(&config, &NoopStemmer, &Stopwords::empty())?;
//!
//! let mut index = Index::open("index/".as_ref(), Codec::VariableByte, None)?;
//! let hits = index.search("cat AND dog", &NoopStemmer, &Stopwords::empty())?;
//! # Ok::<(), lex_retrieve::Error>(())
//! ```
//!
//! # Boundaries
//!
//! - Tokenization, stemming, and the stopword list are pluggable
//!   collaborators supplied by the caller ([`query::Stemmer`],
//!   [`query::Stopwords`]) — this crate ships only `NoopStemmer` as a
//!   default.
//! - No ranked (TF/IDF, BM25) retrieval, no phrase/proximity queries, no
//!   deletion or update of an already-built index, no concurrent
//!   writers, no multi-machine distribution.
//! - No CLI and no logging surface; both are left to the caller.

pub mod algebra;
pub mod bsbi;
pub mod codecs;
pub mod error;
pub mod idmap;
pub mod index;
pub mod query;
pub mod retrieval;

pub use codecs::Codec;
pub use error::{Error, Result};
pub use idmap::IdMap;
pub use retrieval::Index;
