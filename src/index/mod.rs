//! The on-disk inverted-index file format and its two reader access paths.

pub mod format;
pub mod reader;
pub mod writer;

pub use reader::{RandomAccessReader, SequentialReader};
pub use writer::IndexWriter;
