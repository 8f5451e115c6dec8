//! External k-way merge of per-block intermediate indices into the
//! final index.
//!
//! A min-heap is keyed on `(term ID, block index)`: term ID drives the
//! merge order, block index (the block's position in the deterministic
//! processing order from [`super::builder::build_blocks`]) breaks ties
//! between readers presenting the same term, without depending on
//! anything as fragile as allocator addresses.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::path::Path;

use crate::algebra;
use crate::codecs::Codec;
use crate::error::Result;
use crate::index::reader::SequentialReader;
use crate::index::writer::IndexWriter;

use super::builder::Block;

/// Merges `blocks` into a single final index at `final_path`. For every
/// term appearing in one or more blocks, the final postings are the
/// ascending, deduplicated union of that term's per-block postings.
pub fn merge_blocks(blocks: &[Block], codec: Codec, final_path: &Path) -> Result<()> {
    let mut readers: Vec<SequentialReader> = blocks
        .iter()
        .map(|block| SequentialReader::open(&block.path, codec))
        .collect::<Result<_>>()?;

    let mut pending: Vec<Option<(u32, Vec<u32>)>> = Vec::with_capacity(readers.len());
    let mut heap: BinaryHeap<Reverse<(u32, usize)>> = BinaryHeap::new();

    for (block_index, reader) in readers.iter_mut().enumerate() {
        let next = reader.next_term()?;
        if let Some((term_id, _)) = &next {
            heap.push(Reverse((*term_id, block_index)));
        }
        pending.push(next);
    }

    let mut writer = IndexWriter::create(final_path, codec)?;

    while let Some(Reverse((term_id, block_index))) = heap.pop() {
        let mut postings = pending[block_index].take().expect("heap entry without pending postings").1;

        let next = readers[block_index].next_term()?;
        if let Some((next_term, _)) = &next {
            heap.push(Reverse((*next_term, block_index)));
        }
        pending[block_index] = next;

        while let Some(&Reverse((top_term, top_block))) = heap.peek() {
            if top_term != term_id {
                break;
            }
            heap.pop();

            let other = pending[top_block].take().expect("heap entry without pending postings").1;
            postings = algebra::union(&postings, &other);

            let next = readers[top_block].next_term()?;
            if let Some((next_term, _)) = &next {
                heap.push(Reverse((*next_term, top_block)));
            }
            pending[top_block] = next;
        }

        writer.append(term_id, &postings)?;
    }

    writer.finish()
}
