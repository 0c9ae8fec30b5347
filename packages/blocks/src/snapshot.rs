//! # Snapshot Codec
//!
//! Converts between [`BlockTree`] and its durable JSON text. The output is
//! pretty-printed with two-space indentation; input may be any valid JSON
//! array of block objects.
//!
//! Reading rejects (as malformed):
//! - invalid JSON, or JSON that is not an array of blocks
//! - unknown block `type` tags and out-of-range props
//! - empty or duplicate block ids anywhere in the tree
//!
//! Empty or whitespace-only input is an empty document.

use crate::block::Block;
use crate::error::{SnapshotError, SnapshotResult};
use crate::tree::BlockTree;
use std::collections::HashSet;

/// Read a snapshot into a tree
pub fn parse_snapshot(source: &str) -> SnapshotResult<BlockTree> {
    if source.trim().is_empty() {
        return Ok(BlockTree::new());
    }

    let blocks: Vec<Block> = serde_json::from_str(source).map_err(SnapshotError::Syntax)?;
    let tree = BlockTree::from_blocks(blocks);
    check_ids(&tree)?;

    Ok(tree)
}

/// Write a tree as snapshot text
pub fn to_snapshot(tree: &BlockTree) -> SnapshotResult<String> {
    serde_json::to_string_pretty(tree).map_err(SnapshotError::Encode)
}

fn check_ids(tree: &BlockTree) -> SnapshotResult<()> {
    let mut seen = HashSet::new();
    for id in tree.ids() {
        if id.as_str().is_empty() {
            return Err(SnapshotError::EmptyId);
        }
        if !seen.insert(id) {
            return Err(SnapshotError::DuplicateId(id.clone()));
        }
    }
    Ok(())
}
