//! # Block Tree
//!
//! The root sequence of blocks plus lookup and structural edit helpers.
//! Ids are looked up by `&str`; `None` as a parent means the root sequence.

use crate::block::{Block, BlockId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockTree {
    blocks: Vec<Block>,
}

impl BlockTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Root sequence
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Total number of blocks, nested ones included
    pub fn len(&self) -> usize {
        fn count(blocks: &[Block]) -> usize {
            blocks.iter().map(|b| 1 + count(&b.children)).sum()
        }
        count(&self.blocks)
    }

    pub fn find(&self, id: &str) -> Option<&Block> {
        find_in(&self.blocks, id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Block> {
        find_in_mut(&mut self.blocks, id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Parent id (`None` for root) and sibling index of a block
    pub fn location(&self, id: &str) -> Option<(Option<BlockId>, usize)> {
        locate_in(&self.blocks, None, id)
    }

    /// Enclosing block; `None` for root blocks and unknown ids
    pub fn parent_of(&self, id: &str) -> Option<&Block> {
        let (parent, _) = self.location(id)?;
        self.find(parent?.as_str())
    }

    /// Child sequence of `parent`, or the root sequence
    pub fn children_mut(&mut self, parent: Option<&str>) -> Option<&mut Vec<Block>> {
        match parent {
            None => Some(&mut self.blocks),
            Some(parent_id) => self.find_mut(parent_id).map(|b| &mut b.children),
        }
    }

    /// Insert `block` under `parent` at `index` (clamped). Returns the actual index,
    /// or `None` if the parent does not exist.
    pub fn insert(&mut self, parent: Option<&str>, index: usize, block: Block) -> Option<usize> {
        let siblings = self.children_mut(parent)?;
        let index = index.min(siblings.len());
        siblings.insert(index, block);
        Some(index)
    }

    /// Detach a block and its descendants
    pub fn remove(&mut self, id: &str) -> Option<Block> {
        remove_from(&mut self.blocks, id)
    }

    /// True if `id` sits somewhere below `ancestor`
    pub fn is_descendant(&self, ancestor: &str, id: &str) -> bool {
        self.find(ancestor)
            .map(|a| find_in(&a.children, id).is_some())
            .unwrap_or(false)
    }

    /// All ids in document order (pre-order)
    pub fn ids(&self) -> Vec<&BlockId> {
        let mut ids = Vec::with_capacity(self.blocks.len());
        self.walk(|block, _| ids.push(&block.id));
        ids
    }

    /// Pre-order traversal with nesting depth (0 for root blocks)
    pub fn walk<'a>(&'a self, mut visit: impl FnMut(&'a Block, usize)) {
        fn go<'a>(blocks: &'a [Block], depth: usize, visit: &mut impl FnMut(&'a Block, usize)) {
            for block in blocks {
                visit(block, depth);
                go(&block.children, depth + 1, visit);
            }
        }
        go(&self.blocks, 0, &mut visit);
    }
}

impl From<Vec<Block>> for BlockTree {
    fn from(blocks: Vec<Block>) -> Self {
        Self::from_blocks(blocks)
    }
}

fn find_in<'a>(blocks: &'a [Block], id: &str) -> Option<&'a Block> {
    for block in blocks {
        if block.id.as_str() == id {
            return Some(block);
        }
        if let Some(found) = find_in(&block.children, id) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut<'a>(blocks: &'a mut [Block], id: &str) -> Option<&'a mut Block> {
    for block in blocks {
        if block.id.as_str() == id {
            return Some(block);
        }
        if let Some(found) = find_in_mut(&mut block.children, id) {
            return Some(found);
        }
    }
    None
}

fn locate_in(
    blocks: &[Block],
    parent: Option<&BlockId>,
    id: &str,
) -> Option<(Option<BlockId>, usize)> {
    if let Some(pos) = blocks.iter().position(|b| b.id.as_str() == id) {
        return Some((parent.cloned(), pos));
    }
    blocks
        .iter()
        .find_map(|b| locate_in(&b.children, Some(&b.id), id))
}

fn remove_from(blocks: &mut Vec<Block>, id: &str) -> Option<Block> {
    if let Some(pos) = blocks.iter().position(|b| b.id.as_str() == id) {
        return Some(blocks.remove(pos));
    }
    for block in blocks.iter_mut() {
        if let Some(removed) = remove_from(&mut block.children, id) {
            return Some(removed);
        }
    }
    None
}
