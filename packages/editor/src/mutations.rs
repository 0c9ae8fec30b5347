//! # Block Mutations
//!
//! Discrete edits to a [`BlockTree`]. Each one is validated against the
//! current tree before anything changes, so a failed mutation leaves the
//! tree untouched.
//!
//! ## Mutation Semantics
//!
//! ### InsertBlock
//! - Index is clamped to the sibling count
//! - Every id in the inserted subtree must be non-empty and new to the tree
//!
//! ### UpdateContent
//! - Atomic replacement of the inline runs (not a character diff)
//! - Only text-bearing kinds
//!
//! ### UpdateBlock
//! - Replaces kind and props; id and children are kept
//!
//! ### RemoveBlock
//! - Removes the block and all descendants
//!
//! ### MoveBlock
//! - Atomic relocation to a new parent (or the root) at index
//! - Fails if the target parent is the block itself or one of its descendants

use folio_blocks::{Block, BlockId, BlockKind, BlockTree, InlineContent};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Insert a block (with its children) under `parent_id`, or at the root
    InsertBlock {
        parent_id: Option<BlockId>,
        index: usize,
        block: Block,
    },

    /// Replace the inline content of a text block
    UpdateContent {
        block_id: BlockId,
        content: Vec<InlineContent>,
    },

    /// Change a block's kind and props
    UpdateBlock { block_id: BlockId, kind: BlockKind },

    /// Point a media block at a resolved asset
    SetMediaUrl { block_id: BlockId, url: String },

    RemoveBlock { block_id: BlockId },

    MoveBlock {
        block_id: BlockId,
        parent_id: Option<BlockId>,
        index: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Parent not found: {0}")]
    ParentNotFound(BlockId),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Duplicate block id: {0}")]
    DuplicateId(BlockId),

    #[error("Block id is empty")]
    EmptyId,

    #[error("Block is not text")]
    NotText,

    #[error("Block is not media")]
    NotMedia,
}

impl Mutation {
    /// Block the mutation is about; for inserts, the inserted block
    pub fn target(&self) -> &BlockId {
        match self {
            Mutation::InsertBlock { block, .. } => &block.id,
            Mutation::UpdateContent { block_id, .. }
            | Mutation::UpdateBlock { block_id, .. }
            | Mutation::SetMediaUrl { block_id, .. }
            | Mutation::RemoveBlock { block_id }
            | Mutation::MoveBlock { block_id, .. } => block_id,
        }
    }

    /// Apply mutation to the tree with validation
    pub fn apply(&self, tree: &mut BlockTree) -> Result<(), MutationError> {
        self.validate(tree)?;

        match self {
            Mutation::InsertBlock {
                parent_id,
                index,
                block,
            } => {
                tree.insert(parent_id.as_ref().map(BlockId::as_str), *index, block.clone())
                    .ok_or_else(|| parent_not_found(parent_id))?;
                Ok(())
            }

            Mutation::UpdateContent { block_id, content } => {
                let runs = find_mut(tree, block_id)?
                    .kind
                    .content_mut()
                    .ok_or(MutationError::NotText)?;
                *runs = content.clone();
                Ok(())
            }

            Mutation::UpdateBlock { block_id, kind } => {
                find_mut(tree, block_id)?.kind = kind.clone();
                Ok(())
            }

            Mutation::SetMediaUrl { block_id, url } => {
                let props = find_mut(tree, block_id)?
                    .kind
                    .media_props_mut()
                    .ok_or(MutationError::NotMedia)?;
                props.url = url.clone();
                Ok(())
            }

            Mutation::RemoveBlock { block_id } => {
                tree.remove(block_id.as_str())
                    .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;
                Ok(())
            }

            Mutation::MoveBlock {
                block_id,
                parent_id,
                index,
            } => {
                let block = tree
                    .remove(block_id.as_str())
                    .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;
                tree.insert(parent_id.as_ref().map(BlockId::as_str), *index, block)
                    .ok_or_else(|| parent_not_found(parent_id))?;
                Ok(())
            }
        }
    }

    /// Validate without applying
    pub fn validate(&self, tree: &BlockTree) -> Result<(), MutationError> {
        match self {
            Mutation::InsertBlock {
                parent_id, block, ..
            } => {
                if let Some(parent_id) = parent_id {
                    if !tree.contains(parent_id.as_str()) {
                        return Err(MutationError::ParentNotFound(parent_id.clone()));
                    }
                }

                let mut seen = HashSet::new();
                check_new_ids(tree, block, &mut seen)
            }

            Mutation::UpdateContent { block_id, .. } => {
                let block = find(tree, block_id)?;
                match block.kind.content() {
                    Some(_) => Ok(()),
                    None => Err(MutationError::NotText),
                }
            }

            Mutation::UpdateBlock { block_id, .. } => {
                find(tree, block_id)?;
                Ok(())
            }

            Mutation::SetMediaUrl { block_id, .. } => {
                let block = find(tree, block_id)?;
                match block.kind.media_props() {
                    Some(_) => Ok(()),
                    None => Err(MutationError::NotMedia),
                }
            }

            Mutation::RemoveBlock { block_id } => {
                find(tree, block_id)?;
                Ok(())
            }

            Mutation::MoveBlock {
                block_id,
                parent_id,
                ..
            } => {
                find(tree, block_id)?;

                if let Some(parent_id) = parent_id {
                    if !tree.contains(parent_id.as_str()) {
                        return Err(MutationError::ParentNotFound(parent_id.clone()));
                    }

                    if parent_id == block_id
                        || tree.is_descendant(block_id.as_str(), parent_id.as_str())
                    {
                        return Err(MutationError::CycleDetected);
                    }
                }

                Ok(())
            }
        }
    }
}

fn find<'a>(tree: &'a BlockTree, id: &BlockId) -> Result<&'a Block, MutationError> {
    tree.find(id.as_str())
        .ok_or_else(|| MutationError::BlockNotFound(id.clone()))
}

fn find_mut<'a>(tree: &'a mut BlockTree, id: &BlockId) -> Result<&'a mut Block, MutationError> {
    tree.find_mut(id.as_str())
        .ok_or_else(|| MutationError::BlockNotFound(id.clone()))
}

fn parent_not_found(parent_id: &Option<BlockId>) -> MutationError {
    match parent_id {
        Some(id) => MutationError::ParentNotFound(id.clone()),
        None => MutationError::ParentNotFound(BlockId::new("")),
    }
}

fn check_new_ids<'a>(
    tree: &BlockTree,
    block: &'a Block,
    seen: &mut HashSet<&'a str>,
) -> Result<(), MutationError> {
    let id = block.id.as_str();
    if id.is_empty() {
        return Err(MutationError::EmptyId);
    }
    if tree.contains(id) || !seen.insert(id) {
        return Err(MutationError::DuplicateId(block.id.clone()));
    }

    for child in &block.children {
        check_new_ids(tree, child, seen)?;
    }
    Ok(())
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// New version number
    pub version: u64,

    /// Snapshot of the tree after the mutation
    pub snapshot: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_blocks::HeadingLevel;

    fn tree() -> BlockTree {
        BlockTree::from_blocks(vec![
            Block::paragraph("intro").with_id("p1"),
            Block::bullet("outer")
                .with_id("l1")
                .with_children(vec![Block::bullet("inner").with_id("l2")]),
            Block::image("").with_id("img"),
        ])
    }

    #[test]
    fn test_mutation_serialization() {
        let mutation = Mutation::SetMediaUrl {
            block_id: BlockId::new("img"),
            url: "https://store/x.png".to_string(),
        };

        let json = serde_json::to_string(&mutation).unwrap();
        let deserialized: Mutation = serde_json::from_str(&json).unwrap();

        assert_eq!(mutation, deserialized);
    }

    #[test]
    fn test_update_content() {
        let mut tree = tree();
        Mutation::UpdateContent {
            block_id: BlockId::new("p1"),
            content: vec![InlineContent::plain("changed")],
        }
        .apply(&mut tree)
        .unwrap();

        assert_eq!(tree.find("p1").unwrap().plain_text(), "changed");
    }

    #[test]
    fn test_update_content_rejects_media() {
        let mut tree = tree();
        let before = tree.clone();
        let result = Mutation::UpdateContent {
            block_id: BlockId::new("img"),
            content: vec![InlineContent::plain("nope")],
        }
        .apply(&mut tree);

        assert_eq!(result, Err(MutationError::NotText));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_update_block_keeps_children() {
        let mut tree = tree();
        let heading = Block::heading(HeadingLevel::default(), "outer");
        Mutation::UpdateBlock {
            block_id: BlockId::new("l1"),
            kind: heading.kind,
        }
        .apply(&mut tree)
        .unwrap();

        let block = tree.find("l1").unwrap();
        assert_eq!(block.kind.type_name(), "heading");
        assert_eq!(block.children.len(), 1);
    }

    #[test]
    fn test_insert_rejects_duplicate_ids() {
        let mut tree = tree();
        let result = Mutation::InsertBlock {
            parent_id: None,
            index: 0,
            block: Block::paragraph("again").with_id("l2"),
        }
        .apply(&mut tree);

        assert_eq!(result, Err(MutationError::DuplicateId(BlockId::new("l2"))));

        let result = Mutation::InsertBlock {
            parent_id: None,
            index: 0,
            block: Block::paragraph("a")
                .with_id("n1")
                .with_children(vec![Block::paragraph("b").with_id("n1")]),
        }
        .validate(&tree);
        assert_eq!(result, Err(MutationError::DuplicateId(BlockId::new("n1"))));
    }

    #[test]
    fn test_insert_into_missing_parent() {
        let result = Mutation::InsertBlock {
            parent_id: Some(BlockId::new("ghost")),
            index: 0,
            block: Block::paragraph("x").with_id("x"),
        }
        .validate(&tree());

        assert_eq!(result, Err(MutationError::ParentNotFound(BlockId::new("ghost"))));
    }

    #[test]
    fn test_insert_clamps_index() {
        let mut tree = tree();
        Mutation::InsertBlock {
            parent_id: Some(BlockId::new("l1")),
            index: 99,
            block: Block::bullet("last").with_id("l3"),
        }
        .apply(&mut tree)
        .unwrap();

        assert_eq!(tree.location("l3"), Some((Some(BlockId::new("l1")), 1)));
    }

    #[test]
    fn test_move_into_own_descendant_is_cycle() {
        let tree = tree();

        let into_child = Mutation::MoveBlock {
            block_id: BlockId::new("l1"),
            parent_id: Some(BlockId::new("l2")),
            index: 0,
        };
        let into_self = Mutation::MoveBlock {
            block_id: BlockId::new("l1"),
            parent_id: Some(BlockId::new("l1")),
            index: 0,
        };

        assert_eq!(into_child.validate(&tree), Err(MutationError::CycleDetected));
        assert_eq!(into_self.validate(&tree), Err(MutationError::CycleDetected));
    }

    #[test]
    fn test_move_to_root() {
        let mut tree = tree();
        Mutation::MoveBlock {
            block_id: BlockId::new("l2"),
            parent_id: None,
            index: 0,
        }
        .apply(&mut tree)
        .unwrap();

        let ids: Vec<&str> = tree.blocks().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["l2", "p1", "l1", "img"]);
        assert!(tree.find("l1").unwrap().children.is_empty());
    }

    #[test]
    fn test_remove_takes_descendants() {
        let mut tree = tree();
        Mutation::RemoveBlock {
            block_id: BlockId::new("l1"),
        }
        .apply(&mut tree)
        .unwrap();

        assert!(!tree.contains("l1"));
        assert!(!tree.contains("l2"));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_set_media_url_requires_media() {
        let mut tree = tree();
        let result = Mutation::SetMediaUrl {
            block_id: BlockId::new("p1"),
            url: "https://store/x.png".to_string(),
        }
        .apply(&mut tree);
        assert_eq!(result, Err(MutationError::NotMedia));

        Mutation::SetMediaUrl {
            block_id: BlockId::new("img"),
            url: "https://store/x.png".to_string(),
        }
        .apply(&mut tree)
        .unwrap();
        let props = tree.find("img").unwrap().kind.media_props().unwrap();
        assert_eq!(props.url, "https://store/x.png");
    }
}
