//! Error types for the editor

use folio_blocks::{BlockId, SnapshotError};
use folio_intake::Rejection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("{0}")]
    MalformedDocument(SnapshotError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Block {0} does not hold media")]
    NotMedia(BlockId),

    #[error("Asset rejected: {0}")]
    AssetRejected(Rejection),

    #[error("Failed to encode snapshot: {0}")]
    Encode(SnapshotError),
}

impl From<SnapshotError> for EditorError {
    fn from(e: SnapshotError) -> Self {
        if e.is_malformed() {
            EditorError::MalformedDocument(e)
        } else {
            EditorError::Encode(e)
        }
    }
}

impl EditorError {
    pub fn is_malformed_document(&self) -> bool {
        matches!(self, EditorError::MalformedDocument(_))
    }
}
