use crate::block::BlockId;
use thiserror::Error;

pub type SnapshotResult<T> = Result<T, SnapshotError>;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Malformed document: {0}")]
    Syntax(#[source] serde_json::Error),

    #[error("Malformed document: block with empty id")]
    EmptyId,

    #[error("Malformed document: duplicate block id {0}")]
    DuplicateId(BlockId),

    #[error("Failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),
}

impl SnapshotError {
    /// True for errors raised while reading a snapshot (as opposed to writing one).
    pub fn is_malformed(&self) -> bool {
        !matches!(self, SnapshotError::Encode(_))
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("heading level must be between 1 and 3, got {0}")]
pub struct InvalidHeadingLevel(pub u8);
