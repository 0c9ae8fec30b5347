//! # Folio Blocks
//!
//! Block document model and its JSON snapshot form.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ snapshot: JSON array of block objects       │
//! └─────────────────────────────────────────────┘
//!                     ↕  parse_snapshot / to_snapshot
//! ┌─────────────────────────────────────────────┐
//! │ BlockTree: ordered, nested Vec<Block>       │
//! │  - closed set of block kinds                │
//! │  - unique ids across the whole tree         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use folio_blocks::{parse_snapshot, to_snapshot, Block, BlockTree};
//!
//! let mut tree = BlockTree::new();
//! tree.insert(None, 0, Block::paragraph("Hello"));
//!
//! let json = to_snapshot(&tree).unwrap();
//! assert_eq!(parse_snapshot(&json).unwrap(), tree);
//! ```

pub mod block;
pub mod error;
pub mod inline;
pub mod snapshot;
pub mod tree;

pub use block::{
    Block, BlockId, BlockKind, CheckProps, HeadingLevel, HeadingProps, MediaKind, MediaProps,
    TextAlignment, TextProps,
};
pub use error::{InvalidHeadingLevel, SnapshotError, SnapshotResult};
pub use inline::{InlineContent, StyledText, Styles};
pub use snapshot::{parse_snapshot, to_snapshot};
pub use tree::BlockTree;
