//! # Folio Editor
//!
//! Core document editing engine for Folio.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ blocks: snapshot JSON ↔ BlockTree           │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: engine lifecycle + mutations        │
//! │  - Load documents (empty fallback)          │
//! │  - Apply mutations with validation          │
//! │  - Notify one handler per edit              │
//! │  - Resolve embedded assets per block        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ intake: validate → preview → upload → URL   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Tree is source of truth**: snapshots and rendered views are derived
//! 2. **Single writer**: only the engine mutates the tree
//! 3. **Nothing fatal**: load errors fall back to an empty document, asset
//!    failures stay on their block
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_editor::{EditorEngine, EditorOptions};
//! use folio_blocks::Block;
//!
//! let mut engine = EditorEngine::initialize(Some(&saved), EditorOptions::default()).engine;
//! engine.on_mutation(|snapshot| persist(snapshot));
//! engine.append(Block::paragraph("Hello"))?;
//!
//! // Upload without holding the engine
//! if let Some(pending) = engine.resolve_embedded_asset("img-1", file)? {
//!     let resolution = pending.upload().await;
//!     engine.complete_embedded_asset(resolution)?;
//! }
//! ```

mod engine;
mod errors;
mod mutations;
mod render;

pub use engine::{
    AssetResolution, AssetStatus, EditorEngine, EditorOptions, Initialized, MutationHandler,
    PendingAsset,
};
pub use errors::EditorError;
pub use mutations::{Mutation, MutationError, MutationResult};
pub use render::{outline, MediaView, RenderedBlock};
