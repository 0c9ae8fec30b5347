//! # Editor Engine
//!
//! Owns the authoritative [`BlockTree`] and mediates every edit to it.
//!
//! ## Lifecycle
//!
//! ```text
//! initialize(snapshot?) → apply / append → on_mutation(snapshot)
//!        ↓                       ↑
//! MalformedDocument     complete_embedded_asset
//! (empty document)               ↑
//!                      PendingAsset::upload (no engine borrow)
//!                                ↑
//!                      resolve_embedded_asset
//! ```
//!
//! Embedded assets are resolved in two steps so the upload never holds the
//! engine: edits keep flowing while a [`PendingAsset`] is awaited. Each
//! request gets a per-block ticket and only the newest ticket for a block
//! may land; older resolutions are dropped.

use crate::errors::EditorError;
use crate::mutations::{Mutation, MutationResult};
use crate::render::{render_blocks, RenderedBlock};
use folio_blocks::{parse_snapshot, to_snapshot, Block, BlockId, BlockTree};
use folio_intake::{
    AcceptanceConfig, AssetIntake, FileCandidate, MemoryStore, Outcome, PreviewRegistry,
    Rejection, Uploader,
};
use std::collections::HashMap;
use std::slice;
use std::sync::Arc;

/// Receives the freshly serialized snapshot after every mutation
pub type MutationHandler = Box<dyn FnMut(&str) + Send>;

pub struct EditorOptions {
    /// `false` puts the engine in read-only mode
    pub editable: bool,

    /// Size and type limits for assets, both embedded and cover
    pub acceptance: AcceptanceConfig,

    pub uploader: Arc<dyn Uploader>,
}

impl EditorOptions {
    pub fn new(uploader: Arc<dyn Uploader>) -> Self {
        Self {
            editable: true,
            acceptance: AcceptanceConfig::accept_all(),
            uploader,
        }
    }

    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    pub fn with_acceptance(mut self, acceptance: AcceptanceConfig) -> Self {
        self.acceptance = acceptance;
        self
    }
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self::new(Arc::new(MemoryStore::default()))
    }
}

/// View-only state of an embedded asset. Never serialized.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetStatus {
    Pending,
    Failed(Rejection),
}

/// Upload for one media block, detached from the engine
pub struct PendingAsset {
    block_id: BlockId,
    ticket: u64,
    file: FileCandidate,
    intake: AssetIntake,
}

impl PendingAsset {
    pub fn block_id(&self) -> &BlockId {
        &self.block_id
    }

    pub fn file(&self) -> &FileCandidate {
        &self.file
    }

    pub async fn upload(self) -> AssetResolution {
        let PendingAsset {
            block_id,
            ticket,
            file,
            mut intake,
        } = self;

        let result = intake.upload_one(file).await;
        AssetResolution {
            block_id,
            ticket,
            result,
        }
    }
}

/// Outcome of a [`PendingAsset`], handed back to
/// [`EditorEngine::complete_embedded_asset`]
#[derive(Debug, Clone, PartialEq)]
pub struct AssetResolution {
    block_id: BlockId,
    ticket: u64,
    result: Result<String, Rejection>,
}

impl AssetResolution {
    pub fn block_id(&self) -> &BlockId {
        &self.block_id
    }

    pub fn result(&self) -> &Result<String, Rejection> {
        &self.result
    }
}

/// Engine plus the load error it recovered from, if any
pub struct Initialized {
    pub engine: EditorEngine,
    pub error: Option<EditorError>,
}

pub struct EditorEngine {
    tree: BlockTree,
    version: u64,
    editable: bool,
    acceptance: AcceptanceConfig,
    uploader: Arc<dyn Uploader>,
    registry: PreviewRegistry,
    handler: Option<MutationHandler>,
    cover: AssetIntake,
    assets: HashMap<BlockId, AssetStatus>,
    tickets: HashMap<BlockId, u64>,
    next_ticket: u64,
}

impl EditorEngine {
    /// Build an engine from an optional snapshot. A missing or blank snapshot
    /// is an empty document; a malformed one is reported and replaced by an
    /// empty document.
    pub fn initialize(snapshot: Option<&str>, options: EditorOptions) -> Initialized {
        let (tree, error) = match parse_snapshot(snapshot.unwrap_or_default()) {
            Ok(tree) => (tree, None),
            Err(e) => {
                tracing::warn!(error = %e, "falling back to an empty document");
                (BlockTree::new(), Some(EditorError::from(e)))
            }
        };

        let registry = PreviewRegistry::new();
        let cover_rules = AcceptanceConfig {
            max_files: Some(1),
            ..options.acceptance.clone()
        };
        let cover_rules = if cover_rules.accepted_type_patterns.is_empty() {
            cover_rules.with_patterns(["image/*"])
        } else {
            cover_rules
        };
        let mut cover = AssetIntake::with_registry(
            cover_rules,
            Arc::clone(&options.uploader),
            registry.clone(),
        );
        if !options.editable {
            cover.set_disabled(true);
        }

        tracing::debug!(blocks = tree.len(), editable = options.editable, "editor initialized");

        let engine = Self {
            tree,
            version: 0,
            editable: options.editable,
            acceptance: options.acceptance,
            uploader: options.uploader,
            registry,
            handler: None,
            cover,
            assets: HashMap::new(),
            tickets: HashMap::new(),
            next_ticket: 0,
        };

        Initialized { engine, error }
    }

    pub fn document(&self) -> &BlockTree {
        &self.tree
    }

    pub fn snapshot(&self) -> Result<String, EditorError> {
        Ok(to_snapshot(&self.tree)?)
    }

    /// Number of mutations applied since initialization
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Document-level cover slot; disabled while the engine is read-only
    pub fn cover(&self) -> &AssetIntake {
        &self.cover
    }

    /// Offer files to the cover slot. Ignored while read-only.
    pub fn select_cover(&mut self, files: Vec<FileCandidate>) -> Outcome {
        if !self.editable {
            tracing::debug!("read-only, cover selection ignored");
            return Outcome::Ignored;
        }
        self.cover.select(files)
    }

    pub fn clear_cover(&mut self) -> Outcome {
        if !self.editable {
            tracing::debug!("read-only, cover clear ignored");
            return Outcome::Ignored;
        }
        self.cover.clear()
    }

    /// Land the next finished cover upload. In-flight uploads still settle
    /// while read-only; the slot stays disabled and remembers the result.
    pub async fn next_cover_settled(&mut self) -> Option<Outcome> {
        self.cover.next_settled().await
    }

    /// Select a single cover file and wait for its URL
    pub async fn upload_cover(&mut self, file: FileCandidate) -> Result<String, Rejection> {
        if !self.editable {
            tracing::debug!("read-only, cover upload ignored");
            return Err(Rejection::Unsupported);
        }
        self.cover.upload_one(file).await
    }

    pub fn registry(&self) -> &PreviewRegistry {
        &self.registry
    }

    pub fn asset_status(&self, block_id: &str) -> Option<&AssetStatus> {
        self.assets.get(block_id)
    }

    /// Install the mutation handler. Only one is active; a second call replaces the first.
    pub fn on_mutation<F>(&mut self, handler: F)
    where
        F: FnMut(&str) + Send + 'static,
    {
        if self.handler.replace(Box::new(handler)).is_some() {
            tracing::debug!("replacing mutation handler");
        }
    }

    pub fn clear_mutation_handler(&mut self) {
        self.handler = None;
    }

    pub fn set_editable(&mut self, editable: bool) {
        if self.editable == editable {
            return;
        }
        self.editable = editable;
        self.cover.set_disabled(!editable);
        tracing::info!(editable, "editor mode changed");
    }

    /// Apply a mutation. Read-only engines ignore it and return `Ok(None)`.
    pub fn apply(&mut self, mutation: Mutation) -> Result<Option<MutationResult>, EditorError> {
        if !self.editable {
            tracing::debug!(block = %mutation.target(), "read-only, mutation ignored");
            return Ok(None);
        }

        mutation.apply(&mut self.tree)?;
        self.version += 1;

        match &mutation {
            Mutation::RemoveBlock { .. } => {
                let tree = &self.tree;
                self.assets.retain(|id, _| tree.contains(id.as_str()));
                self.tickets.retain(|id, _| tree.contains(id.as_str()));
            }
            // A direct edit of the media supersedes any upload still in flight.
            Mutation::SetMediaUrl { block_id, .. } | Mutation::UpdateBlock { block_id, .. } => {
                self.assets.remove(block_id);
                if self.tickets.remove(block_id).is_some() {
                    tracing::debug!(block = %block_id, "pending asset superseded by edit");
                }
            }
            _ => {}
        }

        let snapshot = to_snapshot(&self.tree).map_err(|e| {
            tracing::error!(error = %e, "failed to serialize document");
            EditorError::from(e)
        })?;
        match self.handler.as_mut() {
            Some(handler) => handler(&snapshot),
            None => tracing::trace!("no mutation handler, notification dropped"),
        }

        Ok(Some(MutationResult {
            version: self.version,
            snapshot,
        }))
    }

    /// Insert at the end of the root sequence
    pub fn append(&mut self, block: Block) -> Result<Option<MutationResult>, EditorError> {
        let index = self.tree.blocks().len();
        self.apply(Mutation::InsertBlock {
            parent_id: None,
            index,
            block,
        })
    }

    /// Start resolving `file` into a URL for the media block `block_id`.
    ///
    /// Validation runs here; a rejected file marks the block failed and
    /// returns [`EditorError::AssetRejected`]. Read-only engines return `Ok(None)`.
    pub fn resolve_embedded_asset(
        &mut self,
        block_id: &str,
        file: FileCandidate,
    ) -> Result<Option<PendingAsset>, EditorError> {
        if !self.editable {
            tracing::debug!(block = block_id, "read-only, asset request ignored");
            return Ok(None);
        }

        let block = self
            .tree
            .find(block_id)
            .ok_or_else(|| EditorError::BlockNotFound(BlockId::new(block_id)))?;
        let kind = block
            .kind
            .media_kind()
            .ok_or_else(|| EditorError::NotMedia(block.id.clone()))?;
        let id = block.id.clone();

        if let Some(pattern) = kind.type_pattern() {
            if !AcceptanceConfig::accept_all()
                .with_patterns([pattern])
                .accepts_type(&file)
            {
                return Err(self.fail_asset(id, Rejection::UnsupportedType));
            }
        }

        let rules = AcceptanceConfig {
            max_files: Some(1),
            ..self.acceptance.clone()
        };
        if let Err(rejection) = rules.validate(slice::from_ref(&file)) {
            return Err(self.fail_asset(id, rejection));
        }

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.tickets.insert(id.clone(), ticket);
        self.assets.insert(id.clone(), AssetStatus::Pending);

        tracing::info!(block = %id, ticket, name = file.name(), "asset requested");

        Ok(Some(PendingAsset {
            block_id: id,
            ticket,
            file,
            intake: AssetIntake::with_registry(
                rules,
                Arc::clone(&self.uploader),
                self.registry.clone(),
            ),
        }))
    }

    /// Land a finished upload. Returns `true` if the URL was stored on the block.
    ///
    /// Resolutions superseded by a newer request, for removed blocks, or
    /// arriving while read-only are discarded. A failure leaves the block
    /// marked failed and the document untouched.
    pub fn complete_embedded_asset(
        &mut self,
        resolution: AssetResolution,
    ) -> Result<bool, EditorError> {
        let AssetResolution {
            block_id,
            ticket,
            result,
        } = resolution;

        if self.tickets.get(&block_id) != Some(&ticket) {
            tracing::debug!(block = %block_id, ticket, "discarding stale asset resolution");
            return Ok(false);
        }
        self.tickets.remove(&block_id);

        if !self.tree.contains(block_id.as_str()) {
            self.assets.remove(&block_id);
            tracing::debug!(block = %block_id, "block removed during upload");
            return Ok(false);
        }

        match result {
            Ok(url) => {
                self.assets.remove(&block_id);
                if !self.editable {
                    tracing::debug!(block = %block_id, "read-only, resolved asset discarded");
                    return Ok(false);
                }

                match self.apply(Mutation::SetMediaUrl { block_id, url }) {
                    Ok(applied) => Ok(applied.is_some()),
                    Err(EditorError::Mutation(e)) => {
                        tracing::warn!(error = %e, "resolved asset no longer fits its block");
                        Ok(false)
                    }
                    Err(e) => Err(e),
                }
            }
            Err(rejection) => {
                tracing::warn!(block = %block_id, reason = %rejection, "asset upload failed");
                self.assets.insert(block_id, AssetStatus::Failed(rejection));
                Ok(false)
            }
        }
    }

    /// Resolved view of the document
    pub fn render(&self) -> Vec<RenderedBlock> {
        render_blocks(self.tree.blocks(), &self.assets)
    }

    fn fail_asset(&mut self, block_id: BlockId, rejection: Rejection) -> EditorError {
        tracing::info!(block = %block_id, reason = %rejection, "asset rejected");
        self.tickets.remove(&block_id);
        self.assets
            .insert(block_id, AssetStatus::Failed(rejection.clone()));
        EditorError::AssetRejected(rejection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn engine(snapshot: &str) -> EditorEngine {
        let init = EditorEngine::initialize(Some(snapshot), EditorOptions::default());
        assert!(init.error.is_none());
        init.engine
    }

    #[test]
    fn test_blank_snapshot_is_empty_document() {
        for snapshot in [None, Some(""), Some("  \n")] {
            let init = EditorEngine::initialize(snapshot, EditorOptions::default());
            assert!(init.error.is_none());
            assert!(init.engine.document().is_empty());
        }
    }

    #[test]
    fn test_malformed_snapshot_falls_back() {
        let init = EditorEngine::initialize(Some("{not json"), EditorOptions::default());

        assert!(init.error.unwrap().is_malformed_document());
        assert!(init.engine.document().is_empty());
        assert!(init.engine.is_editable());
    }

    #[test]
    fn test_handler_sees_every_edit() {
        let mut engine = engine("");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        engine.on_mutation(move |snapshot| sink.lock().unwrap().push(snapshot.to_string()));

        engine.append(Block::paragraph("one").with_id("a")).unwrap();
        engine.append(Block::paragraph("two").with_id("b")).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], engine.snapshot().unwrap());
        assert_eq!(engine.version(), 2);
    }

    #[test]
    fn test_last_handler_wins() {
        let mut engine = engine("");
        let first = Arc::new(Mutex::new(0));
        let second = Arc::new(Mutex::new(0));

        let counter = Arc::clone(&first);
        engine.on_mutation(move |_| *counter.lock().unwrap() += 1);
        let counter = Arc::clone(&second);
        engine.on_mutation(move |_| *counter.lock().unwrap() += 1);

        engine.append(Block::paragraph("x")).unwrap();

        assert_eq!(*first.lock().unwrap(), 0);
        assert_eq!(*second.lock().unwrap(), 1);
    }

    #[test]
    fn test_failed_mutation_changes_nothing() {
        let mut engine = engine("");
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        engine.on_mutation(move |_| *counter.lock().unwrap() += 1);

        let result = engine.apply(Mutation::RemoveBlock {
            block_id: BlockId::new("ghost"),
        });

        assert!(matches!(result, Err(EditorError::Mutation(_))));
        assert_eq!(engine.version(), 0);
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_read_only_ignores_edits() {
        let init = EditorEngine::initialize(None, EditorOptions::default().read_only());
        let mut engine = init.engine;

        assert_eq!(engine.append(Block::paragraph("x")).unwrap(), None);
        assert!(engine.document().is_empty());
        assert_eq!(engine.cover().phase(), folio_intake::Phase::Disabled);

        engine.set_editable(true);
        assert_eq!(engine.cover().phase(), folio_intake::Phase::Empty);
        assert!(engine.append(Block::paragraph("x")).unwrap().is_some());
    }

    #[test]
    fn test_rejected_asset_marks_block_failed() {
        let mut engine = engine("");
        engine.append(Block::image("").with_id("img")).unwrap();
        let version = engine.version();

        let pdf = FileCandidate::new("a.pdf", "application/pdf", vec![0u8; 4]);
        let result = engine.resolve_embedded_asset("img", pdf);

        assert!(matches!(
            result,
            Err(EditorError::AssetRejected(Rejection::UnsupportedType))
        ));
        assert_eq!(
            engine.asset_status("img"),
            Some(&AssetStatus::Failed(Rejection::UnsupportedType))
        );
        assert_eq!(engine.version(), version);
    }

    #[test]
    fn test_asset_for_text_block() {
        let mut engine = engine("");
        engine.append(Block::paragraph("x").with_id("p")).unwrap();
        let png = FileCandidate::new("a.png", "image/png", vec![0u8; 4]);

        assert!(matches!(
            engine.resolve_embedded_asset("p", png.clone()),
            Err(EditorError::NotMedia(_))
        ));
        assert!(matches!(
            engine.resolve_embedded_asset("nope", png),
            Err(EditorError::BlockNotFound(_))
        ));
    }
}
