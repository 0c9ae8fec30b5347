//! # Preview Handles
//!
//! A [`PreviewHandle`] is the local, non-persistent reference used to show a
//! selected file before its upload finishes. Handles are owned by the intake
//! state; dropping one releases it. The [`PreviewRegistry`] counts live
//! handles so a leak shows up as a non-zero count.

use crate::file::FileCandidate;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Identity of one preview, and of the upload started for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: AtomicU64,
    live: AtomicUsize,
}

#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    inner: Arc<RegistryInner>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, file: FileCandidate) -> PreviewHandle {
        let id = HandleId(self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.inner.live.fetch_add(1, Ordering::AcqRel);
        tracing::debug!(handle = %id, name = file.name(), "preview acquired");

        PreviewHandle {
            id,
            file,
            registry: self.clone(),
        }
    }

    /// Handles acquired and not yet released
    pub fn live(&self) -> usize {
        self.inner.live.load(Ordering::Acquire)
    }
}

pub struct PreviewHandle {
    id: HandleId,
    file: FileCandidate,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn file(&self) -> &FileCandidate {
        &self.file
    }

    /// Local URL for rendering the preview; valid only while the handle lives
    pub fn url(&self) -> String {
        format!("blob:folio/{}", self.id)
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.inner.live.fetch_sub(1, Ordering::AcqRel);
        tracing::debug!(handle = %self.id, "preview released");
    }
}

impl PartialEq for PreviewHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle")
            .field("id", &self.id)
            .field("name", &self.file.name())
            .field("size", &self.file.size())
            .finish()
    }
}
