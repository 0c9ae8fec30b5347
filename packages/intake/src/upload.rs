//! Upload seam. The intake only needs a URL back; how bytes reach storage
//! is up to the implementation.

use crate::file::FileCandidate;
use crate::rejection::Rejection;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("{0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<UploadError> for Rejection {
    fn from(e: UploadError) -> Self {
        Rejection::TransportError(e.to_string())
    }
}

/// Moves a file to storage and returns a stable, publicly dereferenceable URL
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, file: FileCandidate) -> Result<String, UploadError>;
}

/// In-process store, handy for previews and tests
#[derive(Debug)]
pub struct MemoryStore {
    base_url: String,
    objects: Mutex<Vec<(String, Bytes)>>,
}

impl MemoryStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: Mutex::new(Vec::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.objects.lock().await.len()
    }

    pub async fn get(&self, url: &str) -> Option<Bytes> {
        self.objects
            .lock()
            .await
            .iter()
            .find(|(stored, _)| stored == url)
            .map(|(_, data)| data.clone())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("memory://store")
    }
}

#[async_trait]
impl Uploader for MemoryStore {
    async fn upload(&self, file: FileCandidate) -> Result<String, UploadError> {
        let mut objects = self.objects.lock().await;
        let url = format!("{}/{}/{}", self.base_url, objects.len(), file.name());
        objects.push((url.clone(), file.data().clone()));
        Ok(url)
    }
}
