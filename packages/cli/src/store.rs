//! Local asset store: copies uploaded bytes into a directory.

use async_trait::async_trait;
use folio_intake::{FileCandidate, UploadError, Uploader};
use std::path::PathBuf;

pub struct DirectoryStore {
    dir: PathBuf,
    public_base_url: Option<String>,
}

impl DirectoryStore {
    pub fn new(dir: PathBuf, public_base_url: Option<String>) -> Self {
        Self {
            dir,
            public_base_url: public_base_url.map(|url| url.trim_end_matches('/').to_string()),
        }
    }

    fn object_name(file: &FileCandidate) -> String {
        let stem: String = file
            .name()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();
        format!("{}-{}", chrono::Utc::now().format("%Y%m%dT%H%M%S%3f"), stem)
    }
}

#[async_trait]
impl Uploader for DirectoryStore {
    async fn upload(&self, file: FileCandidate) -> Result<String, UploadError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let name = Self::object_name(&file);
        let path = self.dir.join(&name);
        tokio::fs::write(&path, file.data()).await?;
        tracing::debug!(path = %path.display(), size = file.size(), "asset stored");

        match &self.public_base_url {
            Some(base) => Ok(format!("{}/{}", base, name)),
            None => {
                let path = tokio::fs::canonicalize(&path).await?;
                Ok(format!("file://{}", path.display()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path().join("uploads"), None);

        let url = store
            .upload(FileCandidate::new("my photo.png", "image/png", vec![1u8, 2, 3]))
            .await
            .unwrap();

        assert!(url.starts_with("file://"));
        assert!(url.ends_with("-my_photo.png"));
        let stored = std::fs::read(url.trim_start_matches("file://")).unwrap();
        assert_eq!(stored, vec![1u8, 2, 3]);
    }

    #[tokio::test]
    async fn test_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(
            dir.path().to_path_buf(),
            Some("https://cdn.example.com/assets/".to_string()),
        );

        let url = store
            .upload(FileCandidate::new("x.png", "image/png", vec![0u8]))
            .await
            .unwrap();

        assert!(url.starts_with("https://cdn.example.com/assets/"));
        assert!(url.ends_with("-x.png"));
    }
}
