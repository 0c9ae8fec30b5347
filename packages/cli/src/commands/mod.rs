pub mod append;
pub mod attach;
pub mod check;
pub mod init;
pub mod render;

pub use append::{append, AppendArgs};
pub use attach::{attach, AttachArgs};
pub use check::{check, CheckArgs};
pub use init::{init, InitArgs};
pub use render::{render, RenderArgs};

use anyhow::{anyhow, Result};
use folio_editor::{EditorEngine, EditorOptions};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Open a snapshot file. A missing file is an empty document; a malformed
/// one is an error so it never gets overwritten.
pub(crate) fn open_document(path: &Path, options: EditorOptions) -> Result<EditorEngine> {
    let snapshot = if path.exists() {
        Some(fs::read_to_string(path)?)
    } else {
        None
    };

    let init = EditorEngine::initialize(snapshot.as_deref(), options);
    match init.error {
        Some(e) => Err(anyhow!("{}: {}", path.display(), e)),
        None => Ok(init.engine),
    }
}

/// Writes every snapshot the engine emits back to the document file
pub(crate) struct FileSink {
    failure: Arc<Mutex<Option<io::Error>>>,
}

impl FileSink {
    pub fn attach(engine: &mut EditorEngine, path: PathBuf) -> Self {
        let failure = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&failure);

        engine.on_mutation(move |snapshot| {
            if let Err(e) = fs::write(&path, snapshot) {
                tracing::error!(path = %path.display(), error = %e, "failed to write document");
                if let Ok(mut slot) = slot.lock() {
                    *slot = Some(e);
                }
            }
        });

        Self { failure }
    }

    /// First write error, if any
    pub fn finish(self) -> Result<()> {
        let failure = self
            .failure
            .lock()
            .map_err(|_| anyhow!("document writer panicked"))?
            .take();
        match failure {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

pub(crate) fn resolve_path(cwd: &str, path: &str) -> PathBuf {
    PathBuf::from(cwd).join(path)
}
