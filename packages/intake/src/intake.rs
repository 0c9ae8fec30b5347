//! # Asset Intake Driver
//!
//! Runs an [`IntakeMachine`] on tokio. Selections confirm immediately (a drop
//! starts the upload), uploads run as spawned tasks, and their results come
//! back through a channel to be dispatched one at a time by
//! [`AssetIntake::next_settled`]. Nothing here blocks: the caller decides when
//! to wait for a result.
//!
//! Dropping the driver does not cancel uploads already started; their
//! results are simply never dispatched.

use crate::acceptance::AcceptanceConfig;
use crate::file::FileCandidate;
use crate::machine::{IntakeEvent, IntakeMachine, IntakeState, Outcome, Phase, UploadRequest};
use crate::preview::{HandleId, PreviewRegistry};
use crate::rejection::Rejection;
use crate::upload::Uploader;
use std::sync::Arc;
use tokio::sync::mpsc;

struct Settlement {
    handle: HandleId,
    result: Result<String, Rejection>,
}

pub struct AssetIntake {
    machine: IntakeMachine,
    uploader: Arc<dyn Uploader>,
    settled_tx: mpsc::UnboundedSender<Settlement>,
    settled_rx: mpsc::UnboundedReceiver<Settlement>,
    outstanding: usize,
}

impl AssetIntake {
    pub fn new(config: AcceptanceConfig, uploader: Arc<dyn Uploader>) -> Self {
        Self::with_registry(config, uploader, PreviewRegistry::new())
    }

    pub fn with_registry(
        config: AcceptanceConfig,
        uploader: Arc<dyn Uploader>,
        registry: PreviewRegistry,
    ) -> Self {
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        Self {
            machine: IntakeMachine::with_registry(config, registry),
            uploader,
            settled_tx,
            settled_rx,
            outstanding: 0,
        }
    }

    pub fn state(&self) -> &IntakeState {
        self.machine.state()
    }

    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    pub fn last_rejection(&self) -> Option<&Rejection> {
        self.machine.last_rejection()
    }

    pub fn registry(&self) -> &PreviewRegistry {
        self.machine.registry()
    }

    pub fn config(&self) -> &AcceptanceConfig {
        self.machine.config()
    }

    /// Uploads started and not yet dispatched
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Offer files (drop or picker). A valid file starts uploading right away.
    pub fn select(&mut self, files: Vec<FileCandidate>) -> Outcome {
        let outcome = self.machine.dispatch(IntakeEvent::Select(files));
        self.follow(outcome)
    }

    pub fn clear(&mut self) -> Outcome {
        self.machine.dispatch(IntakeEvent::Clear)
    }

    pub fn set_disabled(&mut self, disabled: bool) -> Outcome {
        let outcome = self.machine.dispatch(IntakeEvent::SetDisabled(disabled));
        self.follow(outcome)
    }

    /// Wait for the next upload to finish and apply its result.
    /// Returns `None` when nothing is in flight.
    pub async fn next_settled(&mut self) -> Option<Outcome> {
        if self.outstanding == 0 {
            return None;
        }

        let settlement = self.settled_rx.recv().await?;
        self.outstanding -= 1;

        let outcome = self.machine.dispatch(IntakeEvent::Settled {
            handle: settlement.handle,
            result: settlement.result,
        });
        Some(self.follow(outcome))
    }

    /// Drive every in-flight upload to completion and report where the slot ended up
    pub async fn resolve(&mut self) -> Result<String, Rejection> {
        while self.next_settled().await.is_some() {}

        match self.machine.state().url() {
            Some(url) => Ok(url.to_string()),
            None => Err(self
                .machine
                .last_rejection()
                .cloned()
                .unwrap_or(Rejection::Unsupported)),
        }
    }

    /// Select a single file and wait for its URL
    pub async fn upload_one(&mut self, file: FileCandidate) -> Result<String, Rejection> {
        match self.select(vec![file]) {
            Outcome::Rejected(rejection) => Err(rejection),
            Outcome::Ignored => {
                tracing::warn!("intake is disabled, selection ignored");
                Err(Rejection::Unsupported)
            }
            _ => self.resolve().await,
        }
    }

    // A fresh preview is confirmed on the spot.
    fn follow(&mut self, outcome: Outcome) -> Outcome {
        if outcome != Outcome::Entered(Phase::Previewing) {
            return outcome;
        }

        match self.machine.dispatch(IntakeEvent::Confirm) {
            Outcome::Upload(request) => {
                self.spawn_upload(request.clone());
                Outcome::Upload(request)
            }
            other => other,
        }
    }

    fn spawn_upload(&mut self, request: UploadRequest) {
        let uploader = Arc::clone(&self.uploader);
        let settled_tx = self.settled_tx.clone();
        self.outstanding += 1;

        tracing::info!(
            handle = %request.handle,
            name = request.file.name(),
            size = request.file.size(),
            "upload started"
        );

        tokio::spawn(async move {
            let handle = request.handle;
            let result = uploader.upload(request.file).await.map_err(Rejection::from);
            match &result {
                Ok(url) => tracing::info!(%handle, %url, "upload finished"),
                Err(e) => tracing::warn!(%handle, error = %e, "upload failed"),
            }
            // The driver may be gone; its slot no longer cares.
            let _ = settled_tx.send(Settlement { handle, result });
        });
    }
}
