//! # Intake State Machine
//!
//! ## Transitions
//!
//! | From | Event | To |
//! |---|---|---|
//! | Empty / Resolved / Previewing | `Select` (valid) | Previewing(new handle) |
//! | any enabled | `Select` (invalid) | unchanged, rejection reported |
//! | Previewing | `Confirm` | Uploading (caller starts the upload) |
//! | Uploading | `Settled(ok)` | Resolved |
//! | Uploading | `Settled(err)` | Empty, rejection reported |
//! | any enabled | `Clear` | Empty |
//! | any | `SetDisabled(true)` | Disabled(prior) |
//! | Disabled | `SetDisabled(false)` | prior |
//!
//! ## Ordering
//!
//! At most one upload is in flight. A valid selection made while one is in
//! flight is queued and takes the slot once that upload settles; the settled
//! result is then discarded because a newer selection superseded it. A
//! result whose handle does not match the slot's `Uploading` handle (cleared,
//! replaced) is discarded as well.
//!
//! Upload results still apply while disabled; only user events are refused.

use crate::acceptance::AcceptanceConfig;
use crate::file::FileCandidate;
use crate::preview::{HandleId, PreviewHandle, PreviewRegistry};
use crate::rejection::Rejection;
use std::mem;

#[derive(Debug, PartialEq)]
pub enum IntakeState {
    Empty,
    Previewing(PreviewHandle),
    Uploading(PreviewHandle),
    Resolved(String),
    Disabled(Box<IntakeState>),
}

/// Payload-free view of [`IntakeState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Previewing,
    Uploading,
    Resolved,
    Disabled,
}

impl IntakeState {
    pub fn phase(&self) -> Phase {
        match self {
            IntakeState::Empty => Phase::Empty,
            IntakeState::Previewing(_) => Phase::Previewing,
            IntakeState::Uploading(_) => Phase::Uploading,
            IntakeState::Resolved(_) => Phase::Resolved,
            IntakeState::Disabled(_) => Phase::Disabled,
        }
    }

    /// Local preview, looking through `Disabled`
    pub fn preview(&self) -> Option<&PreviewHandle> {
        match self {
            IntakeState::Previewing(handle) | IntakeState::Uploading(handle) => Some(handle),
            IntakeState::Disabled(prior) => prior.preview(),
            IntakeState::Empty | IntakeState::Resolved(_) => None,
        }
    }

    /// Remote URL, looking through `Disabled`
    pub fn url(&self) -> Option<&str> {
        match self {
            IntakeState::Resolved(url) => Some(url),
            IntakeState::Disabled(prior) => prior.url(),
            _ => None,
        }
    }

    /// What to show in the slot: the remote URL, else the local preview
    pub fn display_url(&self) -> Option<String> {
        self.url()
            .map(str::to_string)
            .or_else(|| self.preview().map(PreviewHandle::url))
    }
}

#[derive(Debug, Clone)]
pub enum IntakeEvent {
    /// Files offered at once by a drop or a file picker
    Select(Vec<FileCandidate>),
    Confirm,
    Settled {
        handle: HandleId,
        result: Result<String, Rejection>,
    },
    Clear,
    SetDisabled(bool),
}

/// Upload the caller must start after a `Confirm`
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub handle: HandleId,
    pub file: FileCandidate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Entered(Phase),
    Upload(UploadRequest),
    Rejected(Rejection),
    /// Valid selection queued behind the in-flight upload
    Deferred,
    /// Upload result no longer matches the slot
    Discarded,
    /// Event does not apply in the current state
    Ignored,
}

#[derive(Debug)]
pub struct IntakeMachine {
    config: AcceptanceConfig,
    registry: PreviewRegistry,
    state: IntakeState,
    in_flight: Option<HandleId>,
    queued: Option<FileCandidate>,
    last_rejection: Option<Rejection>,
}

impl IntakeMachine {
    pub fn new(config: AcceptanceConfig) -> Self {
        Self::with_registry(config, PreviewRegistry::new())
    }

    pub fn with_registry(config: AcceptanceConfig, registry: PreviewRegistry) -> Self {
        Self {
            config,
            registry,
            state: IntakeState::Empty,
            in_flight: None,
            queued: None,
            last_rejection: None,
        }
    }

    pub fn state(&self) -> &IntakeState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn config(&self) -> &AcceptanceConfig {
        &self.config
    }

    pub fn registry(&self) -> &PreviewRegistry {
        &self.registry
    }

    /// Reason from the most recent rejection, until the next accepted selection or clear
    pub fn last_rejection(&self) -> Option<&Rejection> {
        self.last_rejection.as_ref()
    }

    pub fn in_flight(&self) -> Option<HandleId> {
        self.in_flight
    }

    pub fn has_queued(&self) -> bool {
        self.queued.is_some()
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self.state, IntakeState::Disabled(_))
    }

    /// Apply one event. The only place the state changes.
    pub fn dispatch(&mut self, event: IntakeEvent) -> Outcome {
        let outcome = match event {
            IntakeEvent::Select(files) => self.select(files),
            IntakeEvent::Confirm => self.confirm(),
            IntakeEvent::Settled { handle, result } => self.settle(handle, result),
            IntakeEvent::Clear => self.clear(),
            IntakeEvent::SetDisabled(disabled) => self.set_disabled(disabled),
        };
        tracing::debug!(phase = ?self.state.phase(), ?outcome, "intake dispatch");
        outcome
    }

    fn select(&mut self, files: Vec<FileCandidate>) -> Outcome {
        if self.is_disabled() {
            return Outcome::Ignored;
        }

        let file = match self.config.validate(&files) {
            Ok(file) => file.clone(),
            Err(rejection) => {
                self.last_rejection = Some(rejection.clone());
                return Outcome::Rejected(rejection);
            }
        };
        self.last_rejection = None;

        if self.in_flight.is_some() {
            self.queued = Some(file);
            return Outcome::Deferred;
        }

        self.enter_preview(file)
    }

    fn enter_preview(&mut self, file: FileCandidate) -> Outcome {
        // Replacing the state drops any previous handle.
        self.state = IntakeState::Previewing(self.registry.acquire(file));
        Outcome::Entered(Phase::Previewing)
    }

    fn confirm(&mut self) -> Outcome {
        match mem::replace(&mut self.state, IntakeState::Empty) {
            IntakeState::Previewing(handle) => {
                let request = UploadRequest {
                    handle: handle.id(),
                    file: handle.file().clone(),
                };
                self.in_flight = Some(handle.id());
                self.state = IntakeState::Uploading(handle);
                Outcome::Upload(request)
            }
            other => {
                self.state = other;
                Outcome::Ignored
            }
        }
    }

    fn settle(&mut self, handle: HandleId, result: Result<String, Rejection>) -> Outcome {
        if self.in_flight == Some(handle) {
            self.in_flight = None;
        }
        let superseded = self.queued.is_some();

        let slot = match &mut self.state {
            IntakeState::Disabled(prior) => prior.as_mut(),
            state => state,
        };
        let current = matches!(&*slot, IntakeState::Uploading(h) if h.id() == handle);

        let outcome = if !current || superseded {
            if current {
                *slot = IntakeState::Empty;
            }
            tracing::debug!(%handle, superseded, "discarding stale upload result");
            Outcome::Discarded
        } else {
            match result {
                Ok(url) => {
                    *slot = IntakeState::Resolved(url);
                    Outcome::Entered(Phase::Resolved)
                }
                Err(rejection) => {
                    *slot = IntakeState::Empty;
                    self.last_rejection = Some(rejection.clone());
                    Outcome::Rejected(rejection)
                }
            }
        };

        if self.in_flight.is_none() {
            if let Some(file) = self.queued.take() {
                return self.enter_preview(file);
            }
        }

        outcome
    }

    fn clear(&mut self) -> Outcome {
        if self.is_disabled() {
            return Outcome::Ignored;
        }

        self.queued = None;
        self.last_rejection = None;
        self.state = IntakeState::Empty;
        Outcome::Entered(Phase::Empty)
    }

    fn set_disabled(&mut self, disabled: bool) -> Outcome {
        match (disabled, self.is_disabled()) {
            (true, false) => {
                if self.queued.take().is_some() {
                    tracing::debug!("dropping queued selection on disable");
                }
                let prior = mem::replace(&mut self.state, IntakeState::Empty);
                self.state = IntakeState::Disabled(Box::new(prior));
                Outcome::Entered(Phase::Disabled)
            }
            (false, true) => {
                if let IntakeState::Disabled(prior) = mem::replace(&mut self.state, IntakeState::Empty) {
                    self.state = *prior;
                }
                Outcome::Entered(self.state.phase())
            }
            _ => Outcome::Ignored,
        }
    }
}
