//! # Folio Intake
//!
//! Single-slot asset intake: accepts one candidate file, validates it,
//! keeps a local preview while the bytes upload, and reports either a
//! remote URL or a rejection reason.
//!
//! ## Architecture
//!
//! ```text
//! select(files) ──► AcceptanceConfig::validate ──► Rejection (slot unchanged)
//!                          │ ok
//!                          ▼
//!   Empty ──► Previewing(handle) ──confirm──► Uploading(handle) ──► Resolved(url)
//!                                                    │
//!                                                    └──failure──► Empty + Rejection
//! ```
//!
//! [`IntakeMachine`] is the pure state machine: every transition goes through
//! [`IntakeMachine::dispatch`]. [`AssetIntake`] drives it on a tokio runtime,
//! spawning uploads through an [`Uploader`] and feeding their results back in.
//!
//! Upload results carry the [`HandleId`] of the preview they were started for;
//! a result whose handle no longer matches the slot is dropped.

mod acceptance;
mod file;
mod intake;
mod machine;
mod preview;
mod rejection;
mod upload;

pub use acceptance::{format_file_size, AcceptanceConfig};
pub use file::FileCandidate;
pub use intake::AssetIntake;
pub use machine::{IntakeEvent, IntakeMachine, IntakeState, Outcome, Phase, UploadRequest};
pub use preview::{HandleId, PreviewHandle, PreviewRegistry};
pub use rejection::Rejection;
pub use upload::{MemoryStore, UploadError, Uploader};
