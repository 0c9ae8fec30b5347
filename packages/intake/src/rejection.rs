use crate::acceptance::format_file_size;
use thiserror::Error;

/// Why a candidate did not make it into the slot.
///
/// The `Display` text is meant for the user, shown under the drop area.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Invalid file type.")]
    UnsupportedType,

    #[error("The file is too large. Max size is {}.", format_file_size(*.0))]
    TooLarge(u64),

    #[error("You can only add {0} file(s).")]
    TooManyFiles(usize),

    #[error("The file is not supported.")]
    Unsupported,

    #[error("Upload failed: {0}")]
    TransportError(String),
}

impl Rejection {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::UnsupportedType => "file-invalid-type",
            Rejection::TooLarge(_) => "file-too-large",
            Rejection::TooManyFiles(_) => "too-many-files",
            Rejection::Unsupported => "file-not-supported",
            Rejection::TransportError(_) => "upload-failed",
        }
    }
}
