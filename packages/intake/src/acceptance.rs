//! # Acceptance Rules
//!
//! Config-driven validation of a selection. Rules run in a fixed order and
//! the first failing rule decides the rejection:
//!
//! 1. type: every offered file matches one accepted pattern → else `UnsupportedType`
//! 2. size: no offered file exceeds `max_bytes` → else `TooLarge(max_bytes)`
//! 3. cardinality: no more than `max_files` offered → else `TooManyFiles(max_files)`
//! 4. fallback: empty selection or unusable media type → `Unsupported`
//!
//! An absent rule accepts everything on its axis.

use crate::file::FileCandidate;
use crate::rejection::Rejection;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptanceConfig {
    /// `*`, `major/*`, `major/minor` or `.ext`; empty accepts any type
    #[serde(default)]
    pub accepted_type_patterns: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bytes: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_files: Option<usize>,
}

impl AcceptanceConfig {
    pub fn accept_all() -> Self {
        Self::default()
    }

    /// One image at a time
    pub fn single_image() -> Self {
        Self {
            accepted_type_patterns: vec!["image/*".to_string()],
            max_bytes: None,
            max_files: Some(1),
        }
    }

    pub fn with_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepted_type_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = Some(max_files);
        self
    }

    pub fn accepts_type(&self, file: &FileCandidate) -> bool {
        self.accepted_type_patterns.is_empty()
            || self
                .accepted_type_patterns
                .iter()
                .any(|pattern| pattern_matches(pattern, file))
    }

    /// Check a selection; on success returns the file that takes the slot
    pub fn validate<'a>(&self, files: &'a [FileCandidate]) -> Result<&'a FileCandidate, Rejection> {
        if files.iter().any(|file| !self.accepts_type(file)) {
            return Err(Rejection::UnsupportedType);
        }

        if let Some(max_bytes) = self.max_bytes {
            if files.iter().any(|file| file.size() > max_bytes) {
                return Err(Rejection::TooLarge(max_bytes));
            }
        }

        if let Some(max_files) = self.max_files {
            if files.len() > max_files {
                return Err(Rejection::TooManyFiles(max_files));
            }
        }

        match files.first() {
            Some(file) if has_media_type_form(file) => Ok(file),
            _ => Err(Rejection::Unsupported),
        }
    }
}

fn pattern_matches(pattern: &str, file: &FileCandidate) -> bool {
    let pattern = pattern.trim().to_ascii_lowercase();
    if pattern == "*" || pattern == "*/*" {
        return true;
    }

    if let Some(ext) = pattern.strip_prefix('.') {
        return file
            .extension()
            .map(|actual| actual.eq_ignore_ascii_case(ext))
            .unwrap_or(false);
    }

    let essence = file.essence();
    match pattern.strip_suffix("/*") {
        Some(major) => essence
            .split_once('/')
            .map(|(actual, _)| actual == major)
            .unwrap_or(false),
        None => !pattern.is_empty() && essence == pattern,
    }
}

fn has_media_type_form(file: &FileCandidate) -> bool {
    file.essence()
        .split_once('/')
        .map(|(major, minor)| !major.is_empty() && !minor.is_empty())
        .unwrap_or(false)
}

/// Human readable byte count, base 1024 with up to two decimals (`5_000_000` → `"4.77 MB"`)
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
