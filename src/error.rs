// src/error.rs

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Classification of a post-processing invariant violation (spec §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    ContentLoss,
    SizeBoundViolation,
    NonMonotonicOrder,
    EmptyChunk,
    InvalidLineNumbers,
    FenceBalanceAnomaly,
    OverlapIntegrityFailure,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValidationErrorKind::ContentLoss => "content_loss",
            ValidationErrorKind::SizeBoundViolation => "size_bound_violation",
            ValidationErrorKind::NonMonotonicOrder => "non_monotonic_order",
            ValidationErrorKind::EmptyChunk => "empty_chunk",
            ValidationErrorKind::InvalidLineNumbers => "invalid_line_numbers",
            ValidationErrorKind::FenceBalanceAnomaly => "fence_balance_anomaly",
            ValidationErrorKind::OverlapIntegrityFailure => "overlap_integrity_failure",
        };
        f.write_str(s)
    }
}

/// Errors surfaced to the caller. No control-flow exceptions for expected
/// cases: every fallible path returns one of these variants.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// Input is empty or whitespace-only.
    #[error("empty input: document contains no non-whitespace content")]
    EmptyInput,

    /// Input could not be interpreted as well-formed UTF-8.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// `Config` construction failed: out-of-range or mutually inconsistent
    /// options that could not be auto-adjusted.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A post-processing invariant (spec §8 PROP-1..PROP-12) was violated.
    /// These are critical and abort the call.
    #[error("validation error ({kind}): {message}")]
    Validation {
        kind: ValidationErrorKind,
        message: String,
        context: BTreeMap<String, String>,
    },
}

impl ChunkError {
    pub fn validation(
        kind: ValidationErrorKind,
        message: impl Into<String>,
        context: BTreeMap<String, String>,
    ) -> Self {
        ChunkError::Validation {
            kind,
            message: message.into(),
            context,
        }
    }
}

/// First 100 code points of `content`, for error context previews (spec §6).
pub fn content_preview(content: &str) -> String {
    content.chars().take(100).collect()
}
