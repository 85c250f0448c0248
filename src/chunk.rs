// src/chunk.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ChunkError, ValidationErrorKind};

/// The kind of content a chunk holds (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Text,
    Code,
    Table,
    List,
    Mixed,
    Preamble,
}

/// Why a chunk was allowed to exceed `max_chunk_size` (spec §3, §4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OversizeReason {
    CodeBlockIntegrity,
    TableIntegrity,
    SectionIntegrity,
}

/// Open, string-keyed metadata map (spec §3). Recognized keys are explicit
/// fields; anything else round-trips through `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub strategy: String,
    pub content_type: ContentType,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub language: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub header_path: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub allow_oversize: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub oversize_reason: Option<OversizeReason>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub previous_content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub next_content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub previous_chunk_index: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub next_chunk_index: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub has_bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub has_italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub has_inline_code: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub has_urls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub has_emails: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub has_nested_lists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub list_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub row_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub column_count: Option<usize>,

    /// Unknown keys, preserved verbatim across a serialize/deserialize
    /// round-trip (spec §6).
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for ContentType {
    fn default() -> Self {
        ContentType::Text
    }
}

impl ChunkMetadata {
    pub fn new(strategy: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            strategy: strategy.into(),
            content_type,
            ..Default::default()
        }
    }
}

/// An output chunk (spec §3). Immutable once constructed; the
/// post-processor only ever produces a new `Chunk` rather than mutating
/// through shared references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    pub start_line: usize,
    pub end_line: usize,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Construct a chunk, enforcing the invariants from spec §3: non-empty
    /// stripped content, and a valid, ordered line span.
    pub fn new(
        content: String,
        start_line: usize,
        end_line: usize,
        metadata: ChunkMetadata,
    ) -> Result<Self, ChunkError> {
        if content.trim().is_empty() {
            return Err(ChunkError::validation(
                ValidationErrorKind::EmptyChunk,
                "chunk content is empty after stripping whitespace",
                Default::default(),
            ));
        }
        if start_line == 0 || start_line > end_line {
            return Err(ChunkError::validation(
                ValidationErrorKind::InvalidLineNumbers,
                format!(
                    "invalid line span: start_line={start_line}, end_line={end_line}"
                ),
                Default::default(),
            ));
        }
        Ok(Chunk {
            content,
            start_line,
            end_line,
            metadata,
        })
    }

    /// Character length of `content`, used for size-bound checks (spec
    /// §3's `max_chunk_size`/`min_chunk_size` are character counts).
    pub fn size(&self) -> usize {
        self.content.chars().count()
    }
}
