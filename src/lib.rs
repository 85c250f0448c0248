// src/lib.rs
//! # md_chunker
//!
//! A structural markdown chunker for retrieval-augmented generation
//! pipelines. Chunks are produced by a single-pass analysis of the
//! document followed by one of three strategies — code-aware,
//! structural, or fallback — chosen by document shape rather than
//! configured up front.
//!
//! ## Quick Start
//!
//! ```rust
//! use md_chunker::{chunk, Config};
//!
//! let markdown = "# Introduction\n\nThis is a test document.";
//! let result = chunk(markdown, &Config::default()).unwrap();
//!
//! for c in &result.chunks {
//!     println!("chunk: {} chars, strategy {}", c.size(), c.metadata.strategy);
//! }
//! ```
//!
//! ## Advanced Usage
//!
//! ```rust
//! use md_chunker::{chunk, Config};
//!
//! let config = Config::builder()
//!     .max_chunk_size(800)
//!     .min_chunk_size(100)
//!     .overlap_size(100)
//!     .build()
//!     .unwrap();
//!
//! let result = chunk("# My Document\n\nContent here.", &config).unwrap();
//! ```

pub mod analysis;
pub mod chunk;
pub mod config;
pub mod error;
pub mod links;
pub mod postprocess;
pub mod segmentation;
pub mod serialize;
pub mod strategy;

pub use analysis::{analyze, Analysis};
pub use chunk::{Chunk, ChunkMetadata, ContentType, OversizeReason};
pub use config::{Config, ConfigBuilder, StrategyKind};
pub use error::ChunkError;
pub use strategy::Strategy;

use std::borrow::Cow;
use std::time::{Duration, Instant};

/// The result of a [`chunk`] call: the chunks themselves plus the
/// diagnostics a caller might want to log (spec §6).
#[derive(Debug, Clone)]
pub struct ChunkingResult {
    pub chunks: Vec<Chunk>,
    pub strategy_used: String,
    pub processing_time: Duration,
    pub warnings: Vec<String>,
}

/// Chunk `text` under `config` (spec §6's primary entry point).
///
/// Validates the input, analyzes it once, selects and runs a strategy,
/// then post-processes the result (ordering, header paths, overlap,
/// enrichment, and invariant validation). Pure and synchronous: no
/// threads, no shared mutable state (spec §5).
pub fn chunk(text: &str, config: &Config) -> Result<ChunkingResult, ChunkError> {
    let start = Instant::now();

    if text.trim().is_empty() {
        return Err(ChunkError::EmptyInput);
    }

    let normalized = normalize_line_endings(text);
    let analysis = analysis::analyze(&normalized);
    let strategy = Strategy::select(&analysis, config);
    let (chunks, strategy_used) = strategy.apply(&normalized, &analysis, config)?;
    let (chunks, warnings) = postprocess::run(chunks, &analysis, config)?;

    log::debug!(
        "chunked {} chars into {} chunks via {} in {:?}",
        analysis.total_chars,
        chunks.len(),
        strategy_used.as_str(),
        start.elapsed()
    );

    Ok(ChunkingResult {
        chunks,
        strategy_used: strategy_used.as_str().to_string(),
        processing_time: start.elapsed(),
        warnings,
    })
}

/// Normalize `\r\n` and bare `\r` to `\n`, borrowing the input unchanged
/// when there's nothing to do.
fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_errors() {
        let result = chunk("   \n\t  ", &Config::default());
        assert!(matches!(result, Err(ChunkError::EmptyInput)));
    }

    #[test]
    fn single_paragraph_produces_one_fallback_chunk() {
        let result = chunk("Just a single short paragraph.", &Config::default()).unwrap();
        assert_eq!(result.chunks.len(), 1);
        assert_eq!(result.strategy_used, "fallback");
    }

    #[test]
    fn structured_document_uses_structural_strategy_and_header_paths() {
        let text = "# Title\n\nintro\n\n## Section One\n\nbody one\n\n## Section Two\n\nbody two\n\n## Section Three\n\nbody three\n";
        let result = chunk(text, &Config::default()).unwrap();
        assert_eq!(result.strategy_used, "structural");
        assert!(result
            .chunks
            .iter()
            .any(|c| c.metadata.header_path.is_some()));
    }

    #[test]
    fn code_heavy_document_uses_code_aware_strategy() {
        let body = "x = 1\n".repeat(1500);
        let text = format!("```python\n{body}```\n");
        let config = Config::builder().max_chunk_size(2000).build().unwrap();
        let result = chunk(&text, &config).unwrap();
        assert_eq!(result.strategy_used, "code_aware");
        assert!(result
            .chunks
            .iter()
            .any(|c| c.metadata.content_type == ContentType::Code));
    }

    #[test]
    fn crlf_input_is_normalized() {
        let text = "# Title\r\n\r\nbody text\r\n";
        let result = chunk(text, &Config::default()).unwrap();
        assert!(result.chunks.iter().all(|c| !c.content.contains('\r')));
    }

    #[test]
    fn two_paragraph_document_gets_overlap_metadata() {
        let text = "First paragraph with enough words to be meaningful here.\n\nSecond paragraph with enough words to be meaningful here too.";
        let config = Config::builder()
            .max_chunk_size(60)
            .min_chunk_size(10)
            .overlap_size(20)
            .build()
            .unwrap();
        let result = chunk(text, &config).unwrap();
        assert!(result.chunks.len() >= 2);
        assert!(result.chunks[1].metadata.previous_content.is_some());
    }
}
