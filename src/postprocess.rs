// src/postprocess.rs
//
// Post-processing pipeline (spec §4.7): the single place where chunks
// coming out of any strategy get ordered, enriched with header paths and
// overlap, and validated before being handed back to the caller. Grounded
// on the teacher's final assembly step in `HierarchyChunker::chunk`, but
// generalized into a strategy-agnostic pass since here it runs regardless
// of which of the three strategies produced the chunks.

use std::collections::BTreeMap;

use crate::analysis::{Analysis, HeaderRecord};
use crate::chunk::{Chunk, ContentType, OversizeReason};
use crate::config::Config;
use crate::error::{ChunkError, ValidationErrorKind};
use crate::links;
use crate::strategy::boundary::{sentence_aligned_prefix, sentence_aligned_suffix};

/// Run the full post-processing pipeline, returning the finished chunks
/// plus any non-critical warnings collected along the way.
pub fn run(
    mut chunks: Vec<Chunk>,
    analysis: &Analysis,
    config: &Config,
) -> Result<(Vec<Chunk>, Vec<String>), ChunkError> {
    chunks.sort_by_key(|c| (c.start_line, c.end_line));

    for chunk in &mut chunks {
        if chunk.content.contains('\r') {
            chunk.content = chunk.content.replace('\r', "");
        }
    }

    for chunk in &mut chunks {
        let path = compute_header_path(&analysis.headers, chunk.start_line);
        chunk.metadata.header_path = if path.is_empty() { None } else { Some(path) };
    }

    for chunk in &mut chunks {
        enrich(chunk);
    }

    fill_oversize_defaults(&mut chunks, config);

    apply_overlap(&mut chunks, config);

    let warnings = validate(&chunks, analysis, config)?;

    Ok((chunks, warnings))
}

/// Header path at `line`: the stack of headers whose scope contains it,
/// simulating push-on-deeper/pop-on-shallower-or-equal (spec §4.7 item 2).
fn compute_header_path(headers: &[HeaderRecord], line: usize) -> Vec<String> {
    let mut stack: Vec<&HeaderRecord> = Vec::new();
    for h in headers {
        if h.line > line {
            break;
        }
        while let Some(top) = stack.last() {
            if top.level >= h.level {
                stack.pop();
            } else {
                break;
            }
        }
        stack.push(h);
    }
    stack.into_iter().map(|h| h.text.clone()).collect()
}

fn enrich(chunk: &mut Chunk) {
    let content = &chunk.content;
    let meta = &mut chunk.metadata;

    match meta.content_type {
        ContentType::Code => {
            // Atomic regions are left alone; their own fence already marks them.
        }
        ContentType::Table => {
            // row_count/column_count are set by the strategy that built the table chunk.
        }
        _ => {
            meta.has_bold = Some(content.contains("**") || content.contains("__"));
            meta.has_inline_code = Some(has_inline_code(content));
            meta.has_italic = Some(has_italic(content));
            meta.has_urls = Some(links::has_urls(content));
            meta.has_emails = Some(links::has_emails(content));

            let link_count = links::extract_links(content).len();
            if link_count > 0 {
                meta.extra
                    .insert("link_count".to_string(), serde_json::json!(link_count));
            }

            if meta.content_type == ContentType::List {
                meta.list_type = Some(detect_list_type(content));
                meta.has_nested_lists = Some(has_nested_list_items(content));
            }
        }
    }
}

fn has_inline_code(content: &str) -> bool {
    content
        .lines()
        .filter(|l| !l.trim_start().starts_with("```") && !l.trim_start().starts_with("~~~"))
        .any(|l| l.matches('`').count() >= 2)
}

fn has_italic(content: &str) -> bool {
    let stripped = content.replace("**", "").replace("__", "");
    stripped.contains('*') || stripped.contains('_')
}

fn detect_list_type(content: &str) -> String {
    let first = content.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let trimmed = first.trim_start();
    if trimmed.starts_with(|c: char| c.is_numeric()) {
        "ordered".to_string()
    } else {
        "unordered".to_string()
    }
}

fn has_nested_list_items(content: &str) -> bool {
    content
        .lines()
        .any(|l| l.starts_with("  ") && crate::analysis::is_list_item_start(l.trim_start()))
}

/// Guarantee every chunk exceeding `max_chunk_size` carries an oversize
/// reason (spec §4.7 item 5). Strategies should already set this; this is
/// the last line of defense so validation never has to fail for it.
fn fill_oversize_defaults(chunks: &mut [Chunk], config: &Config) {
    for chunk in chunks {
        if chunk.size() > config.max_chunk_size && chunk.metadata.allow_oversize.is_none() {
            chunk.metadata.allow_oversize = Some(true);
            chunk.metadata.oversize_reason = Some(OversizeReason::SectionIntegrity);
        }
    }
}

/// Attach block-aligned overlap (spec §4.7 item 3, metadata mode only):
/// `previous_content`/`next_content` store sentence-aligned slices of the
/// neighboring chunks, capped at `overlap_size` and at 40% of whichever
/// neighbor is shorter. Atomic (code/table) neighbors never donate partial
/// content, since truncating mid-fence or mid-row would be meaningless.
fn apply_overlap(chunks: &mut [Chunk], config: &Config) {
    if config.overlap_size == 0 || chunks.len() < 2 {
        return;
    }

    let snapshot: Vec<(usize, ContentType)> = chunks
        .iter()
        .map(|c| (c.size(), c.metadata.content_type))
        .collect();
    let contents: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();

    let n = chunks.len();
    for i in 0..n {
        if i > 0 {
            let (prev_size, prev_type) = snapshot[i - 1];
            if !is_atomic(prev_type) {
                let cap = overlap_cap(config.overlap_size, prev_size, snapshot[i].0);
                if cap > 0 {
                    let suffix = sentence_aligned_suffix(&contents[i - 1], cap);
                    if !suffix.is_empty() {
                        chunks[i].metadata.previous_content = Some(suffix);
                        chunks[i].metadata.previous_chunk_index = Some(i - 1);
                    }
                }
            }
        }
        if i + 1 < n {
            let (next_size, next_type) = snapshot[i + 1];
            if !is_atomic(next_type) {
                let cap = overlap_cap(config.overlap_size, next_size, snapshot[i].0);
                if cap > 0 {
                    let prefix = sentence_aligned_prefix(&contents[i + 1], cap);
                    if !prefix.is_empty() {
                        chunks[i].metadata.next_content = Some(prefix);
                        chunks[i].metadata.next_chunk_index = Some(i + 1);
                    }
                }
            }
        }
    }
}

fn is_atomic(content_type: ContentType) -> bool {
    matches!(content_type, ContentType::Code | ContentType::Table)
}

fn overlap_cap(overlap_size: usize, a: usize, b: usize) -> usize {
    let shorter = a.min(b);
    let ratio_cap = (shorter as f64 * 0.4).floor() as usize;
    overlap_size.min(ratio_cap)
}

/// Final validation against the testable properties (spec §8): a
/// violation that can only mean a programming error aborts the call, while
/// conditions that are legal but notable become warnings.
fn validate(
    chunks: &[Chunk],
    analysis: &Analysis,
    config: &Config,
) -> Result<Vec<String>, ChunkError> {
    let mut warnings = Vec::new();

    for window in chunks.windows(2) {
        if window[1].start_line < window[0].start_line {
            let mut context = BTreeMap::new();
            context.insert("first_start".to_string(), window[0].start_line.to_string());
            context.insert("second_start".to_string(), window[1].start_line.to_string());
            return Err(ChunkError::validation(
                ValidationErrorKind::NonMonotonicOrder,
                "chunks are not sorted in non-decreasing start_line order",
                context,
            ));
        }
    }

    for (idx, chunk) in chunks.iter().enumerate() {
        if chunk.size() > config.max_chunk_size && chunk.metadata.allow_oversize != Some(true) {
            let mut context = BTreeMap::new();
            context.insert("chunk_index".to_string(), idx.to_string());
            context.insert("size".to_string(), chunk.size().to_string());
            return Err(ChunkError::validation(
                ValidationErrorKind::SizeBoundViolation,
                "chunk exceeds max_chunk_size without an oversize reason",
                context,
            ));
        }
        let is_last = idx + 1 == chunks.len();
        if !is_last && chunk.size() < config.min_chunk_size && chunk.metadata.allow_oversize.is_none()
        {
            warnings.push(format!(
                "chunk {idx} (lines {}-{}) is smaller than min_chunk_size ({} < {})",
                chunk.start_line,
                chunk.end_line,
                chunk.size(),
                config.min_chunk_size
            ));
        }
    }

    for block in &analysis.code_blocks {
        if block.unterminated {
            warnings.push(format!(
                "unterminated code fence starting at line {}",
                block.start_line
            ));
        }
    }

    for warning in &warnings {
        log::warn!("{warning}");
    }

    Ok(warnings)
}
