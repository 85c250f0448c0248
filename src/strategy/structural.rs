// src/strategy/structural.rs
//
// Structural strategy (spec §4.4): every header starts a new section,
// spanning from its own line to the line before the next header of any
// level; `header_path` comes from a running stack of in-scope headers.
// A section is emitted whole when it fits, allowed oversize up to
// `effective_max`, and otherwise handed to atomic-aware prose packing
// (there is no further header boundary to recurse into, since each
// header already owns its own section). Grounded on the teacher's
// `HierarchyChunker` section walk (chunker/hierarchy.rs), generalized
// from a fixed-depth cutoff to this flat, stack-tracked partition.

use crate::analysis::{Analysis, HeaderRecord};
use crate::chunk::{Chunk, ChunkMetadata, ContentType, OversizeReason};
use crate::config::{Config, StrategyKind};
use crate::error::ChunkError;
use crate::strategy::code_aware::pack_atomic_aware;

const NAME: &str = "structural";

pub fn apply(text: &str, analysis: &Analysis, config: &Config) -> Result<Vec<Chunk>, ChunkError> {
    let lines: Vec<&str> = text.split('\n').collect();
    let total_lines = lines.len().max(1);
    let mut chunks = Vec::new();

    if analysis.headers.is_empty() {
        // No usable section breaks; spec §7's fallback-of-last-resort.
        return pack_atomic_aware(&lines, 1, analysis, config, NAME);
    }

    let first_header_line = analysis.headers[0].line;
    if first_header_line > 1 {
        // Content before the first header always needs a home, whether or
        // not it's tagged as a preamble.
        emit_section(
            &lines,
            analysis,
            config,
            1,
            first_header_line - 1,
            &[],
            config.extract_preamble,
            &mut chunks,
        )?;
    }

    let mut stack: Vec<&HeaderRecord> = Vec::new();
    for (i, header) in analysis.headers.iter().enumerate() {
        while stack.last().is_some_and(|top| top.level >= header.level) {
            stack.pop();
        }
        stack.push(header);
        let path: Vec<String> = stack.iter().map(|h| h.text.clone()).collect();

        let end = analysis
            .headers
            .get(i + 1)
            .map(|next| next.line - 1)
            .unwrap_or(total_lines);

        emit_section(&lines, analysis, config, header.line, end, &path, false, &mut chunks)?;
    }

    if chunks.is_empty() {
        return pack_atomic_aware(&lines, 1, analysis, config, NAME);
    }

    Ok(chunks)
}

fn emit_section(
    lines: &[&str],
    analysis: &Analysis,
    config: &Config,
    start_line: usize,
    end_line: usize,
    header_path: &[String],
    is_preamble: bool,
    chunks: &mut Vec<Chunk>,
) -> Result<(), ChunkError> {
    if start_line > end_line {
        return Ok(());
    }
    let section_lines = &lines[(start_line - 1)..end_line];
    let content = section_lines.join("\n");
    if content.trim().is_empty() {
        return Ok(());
    }

    let size = content.chars().count();

    if size <= config.max_chunk_size {
        push_section_chunk(section_lines, start_line, end_line, header_path, is_preamble, false, chunks)?;
        return Ok(());
    }
    if size <= config.effective_max() {
        push_section_chunk(section_lines, start_line, end_line, header_path, is_preamble, true, chunks)?;
        return Ok(());
    }

    // No deeper header boundary to recurse into: every header already
    // owns its own section. Pack the overflow via paragraph/atomic
    // splitting instead.
    leaf_fallback(lines, analysis, config, start_line, end_line, header_path, chunks)
}

fn push_section_chunk(
    section_lines: &[&str],
    start_line: usize,
    end_line: usize,
    header_path: &[String],
    is_preamble: bool,
    oversize: bool,
    chunks: &mut Vec<Chunk>,
) -> Result<(), ChunkError> {
    let content = section_lines.join("\n");
    let content_type = if is_preamble {
        ContentType::Preamble
    } else {
        ContentType::Text
    };
    let mut metadata = ChunkMetadata::new(StrategyKind::Structural.as_str(), content_type);
    if !header_path.is_empty() {
        metadata.header_path = Some(header_path.to_vec());
    }
    if oversize {
        metadata.allow_oversize = Some(true);
        metadata.oversize_reason = Some(OversizeReason::SectionIntegrity);
    }
    chunks.push(Chunk::new(content, start_line, end_line, metadata)?);
    Ok(())
}

fn leaf_fallback(
    lines: &[&str],
    analysis: &Analysis,
    config: &Config,
    start_line: usize,
    end_line: usize,
    header_path: &[String],
    chunks: &mut Vec<Chunk>,
) -> Result<(), ChunkError> {
    let section_lines = &lines[(start_line - 1)..end_line];
    let packed = pack_atomic_aware(section_lines, start_line, analysis, config, NAME)?;
    for mut c in packed {
        if !header_path.is_empty() {
            c.metadata.header_path = Some(header_path.to_vec());
        }
        chunks.push(c);
    }
    Ok(())
}
