// src/strategy/code_aware.rs
//
// Code-aware strategy (spec §4.3): alternates packed prose with atomic
// regions (fenced code blocks and tables), never splitting an atomic region
// and never merging prose across one. Grounded on the teacher's
// `HierarchyChunker`, generalized from a header-driven walk to an
// atomic-region-driven one.

use crate::analysis::Analysis;
use crate::chunk::{Chunk, ChunkMetadata, ContentType, OversizeReason};
use crate::config::{Config, StrategyKind};
use crate::error::ChunkError;
use crate::strategy::prose::pack_prose;

enum Atomic<'a> {
    Code {
        start_line: usize,
        end_line: usize,
        language: Option<&'a str>,
    },
    Table {
        start_line: usize,
        end_line: usize,
        column_count: usize,
    },
}

impl Atomic<'_> {
    fn start(&self) -> usize {
        match self {
            Atomic::Code { start_line, .. } => *start_line,
            Atomic::Table { start_line, .. } => *start_line,
        }
    }
    fn end(&self) -> usize {
        match self {
            Atomic::Code { end_line, .. } => *end_line,
            Atomic::Table { end_line, .. } => *end_line,
        }
    }
}

fn atomic_regions(analysis: &Analysis) -> Vec<Atomic<'_>> {
    let mut regions: Vec<Atomic> = Vec::new();
    for b in &analysis.code_blocks {
        regions.push(Atomic::Code {
            start_line: b.start_line,
            end_line: b.end_line,
            language: b.language.as_deref(),
        });
    }
    for t in &analysis.tables {
        regions.push(Atomic::Table {
            start_line: t.start_line,
            end_line: t.end_line,
            column_count: t.column_count,
        });
    }
    regions.sort_by_key(|r| r.start());
    regions
}

pub fn apply(text: &str, analysis: &Analysis, config: &Config) -> Result<Vec<Chunk>, ChunkError> {
    let lines: Vec<&str> = text.split('\n').collect();
    pack_atomic_aware(&lines, 1, analysis, config, StrategyKind::CodeAware.as_str())
}

/// Pack a line range, alternating prose (via [`pack_prose`]) with atomic
/// regions (code blocks, tables) that fall inside it, never splitting an
/// atomic region and never merging prose across one. Shared by the
/// code-aware strategy and by structural's leaf fallback, tagged with
/// whichever strategy name the caller is emitting under.
pub(crate) fn pack_atomic_aware(
    lines: &[&str],
    first_line_no: usize,
    analysis: &Analysis,
    config: &Config,
    strategy_name: &str,
) -> Result<Vec<Chunk>, ChunkError> {
    let last_line_no = first_line_no + lines.len() - 1;
    let regions: Vec<Atomic> = atomic_regions(analysis)
        .into_iter()
        .filter(|r| r.start() >= first_line_no && r.end() <= last_line_no)
        .collect();

    let mut chunks = Vec::new();
    let mut cursor = first_line_no;

    for region in &regions {
        if region.start() > cursor {
            let prose_lines = &lines[(cursor - first_line_no)..(region.start() - first_line_no)];
            emit_prose(prose_lines, cursor, config, strategy_name, &mut chunks)?;
        }

        let region_lines =
            &lines[(region.start() - first_line_no)..(region.end() - first_line_no + 1)];
        let content = region_lines.join("\n");
        let size = content.chars().count();
        let oversize = size > config.max_chunk_size;

        let mut metadata = match region {
            Atomic::Code { language, .. } => {
                let mut m = ChunkMetadata::new(strategy_name, ContentType::Code);
                m.language = language.map(str::to_string);
                if oversize {
                    m.allow_oversize = Some(true);
                    m.oversize_reason = Some(OversizeReason::CodeBlockIntegrity);
                }
                m
            }
            Atomic::Table { column_count, .. } => {
                let mut m = ChunkMetadata::new(strategy_name, ContentType::Table);
                m.column_count = Some(*column_count);
                m.row_count = Some(region_lines.len().saturating_sub(2));
                if oversize {
                    m.allow_oversize = Some(true);
                    m.oversize_reason = Some(OversizeReason::TableIntegrity);
                }
                m
            }
        };
        metadata.strategy = strategy_name.to_string();

        chunks.push(Chunk::new(content, region.start(), region.end(), metadata)?);
        cursor = region.end() + 1;
    }

    if cursor <= last_line_no {
        let prose_lines = &lines[(cursor - first_line_no)..];
        emit_prose(prose_lines, cursor, config, strategy_name, &mut chunks)?;
    }

    Ok(chunks)
}

fn emit_prose(
    lines: &[&str],
    first_line_no: usize,
    config: &Config,
    strategy_name: &str,
    chunks: &mut Vec<Chunk>,
) -> Result<(), ChunkError> {
    for draft in pack_prose(lines, first_line_no, config) {
        let mut metadata = ChunkMetadata::new(strategy_name, draft.content_type);
        if draft.oversize {
            metadata.allow_oversize = Some(true);
            metadata.oversize_reason = Some(OversizeReason::SectionIntegrity);
        }
        chunks.push(Chunk::new(draft.content, draft.start_line, draft.end_line, metadata)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::config::ConfigBuilder;

    #[test]
    fn single_code_block_becomes_its_own_chunk() {
        let text = "intro text here\n\n```python\nprint(1)\n```\n\noutro text here";
        let analysis = analyze(text);
        let config = ConfigBuilder::new().build().unwrap();
        let chunks = apply(text, &analysis, &config).unwrap();
        assert!(chunks.iter().any(|c| c.metadata.content_type == ContentType::Code));
        let code_chunk = chunks
            .iter()
            .find(|c| c.metadata.content_type == ContentType::Code)
            .unwrap();
        assert!(code_chunk.content.contains("print(1)"));
        assert_eq!(code_chunk.metadata.language.as_deref(), Some("python"));
    }

    #[test]
    fn oversize_code_block_is_flagged() {
        let body = "x = 1\n".repeat(2000);
        let text = format!("```python\n{body}```\n");
        let analysis = analyze(&text);
        let config = ConfigBuilder::new().max_chunk_size(100).build().unwrap();
        let chunks = apply(&text, &analysis, &config).unwrap();
        let code_chunk = chunks
            .iter()
            .find(|c| c.metadata.content_type == ContentType::Code)
            .unwrap();
        assert_eq!(code_chunk.metadata.allow_oversize, Some(true));
        assert_eq!(
            code_chunk.metadata.oversize_reason,
            Some(OversizeReason::CodeBlockIntegrity)
        );
    }
}
