// src/strategy/fallback.rs
//
// Fallback strategy (spec §4.5): paragraph-first greedy packing for
// documents with no usable header hierarchy and insufficient code to
// warrant the code-aware strategy. Grounded on the teacher's
// `RecursiveCharacterSplitter::chunk`, generalized to operate over
// characters instead of estimated tokens.

use crate::analysis::Analysis;
use crate::chunk::{Chunk, ChunkMetadata};
use crate::config::{Config, StrategyKind};
use crate::error::ChunkError;
use crate::strategy::code_aware::pack_atomic_aware;
use crate::strategy::prose::pack_prose;

const NAME: &str = "fallback";

pub fn apply(text: &str, analysis: &Analysis, config: &Config) -> Result<Vec<Chunk>, ChunkError> {
    let lines: Vec<&str> = text.split('\n').collect();

    if config.preserve_atomic_blocks {
        return pack_atomic_aware(&lines, 1, analysis, config, NAME);
    }

    let mut chunks = Vec::new();
    for draft in pack_prose(&lines, 1, config) {
        let mut metadata = ChunkMetadata::new(StrategyKind::Fallback.as_str(), draft.content_type);
        if draft.oversize {
            metadata.allow_oversize = Some(true);
            metadata.oversize_reason = Some(crate::chunk::OversizeReason::SectionIntegrity);
        }
        chunks.push(Chunk::new(draft.content, draft.start_line, draft.end_line, metadata)?);
    }
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::config::ConfigBuilder;

    #[test]
    fn single_paragraph_becomes_one_chunk() {
        let text = "Just a single short paragraph of plain prose.";
        let analysis = analyze(text);
        let config = ConfigBuilder::new().build().unwrap();
        let chunks = apply(text, &analysis, &config).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata.strategy, "fallback");
    }

    #[test]
    fn respects_max_chunk_size_across_many_paragraphs() {
        let mut text = String::new();
        for i in 0..20 {
            text.push_str(&format!("Paragraph number {i} with a handful of words in it.\n\n"));
        }
        let analysis = analyze(&text);
        let config = ConfigBuilder::new().max_chunk_size(120).build().unwrap();
        let chunks = apply(&text, &analysis, &config).unwrap();
        assert!(chunks.len() > 1);
        for c in &chunks {
            assert!(c.size() <= config.effective_max());
        }
    }
}
