// src/strategy/mod.rs
//
// Strategy selection and dispatch (spec §4.2). A closed sum type rather
// than a trait-object registry, per the design notes: there are exactly
// three strategies and no plugin surface is wanted.

pub mod boundary;
pub mod code_aware;
pub mod fallback;
pub mod prose;
pub mod structural;

use crate::analysis::Analysis;
use crate::chunk::Chunk;
use crate::config::{Config, StrategyKind};
use crate::error::ChunkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    CodeAware,
    Structural,
    Fallback,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::CodeAware => "code_aware",
            Strategy::Structural => "structural",
            Strategy::Fallback => "fallback",
        }
    }

    /// Pick a strategy for `analysis` under `config` (spec §4.2's priority
    /// order): an explicit override wins outright; otherwise code-aware is
    /// tried first, then structural, falling back to paragraph packing.
    pub fn select(analysis: &Analysis, config: &Config) -> Strategy {
        if let Some(kind) = config.strategy_override {
            let chosen = match kind {
                StrategyKind::CodeAware => Strategy::CodeAware,
                StrategyKind::Structural => Strategy::Structural,
                StrategyKind::Fallback => Strategy::Fallback,
            };
            log::debug!("strategy forced by config override: {}", chosen.as_str());
            return chosen;
        }

        if analysis.code_ratio >= config.code_threshold
            || analysis.code_block_count >= 1
            || analysis.table_count >= 1
        {
            log::trace!(
                "selecting code_aware: code_ratio={:.3}, code_blocks={}, tables={}",
                analysis.code_ratio,
                analysis.code_block_count,
                analysis.table_count
            );
            return Strategy::CodeAware;
        }

        if analysis.header_count >= config.structure_threshold && analysis.max_header_depth > 1 {
            log::trace!(
                "selecting structural: header_count={}, max_header_depth={}",
                analysis.header_count,
                analysis.max_header_depth
            );
            return Strategy::Structural;
        }

        log::trace!("selecting fallback: no code or sufficient header structure detected");
        Strategy::Fallback
    }

    /// Run this strategy over `text`. Structural degrades to fallback when
    /// it finds no usable section breaks (spec §7's fallback-of-last-resort);
    /// code-aware and fallback always produce a result.
    pub fn apply(
        &self,
        text: &str,
        analysis: &Analysis,
        config: &Config,
    ) -> Result<(Vec<Chunk>, Strategy), ChunkError> {
        match self {
            Strategy::CodeAware => Ok((code_aware::apply(text, analysis, config)?, Strategy::CodeAware)),
            Strategy::Structural => {
                let chunks = structural::apply(text, analysis, config)?;
                if chunks.is_empty() {
                    Ok((fallback::apply(text, analysis, config)?, Strategy::Fallback))
                } else {
                    Ok((chunks, Strategy::Structural))
                }
            }
            Strategy::Fallback => Ok((fallback::apply(text, analysis, config)?, Strategy::Fallback)),
        }
    }
}
