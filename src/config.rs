// src/config.rs

use crate::error::ChunkError;

/// One of the three chunking algorithms, or the result of forcing one via
/// `Config::strategy_override`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    CodeAware,
    Structural,
    Fallback,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::CodeAware => "code_aware",
            StrategyKind::Structural => "structural",
            StrategyKind::Fallback => "fallback",
        }
    }
}

/// Immutable run configuration (spec §3). Built via [`ConfigBuilder`], which
/// validates ranges and auto-adjusts minor contradictions rather than
/// failing outright.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub max_chunk_size: usize,
    pub min_chunk_size: usize,
    pub overlap_size: usize,
    pub preserve_atomic_blocks: bool,
    pub extract_preamble: bool,
    pub code_threshold: f64,
    pub structure_threshold: usize,
    pub oversize_tolerance: f64,
    pub strategy_override: Option<StrategyKind>,
}

impl Default for Config {
    fn default() -> Self {
        ConfigBuilder::new()
            .build()
            .expect("default configuration is always valid")
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// `floor(max_chunk_size * (1 + oversize_tolerance))`, the ceiling used
    /// by structural and fallback strategies before a section/paragraph is
    /// forced to subdivide further (spec §4.4, §4.5).
    pub fn effective_max(&self) -> usize {
        let scaled = self.max_chunk_size as f64 * (1.0 + self.oversize_tolerance);
        scaled.floor() as usize
    }
}

/// Builder for [`Config`]. Defaults match spec §3's table.
pub struct ConfigBuilder {
    max_chunk_size: usize,
    min_chunk_size: usize,
    overlap_size: usize,
    preserve_atomic_blocks: bool,
    extract_preamble: bool,
    code_threshold: f64,
    structure_threshold: usize,
    oversize_tolerance: f64,
    strategy_override: Option<StrategyKind>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            max_chunk_size: 4096,
            min_chunk_size: 512,
            overlap_size: 200,
            preserve_atomic_blocks: true,
            extract_preamble: true,
            code_threshold: 0.3,
            structure_threshold: 3,
            oversize_tolerance: 0.2,
            strategy_override: None,
        }
    }

    pub fn max_chunk_size(mut self, v: usize) -> Self {
        self.max_chunk_size = v;
        self
    }

    pub fn min_chunk_size(mut self, v: usize) -> Self {
        self.min_chunk_size = v;
        self
    }

    pub fn overlap_size(mut self, v: usize) -> Self {
        self.overlap_size = v;
        self
    }

    pub fn preserve_atomic_blocks(mut self, v: bool) -> Self {
        self.preserve_atomic_blocks = v;
        self
    }

    pub fn extract_preamble(mut self, v: bool) -> Self {
        self.extract_preamble = v;
        self
    }

    pub fn code_threshold(mut self, v: f64) -> Self {
        self.code_threshold = v;
        self
    }

    pub fn structure_threshold(mut self, v: usize) -> Self {
        self.structure_threshold = v;
        self
    }

    pub fn oversize_tolerance(mut self, v: f64) -> Self {
        self.oversize_tolerance = v;
        self
    }

    pub fn strategy_override(mut self, v: StrategyKind) -> Self {
        self.strategy_override = Some(v);
        self
    }

    /// Validate and auto-adjust, per spec §3: hard errors for invariants
    /// that cannot be reconciled, silent clamping for minor contradictions.
    pub fn build(mut self) -> Result<Config, ChunkError> {
        if self.max_chunk_size == 0 {
            return Err(ChunkError::Configuration(
                "max_chunk_size must be >= 1".into(),
            ));
        }
        if self.min_chunk_size == 0 {
            return Err(ChunkError::Configuration(
                "min_chunk_size must be >= 1".into(),
            ));
        }
        if self.structure_threshold == 0 {
            return Err(ChunkError::Configuration(
                "structure_threshold must be >= 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.code_threshold) {
            return Err(ChunkError::Configuration(format!(
                "code_threshold must be in [0, 1], got {}",
                self.code_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.oversize_tolerance) {
            return Err(ChunkError::Configuration(format!(
                "oversize_tolerance must be in [0, 1], got {}",
                self.oversize_tolerance
            )));
        }
        if self.overlap_size >= self.max_chunk_size {
            return Err(ChunkError::Configuration(format!(
                "overlap_size ({}) must be < max_chunk_size ({})",
                self.overlap_size, self.max_chunk_size
            )));
        }

        // Minor contradiction: min > max auto-adjusts rather than erroring.
        if self.min_chunk_size > self.max_chunk_size {
            self.min_chunk_size = (self.max_chunk_size / 2).max(1);
        }

        Ok(Config {
            max_chunk_size: self.max_chunk_size,
            min_chunk_size: self.min_chunk_size,
            overlap_size: self.overlap_size,
            preserve_atomic_blocks: self.preserve_atomic_blocks,
            extract_preamble: self.extract_preamble,
            code_threshold: self.code_threshold,
            structure_threshold: self.structure_threshold,
            oversize_tolerance: self.oversize_tolerance,
            strategy_override: self.strategy_override,
        })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_table() {
        let cfg = Config::default();
        assert_eq!(cfg.max_chunk_size, 4096);
        assert_eq!(cfg.min_chunk_size, 512);
        assert_eq!(cfg.overlap_size, 200);
        assert!(cfg.preserve_atomic_blocks);
        assert!(cfg.extract_preamble);
        assert_eq!(cfg.code_threshold, 0.3);
        assert_eq!(cfg.structure_threshold, 3);
        assert_eq!(cfg.oversize_tolerance, 0.2);
        assert_eq!(cfg.strategy_override, None);
    }

    #[test]
    fn min_greater_than_max_auto_adjusts() {
        let cfg = ConfigBuilder::new()
            .max_chunk_size(100)
            .min_chunk_size(500)
            .overlap_size(0)
            .build()
            .unwrap();
        assert_eq!(cfg.min_chunk_size, 50);
    }

    #[test]
    fn zero_max_chunk_size_errors() {
        let result = ConfigBuilder::new().max_chunk_size(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn overlap_at_or_above_max_errors() {
        let result = ConfigBuilder::new()
            .max_chunk_size(100)
            .overlap_size(100)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn out_of_range_ratio_errors() {
        assert!(ConfigBuilder::new().code_threshold(1.5).build().is_err());
        assert!(ConfigBuilder::new()
            .oversize_tolerance(-0.1)
            .build()
            .is_err());
    }

    #[test]
    fn effective_max_applies_tolerance() {
        let cfg = ConfigBuilder::new()
            .max_chunk_size(1000)
            .oversize_tolerance(0.2)
            .overlap_size(0)
            .build()
            .unwrap();
        assert_eq!(cfg.effective_max(), 1200);
    }
}
