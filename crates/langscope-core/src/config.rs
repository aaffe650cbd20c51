//! Configuration types for the Langscope engine.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, EvidenceKind, Result};

/// Weight assumed for evidence kinds missing from the configured table.
pub const DEFAULT_KIND_WEIGHT: f64 = 0.3;

/// Top-level analysis configuration loaded from a YAML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Source tracker settings
    pub tracker: TrackerConfig,
    /// Confidence calculator settings
    pub calculator: CalculatorConfig,
    /// Detector settings
    pub detection: DetectionConfig,
}

impl AnalysisConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: AnalysisConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        self.tracker.validate()?;
        self.calculator.validate()?;
        self.detection.validate()?;
        Ok(())
    }
}

/// Source tracker settings: snippet extraction and location tracking knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Lines of context captured before/after each match
    pub context_lines: usize,
    /// Maximum snippet text length before truncation
    pub max_snippet_length: usize,
    /// Whether to extract snippets at all
    pub extract_snippets: bool,
    /// Whether to record line numbers
    pub track_line_numbers: bool,
    /// Whether to record column positions
    pub track_column_positions: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::detailed()
    }
}

impl TrackerConfig {
    /// Detailed preset: 5 context lines, 500-char snippets, everything on.
    pub fn detailed() -> Self {
        Self {
            context_lines: 5,
            max_snippet_length: 500,
            extract_snippets: true,
            track_line_numbers: true,
            track_column_positions: true,
        }
    }

    /// Minimal preset: 1 context line, 100-char snippets, no column tracking.
    pub fn minimal() -> Self {
        Self {
            context_lines: 1,
            max_snippet_length: 100,
            extract_snippets: true,
            track_line_numbers: true,
            track_column_positions: false,
        }
    }

    /// Performance preset: no context, 50-char cap, snippets disabled.
    pub fn performance() -> Self {
        Self {
            context_lines: 0,
            max_snippet_length: 50,
            extract_snippets: false,
            track_line_numbers: true,
            track_column_positions: false,
        }
    }

    /// Validate tracker settings.
    pub fn validate(&self) -> Result<()> {
        if self.max_snippet_length == 0 {
            return Err(Error::Config(
                "tracker.max_snippet_length must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Strategy for combining multiple confidence scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AggregationStrategy {
    /// Weight-proportional average of all scores
    #[default]
    WeightedAverage,
    /// Best score plus bounded bonuses for score count and evidence diversity
    MaxBoost,
    /// Weighted harmonic mean over non-zero scores
    HarmonicMean,
}

/// Confidence calculator settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Lower clamp for all confidence outputs
    pub min_confidence: f64,
    /// Upper clamp for all confidence outputs
    pub max_confidence: f64,
    /// Evidence confidence required to count as a strong indicator
    pub strong_indicator_threshold: f64,
    /// How multiple scores are combined
    pub aggregation: AggregationStrategy,
    /// Per-kind evidence weights; missing kinds fall back to
    /// [`DEFAULT_KIND_WEIGHT`]
    pub kind_weights: BTreeMap<EvidenceKind, f64>,
    /// Multiplicative boost factors for strong-indicator kinds; kinds
    /// absent from this table never boost
    pub boost_factors: BTreeMap<EvidenceKind, f64>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        let kind_weights = BTreeMap::from([
            (EvidenceKind::Extension, 0.9),
            (EvidenceKind::Syntax, 0.8),
            (EvidenceKind::Declaration, 0.9),
            (EvidenceKind::Framework, 0.7),
            (EvidenceKind::Dependency, 0.6),
            (EvidenceKind::Pattern, 0.6),
            (EvidenceKind::Keyword, 0.5),
            (EvidenceKind::Tool, 0.4),
        ]);
        let boost_factors = BTreeMap::from([
            (EvidenceKind::Extension, 1.2),
            (EvidenceKind::Declaration, 1.2),
            (EvidenceKind::Syntax, 1.15),
            (EvidenceKind::Framework, 1.1),
        ]);
        Self {
            min_confidence: 0.0,
            max_confidence: 1.0,
            strong_indicator_threshold: 0.6,
            aggregation: AggregationStrategy::default(),
            kind_weights,
            boost_factors,
        }
    }
}

impl CalculatorConfig {
    /// Conservative profile: caps all outputs at 0.85.
    pub fn conservative() -> Self {
        Self {
            max_confidence: 0.85,
            ..Self::default()
        }
    }

    /// Weight for an evidence kind, with the documented fallback.
    pub fn weight_for(&self, kind: EvidenceKind) -> f64 {
        self.kind_weights
            .get(&kind)
            .copied()
            .unwrap_or(DEFAULT_KIND_WEIGHT)
    }

    /// Boost factor for a strong-indicator kind, if it has one.
    pub fn boost_factor_for(&self, kind: EvidenceKind) -> Option<f64> {
        self.boost_factors.get(&kind).copied()
    }

    /// Clamp a raw score into the configured bounds.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min_confidence, self.max_confidence)
    }

    /// Validate calculator settings.
    pub fn validate(&self) -> Result<()> {
        for bound in [self.min_confidence, self.max_confidence] {
            if !bound.is_finite() || !(0.0..=1.0).contains(&bound) {
                return Err(Error::Config(
                    "calculator confidence bounds must be finite and within [0, 1]".to_string(),
                ));
            }
        }
        if self.min_confidence > self.max_confidence {
            return Err(Error::Config(
                "calculator.min_confidence must be <= max_confidence".to_string(),
            ));
        }
        if !self.strong_indicator_threshold.is_finite()
            || !(0.0..=1.0).contains(&self.strong_indicator_threshold)
        {
            return Err(Error::Config(
                "calculator.strong_indicator_threshold must be within [0, 1]".to_string(),
            ));
        }
        for (kind, weight) in &self.kind_weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(Error::Config(format!(
                    "calculator.kind_weights.{kind} must be finite and >= 0"
                )));
            }
        }
        for (kind, factor) in &self.boost_factors {
            if !factor.is_finite() || *factor < 1.0 {
                return Err(Error::Config(format!(
                    "calculator.boost_factors.{kind} must be finite and >= 1"
                )));
            }
        }
        Ok(())
    }
}

/// Detector settings governing fallback strategies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectionConfig {
    /// Boosted confidence below which fallback strategies engage
    pub fallback_threshold: f64,
    /// Multiplier applied when evidence spans enough distinct kinds
    pub diversity_boost: f64,
    /// Distinct evidence kinds required for the diversity boost
    pub diversity_min_kinds: usize,
    /// Multiplier applied when framework evidence matches the language's
    /// known frameworks
    pub framework_boost: f64,
    /// Confidence floor for languages present in the pattern table
    pub known_language_floor: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            fallback_threshold: 0.6,
            diversity_boost: 1.2,
            diversity_min_kinds: 3,
            framework_boost: 1.1,
            known_language_floor: 0.3,
        }
    }
}

impl DetectionConfig {
    /// Validate detection settings.
    pub fn validate(&self) -> Result<()> {
        if !self.fallback_threshold.is_finite() || !(0.0..=1.0).contains(&self.fallback_threshold)
        {
            return Err(Error::Config(
                "detection.fallback_threshold must be within [0, 1]".to_string(),
            ));
        }
        if !self.known_language_floor.is_finite()
            || !(0.0..=1.0).contains(&self.known_language_floor)
        {
            return Err(Error::Config(
                "detection.known_language_floor must be within [0, 1]".to_string(),
            ));
        }
        for boost in [self.diversity_boost, self.framework_boost] {
            if !boost.is_finite() || boost < 1.0 {
                return Err(Error::Config(
                    "detection boost multipliers must be finite and >= 1".to_string(),
                ));
            }
        }
        Ok(())
    }
}
