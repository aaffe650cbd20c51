//! Confidence scoring: weighted bases, strong-indicator boosts, and
//! multi-score aggregation.

use langscope_core::{AggregationStrategy, CalculatorConfig, Evidence, EvidenceKind};

/// Bonus per additional score under the max-boost strategy.
const MAX_BOOST_SCORE_BONUS: f64 = 0.05;
/// Cap on the score-count bonus.
const MAX_BOOST_SCORE_CAP: f64 = 0.2;
/// Bonus per evidence item under the max-boost strategy.
const MAX_BOOST_EVIDENCE_BONUS: f64 = 0.02;
/// Cap on the evidence-count bonus.
const MAX_BOOST_EVIDENCE_CAP: f64 = 0.15;

/// An intermediate score fed into aggregation. Never persisted beyond a
/// single aggregation call.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceScore {
    /// The score value
    pub value: f64,
    /// Relative weight of this score
    pub weight: f64,
    /// Which component produced it
    pub source: String,
    /// How many evidence items backed it
    pub evidence_count: usize,
}

/// Evidence reliable enough to multiplicatively boost a base score.
#[derive(Debug, Clone, PartialEq)]
pub struct StrongIndicator {
    /// The indicator's evidence kind
    pub kind: EvidenceKind,
    /// Configured kind weight scaled by the evidence confidence
    pub weight: f64,
    /// Multiplicative boost factor
    pub boost_factor: f64,
}

/// Turns evidence sets into calibrated confidence values.
///
/// All outputs are clamped to the configured `[min_confidence,
/// max_confidence]` bounds.
#[derive(Debug, Clone, Default)]
pub struct ConfidenceCalculator {
    config: CalculatorConfig,
}

impl ConfidenceCalculator {
    /// Create a calculator with the given configuration.
    pub fn new(config: CalculatorConfig) -> Self {
        Self { config }
    }

    /// The calculator's configuration.
    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Weighted average of evidence confidences, where each kind's
    /// configured weight reflects how diagnostic it is of genuine language
    /// use. Empty input yields the configured minimum.
    pub fn calculate_base_confidence(&self, evidence: &[Evidence]) -> f64 {
        if evidence.is_empty() {
            return self.config.min_confidence;
        }
        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        for item in evidence {
            let weight = self.config.weight_for(item.kind);
            weighted_sum += item.confidence * weight;
            weight_total += weight;
        }
        if weight_total == 0.0 {
            return self.config.min_confidence;
        }
        self.config.clamp(weighted_sum / weight_total)
    }

    /// Pick out strong indicators: evidence whose kind carries a configured
    /// boost factor and whose confidence clears the threshold. Everything
    /// else still contributes to the base score but never boosts.
    pub fn detect_strong_indicators(&self, evidence: &[Evidence]) -> Vec<StrongIndicator> {
        evidence
            .iter()
            .filter(|e| e.confidence >= self.config.strong_indicator_threshold)
            .filter_map(|e| {
                self.config.boost_factor_for(e.kind).map(|boost_factor| StrongIndicator {
                    kind: e.kind,
                    weight: self.config.weight_for(e.kind) * e.confidence,
                    boost_factor,
                })
            })
            .collect()
    }

    /// Apply strong-indicator boosts to a base score.
    ///
    /// The average boost is the weight-proportional mean of the excess
    /// factors; no indicators leaves the base unchanged (modulo clamping).
    pub fn apply_boost_factors(&self, base: f64, indicators: &[StrongIndicator]) -> f64 {
        let weight_total: f64 = indicators.iter().map(|i| i.weight).sum();
        if indicators.is_empty() || weight_total == 0.0 {
            return self.config.clamp(base);
        }
        let boost_sum: f64 = indicators
            .iter()
            .map(|i| (i.boost_factor - 1.0) * i.weight)
            .sum();
        let average_boost = boost_sum / weight_total;
        self.config.clamp(base * (1.0 + average_boost))
    }

    /// Base confidence with strong-indicator boosts applied.
    pub fn calculate_with_boosts(&self, evidence: &[Evidence]) -> f64 {
        let base = self.calculate_base_confidence(evidence);
        let indicators = self.detect_strong_indicators(evidence);
        self.apply_boost_factors(base, &indicators)
    }

    /// Combine multiple scores using the configured strategy.
    ///
    /// A single score bypasses aggregation and is clamped directly.
    pub fn aggregate_multiple_scores(&self, scores: &[ConfidenceScore]) -> f64 {
        match scores {
            [] => self.config.min_confidence,
            [single] => self.config.clamp(single.value),
            _ => {
                let value = match self.config.aggregation {
                    AggregationStrategy::WeightedAverage => Self::weighted_average(scores),
                    AggregationStrategy::MaxBoost => Self::max_boost(scores),
                    AggregationStrategy::HarmonicMean => Self::harmonic_mean(scores),
                };
                self.config.clamp(value)
            }
        }
    }

    fn weighted_average(scores: &[ConfidenceScore]) -> f64 {
        let weight_total: f64 = scores.iter().map(|s| s.weight).sum();
        if weight_total == 0.0 {
            return 0.0;
        }
        scores.iter().map(|s| s.value * s.weight).sum::<f64>() / weight_total
    }

    /// Best score plus bounded bonuses rewarding evidence diversity beyond
    /// the single best score.
    fn max_boost(scores: &[ConfidenceScore]) -> f64 {
        let max = scores.iter().map(|s| s.value).fold(f64::MIN, f64::max);
        let score_bonus = (MAX_BOOST_SCORE_BONUS * scores.len() as f64).min(MAX_BOOST_SCORE_CAP);
        let evidence_total: usize = scores.iter().map(|s| s.evidence_count).sum();
        let evidence_bonus =
            (MAX_BOOST_EVIDENCE_BONUS * evidence_total as f64).min(MAX_BOOST_EVIDENCE_CAP);
        max + score_bonus + evidence_bonus
    }

    /// Weighted harmonic mean over scores with non-zero value; zero-value
    /// scores are excluded to guard the division.
    fn harmonic_mean(scores: &[ConfidenceScore]) -> f64 {
        let nonzero: Vec<&ConfidenceScore> = scores.iter().filter(|s| s.value > 0.0).collect();
        if nonzero.is_empty() {
            return 0.0;
        }
        let weight_total: f64 = nonzero.iter().map(|s| s.weight).sum();
        let denominator: f64 = nonzero.iter().map(|s| s.weight / s.value).sum();
        if denominator == 0.0 {
            return 0.0;
        }
        weight_total / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use langscope_core::SourceRange;

    fn evidence(kind: EvidenceKind, confidence: f64) -> Evidence {
        Evidence::new(kind, "x", confidence, SourceRange::single_line(0, 0, 1))
    }

    fn score(value: f64, weight: f64, evidence_count: usize) -> ConfidenceScore {
        ConfidenceScore {
            value,
            weight,
            source: "test".to_string(),
            evidence_count,
        }
    }

    #[test]
    fn test_empty_evidence_returns_min() {
        let calculator = ConfidenceCalculator::default();
        assert_eq!(calculator.calculate_base_confidence(&[]), 0.0);

        let mut config = CalculatorConfig::default();
        config.min_confidence = 0.1;
        let calculator = ConfidenceCalculator::new(config);
        assert_eq!(calculator.calculate_base_confidence(&[]), 0.1);
    }

    #[test]
    fn test_base_is_weighted_average() {
        let calculator = ConfidenceCalculator::default();
        let items = vec![
            evidence(EvidenceKind::Extension, 0.8), // weight 0.9
            evidence(EvidenceKind::Keyword, 0.5),   // weight 0.5
        ];
        let expected = (0.8 * 0.9 + 0.5 * 0.5) / (0.9 + 0.5);
        assert!((calculator.calculate_base_confidence(&items) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_single_evidence_base_equals_its_confidence() {
        let calculator = ConfidenceCalculator::default();
        let items = vec![evidence(EvidenceKind::Syntax, 0.9)];
        assert!((calculator.calculate_base_confidence(&items) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_strong_indicators_threshold() {
        let calculator = ConfidenceCalculator::default();
        let items = vec![
            evidence(EvidenceKind::Extension, 0.8),   // strong
            evidence(EvidenceKind::Syntax, 0.59),     // below threshold
            evidence(EvidenceKind::Keyword, 0.9),     // no boost factor
            evidence(EvidenceKind::Framework, 0.7),   // strong
        ];
        let indicators = calculator.detect_strong_indicators(&items);
        assert_eq!(indicators.len(), 2);
        assert_eq!(indicators[0].kind, EvidenceKind::Extension);
        assert!((indicators[0].weight - 0.9 * 0.8).abs() < 1e-9);
        assert_eq!(indicators[1].kind, EvidenceKind::Framework);
    }

    #[test]
    fn test_no_indicators_leaves_base_unchanged() {
        let calculator = ConfidenceCalculator::default();
        assert_eq!(calculator.apply_boost_factors(0.45, &[]), 0.45);
    }

    #[test]
    fn test_boost_application() {
        let calculator = ConfidenceCalculator::default();
        let indicators = vec![StrongIndicator {
            kind: EvidenceKind::Syntax,
            weight: 0.72,
            boost_factor: 1.15,
        }];
        // Single indicator: average boost is exactly factor - 1.
        let boosted = calculator.apply_boost_factors(0.6, &indicators);
        assert!((boosted - 0.6 * 1.15).abs() < 1e-9);
    }

    #[test]
    fn test_boosted_output_clamped() {
        let calculator = ConfidenceCalculator::default();
        let items = vec![evidence(EvidenceKind::Extension, 1.0)];
        assert!(calculator.calculate_with_boosts(&items) <= 1.0);

        let conservative = ConfidenceCalculator::new(CalculatorConfig::conservative());
        assert!(conservative.calculate_with_boosts(&items) <= 0.85);
    }

    #[test]
    fn test_fenced_python_block_scenario() {
        // A lone 0.9 syntax evidence must survive weighting above 0.6.
        let calculator = ConfidenceCalculator::default();
        let items = vec![evidence(EvidenceKind::Syntax, 0.9)];
        assert!(calculator.calculate_with_boosts(&items) >= 0.6);
    }

    #[test]
    fn test_single_score_bypasses_aggregation() {
        for strategy in [
            AggregationStrategy::WeightedAverage,
            AggregationStrategy::MaxBoost,
            AggregationStrategy::HarmonicMean,
        ] {
            let mut config = CalculatorConfig::default();
            config.aggregation = strategy;
            let calculator = ConfidenceCalculator::new(config);
            assert_eq!(
                calculator.aggregate_multiple_scores(&[score(0.42, 3.0, 7)]),
                0.42
            );
        }
    }

    #[test]
    fn test_weighted_average_aggregation() {
        let calculator = ConfidenceCalculator::default();
        let scores = vec![score(0.6, 2.0, 1), score(0.9, 1.0, 1)];
        let expected = (0.6 * 2.0 + 0.9) / 3.0;
        assert!((calculator.aggregate_multiple_scores(&scores) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_max_boost_aggregation() {
        let mut config = CalculatorConfig::default();
        config.aggregation = AggregationStrategy::MaxBoost;
        let calculator = ConfidenceCalculator::new(config);

        let scores = vec![score(0.5, 1.0, 2), score(0.7, 1.0, 3)];
        // 0.7 + min(0.05*2, 0.2) + min(0.02*5, 0.15) = 0.7 + 0.1 + 0.1
        assert!((calculator.aggregate_multiple_scores(&scores) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_max_boost_bonuses_capped() {
        let mut config = CalculatorConfig::default();
        config.aggregation = AggregationStrategy::MaxBoost;
        let calculator = ConfidenceCalculator::new(config);

        let scores: Vec<ConfidenceScore> = (0..20).map(|_| score(0.4, 1.0, 50)).collect();
        // 0.4 + 0.2 (capped) + 0.15 (capped)
        assert!((calculator.aggregate_multiple_scores(&scores) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_harmonic_mean_aggregation() {
        let mut config = CalculatorConfig::default();
        config.aggregation = AggregationStrategy::HarmonicMean;
        let calculator = ConfidenceCalculator::new(config);

        let scores = vec![score(0.5, 1.0, 1), score(0.8, 1.0, 1)];
        let expected = 2.0 / (1.0 / 0.5 + 1.0 / 0.8);
        let result = calculator.aggregate_multiple_scores(&scores);
        assert!((result - expected).abs() < 1e-9);
        assert!((result - 0.615).abs() < 0.001);
    }

    #[test]
    fn test_harmonic_mean_excludes_zero_scores() {
        let mut config = CalculatorConfig::default();
        config.aggregation = AggregationStrategy::HarmonicMean;
        let calculator = ConfidenceCalculator::new(config);

        let scores = vec![score(0.0, 1.0, 1), score(0.8, 1.0, 1), score(0.4, 1.0, 1)];
        let expected = 2.0 / (1.0 / 0.8 + 1.0 / 0.4);
        assert!((calculator.aggregate_multiple_scores(&scores) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_empty_scores_return_min() {
        let calculator = ConfidenceCalculator::default();
        assert_eq!(calculator.aggregate_multiple_scores(&[]), 0.0);
    }
}
