//! The language detector: evidence collection and context generation.

use std::collections::HashSet;

use langscope_context::ContextCollection;
use langscope_core::{
    AnalysisConfig, ContextBoundary, Evidence, EvidenceKind, LanguageContext, Result,
    SourceRange, SourceTracking,
};

use crate::confidence::ConfidenceCalculator;
use crate::document::DocumentNode;
use crate::patterns::{language_patterns, LanguagePatterns};
use crate::tracker::SourceTracker;

/// Base confidence of a tagged fenced code block.
const SYNTAX_CONFIDENCE: f64 = 0.9;
/// Base confidence of a keyword mention.
const KEYWORD_CONFIDENCE: f64 = 0.5;
/// Base confidence of a file extension reference.
const EXTENSION_CONFIDENCE: f64 = 0.8;
/// Base confidence of a framework mention.
const FRAMEWORK_CONFIDENCE: f64 = 0.7;

/// Result of one analysis run.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Detected contexts, sorted by descending confidence
    pub contexts: Vec<LanguageContext>,
    /// Transitions between adjacent differing-language contexts
    pub boundaries: Vec<ContextBoundary>,
    /// Overall document confidence
    pub overall_confidence: f64,
    /// Diagnostic bundle over all collected evidence
    pub tracking: SourceTracking,
}

/// Polymorphic analyzer contract.
///
/// One interface for all analyzers; callers construct and own their
/// analyzer instances and pass them through the call chain.
pub trait Analyzer: Send + Sync {
    /// Analyzer name for debugging/logging.
    fn name(&self) -> &'static str;

    /// Analyze a parsed document tree plus its raw text.
    fn analyze(&self, document: &DocumentNode, text: &str) -> Result<Analysis>;
}

/// Infers language contexts from documentation text.
///
/// Each call builds fresh tracker/calculator instances scoped to the
/// document, so one detector can analyze documents from multiple threads.
#[derive(Debug, Clone, Default)]
pub struct LanguageDetector {
    config: AnalysisConfig,
}

impl LanguageDetector {
    /// Create a detector with the given configuration.
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Parse markdown and analyze it in one step.
    pub fn analyze_markdown(&self, text: &str) -> Result<Analysis> {
        let document = crate::document::parse_markdown(text);
        self.analyze(&document, text)
    }

    /// Collect all evidence for one language.
    fn collect_evidence(
        &self,
        tracker: &SourceTracker,
        patterns: &LanguagePatterns,
        document: &DocumentNode,
    ) -> Result<Vec<Evidence>> {
        let mut evidence = Vec::new();

        // Fenced blocks whose tag claims this language, one distinct tag at
        // a time so each fence line yields exactly one syntax evidence.
        let mut seen_tags: Vec<&str> = Vec::new();
        for (lang, _) in document.code_blocks() {
            let Some(tag) = lang else { continue };
            if patterns.matches_tag(tag) && !seen_tags.contains(&tag) {
                seen_tags.push(tag);
                evidence.extend(self.syntax_evidence(tracker, tag)?);
            }
        }

        for keyword in patterns.keywords {
            evidence.extend(tracker.track_evidence(
                EvidenceKind::Keyword,
                keyword,
                KEYWORD_CONFIDENCE,
                None,
            )?);
        }
        for extension in patterns.file_extensions {
            evidence.extend(tracker.track_evidence(
                EvidenceKind::Extension,
                extension,
                EXTENSION_CONFIDENCE,
                None,
            )?);
        }
        for framework in patterns.frameworks {
            evidence.extend(tracker.track_evidence(
                EvidenceKind::Framework,
                framework,
                FRAMEWORK_CONFIDENCE,
                None,
            )?);
        }

        Ok(evidence)
    }

    /// Locate the fence lines for a tag. A tree that did not come from the
    /// raw text still contributes one evidence item at the document origin.
    fn syntax_evidence(&self, tracker: &SourceTracker, tag: &str) -> Result<Vec<Evidence>> {
        let pattern = format!(r"(?i)```\s*{}", regex::escape(tag));
        let mut found = tracker.track_evidence(
            EvidenceKind::Syntax,
            tag,
            SYNTAX_CONFIDENCE,
            Some(&pattern),
        )?;
        if found.is_empty() {
            found.push(Evidence::new(
                EvidenceKind::Syntax,
                tag,
                SYNTAX_CONFIDENCE,
                SourceRange::single_line(0, 0, 0),
            ));
        }
        Ok(found)
    }

    /// Score one language's evidence, applying fallback strategies when the
    /// boosted value stays under the threshold. Fallbacks compound in order
    /// and each multiplication is independently clamped.
    fn score_language(
        &self,
        calculator: &ConfidenceCalculator,
        patterns: &LanguagePatterns,
        evidence: &[Evidence],
    ) -> f64 {
        let mut confidence = calculator.calculate_with_boosts(evidence);
        let detection = &self.config.detection;
        if confidence >= detection.fallback_threshold {
            return confidence;
        }

        let distinct_kinds: HashSet<EvidenceKind> = evidence.iter().map(|e| e.kind).collect();
        if distinct_kinds.len() >= detection.diversity_min_kinds {
            confidence = (confidence * detection.diversity_boost).min(1.0);
        }
        if evidence
            .iter()
            .any(|e| e.kind == EvidenceKind::Framework && patterns.knows_framework(&e.value))
        {
            confidence = (confidence * detection.framework_boost).min(1.0);
        }
        if confidence < detection.known_language_floor {
            confidence = detection.known_language_floor;
        }
        tracing::debug!(
            language = patterns.name,
            confidence,
            kinds = distinct_kinds.len(),
            "applied fallback strategies"
        );
        confidence
    }
}

impl Analyzer for LanguageDetector {
    fn name(&self) -> &'static str {
        "language-detector"
    }

    fn analyze(&self, document: &DocumentNode, text: &str) -> Result<Analysis> {
        let mut tracker = SourceTracker::new(self.config.tracker.clone());
        tracker.initialize_tracking(text);
        let calculator = ConfidenceCalculator::new(self.config.calculator.clone());

        let mut all_evidence: Vec<Evidence> = Vec::new();
        let mut contexts: Vec<LanguageContext> = Vec::new();

        // Fixed table iteration order keeps results reproducible.
        for patterns in language_patterns() {
            let evidence = self.collect_evidence(&tracker, patterns, document)?;
            if evidence.is_empty() {
                continue;
            }

            let confidence = self.score_language(&calculator, patterns, &evidence);
            let ranges: Vec<SourceRange> = evidence.iter().map(|e| e.location).collect();
            let source_range =
                SourceRange::bounding(&ranges).unwrap_or(SourceRange::single_line(0, 0, 0));

            all_evidence.extend(evidence.iter().cloned());
            contexts.push(LanguageContext::new(
                patterns.name,
                confidence,
                source_range,
                evidence,
                self.name(),
            ));
        }

        contexts.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        let collection = ContextCollection::from_contexts(contexts.clone());
        let boundaries = collection.boundaries();
        let overall_confidence = collection.overall_confidence();
        let tracking = tracker.create_source_tracking(&all_evidence);

        tracing::debug!(
            contexts = contexts.len(),
            boundaries = boundaries.len(),
            overall_confidence,
            "analysis complete"
        );

        Ok(Analysis {
            contexts,
            boundaries,
            overall_confidence,
            tracking,
        })
    }
}
