//! Evidence types: located clues supporting a language inference.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::SourceRange;

/// Kind of evidence found in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
    /// Language keyword mentioned in prose or code
    Keyword,
    /// File extension reference (e.g. `.rs`, `.py`)
    Extension,
    /// Syntax-level signal, such as a tagged fenced code block
    Syntax,
    /// Dependency declaration (quoted package name)
    Dependency,
    /// Framework or major library name
    Framework,
    /// Build or tooling reference
    Tool,
    /// Generic textual pattern
    Pattern,
    /// Declaration-shaped construct (function/class signatures)
    Declaration,
}

impl EvidenceKind {
    /// All kinds, in a fixed order.
    pub const ALL: [EvidenceKind; 8] = [
        EvidenceKind::Keyword,
        EvidenceKind::Extension,
        EvidenceKind::Syntax,
        EvidenceKind::Dependency,
        EvidenceKind::Framework,
        EvidenceKind::Tool,
        EvidenceKind::Pattern,
        EvidenceKind::Declaration,
    ];

    /// Stable string name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceKind::Keyword => "keyword",
            EvidenceKind::Extension => "extension",
            EvidenceKind::Syntax => "syntax",
            EvidenceKind::Dependency => "dependency",
            EvidenceKind::Framework => "framework",
            EvidenceKind::Tool => "tool",
            EvidenceKind::Pattern => "pattern",
            EvidenceKind::Declaration => "declaration",
        }
    }
}

impl std::fmt::Display for EvidenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single located clue supporting a language inference.
///
/// Immutable once created; owned by exactly one `LanguageContext`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// What kind of clue this is
    pub kind: EvidenceKind,
    /// The matched value (keyword, extension, tag, ...)
    pub value: String,
    /// Confidence in [0, 1] that this clue indicates genuine language use
    pub confidence: f64,
    /// Where the clue was found
    pub location: SourceRange,
    /// Optional extracted snippet around the match
    pub snippet: Option<SourceSnippet>,
}

impl Evidence {
    /// Create new evidence. Confidence is clamped to [0, 1].
    pub fn new(
        kind: EvidenceKind,
        value: impl Into<String>,
        confidence: f64,
        location: SourceRange,
    ) -> Self {
        Self {
            kind,
            value: value.into(),
            confidence: confidence.clamp(0.0, 1.0),
            location,
            snippet: None,
        }
    }

    /// Attach a snippet to this evidence.
    pub fn with_snippet(mut self, snippet: SourceSnippet) -> Self {
        self.snippet = Some(snippet);
        self
    }
}

/// Extracted text around an evidence match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSnippet {
    /// The evidence's own line(s), possibly truncated
    pub text: String,
    /// Lines preceding the match
    pub before_context: Vec<String>,
    /// Lines following the match
    pub after_context: Vec<String>,
    /// Highlight range relative to the start of `text`
    pub highlight: SourceRange,
    /// Whether `text` was truncated to the configured maximum length
    pub truncated: bool,
}

/// Diagnostic bundle aggregating all evidence from one tracking session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceTracking {
    /// All tracked evidence
    pub evidence: Vec<Evidence>,
    /// The ranges where evidence was detected, in evidence order
    pub detection_ranges: Vec<SourceRange>,
    /// Summary statistics
    pub metadata: SourceTrackingMetadata,
}

impl SourceTracking {
    /// Summarize this bundle for reporting.
    pub fn summary(&self) -> EvidenceSummary {
        let mut by_kind = BTreeMap::new();
        for item in &self.evidence {
            *by_kind.entry(item.kind).or_insert(0usize) += 1;
        }
        let mean_confidence = if self.evidence.is_empty() {
            0.0
        } else {
            self.evidence.iter().map(|e| e.confidence).sum::<f64>() / self.evidence.len() as f64
        };
        EvidenceSummary {
            total_evidence: self.evidence.len(),
            by_kind,
            mean_confidence,
            accuracy: self.metadata.accuracy,
        }
    }
}

/// Summary statistics over a tracking session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SourceTrackingMetadata {
    /// Number of lines in the tracked content
    pub total_lines: usize,
    /// Number of characters in the tracked content
    pub total_characters: usize,
    /// Number of evidence items tracked
    pub evidence_count: usize,
    /// Fraction of evidence carrying a sane location (0 on empty input)
    pub accuracy: f64,
}

/// Per-kind evidence counts and overall quality, derived from `SourceTracking`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSummary {
    /// Total evidence items
    pub total_evidence: usize,
    /// Count per evidence kind
    pub by_kind: BTreeMap<EvidenceKind, usize>,
    /// Arithmetic mean of evidence confidences
    pub mean_confidence: f64,
    /// Location accuracy carried over from the tracking metadata
    pub accuracy: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in EvidenceKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            let back: EvidenceKind = serde_json::from_str(&json).unwrap();
            assert_eq!(kind, back);
        }
        assert_eq!(
            serde_json::to_string(&EvidenceKind::Extension).unwrap(),
            "\"extension\""
        );
    }

    #[test]
    fn test_evidence_confidence_clamped() {
        let range = SourceRange::single_line(0, 0, 4);
        assert_eq!(Evidence::new(EvidenceKind::Keyword, "impl", 1.7, range).confidence, 1.0);
        assert_eq!(Evidence::new(EvidenceKind::Keyword, "impl", -0.2, range).confidence, 0.0);
    }

    #[test]
    fn test_summary_counts_by_kind() {
        let range = SourceRange::single_line(0, 0, 3);
        let tracking = SourceTracking {
            evidence: vec![
                Evidence::new(EvidenceKind::Keyword, "def", 0.5, range),
                Evidence::new(EvidenceKind::Keyword, "import", 0.5, range),
                Evidence::new(EvidenceKind::Extension, ".py", 0.8, range),
            ],
            detection_ranges: vec![range, range, range],
            metadata: SourceTrackingMetadata {
                total_lines: 1,
                total_characters: 20,
                evidence_count: 3,
                accuracy: 1.0,
            },
        };

        let summary = tracking.summary();
        assert_eq!(summary.total_evidence, 3);
        assert_eq!(summary.by_kind[&EvidenceKind::Keyword], 2);
        assert_eq!(summary.by_kind[&EvidenceKind::Extension], 1);
        assert!((summary.mean_confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_empty_summary() {
        let tracking = SourceTracking {
            evidence: vec![],
            detection_ranges: vec![],
            metadata: SourceTrackingMetadata::default(),
        };
        let summary = tracking.summary();
        assert_eq!(summary.total_evidence, 0);
        assert_eq!(summary.mean_confidence, 0.0);
    }
}
