//! Language context types: scored, evidenced claims about source regions.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Evidence, SourceRange};

/// Metadata attached to a language context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMetadata {
    /// When the context was created
    pub created_at: DateTime<Utc>,
    /// Which component produced it (e.g. "language-detector", "merged-context")
    pub source: String,
    /// Dominant framework, when one was detected
    pub framework: Option<String>,
    /// Language/framework version, when stated in the text
    pub version: Option<String>,
    /// Free-form extra properties
    pub properties: HashMap<String, String>,
}

impl ContextMetadata {
    /// Create metadata tagged with the producing component.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            created_at: Utc::now(),
            source: source.into(),
            framework: None,
            version: None,
            properties: HashMap::new(),
        }
    }

    /// Merge two metadata sets, with `child` fields taking precedence.
    ///
    /// The result is tagged `"merged-context"` and timestamped at merge time.
    pub fn merged(parent: &ContextMetadata, child: &ContextMetadata) -> Self {
        let mut properties = parent.properties.clone();
        properties.extend(child.properties.clone());
        Self {
            created_at: Utc::now(),
            source: "merged-context".to_string(),
            framework: child.framework.clone().or_else(|| parent.framework.clone()),
            version: child.version.clone().or_else(|| parent.version.clone()),
            properties,
        }
    }
}

/// A scored claim that a region of the source text is written in (or about)
/// a given language.
///
/// Created once by the detector and read-only downstream; the inheritance
/// engine produces *new* merged contexts rather than mutating existing ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageContext {
    /// Language name (e.g. "Rust", "Python")
    pub language: String,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Bounding range over all evidence locations
    pub source_range: SourceRange,
    /// The evidence supporting this context
    pub evidence: Vec<Evidence>,
    /// Back-reference to a parent context, used only for inheritance lookups
    #[serde(skip)]
    pub parent_context: Option<Arc<LanguageContext>>,
    /// Provenance metadata
    pub metadata: ContextMetadata,
}

impl LanguageContext {
    /// Create a new context. Confidence is clamped to [0, 1].
    pub fn new(
        language: impl Into<String>,
        confidence: f64,
        source_range: SourceRange,
        evidence: Vec<Evidence>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            confidence: confidence.clamp(0.0, 1.0),
            source_range,
            evidence,
            parent_context: None,
            metadata: ContextMetadata::new(source),
        }
    }

    /// Attach a parent context back-reference.
    pub fn with_parent(mut self, parent: Arc<LanguageContext>) -> Self {
        self.parent_context = Some(parent);
        self
    }

    /// Check whether a (line, column) point falls inside this context.
    pub fn contains(&self, line: usize, column: usize) -> bool {
        self.source_range.contains(line, column)
    }

    /// Case-insensitive language comparison.
    pub fn is_language(&self, language: &str) -> bool {
        self.language.eq_ignore_ascii_case(language)
    }
}

/// Kind of transition at a context boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionType {
    /// Adjacent contexts infer different languages
    LanguageChange,
    /// Explicit marker in the text (reserved, not yet produced)
    ExplicitMarker,
    /// Framework change within the same language (reserved, not yet produced)
    FrameworkChange,
}

/// A detected transition point between two adjacent differing-language
/// contexts. Derived from the contexts it references, never stored
/// independently of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextBoundary {
    /// Where the new context begins
    pub location: SourceRange,
    /// Context before the transition
    pub before_context: LanguageContext,
    /// Context after the transition
    pub after_context: LanguageContext,
    /// What kind of transition this is
    pub transition_type: TransitionType,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EvidenceKind;

    fn context(language: &str, confidence: f64) -> LanguageContext {
        let range = SourceRange::single_line(0, 0, 10);
        LanguageContext::new(
            language,
            confidence,
            range,
            vec![Evidence::new(EvidenceKind::Keyword, "fn", 0.5, range)],
            "test",
        )
    }

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(context("Rust", 1.4).confidence, 1.0);
        assert_eq!(context("Rust", -0.5).confidence, 0.0);
    }

    #[test]
    fn test_is_language_case_insensitive() {
        let ctx = context("Rust", 0.9);
        assert!(ctx.is_language("rust"));
        assert!(ctx.is_language("RUST"));
        assert!(!ctx.is_language("Python"));
    }

    #[test]
    fn test_metadata_merge_child_precedence() {
        let mut parent = ContextMetadata::new("detector");
        parent.framework = Some("Django".to_string());
        parent.properties.insert("a".to_string(), "parent".to_string());
        parent.properties.insert("b".to_string(), "parent".to_string());

        let mut child = ContextMetadata::new("detector");
        child.properties.insert("b".to_string(), "child".to_string());

        let merged = ContextMetadata::merged(&parent, &child);
        assert_eq!(merged.source, "merged-context");
        assert_eq!(merged.framework.as_deref(), Some("Django"));
        assert_eq!(merged.properties["a"], "parent");
        assert_eq!(merged.properties["b"], "child");
    }

    #[test]
    fn test_parent_back_reference() {
        let parent = Arc::new(context("Python", 0.8));
        let child = context("Rust", 0.6).with_parent(Arc::clone(&parent));
        assert_eq!(child.parent_context.as_ref().unwrap().language, "Python");
    }

    #[test]
    fn test_transition_type_serialization() {
        let json = serde_json::to_string(&TransitionType::LanguageChange).unwrap();
        assert_eq!(json, "\"language-change\"");
    }
}
