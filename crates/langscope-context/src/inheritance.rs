//! Rule-based context inheritance.
//!
//! A small condition/action interpreter that lets a consumer combine a
//! parent language context with a locally-derived child context. Each
//! consumer owns its own engine instance and rule list.

use std::sync::Arc;

use langscope_core::{ContextMetadata, LanguageContext};

/// Child confidence below which a context counts as low-confidence.
const LOW_CONFIDENCE_THRESHOLD: f64 = 0.5;
/// Child confidence at or above which a context counts as high-confidence.
const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Condition deciding whether a rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCondition {
    /// Always fires
    Always,
    /// Fires when no child context is present
    NoChildContext,
    /// Fires when a child context is present
    HasChildContext,
    /// Fires when the child is absent or below the low-confidence threshold
    LowConfidence,
    /// Fires when the child is present and at or above the high-confidence
    /// threshold
    HighConfidence,
}

impl RuleCondition {
    /// Evaluate this condition against an optional child context.
    pub fn evaluate(&self, child: Option<&LanguageContext>) -> bool {
        match self {
            RuleCondition::Always => true,
            RuleCondition::NoChildContext => child.is_none(),
            RuleCondition::HasChildContext => child.is_some(),
            RuleCondition::LowConfidence => {
                child.map_or(true, |c| c.confidence < LOW_CONFIDENCE_THRESHOLD)
            }
            RuleCondition::HighConfidence => {
                child.is_some_and(|c| c.confidence >= HIGH_CONFIDENCE_THRESHOLD)
            }
        }
    }
}

/// What a fired rule does with the parent/child pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleAction {
    /// Take the parent context
    Inherit,
    /// Take the child context
    Override,
    /// Take the child context, discarding the parent
    Ignore,
    /// Construct a new context combining both
    Merge,
}

/// A condition/action pair with a priority.
#[derive(Debug, Clone, PartialEq)]
pub struct InheritanceRule {
    /// When this rule fires
    pub condition: RuleCondition,
    /// What it does when it fires
    pub action: RuleAction,
    /// Higher priorities are evaluated first
    pub priority: u32,
    /// Optional human-readable note
    pub description: Option<String>,
}

impl InheritanceRule {
    /// Create a rule without a description.
    pub fn new(condition: RuleCondition, action: RuleAction, priority: u32) -> Self {
        Self {
            condition,
            action,
            priority,
            description: None,
        }
    }

    /// Attach a description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Per-consumer inheritance interpreter.
///
/// Owns an ordered rule list; the first rule (highest priority) whose
/// condition holds decides the outcome. Never mutates existing contexts:
/// a merge produces a fresh one.
#[derive(Debug, Clone, Default)]
pub struct InheritanceEngine {
    parent: Option<Arc<LanguageContext>>,
    rules: Vec<InheritanceRule>,
}

impl InheritanceEngine {
    /// Create an engine with no parent and no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with a sensible default rule set: inherit when the
    /// child is missing or weak, keep the child when it is strong, merge
    /// otherwise.
    pub fn with_default_rules() -> Self {
        let mut engine = Self::new();
        engine.add_rule(
            InheritanceRule::new(RuleCondition::NoChildContext, RuleAction::Inherit, 100)
                .describe("no local context: take the parent"),
        );
        engine.add_rule(
            InheritanceRule::new(RuleCondition::HighConfidence, RuleAction::Override, 80)
                .describe("strong local context: keep it"),
        );
        engine.add_rule(
            InheritanceRule::new(RuleCondition::LowConfidence, RuleAction::Inherit, 60)
                .describe("weak local context: take the parent"),
        );
        engine.add_rule(
            InheritanceRule::new(RuleCondition::Always, RuleAction::Merge, 10)
                .describe("middling local context: merge"),
        );
        engine
    }

    /// Set (or clear) the parent context.
    pub fn set_parent(&mut self, parent: Option<Arc<LanguageContext>>) {
        self.parent = parent;
    }

    /// The current parent context.
    pub fn parent(&self) -> Option<&Arc<LanguageContext>> {
        self.parent.as_ref()
    }

    /// Add a rule and keep the list sorted by descending priority.
    pub fn add_rule(&mut self, rule: InheritanceRule) {
        self.rules.push(rule);
        self.rules.sort_by_key(|r| std::cmp::Reverse(r.priority));
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[InheritanceRule] {
        &self.rules
    }

    /// Apply the rules to an optional child context.
    ///
    /// With no parent set, the child is returned unchanged (including
    /// `None`). Otherwise the first matching rule decides; if none matches,
    /// the child wins when present, else the parent.
    pub fn apply(&self, child: Option<&LanguageContext>) -> Option<LanguageContext> {
        let Some(parent) = &self.parent else {
            return child.cloned();
        };

        for rule in &self.rules {
            if !rule.condition.evaluate(child) {
                continue;
            }
            tracing::trace!(
                condition = ?rule.condition,
                action = ?rule.action,
                priority = rule.priority,
                "inheritance rule fired"
            );
            return match rule.action {
                RuleAction::Inherit => Some(parent.as_ref().clone()),
                RuleAction::Override | RuleAction::Ignore => child.cloned(),
                RuleAction::Merge => match child {
                    Some(child) => Some(Self::merge(parent, child)),
                    // Nothing to merge with: the parent stands alone.
                    None => Some(parent.as_ref().clone()),
                },
            };
        }

        child
            .cloned()
            .or_else(|| Some(parent.as_ref().clone()))
    }

    /// Build a new merged context from a parent/child pair.
    ///
    /// Language follows the higher-confidence side, confidence is the mean,
    /// evidence is concatenated, the range is the child's, and the metadata
    /// merge gives the child precedence.
    fn merge(parent: &Arc<LanguageContext>, child: &LanguageContext) -> LanguageContext {
        let language = if parent.confidence > child.confidence {
            parent.language.clone()
        } else {
            child.language.clone()
        };
        let mut evidence = parent.evidence.clone();
        evidence.extend(child.evidence.iter().cloned());

        LanguageContext {
            language,
            confidence: (parent.confidence + child.confidence) / 2.0,
            source_range: child.source_range,
            evidence,
            parent_context: Some(Arc::clone(parent)),
            metadata: ContextMetadata::merged(&parent.metadata, &child.metadata),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use langscope_core::{Evidence, EvidenceKind, SourceRange};

    fn context(language: &str, confidence: f64) -> LanguageContext {
        let range = SourceRange::single_line(0, 0, 10);
        LanguageContext::new(
            language,
            confidence,
            range,
            vec![Evidence::new(EvidenceKind::Keyword, "x", confidence, range)],
            "test",
        )
    }

    #[test]
    fn test_no_parent_returns_child_unchanged() {
        let engine = InheritanceEngine::with_default_rules();
        let child = context("Rust", 0.9);

        assert_eq!(engine.apply(Some(&child)), Some(child.clone()));
        assert_eq!(engine.apply(None), None);
    }

    #[test]
    fn test_rules_sorted_by_descending_priority() {
        let mut engine = InheritanceEngine::new();
        engine.add_rule(InheritanceRule::new(RuleCondition::Always, RuleAction::Inherit, 10));
        engine.add_rule(InheritanceRule::new(RuleCondition::Always, RuleAction::Override, 90));
        engine.add_rule(InheritanceRule::new(RuleCondition::Always, RuleAction::Merge, 50));

        let priorities: Vec<u32> = engine.rules().iter().map(|r| r.priority).collect();
        assert_eq!(priorities, vec![90, 50, 10]);
    }

    #[test]
    fn test_highest_priority_matching_rule_wins() {
        let mut engine = InheritanceEngine::new();
        engine.set_parent(Some(Arc::new(context("Python", 0.8))));
        engine.add_rule(InheritanceRule::new(RuleCondition::Always, RuleAction::Override, 10));
        engine.add_rule(InheritanceRule::new(
            RuleCondition::HasChildContext,
            RuleAction::Inherit,
            50,
        ));

        let child = context("Rust", 0.9);
        let result = engine.apply(Some(&child)).unwrap();
        assert_eq!(result.language, "Python"); // inherit fired, not override
    }

    #[test]
    fn test_condition_evaluation() {
        let weak = context("Rust", 0.3);
        let strong = context("Rust", 0.9);

        assert!(RuleCondition::Always.evaluate(None));
        assert!(RuleCondition::NoChildContext.evaluate(None));
        assert!(!RuleCondition::NoChildContext.evaluate(Some(&weak)));
        assert!(RuleCondition::HasChildContext.evaluate(Some(&weak)));
        assert!(RuleCondition::LowConfidence.evaluate(None));
        assert!(RuleCondition::LowConfidence.evaluate(Some(&weak)));
        assert!(!RuleCondition::LowConfidence.evaluate(Some(&strong)));
        assert!(RuleCondition::HighConfidence.evaluate(Some(&strong)));
        assert!(!RuleCondition::HighConfidence.evaluate(None));
    }

    #[test]
    fn test_no_matching_rule_defaults_to_child_then_parent() {
        let mut engine = InheritanceEngine::new();
        engine.set_parent(Some(Arc::new(context("Python", 0.8))));
        engine.add_rule(InheritanceRule::new(
            RuleCondition::NoChildContext,
            RuleAction::Inherit,
            50,
        ));

        let child = context("Rust", 0.9);
        assert_eq!(engine.apply(Some(&child)).unwrap().language, "Rust");
        assert_eq!(engine.apply(None).unwrap().language, "Python");
    }

    #[test]
    fn test_merge_keeps_all_evidence() {
        let mut engine = InheritanceEngine::new();
        let parent = Arc::new(context("Python", 0.8));
        engine.set_parent(Some(Arc::clone(&parent)));
        engine.add_rule(InheritanceRule::new(RuleCondition::Always, RuleAction::Merge, 50));

        let child = context("Rust", 0.6);
        let merged = engine.apply(Some(&child)).unwrap();

        assert_eq!(
            merged.evidence.len(),
            parent.evidence.len() + child.evidence.len()
        );
        assert_eq!(merged.language, "Python"); // higher-confidence side
        assert!((merged.confidence - 0.7).abs() < 1e-9); // mean
        assert_eq!(merged.source_range, child.source_range);
        assert_eq!(merged.metadata.source, "merged-context");
        assert_eq!(
            merged.parent_context.as_ref().unwrap().language,
            "Python"
        );
    }

    #[test]
    fn test_merge_language_follows_child_when_stronger() {
        let mut engine = InheritanceEngine::new();
        engine.set_parent(Some(Arc::new(context("Python", 0.4))));
        engine.add_rule(InheritanceRule::new(RuleCondition::Always, RuleAction::Merge, 50));

        let merged = engine.apply(Some(&context("Rust", 0.9))).unwrap();
        assert_eq!(merged.language, "Rust");
    }

    #[test]
    fn test_default_rules_inherit_when_child_missing_or_weak() {
        let mut engine = InheritanceEngine::with_default_rules();
        engine.set_parent(Some(Arc::new(context("Python", 0.8))));

        assert_eq!(engine.apply(None).unwrap().language, "Python");
        assert_eq!(
            engine.apply(Some(&context("Rust", 0.2))).unwrap().language,
            "Python"
        );
        assert_eq!(
            engine.apply(Some(&context("Rust", 0.95))).unwrap().language,
            "Rust"
        );
        // Middling confidence merges.
        let merged = engine.apply(Some(&context("Rust", 0.6))).unwrap();
        assert_eq!(merged.metadata.source, "merged-context");
    }
}
