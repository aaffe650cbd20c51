//! Storage and queries over detected language contexts.

use langscope_core::{ContextBoundary, LanguageContext, TransitionType};

/// Penalty applied to the overall confidence per detected boundary.
const BOUNDARY_PENALTY: f64 = 0.05;
/// Cap on the total boundary penalty.
const MAX_BOUNDARY_PENALTY: f64 = 0.2;

/// Stores the language contexts of one analysis run and answers point
/// queries and boundary derivations over them.
///
/// Contexts are held in no particular internal order; sorted views are
/// computed on demand.
#[derive(Debug, Clone, Default)]
pub struct ContextCollection {
    contexts: Vec<LanguageContext>,
}

impl ContextCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection from existing contexts.
    pub fn from_contexts(contexts: Vec<LanguageContext>) -> Self {
        Self { contexts }
    }

    /// Add a context.
    pub fn add(&mut self, context: LanguageContext) {
        self.contexts.push(context);
    }

    /// Number of stored contexts.
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Iterate over contexts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LanguageContext> {
        self.contexts.iter()
    }

    /// Contexts sorted by descending confidence.
    pub fn by_confidence(&self) -> Vec<&LanguageContext> {
        let mut sorted: Vec<&LanguageContext> = self.contexts.iter().collect();
        sorted.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        sorted
    }

    /// Contexts sorted by source position (start line, then start column).
    pub fn in_source_order(&self) -> Vec<&LanguageContext> {
        let mut sorted: Vec<&LanguageContext> = self.contexts.iter().collect();
        sorted.sort_by_key(|c| (c.source_range.start_line, c.source_range.start_column));
        sorted
    }

    /// The highest-confidence context, if any.
    pub fn best(&self) -> Option<&LanguageContext> {
        self.contexts
            .iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }

    /// Find an exact (case-insensitive) language match.
    pub fn find_language(&self, language: &str) -> Option<&LanguageContext> {
        self.contexts.iter().find(|c| c.is_language(language))
    }

    /// The context covering a (line, column) point.
    ///
    /// When ranges overlap, the context with the higher confidence wins.
    pub fn context_at(&self, line: usize, column: usize) -> Option<&LanguageContext> {
        self.contexts
            .iter()
            .filter(|c| c.contains(line, column))
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }

    /// Derive boundaries between adjacent differing-language contexts.
    ///
    /// Walks contexts in source order; a boundary is recorded wherever the
    /// language changes between neighbours, tagged as a language change.
    /// Other transition types are reserved for future evidence kinds.
    pub fn boundaries(&self) -> Vec<ContextBoundary> {
        let ordered = self.in_source_order();
        ordered
            .windows(2)
            .filter(|pair| !pair[0].is_language(&pair[1].language))
            .map(|pair| ContextBoundary {
                location: pair[1].source_range,
                before_context: pair[0].clone(),
                after_context: pair[1].clone(),
                transition_type: TransitionType::LanguageChange,
            })
            .collect()
    }

    /// Overall confidence for the whole document.
    ///
    /// `0.7 * max + 0.3 * avg` over context confidences, reduced by a capped
    /// per-boundary penalty and floored at 0. Empty collections score 0.
    pub fn overall_confidence(&self) -> f64 {
        if self.contexts.is_empty() {
            return 0.0;
        }
        let max = self
            .contexts
            .iter()
            .map(|c| c.confidence)
            .fold(f64::MIN, f64::max);
        let avg =
            self.contexts.iter().map(|c| c.confidence).sum::<f64>() / self.contexts.len() as f64;
        let penalty =
            (BOUNDARY_PENALTY * self.boundaries().len() as f64).min(MAX_BOUNDARY_PENALTY);
        (0.7 * max + 0.3 * avg - penalty).max(0.0)
    }
}

impl FromIterator<LanguageContext> for ContextCollection {
    fn from_iter<I: IntoIterator<Item = LanguageContext>>(iter: I) -> Self {
        Self {
            contexts: iter.into_iter().collect(),
        }
    }
}
