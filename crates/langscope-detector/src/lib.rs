//! # langscope-detector
//!
//! Language detection engine for the Langscope project.
//!
//! This crate provides:
//! - Source tracker: locates evidence matches in raw text with snippets
//! - Confidence calculator: weighted scoring, strong-indicator boosts, and
//!   multi-score aggregation strategies
//! - Declarative per-language pattern tables
//! - A document node contract plus a markdown adapter
//! - The `LanguageDetector` analyzer tying it all together
//!
//! ## Architecture
//!
//! This is the top layer - it depends on langscope-core and
//! langscope-context to turn raw documentation into scored language
//! contexts. Each analysis run constructs fresh component instances; there
//! is no shared mutable state, so documents can be processed in parallel by
//! building independent detectors.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod confidence;
pub mod detector;
pub mod document;
pub mod patterns;
pub mod tracker;

// Re-export commonly used types
pub use confidence::{ConfidenceCalculator, ConfidenceScore, StrongIndicator};
pub use detector::{Analysis, Analyzer, LanguageDetector};
pub use document::{parse_markdown, DocumentNode};
pub use patterns::{language_patterns, LanguagePatterns};
pub use tracker::SourceTracker;
