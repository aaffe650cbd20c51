//! # langscope-core
//!
//! Core types for the Langscope language context engine.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other langscope crates. It provides:
//!
//! - Source location types (SourceRange)
//! - Evidence types (EvidenceKind, Evidence, SourceSnippet, SourceTracking)
//! - Context types (LanguageContext, ContextBoundary, TransitionType)
//! - Configuration types (tracker presets, calculator profiles)
//! - Error types
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - all other crates depend on this one,
//! but this crate has no dependencies on other langscope crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export all modules
pub mod config;
pub mod context;
pub mod error;
pub mod evidence;
pub mod location;

// Re-export commonly used types
pub use config::{
    AggregationStrategy, AnalysisConfig, CalculatorConfig, DetectionConfig, TrackerConfig,
};
pub use context::{ContextBoundary, ContextMetadata, LanguageContext, TransitionType};
pub use error::{Error, Result, Severity};
pub use evidence::{
    Evidence, EvidenceKind, EvidenceSummary, SourceSnippet, SourceTracking,
    SourceTrackingMetadata,
};
pub use location::SourceRange;
