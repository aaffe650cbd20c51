//! # langscope-context
//!
//! Context machinery for the Langscope language engine.
//!
//! This crate provides:
//! - `ContextCollection`: stores detected language contexts, answers point
//!   queries, and derives boundaries between differing-language regions
//! - The inheritance rule engine: condition/action rules governing how a
//!   locally-derived child context combines with a parent context
//! - The command-context associator: classifies shell-like command strings
//!   and assigns them a language context with a tiered confidence
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends only on langscope-core
//! and is consumed by the detector and by downstream extraction pipelines.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod associator;
pub mod collection;
pub mod inheritance;

// Re-export commonly used types
pub use associator::{
    AssociatedCommand, AssociationTier, Command, CommandAssociator, InferredLanguage,
    infer_language_from_command, UNKNOWN_LANGUAGE,
};
pub use collection::ContextCollection;
pub use inheritance::{InheritanceEngine, InheritanceRule, RuleAction, RuleCondition};
