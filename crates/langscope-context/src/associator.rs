//! Command-context association.
//!
//! Classifies shell-like command strings against the detected language
//! contexts. A deterministic prefix table maps the leading token to a
//! language; association then produces a tiered confidence so downstream
//! consumers can tell "this command is definitely Rust" apart from "this
//! command was assigned to the dominant detected language".

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use langscope_core::{LanguageContext, SourceRange};

use crate::collection::ContextCollection;
use crate::inheritance::InheritanceEngine;

/// Sentinel language for commands that cannot be classified.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Confidence of a synthesized default context.
const SYNTHESIZED_CONFIDENCE: f64 = 0.5;
/// Cap on the confidence of unknown-command associations.
const UNKNOWN_CONFIDENCE_CAP: f64 = 0.4;
/// Cap on inherited (fallback) associations, kept below the "confident"
/// threshold so callers can distinguish them from verified matches.
const INHERITED_CONFIDENCE_CAP: f64 = 0.75;

lazy_static! {
    /// Leading-token allowlist mapping tool names to languages.
    static ref COMMAND_PREFIXES: HashMap<&'static str, &'static str> = HashMap::from([
        ("npm", "JavaScript"),
        ("npx", "JavaScript"),
        ("yarn", "JavaScript"),
        ("pnpm", "JavaScript"),
        ("node", "JavaScript"),
        ("tsc", "TypeScript"),
        ("deno", "TypeScript"),
        ("pip", "Python"),
        ("pip3", "Python"),
        ("python", "Python"),
        ("python3", "Python"),
        ("pytest", "Python"),
        ("poetry", "Python"),
        ("uv", "Python"),
        ("cargo", "Rust"),
        ("rustc", "Rust"),
        ("rustup", "Rust"),
        ("go", "Go"),
        ("gofmt", "Go"),
        ("mvn", "Java"),
        ("gradle", "Java"),
        ("gradlew", "Java"),
        ("javac", "Java"),
        ("java", "Java"),
        ("dotnet", "C#"),
        ("gem", "Ruby"),
        ("bundle", "Ruby"),
        ("rake", "Ruby"),
        ("ruby", "Ruby"),
        ("composer", "PHP"),
        ("php", "PHP"),
        ("gcc", "C"),
        ("g++", "C++"),
        ("clang++", "C++"),
        ("cmake", "C++"),
        ("swift", "Swift"),
        ("kotlinc", "Kotlin"),
    ]);

    /// Placeholder words that never identify a real tool.
    static ref PLACEHOLDER_TOKENS: HashSet<&'static str> = HashSet::from([
        "cmd", "command", "run", "exec", "foo", "bar", "baz", "example",
        "test", "tool", "script", "app", "binary", "placeholder", "xxx",
    ]);
}

/// Outcome of classifying a command's leading token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferredLanguage {
    /// The token maps to a known language
    Language(&'static str),
    /// The token is definitely not classifiable (short or a placeholder)
    Unknown,
    /// The token is unrecognized but plausibly a real tool; association
    /// falls through to the surrounding contexts
    Unclassified,
}

/// Map a command string's leading token to a language.
///
/// Tokens on the allowlist classify directly. Off-list tokens are hard
/// `Unknown` only when short (≤3 chars) or on the placeholder stoplist;
/// longer unrecognized tokens stay `Unclassified` so that context
/// association can still place them.
pub fn infer_language_from_command(command: &str) -> InferredLanguage {
    let Some(token) = command.split_whitespace().next() else {
        return InferredLanguage::Unknown;
    };
    let token = token.to_ascii_lowercase();

    if let Some(language) = COMMAND_PREFIXES.get(token.as_str()) {
        return InferredLanguage::Language(language);
    }
    if token.chars().count() <= 3 || PLACEHOLDER_TOKENS.contains(token.as_str()) {
        return InferredLanguage::Unknown;
    }
    InferredLanguage::Unclassified
}

/// A raw command string extracted from documentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// The command text (e.g. "cargo build --release")
    pub text: String,
    /// Confidence that this string is a real command, from the extractor
    pub base_confidence: f64,
}

impl Command {
    /// Create a command. Base confidence is clamped to [0, 1].
    pub fn new(text: impl Into<String>, base_confidence: f64) -> Self {
        Self {
            text: text.into(),
            base_confidence: base_confidence.clamp(0.0, 1.0),
        }
    }
}

/// How the associated context was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationTier {
    /// Inferred language matched a detected context exactly
    Exact,
    /// The context was inherited from the dominant detected language
    Inherited,
    /// No language inference; placed by the surrounding contexts alone
    Partial,
    /// The command could not be classified at all
    Unknown,
}

/// A command with its assigned language context and confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociatedCommand {
    /// The original command
    pub command: Command,
    /// Final language assignment (may be the `unknown` sentinel)
    pub language: String,
    /// The chosen context, when one was available or synthesized
    pub language_context: Option<LanguageContext>,
    /// Tiered association confidence
    pub context_confidence: f64,
    /// How the association was made
    pub tier: AssociationTier,
}

/// Associates commands with language contexts.
///
/// Fallback selection (no exact language match) goes through the
/// inheritance engine with the dominant context as parent, so consumers
/// can swap in their own rule sets.
#[derive(Debug, Clone)]
pub struct CommandAssociator {
    engine: InheritanceEngine,
}

impl Default for CommandAssociator {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandAssociator {
    /// Create an associator with the default inheritance rules.
    pub fn new() -> Self {
        Self {
            engine: InheritanceEngine::with_default_rules(),
        }
    }

    /// Create an associator with a custom inheritance engine.
    pub fn with_engine(engine: InheritanceEngine) -> Self {
        Self { engine }
    }

    /// Associate one command with the available contexts.
    pub fn associate(
        &self,
        command: &Command,
        contexts: &ContextCollection,
    ) -> AssociatedCommand {
        match infer_language_from_command(&command.text) {
            InferredLanguage::Unknown => {
                // Unknown commands stay capped low regardless of context.
                AssociatedCommand {
                    command: command.clone(),
                    language: UNKNOWN_LANGUAGE.to_string(),
                    language_context: None,
                    context_confidence: UNKNOWN_CONFIDENCE_CAP.min(command.base_confidence),
                    tier: AssociationTier::Unknown,
                }
            }
            InferredLanguage::Language(language) => {
                self.associate_inferred(command, language, contexts)
            }
            InferredLanguage::Unclassified => self.associate_partial(command, contexts),
        }
    }

    /// Associate a batch of commands.
    pub fn associate_all(
        &self,
        commands: &[Command],
        contexts: &ContextCollection,
    ) -> Vec<AssociatedCommand> {
        commands
            .iter()
            .map(|command| self.associate(command, contexts))
            .collect()
    }

    fn associate_inferred(
        &self,
        command: &Command,
        language: &str,
        contexts: &ContextCollection,
    ) -> AssociatedCommand {
        if let Some(context) = contexts.find_language(language) {
            // Near-pass-through for verified matches.
            let confidence = (context.confidence + 0.01).min(1.0);
            return AssociatedCommand {
                command: command.clone(),
                language: context.language.clone(),
                language_context: Some(context.clone()),
                context_confidence: confidence,
                tier: AssociationTier::Exact,
            };
        }

        if let Some(inherited) = self.inherited_context(contexts) {
            let confidence =
                (0.4 + inherited.confidence * 0.15).min(INHERITED_CONFIDENCE_CAP);
            return AssociatedCommand {
                command: command.clone(),
                language: language.to_string(),
                language_context: Some(inherited),
                context_confidence: confidence,
                tier: AssociationTier::Inherited,
            };
        }

        // No contexts at all: synthesize a default for the inferred language.
        let synthesized = Self::synthesize_context(language);
        let confidence = (synthesized.confidence + 0.01).min(1.0);
        AssociatedCommand {
            command: command.clone(),
            language: language.to_string(),
            language_context: Some(synthesized),
            context_confidence: confidence,
            tier: AssociationTier::Exact,
        }
    }

    fn associate_partial(
        &self,
        command: &Command,
        contexts: &ContextCollection,
    ) -> AssociatedCommand {
        let Some(context) = self.inherited_context(contexts) else {
            // Nothing to place the command against: synthesize from the
            // leading token as given.
            let token = command
                .text
                .split_whitespace()
                .next()
                .unwrap_or(UNKNOWN_LANGUAGE);
            let synthesized = Self::synthesize_context(token);
            return AssociatedCommand {
                command: command.clone(),
                language: token.to_string(),
                language_context: Some(synthesized.clone()),
                context_confidence: (0.5 + synthesized.confidence * 0.2).min(1.0),
                tier: AssociationTier::Partial,
            };
        };

        let mut confidence = 0.5 + context.confidence * 0.2;
        if context.confidence > 0.8 {
            confidence += 0.1;
        }
        if command
            .text
            .to_ascii_lowercase()
            .contains(&context.language.to_ascii_lowercase())
        {
            confidence += 0.1;
        }

        AssociatedCommand {
            command: command.clone(),
            language: context.language.clone(),
            language_context: Some(context),
            context_confidence: confidence.min(1.0),
            tier: AssociationTier::Partial,
        }
    }

    /// Resolve a fallback context through the inheritance engine, with the
    /// dominant detected context as parent and no local child.
    fn inherited_context(&self, contexts: &ContextCollection) -> Option<LanguageContext> {
        let best = contexts.best()?;
        let mut engine = self.engine.clone();
        engine.set_parent(Some(Arc::new(best.clone())));
        engine.apply(None)
    }

    fn synthesize_context(language: &str) -> LanguageContext {
        LanguageContext::new(
            language,
            SYNTHESIZED_CONFIDENCE,
            SourceRange::single_line(0, 0, 0),
            Vec::new(),
            "synthesized-default",
        )
    }
}
