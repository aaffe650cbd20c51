//! Source tracking: locating evidence matches in raw text.

use regex::RegexBuilder;

use langscope_core::{
    Error, Evidence, EvidenceKind, Result, SourceRange, SourceSnippet, SourceTracking,
    SourceTrackingMetadata, TrackerConfig,
};

/// Marker appended to truncated snippet text.
const TRUNCATION_MARKER: &str = "...";

/// Locates pattern matches in raw text and materializes `Evidence` with
/// source ranges and optional snippets.
///
/// One tracker is scoped to one document; `initialize_tracking` resets it
/// for new content.
#[derive(Debug, Clone)]
pub struct SourceTracker {
    config: TrackerConfig,
    lines: Vec<String>,
    total_characters: usize,
}

impl SourceTracker {
    /// Create a tracker with the given configuration.
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            lines: Vec::new(),
            total_characters: 0,
        }
    }

    /// Reset the tracker's line array from raw content.
    pub fn initialize_tracking(&mut self, content: &str) {
        self.lines = content.split('\n').map(str::to_string).collect();
        self.total_characters = content.chars().count();
    }

    /// The tracked lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Locate every match of `value` and produce one `Evidence` per match.
    ///
    /// Without an explicit `pattern`, a search pattern is generated from the
    /// evidence kind: extensions match the escaped literal with a trailing
    /// word boundary; keywords and frameworks match whole words
    /// case-insensitively; dependencies match the literal wrapped in quotes;
    /// everything else matches the literal case-insensitively.
    pub fn track_evidence(
        &self,
        kind: EvidenceKind,
        value: &str,
        confidence: f64,
        pattern: Option<&str>,
    ) -> Result<Vec<Evidence>> {
        let regex = match pattern {
            Some(custom) => RegexBuilder::new(custom).build().map_err(|e| {
                Error::InvalidPattern {
                    pattern: custom.to_string(),
                    reason: e.to_string(),
                }
            })?,
            None => self.build_pattern(kind, value)?,
        };

        let mut found = Vec::new();
        for (line_index, line) in self.lines.iter().enumerate() {
            // find_iter advances past zero-length matches on its own.
            for m in regex.find_iter(line) {
                let location = self.match_location(line_index, line, m.start(), m.end());
                let mut evidence = Evidence::new(kind, value, confidence, location);
                if self.config.extract_snippets {
                    evidence = evidence.with_snippet(self.extract_snippet(&location, None));
                }
                found.push(evidence);
            }
        }

        tracing::trace!(kind = %kind, value, matches = found.len(), "tracked evidence");
        Ok(found)
    }

    /// Extract a snippet window around a match.
    ///
    /// Captures up to `context_lines` (default from config) lines before and
    /// after, joins the evidence's own lines, and truncates the joined text
    /// to the configured maximum length.
    pub fn extract_snippet(
        &self,
        location: &SourceRange,
        context_lines: Option<usize>,
    ) -> SourceSnippet {
        let context = context_lines.unwrap_or(self.config.context_lines);
        let start = location.start_line.min(self.lines.len());
        let end = location
            .end_line
            .min(self.lines.len().saturating_sub(1))
            .max(start);

        let before_start = start.saturating_sub(context);
        let before_context = self.lines[before_start..start].to_vec();

        let after_start = (end + 1).min(self.lines.len());
        let after_end = (end + 1 + context).min(self.lines.len());
        let after_context = self.lines[after_start..after_end].to_vec();

        let own_lines = if start < self.lines.len() && start <= end {
            self.lines[start..=end].join("\n")
        } else {
            String::new()
        };
        let (text, truncated) = if own_lines.chars().count() > self.config.max_snippet_length {
            let clipped: String = own_lines
                .chars()
                .take(self.config.max_snippet_length)
                .collect();
            (format!("{clipped}{TRUNCATION_MARKER}"), true)
        } else {
            (own_lines, false)
        };

        SourceSnippet {
            text,
            before_context,
            after_context,
            highlight: SourceRange::new(
                0,
                location.end_line.saturating_sub(location.start_line),
                location.start_column,
                location.end_column,
            ),
            truncated,
        }
    }

    /// Bundle evidence into a diagnostic `SourceTracking` report.
    ///
    /// Accuracy is the fraction of evidence whose location passes the range
    /// sanity check; it defaults to 0 on empty input.
    pub fn create_source_tracking(&self, evidence: &[Evidence]) -> SourceTracking {
        let accuracy = if evidence.is_empty() {
            0.0
        } else {
            let sane = evidence.iter().filter(|e| e.location.is_valid()).count();
            sane as f64 / evidence.len() as f64
        };

        SourceTracking {
            evidence: evidence.to_vec(),
            detection_ranges: evidence.iter().map(|e| e.location).collect(),
            metadata: SourceTrackingMetadata {
                total_lines: self.lines.len(),
                total_characters: self.total_characters,
                evidence_count: evidence.len(),
                accuracy,
            },
        }
    }

    fn build_pattern(&self, kind: EvidenceKind, value: &str) -> Result<regex::Regex> {
        let escaped = regex::escape(value);
        let (source, case_insensitive) = match kind {
            EvidenceKind::Extension => (format!(r"{escaped}\b"), false),
            EvidenceKind::Keyword | EvidenceKind::Framework => {
                (Self::word_bounded(&escaped, value), true)
            }
            EvidenceKind::Dependency => (format!("\"{escaped}\""), false),
            _ => (escaped, true),
        };
        RegexBuilder::new(&source)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|e| Error::InvalidPattern {
                pattern: source,
                reason: e.to_string(),
            })
    }

    /// Add `\b` anchors only on edges that are word characters; a `\b` next
    /// to a symbol edge (as in "g++" or "c#") would require a word character
    /// beyond it and silently miss ordinary prose mentions.
    fn word_bounded(escaped: &str, value: &str) -> String {
        let is_word = |c: char| c.is_alphanumeric() || c == '_';
        let mut source = String::new();
        if value.starts_with(is_word) {
            source.push_str(r"\b");
        }
        source.push_str(escaped);
        if value.ends_with(is_word) {
            source.push_str(r"\b");
        }
        source
    }

    fn match_location(
        &self,
        line_index: usize,
        line: &str,
        start: usize,
        end: usize,
    ) -> SourceRange {
        if !self.config.track_line_numbers {
            return SourceRange::new(0, 0, 0, 0);
        }
        if self.config.track_column_positions {
            SourceRange::single_line(line_index, start, end)
        } else {
            SourceRange::single_line(line_index, 0, line.len())
        }
    }
}

impl Default for SourceTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}
