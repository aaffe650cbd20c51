//! Document node contract and markdown adapter.
//!
//! The detector consumes a parsed document tree plus the original raw text.
//! Any parser that can produce this node shape works; `parse_markdown` is
//! the bundled adapter for markdown input.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};

/// A node in the parsed document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentNode {
    /// A fenced or indented code block
    Code {
        /// Fence tag, when present (e.g. "python")
        lang: Option<String>,
        /// Block body
        text: String,
    },
    /// A run of prose
    Text {
        /// The prose text
        text: String,
    },
    /// A container of child nodes
    Container {
        /// Ordered children
        children: Vec<DocumentNode>,
    },
}

impl DocumentNode {
    /// Create an empty container (useful as a root).
    pub fn empty() -> Self {
        DocumentNode::Container {
            children: Vec::new(),
        }
    }

    /// Depth-first walk over this node and all descendants.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a DocumentNode)) {
        visit(self);
        if let DocumentNode::Container { children } = self {
            for child in children {
                child.walk(visit);
            }
        }
    }

    /// Collect all code blocks, in document order.
    pub fn code_blocks(&self) -> Vec<(Option<&str>, &str)> {
        let mut blocks = Vec::new();
        self.walk(&mut |node| {
            if let DocumentNode::Code { lang, text } = node {
                blocks.push((lang.as_deref(), text.as_str()));
            }
        });
        blocks
    }
}

/// Parse raw markdown into a document node tree.
///
/// Prose runs are coalesced into `Text` nodes between code blocks; fence
/// tags keep only their first word (the language tag, dropping info-string
/// attributes).
pub fn parse_markdown(text: &str) -> DocumentNode {
    let mut children = Vec::new();
    let mut prose = String::new();
    let mut code: Option<(Option<String>, String)> = None;

    for event in Parser::new(text) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                if !prose.trim().is_empty() {
                    children.push(DocumentNode::Text {
                        text: std::mem::take(&mut prose),
                    });
                } else {
                    prose.clear();
                }
                let lang = match kind {
                    CodeBlockKind::Fenced(tag) => tag
                        .split_whitespace()
                        .next()
                        .map(str::to_string)
                        .filter(|t| !t.is_empty()),
                    CodeBlockKind::Indented => None,
                };
                code = Some((lang, String::new()));
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((lang, body)) = code.take() {
                    children.push(DocumentNode::Code { lang, text: body });
                }
            }
            Event::Text(chunk) => match &mut code {
                Some((_, body)) => body.push_str(&chunk),
                None => {
                    prose.push_str(&chunk);
                    prose.push('\n');
                }
            },
            Event::Code(inline) => {
                if code.is_none() {
                    prose.push_str(&inline);
                    prose.push('\n');
                }
            }
            _ => {}
        }
    }

    if !prose.trim().is_empty() {
        children.push(DocumentNode::Text { text: prose });
    }
    DocumentNode::Container { children }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_block_keeps_tag() {
        let doc = parse_markdown("# Title\n\n```python\nimport os\n```\n");
        let blocks = doc.code_blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].0, Some("python"));
        assert_eq!(blocks[0].1.trim(), "import os");
    }

    #[test]
    fn test_untagged_fence_has_no_lang() {
        let doc = parse_markdown("```\nplain\n```\n");
        let blocks = doc.code_blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].0, None);
    }

    #[test]
    fn test_info_string_attributes_dropped() {
        let doc = parse_markdown("```rust ignore\nfn main() {}\n```\n");
        let blocks = doc.code_blocks();
        assert_eq!(blocks[0].0, Some("rust"));
    }

    #[test]
    fn test_prose_and_blocks_interleave_in_order() {
        let doc = parse_markdown("Install it.\n\n```sh\nmake install\n```\n\nThen run it.\n");
        if let DocumentNode::Container { children } = &doc {
            assert!(matches!(children[0], DocumentNode::Text { .. }));
            assert!(matches!(children[1], DocumentNode::Code { .. }));
            assert!(matches!(children[2], DocumentNode::Text { .. }));
        } else {
            panic!("expected container root");
        }
    }

    #[test]
    fn test_multiple_blocks() {
        let doc = parse_markdown("```rust\nfn a() {}\n```\n\n```python\nprint(1)\n```\n");
        let blocks = doc.code_blocks();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].0, Some("rust"));
        assert_eq!(blocks[1].0, Some("python"));
    }

    #[test]
    fn test_empty_input() {
        let doc = parse_markdown("");
        assert_eq!(doc, DocumentNode::empty());
    }

    #[test]
    fn test_walk_visits_nested_containers() {
        let doc = DocumentNode::Container {
            children: vec![
                DocumentNode::Container {
                    children: vec![DocumentNode::Code {
                        lang: Some("go".to_string()),
                        text: "package main".to_string(),
                    }],
                },
                DocumentNode::Text {
                    text: "prose".to_string(),
                },
            ],
        };
        let mut visited = 0;
        doc.walk(&mut |_| visited += 1);
        assert_eq!(visited, 4);
        assert_eq!(doc.code_blocks().len(), 1);
    }
}
