//! Declarative per-language pattern tables.
//!
//! The tables are plain data, kept apart from the scanning algorithm so
//! they can be unit-tested and extended independently. Table order is
//! fixed, which keeps evidence collection deterministic across runs.

use std::collections::HashMap;

use lazy_static::lazy_static;

/// Heuristic patterns identifying one language in documentation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguagePatterns {
    /// Canonical language name
    pub name: &'static str,
    /// Keywords and tool names mentioned in prose
    pub keywords: &'static [&'static str],
    /// Fenced-code-block tags claiming this language
    pub code_block_tags: &'static [&'static str],
    /// File extensions (with leading dot)
    pub file_extensions: &'static [&'static str],
    /// Framework and major library names
    pub frameworks: &'static [&'static str],
}

/// The known-language table, in fixed iteration order.
static LANGUAGE_PATTERNS: &[LanguagePatterns] = &[
    LanguagePatterns {
        name: "Rust",
        keywords: &["cargo", "rustc", "rustup", "crate", "borrow checker"],
        code_block_tags: &["rust", "rs"],
        file_extensions: &[".rs"],
        frameworks: &["tokio", "actix", "axum", "rocket", "serde"],
    },
    LanguagePatterns {
        name: "Python",
        keywords: &["pip", "virtualenv", "pytest", "conda", "def "],
        code_block_tags: &["python", "py", "python3"],
        file_extensions: &[".py", ".pyw"],
        frameworks: &["django", "flask", "fastapi", "numpy", "pandas"],
    },
    LanguagePatterns {
        name: "JavaScript",
        keywords: &["npm", "yarn", "node", "eslint"],
        code_block_tags: &["javascript", "js", "jsx"],
        file_extensions: &[".js", ".mjs", ".cjs"],
        frameworks: &["react", "express", "webpack", "vite", "next.js"],
    },
    LanguagePatterns {
        name: "TypeScript",
        keywords: &["tsc", "tsconfig", "ts-node"],
        code_block_tags: &["typescript", "ts", "tsx"],
        file_extensions: &[".ts", ".tsx"],
        frameworks: &["angular", "nestjs", "deno"],
    },
    LanguagePatterns {
        name: "Go",
        keywords: &["golang", "goroutine", "go mod", "go build"],
        code_block_tags: &["go", "golang"],
        file_extensions: &[".go"],
        frameworks: &["gin", "echo", "cobra"],
    },
    LanguagePatterns {
        name: "Java",
        keywords: &["maven", "gradle", "jvm", "javac"],
        code_block_tags: &["java"],
        file_extensions: &[".java", ".jar"],
        frameworks: &["spring", "hibernate", "quarkus"],
    },
    LanguagePatterns {
        name: "C#",
        keywords: &["dotnet", "nuget", "csproj"],
        code_block_tags: &["csharp", "cs", "c#"],
        file_extensions: &[".cs", ".csproj"],
        frameworks: &["asp.net", "blazor", "xamarin"],
    },
    LanguagePatterns {
        name: "Ruby",
        keywords: &["gem", "bundler", "rake", "irb"],
        code_block_tags: &["ruby", "rb"],
        file_extensions: &[".rb", ".gemspec"],
        frameworks: &["rails", "sinatra", "rspec"],
    },
    LanguagePatterns {
        name: "PHP",
        keywords: &["composer", "phpunit"],
        code_block_tags: &["php"],
        file_extensions: &[".php"],
        frameworks: &["laravel", "symfony", "wordpress"],
    },
    LanguagePatterns {
        name: "C++",
        keywords: &["cmake", "clang", "g++"],
        code_block_tags: &["cpp", "c++", "cxx"],
        file_extensions: &[".cpp", ".cc", ".hpp"],
        frameworks: &["boost", "qt"],
    },
    LanguagePatterns {
        name: "Shell",
        keywords: &["shebang", "chmod"],
        code_block_tags: &["bash", "sh", "shell", "zsh"],
        file_extensions: &[".sh", ".bash"],
        frameworks: &[],
    },
];

lazy_static! {
    /// Case-insensitive name index over the table.
    static ref NAME_INDEX: HashMap<String, &'static LanguagePatterns> = LANGUAGE_PATTERNS
        .iter()
        .map(|p| (p.name.to_ascii_lowercase(), p))
        .collect();
}

/// The full pattern table, in fixed order.
pub fn language_patterns() -> &'static [LanguagePatterns] {
    LANGUAGE_PATTERNS
}

/// Look up a language's patterns by name, case-insensitively.
pub fn find_language(name: &str) -> Option<&'static LanguagePatterns> {
    NAME_INDEX.get(&name.to_ascii_lowercase()).copied()
}

impl LanguagePatterns {
    /// Whether a fenced-code-block tag claims this language.
    pub fn matches_tag(&self, tag: &str) -> bool {
        self.code_block_tags
            .iter()
            .any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Whether a framework name belongs to this language's known set.
    pub fn knows_framework(&self, framework: &str) -> bool {
        self.frameworks
            .iter()
            .any(|f| f.eq_ignore_ascii_case(framework))
    }
}
