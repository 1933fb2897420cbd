//! Code block values produced by extraction.

/// A fenced code block extracted from a markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Language tag from the info string (empty if unspecified)
    pub language: String,

    /// Literal text between the fences, trailing newlines included
    pub content: String,

    /// Line number of the opening fence (1-indexed)
    pub line_number: usize,
}

impl CodeBlock {
    /// Create a new code block.
    pub fn new(language: impl Into<String>, content: impl Into<String>, line_number: usize) -> Self {
        Self {
            language: language.into(),
            content: content.into(),
            line_number,
        }
    }

    /// Check if the fence declared a language.
    pub fn has_language(&self) -> bool {
        !self.language.is_empty()
    }
}

/// Extract the language tag from a code fence info string.
///
/// The language is the first whitespace-separated token, so
/// `rust ignore title="x"` yields `rust`. No validation is done against a
/// list of known languages.
pub fn language_from_info(info: &str) -> String {
    info.split_whitespace().next().unwrap_or("").to_string()
}
