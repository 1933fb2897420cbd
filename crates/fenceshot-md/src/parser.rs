//! Markdown parser and fenced code block extractor.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::codeblock::{language_from_info, CodeBlock};

/// Extract every fenced code block from a markdown document.
///
/// Blocks are returned in reading order, including fences nested inside
/// block quotes, lists and footnotes. Indented code blocks are skipped.
/// Parsing is total: malformed markdown degrades to text, it never fails.
///
/// Tables, footnotes, strikethrough and task lists are enabled. None of them
/// changes how fences are recognized, but fences inside footnote definitions
/// are only found with footnotes on.
pub fn extract_code_blocks(source: &str) -> Vec<CodeBlock> {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let lines = LineIndex::new(source);
    let mut code_blocks = Vec::new();

    // (language, content, line) of the fence being read
    let mut current: Option<(String, String, usize)> = None;

    for (event, range) in Parser::new_ext(source, options).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                let line = lines.line_of(range.start);
                current = Some((language_from_info(&info), String::new(), line));
            }

            Event::Text(text) => {
                if let Some((_, ref mut content, _)) = current {
                    push_source_text(content, source, range, &text);
                }
            }

            // Also closes indented blocks, for which `current` is None.
            Event::End(TagEnd::CodeBlock) => {
                if let Some((language, content, line)) = current.take() {
                    code_blocks.push(CodeBlock::new(language, content, line));
                }
            }

            _ => {}
        }
    }

    code_blocks
}

/// Append code text as it appears in the source.
///
/// The parser normalizes CRLF to LF and emits the `\n` with a span that
/// starts after the `\r`, so the `\r` is restored from the source. Text with
/// no matching span (spaces from tab expansion) is appended as given.
fn push_source_text(content: &mut String, source: &str, range: Range<usize>, text: &str) {
    let raw = match source.get(range.clone()) {
        Some(raw) if raw.replace("\r\n", "\n") == text => raw,
        _ => {
            content.push_str(text);
            return;
        }
    };

    if raw.starts_with('\n') && source[..range.start].ends_with('\r') && !content.ends_with('\r')
    {
        content.push('\r');
    }
    content.push_str(raw);
}

/// Maps byte offsets to 1-indexed line numbers.
struct LineIndex {
    /// Byte offset where each line starts
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }
}
