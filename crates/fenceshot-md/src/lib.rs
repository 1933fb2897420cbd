//! Markdown parsing and fenced code block extraction.
//!
//! This crate walks a CommonMark document in reading order and collects every
//! fenced code block together with the language named in its info string.

pub mod codeblock;
pub mod parser;

pub use codeblock::{language_from_info, CodeBlock};
pub use parser::extract_code_blocks;
