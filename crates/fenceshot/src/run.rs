//! Extract-and-render pipeline.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use fenceshot_md::extract_code_blocks;
use fenceshot_render::{plan, render_all, BatchReport, Renderer};

/// Options for a single run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Markdown file to read
    pub markdown: PathBuf,

    /// Prefix for output image names
    pub prefix: String,

    /// Fail the run when any block fails to render
    pub strict: bool,

    /// Render blocks concurrently
    pub parallel: bool,

    /// Only log the planned renders
    pub dry_run: bool,
}

/// Read the markdown file and render each of its fenced code blocks.
///
/// Per-block failures are logged and returned in the report. Only an
/// unreadable input, or a failed block in strict mode, is an error.
pub fn run(options: &RunOptions, renderer: &dyn Renderer) -> Result<BatchReport> {
    let bytes = fs::read(&options.markdown)
        .with_context(|| format!("Error reading file {}", options.markdown.display()))?;

    // Invalid UTF-8 becomes U+FFFD; the rest of the document still parses
    let markdown = String::from_utf8_lossy(&bytes);
    let blocks = extract_code_blocks(&markdown);
    tracing::info!(
        "Found {} code blocks in {}",
        blocks.len(),
        options.markdown.display()
    );

    let jobs = plan(blocks, &options.prefix);

    if options.dry_run {
        for job in &jobs {
            tracing::info!(
                "Would render block {} (line {}) to {}",
                job.index,
                job.block.line_number,
                job.output.display()
            );
        }
        return Ok(BatchReport::default());
    }

    let report = render_all(renderer, &jobs, options.parallel);

    tracing::info!(
        "Rendered {} of {} code blocks",
        report.rendered.len(),
        report.total()
    );

    if options.strict && !report.is_success() {
        anyhow::bail!(
            "{} of {} code blocks failed to render",
            report.failures.len(),
            report.total()
        );
    }

    Ok(report)
}
