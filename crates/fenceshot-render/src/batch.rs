//! Batch rendering of extracted code blocks.

use std::path::PathBuf;

use rayon::prelude::*;

use fenceshot_md::CodeBlock;

use crate::traits::{RenderError, Renderer};

/// A code block paired with the image it should become.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    /// Zero-based position in extraction order
    pub index: usize,

    /// Block to render
    pub block: CodeBlock,

    /// Destination image path
    pub output: PathBuf,
}

/// A block that failed to render.
#[derive(Debug)]
pub struct BlockFailure {
    /// Index of the failed block
    pub index: usize,

    /// Image path that was not produced
    pub output: PathBuf,

    /// Why rendering failed
    pub error: RenderError,
}

/// Outcome of rendering a batch of blocks.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Images written, in block order
    pub rendered: Vec<PathBuf>,

    /// Blocks that failed, in block order
    pub failures: Vec<BlockFailure>,
}

impl BatchReport {
    /// Number of blocks attempted.
    pub fn total(&self) -> usize {
        self.rendered.len() + self.failures.len()
    }

    /// Check if every block rendered.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Image file name for a block: `{prefix}-{language}-{index}.png`.
///
/// An empty language is kept as-is, giving names like `out--0.png`.
pub fn output_filename(prefix: &str, language: &str, index: usize) -> String {
    format!("{}-{}-{}.png", prefix, language, index)
}

/// Pair each block with its output path, numbering in extraction order.
pub fn plan(blocks: Vec<CodeBlock>, prefix: &str) -> Vec<RenderJob> {
    blocks
        .into_iter()
        .enumerate()
        .map(|(index, block)| RenderJob {
            output: PathBuf::from(output_filename(prefix, &block.language, index)),
            index,
            block,
        })
        .collect()
}

/// Render every job, continuing past failures.
///
/// With `parallel` set, jobs run on the rayon thread pool. The report keeps
/// job order either way.
pub fn render_all(renderer: &dyn Renderer, jobs: &[RenderJob], parallel: bool) -> BatchReport {
    let results: Vec<Result<PathBuf, BlockFailure>> = if parallel {
        jobs.par_iter().map(|job| render_one(renderer, job)).collect()
    } else {
        jobs.iter().map(|job| render_one(renderer, job)).collect()
    };

    let mut report = BatchReport::default();
    for result in results {
        match result {
            Ok(path) => report.rendered.push(path),
            Err(failure) => report.failures.push(failure),
        }
    }

    report
}

fn render_one(renderer: &dyn Renderer, job: &RenderJob) -> Result<PathBuf, BlockFailure> {
    tracing::debug!(
        "Rendering block {} ({} at line {}) with {}",
        job.index,
        display_language(&job.block.language),
        job.block.line_number,
        renderer.name()
    );

    match renderer.render(&job.block.content, &job.block.language, &job.output) {
        Ok(()) => Ok(job.output.clone()),
        Err(error) => {
            tracing::error!(
                "Error generating image {} for block {}: {}",
                job.output.display(),
                job.index,
                error
            );
            Err(BlockFailure {
                index: job.index,
                output: job.output.clone(),
                error,
            })
        }
    }
}

fn display_language(language: &str) -> &str {
    if language.is_empty() {
        "no language"
    } else {
        language
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use std::sync::Mutex;

    /// Records calls and fails for the configured block contents.
    #[derive(Default)]
    struct FakeRenderer {
        calls: Mutex<Vec<(String, String, PathBuf)>>,
        fail_on: Vec<String>,
    }

    impl FakeRenderer {
        fn failing_on(content: &str) -> Self {
            Self {
                fail_on: vec![content.to_string()],
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<(String, String, PathBuf)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Renderer for FakeRenderer {
        fn name(&self) -> &str {
            "fake"
        }

        fn render(&self, source: &str, language: &str, dest: &Path) -> Result<(), RenderError> {
            self.calls.lock().unwrap().push((
                source.to_string(),
                language.to_string(),
                dest.to_path_buf(),
            ));
            if self.fail_on.iter().any(|c| c == source) {
                return Err(RenderError::Write(std::io::Error::other("disk full")));
            }
            Ok(())
        }
    }

    fn blocks() -> Vec<CodeBlock> {
        vec![
            CodeBlock::new("python", "print(1)\n", 2),
            CodeBlock::new("go", "fmt.Println(2)\n", 6),
        ]
    }

    #[test]
    fn formats_output_filenames() {
        assert_eq!(output_filename("out", "python", 0), "out-python-0.png");
        assert_eq!(output_filename("docs/img", "go", 12), "docs/img-go-12.png");
        assert_eq!(output_filename("out", "", 0), "out--0.png");
    }

    #[test]
    fn plans_jobs_in_extraction_order() {
        let jobs = plan(blocks(), "out");

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].index, 0);
        assert_eq!(jobs[0].output, PathBuf::from("out-python-0.png"));
        assert_eq!(jobs[1].index, 1);
        assert_eq!(jobs[1].output, PathBuf::from("out-go-1.png"));
        assert_eq!(jobs[1].block.content, "fmt.Println(2)\n");
    }

    #[test]
    fn renders_every_block() {
        let renderer = FakeRenderer::default();
        let jobs = plan(blocks(), "out");

        let report = render_all(&renderer, &jobs, false);

        assert!(report.is_success());
        assert_eq!(
            report.rendered,
            vec![PathBuf::from("out-python-0.png"), PathBuf::from("out-go-1.png")]
        );
        assert_eq!(
            renderer.calls(),
            vec![
                (
                    "print(1)\n".to_string(),
                    "python".to_string(),
                    PathBuf::from("out-python-0.png")
                ),
                (
                    "fmt.Println(2)\n".to_string(),
                    "go".to_string(),
                    PathBuf::from("out-go-1.png")
                ),
            ]
        );
    }

    #[test]
    fn continues_past_failed_block() {
        let renderer = FakeRenderer::failing_on("print(1)\n");
        let jobs = plan(blocks(), "out");

        let report = render_all(&renderer, &jobs, false);

        assert_eq!(renderer.calls().len(), 2);
        assert_eq!(report.total(), 2);
        assert!(!report.is_success());
        assert_eq!(report.rendered, vec![PathBuf::from("out-go-1.png")]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 0);
        assert_eq!(report.failures[0].output, PathBuf::from("out-python-0.png"));
        assert!(matches!(report.failures[0].error, RenderError::Write(_)));
    }

    #[test]
    fn parallel_rendering_keeps_block_order() {
        let blocks: Vec<CodeBlock> = (0..32)
            .map(|i| CodeBlock::new("rust", format!("let x = {};\n", i), i + 1))
            .collect();
        let renderer = FakeRenderer::failing_on("let x = 7;\n");
        let jobs = plan(blocks, "par");

        let report = render_all(&renderer, &jobs, true);

        assert_eq!(renderer.calls().len(), 32);
        assert_eq!(report.rendered.len(), 31);
        assert_eq!(report.rendered[0], PathBuf::from("par-rust-0.png"));
        assert_eq!(report.rendered[7], PathBuf::from("par-rust-8.png"));
        assert_eq!(report.failures[0].index, 7);
    }

    #[test]
    fn empty_batch_is_a_success() {
        let renderer = FakeRenderer::default();

        let report = render_all(&renderer, &[], false);

        assert_eq!(report.total(), 0);
        assert!(report.is_success());
        assert!(renderer.calls().is_empty());
    }
}
