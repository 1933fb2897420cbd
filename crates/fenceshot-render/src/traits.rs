//! Trait definitions for image renderers.

use std::io;
use std::path::Path;
use std::process::ExitStatus;

/// Errors that can occur while rendering a single code block.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to create temp file: {0}")]
    TempFile(#[source] io::Error),

    #[error("failed to write code to temp file: {0}")]
    Write(#[source] io::Error),

    #[error("failed to flush temp file: {0}")]
    Flush(#[source] io::Error),

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited unsuccessfully ({status})")]
    Failed { program: String, status: ExitStatus },
}

/// Trait for backends that turn source code into an image file.
pub trait Renderer: Send + Sync {
    /// Renderer identifier (e.g., "silicon")
    fn name(&self) -> &str;

    /// Render `source` highlighted as `language` into an image at `dest`.
    ///
    /// # Arguments
    /// * `source` - The code block content
    /// * `language` - Language hint, possibly empty
    /// * `dest` - Path of the image to create
    fn render(&self, source: &str, language: &str, dest: &Path) -> Result<(), RenderError>;
}
