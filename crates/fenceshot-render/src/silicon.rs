//! Renderer backed by the `silicon` command line tool.
//!
//! Each block is written to a temp file which is handed to the binary as
//! `silicon <temp-file> -o <dest> --language <language>`.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::{Builder, TempPath};

use crate::traits::{RenderError, Renderer};

/// Configuration for the silicon renderer.
#[derive(Debug, Clone)]
pub struct SiliconConfig {
    /// Renderer executable, looked up on PATH
    pub program: String,

    /// Extra arguments appended after the fixed ones (e.g. `--theme`)
    pub extra_args: Vec<String>,

    /// Leave temp files on disk after rendering for inspection
    pub keep_temp_files: bool,

    /// Directory for temp files (defaults to the system temp dir)
    pub temp_dir: Option<PathBuf>,
}

impl Default for SiliconConfig {
    fn default() -> Self {
        Self {
            program: "silicon".to_string(),
            extra_args: vec![],
            keep_temp_files: true,
            temp_dir: None,
        }
    }
}

/// Source file handed to the renderer.
enum TempSource {
    /// Persisted file that outlives the render
    Kept(PathBuf),
    /// Deleted when dropped
    Scratch(TempPath),
}

impl TempSource {
    fn path(&self) -> &Path {
        match self {
            Self::Kept(path) => path.as_path(),
            Self::Scratch(path) => &**path,
        }
    }
}

/// Renders code blocks by invoking `silicon` (or a compatible binary).
#[derive(Debug, Clone, Default)]
pub struct SiliconRenderer {
    config: SiliconConfig,
}

impl SiliconRenderer {
    /// Create a new renderer.
    pub fn new(config: SiliconConfig) -> Self {
        Self { config }
    }

    /// Get the renderer configuration.
    pub fn config(&self) -> &SiliconConfig {
        &self.config
    }

    /// Write the code to a closed temp file the renderer can read.
    fn write_source(&self, source: &str, language: &str) -> Result<TempSource, RenderError> {
        let suffix = temp_suffix(language);
        let mut builder = Builder::new();
        builder.prefix("codeblock.").suffix(&suffix);

        let mut file = match &self.config.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(RenderError::TempFile)?;

        tracing::debug!("Created temp file: {}", file.path().display());

        file.write_all(source.as_bytes()).map_err(RenderError::Write)?;

        file.flush()
            .and_then(|_| file.as_file().sync_all())
            .map_err(RenderError::Flush)?;

        // Both branches close the handle before the renderer opens the file
        if self.config.keep_temp_files {
            let (_, path) = file.keep().map_err(|e| RenderError::Flush(e.error))?;
            Ok(TempSource::Kept(path))
        } else {
            Ok(TempSource::Scratch(file.into_temp_path()))
        }
    }
}

impl Renderer for SiliconRenderer {
    fn name(&self) -> &str {
        &self.config.program
    }

    fn render(&self, source: &str, language: &str, dest: &Path) -> Result<(), RenderError> {
        let temp = self.write_source(source, language)?;
        let program = &self.config.program;

        let output = Command::new(program)
            .arg(temp.path())
            .arg("-o")
            .arg(dest)
            .arg("--language")
            .arg(language)
            .args(&self.config.extra_args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| RenderError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stderr.trim().is_empty() {
                tracing::debug!("{} stderr: {}", program, stderr.trim());
            }
            return Err(RenderError::Failed {
                program: program.clone(),
                status: output.status,
            });
        }

        if let TempSource::Kept(path) = &temp {
            tracing::debug!("Kept temp file: {}", path.display());
        }
        tracing::info!("Image saved as {}", dest.display());

        Ok(())
    }
}

/// File extension for the temp file, so the renderer can also sniff it.
///
/// Languages that are not safe as a file name component get no suffix.
fn temp_suffix(language: &str) -> String {
    let safe = !language.is_empty()
        && language
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '_' | '#'));

    if safe {
        format!(".{}", language)
    } else {
        String::new()
    }
}
