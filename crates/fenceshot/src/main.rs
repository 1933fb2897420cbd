//! Fenceshot CLI - render the fenced code blocks of a markdown file as images.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use fenceshot_render::{SiliconConfig, SiliconRenderer};
use tracing_subscriber::{fmt, EnvFilter};

mod config;
mod run;

use config::{load_config, ConfigFile};
use run::RunOptions;

#[derive(Parser)]
#[command(name = "fenceshot")]
#[command(about = "Render the fenced code blocks of a markdown file as images")]
#[command(version)]
pub struct Cli {
    /// Markdown file to read
    markdown: PathBuf,

    /// Prefix for output images ({prefix}-{language}-{index}.png)
    prefix: String,

    /// Path to fenceshot.toml config file
    #[arg(short, long, default_value = "fenceshot.toml")]
    config: PathBuf,

    /// Renderer program (defaults to config or "silicon")
    #[arg(short, long)]
    renderer: Option<String>,

    /// Exit with an error if any block fails to render
    #[arg(long)]
    strict: bool,

    /// Render blocks in parallel
    #[arg(long)]
    parallel: bool,

    /// Delete temp files after rendering
    #[arg(long)]
    no_keep_temp: bool,

    /// Print the planned images without rendering
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Merge command line flags over the config file.
    fn resolve(self, file: ConfigFile) -> (SiliconConfig, RunOptions) {
        let renderer = SiliconConfig {
            program: self.renderer.unwrap_or(file.renderer.program),
            extra_args: file.renderer.args,
            keep_temp_files: file.renderer.keep_temp_files && !self.no_keep_temp,
            temp_dir: file.renderer.temp_dir,
        };

        let options = RunOptions {
            markdown: self.markdown,
            prefix: self.prefix,
            strict: self.strict || file.run.strict,
            parallel: self.parallel || file.run.parallel,
            dry_run: self.dry_run,
        };

        (renderer, options)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let file_config = load_config(&cli.config)?;
    let (renderer_config, options) = cli.resolve(file_config);
    let renderer = SiliconRenderer::new(renderer_config);

    run::run(&options, &renderer)?;

    Ok(())
}
