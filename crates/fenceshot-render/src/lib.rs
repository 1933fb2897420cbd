//! Code block image rendering.
//!
//! This crate defines the [`Renderer`] seam, the default [`SiliconRenderer`]
//! that shells out to the `silicon` binary, and the batch loop that renders
//! every extracted block while tolerating per-block failures.

pub mod batch;
pub mod silicon;
pub mod traits;

pub use batch::{output_filename, plan, render_all, BatchReport, BlockFailure, RenderJob};
pub use silicon::{SiliconConfig, SiliconRenderer};
pub use traits::{RenderError, Renderer};
