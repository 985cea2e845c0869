//! Renderer interface and the CPU reference backend.
//!
//! The scene's displacement and color math lives in `pulsefield-scene`
//! as plain functions; the GPU backend mirrors it in WGSL. The CPU
//! backend here evaluates the same functions directly, so a frame can
//! be resolved, compared, and digested without a GPU.

mod renderer;

pub use renderer::{CpuRenderer, RenderView, Renderer, ResolvedFrame, ResolvedStar};

pub fn crate_info() -> &'static str {
    concat!("pulsefield-render v", env!("CARGO_PKG_VERSION"))
}
