//! wgpu render backend for the pulsefield scene.
//!
//! Draws the star field as instanced billboard sprites whose WGSL
//! vertex stage mirrors the displacement and color formulas of
//! `pulsefield-scene`, and the heart as an unlit mesh whose vertex
//! buffer is re-uploaded from the CPU deformation each frame.
//!
//! # Invariants
//! - The renderer never mutates scene state.
//! - Star attribute buffers are uploaded once; only uniforms (time,
//!   rotation, camera) change per frame.

mod camera;
mod gpu;
mod shaders;

pub use camera::OrbitCamera;
pub use gpu::SceneRenderer;
