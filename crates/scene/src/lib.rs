//! Scene core: star field generation, breathing mesh deformation, and the
//! per-frame animation driver.
//!
//! # Invariants
//! - Field generation is pure and deterministic given the sampler stream.
//! - Star positions, sizes, and shift parameters are fixed at generation;
//!   only the shared time scalar changes per frame.
//! - The breathing deformation never mutates the captured vertex snapshot.

pub mod clock;
pub mod driver;
pub mod field;
pub mod heart;
pub mod rng;
pub mod scene;

pub use clock::{FrameClock, FrameTimer};
pub use driver::AnimationDriver;
pub use field::{FieldParams, StarField};
pub use heart::BreathingMesh;
pub use rng::{FieldRng, UniformSource};
pub use scene::Scene;
