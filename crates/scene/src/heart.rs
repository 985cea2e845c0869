use glam::Vec3;

/// A mesh that pulses by uniform scaling about the origin.
///
/// The original vertex positions are captured once, when the asset
/// arrives, and never mutated afterwards. Each deform pass recomputes
/// the full output buffer from that snapshot, so repeated calls with
/// the same time are identical.
#[derive(Debug, Clone)]
pub struct BreathingMesh {
    original: Vec<Vec3>,
    deformed: Vec<Vec3>,
    amplitude: f32,
    frequency: f32,
}

impl BreathingMesh {
    /// Capture a vertex snapshot. `vertices` must be non-empty.
    pub fn new(vertices: Vec<Vec3>, amplitude: f32, frequency: f32) -> Self {
        debug_assert!(!vertices.is_empty(), "breathing mesh needs vertices");
        let deformed = vertices.clone();
        Self {
            original: vertices,
            deformed,
            amplitude,
            frequency,
        }
    }

    /// Scale factor at elapsed time `t` (raw seconds, not field time).
    pub fn breathing_scale(&self, t: f64) -> f32 {
        (1.0 + self.amplitude as f64 * (t * self.frequency as f64).sin()) as f32
    }

    /// Recompute the deformed buffer for time `t` and return it.
    pub fn deform(&mut self, t: f64) -> &[Vec3] {
        let scale = self.breathing_scale(t);
        for (out, &v) in self.deformed.iter_mut().zip(&self.original) {
            *out = v * scale;
        }
        &self.deformed
    }

    /// The most recently deformed vertex buffer.
    pub fn deformed(&self) -> &[Vec3] {
        &self.deformed
    }

    /// The immutable snapshot captured at load.
    pub fn original(&self) -> &[Vec3] {
        &self.original
    }

    pub fn vertex_count(&self) -> usize {
        self.original.len()
    }
}
