use glam::{EulerRot, Mat4, Vec3};
use pulsefield_common::SceneConfig;

use crate::field::{FieldParams, StarField};
use crate::heart::BreathingMesh;
use crate::rng::FieldRng;

/// The full scene state: star field, optional heart mesh, and the
/// orientation of both.
///
/// An explicit context object passed to the driver and the renderers;
/// there is no process-wide scene.
#[derive(Debug, Clone)]
pub struct Scene {
    config: SceneConfig,
    field: StarField,
    pub(crate) field_rot_x: f32,
    pub(crate) field_rot_y: f32,
    pub(crate) heart: Option<BreathingMesh>,
    pub(crate) heart_rot_x: f32,
    pub(crate) heart_rot_y: f32,
}

impl Scene {
    /// Build the scene: generates the star field from `seed`. The heart
    /// slot starts empty and fills when its asset arrives.
    pub fn new(config: SceneConfig, seed: u64) -> Self {
        let mut rng = FieldRng::new(seed);
        let field = StarField::generate(FieldParams::from(&config), config.star_count, &mut rng);
        Self {
            config,
            field,
            field_rot_x: 0.0,
            field_rot_y: 0.0,
            heart: None,
            heart_rot_x: 0.0,
            heart_rot_y: 0.0,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn field(&self) -> &StarField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut StarField {
        &mut self.field
    }

    /// Model matrix of the star field (XYZ euler, no translation).
    pub fn field_transform(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.field_rot_x, self.field_rot_y, 0.0)
    }

    pub fn heart(&self) -> Option<&BreathingMesh> {
        self.heart.as_ref()
    }

    /// Model matrix of the heart mesh.
    pub fn heart_transform(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.heart_rot_x, self.heart_rot_y, 0.0)
    }

    pub fn caption(&self) -> &str {
        &self.config.caption
    }

    /// Install the heart mesh from its baked vertex positions.
    pub fn install_heart(&mut self, vertices: Vec<Vec3>) {
        tracing::info!(vertices = vertices.len(), "heart mesh installed");
        self.heart = Some(BreathingMesh::new(
            vertices,
            self.config.breath_amplitude,
            self.config.breath_frequency,
        ));
    }
}
