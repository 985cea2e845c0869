use glam::Vec3;
use pulsefield_common::{Rgb, SceneConfig};
use std::f32::consts::{PI, TAU};

use crate::rng::UniformSource;

/// Generation and color parameters for a star field.
#[derive(Debug, Clone)]
pub struct FieldParams {
    /// Inner radius of the spherical shell.
    pub inner_radius: f32,
    /// Outer radius of the shell (exclusive).
    pub outer_radius: f32,
    /// Color of stars at the origin.
    pub near_color: Rgb,
    /// Color of stars at and beyond the falloff distance.
    pub far_color: Rgb,
    /// Distance over which the color blend saturates.
    pub color_falloff: f32,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            inner_radius: 12.0,
            outer_radius: 27.0,
            near_color: Rgb::from_u8(150, 150, 255),
            far_color: Rgb::from_u8(80, 50, 120),
            color_falloff: 20.0,
        }
    }
}

impl From<&SceneConfig> for FieldParams {
    fn from(cfg: &SceneConfig) -> Self {
        Self {
            inner_radius: cfg.shell_inner_radius,
            outer_radius: cfg.shell_outer_radius,
            near_color: cfg.star_color_near,
            far_color: cfg.star_color_far,
            color_falloff: cfg.color_falloff_distance,
        }
    }
}

/// A procedurally generated field of orbiting point sprites.
///
/// Storage is three parallel arrays plus one shared time scalar. The
/// arrays are fixed at generation; all motion comes from re-evaluating
/// [`StarField::position_at`] against the shared time, never from
/// mutating the stored positions.
#[derive(Debug, Clone)]
pub struct StarField {
    params: FieldParams,
    positions: Vec<Vec3>,
    sizes: Vec<f32>,
    /// Per star: `(theta0, phi0, angular_speed, amplitude)`.
    shifts: Vec<[f32; 4]>,
    time: f32,
}

impl StarField {
    /// Generate `count` stars from the given uniform stream.
    ///
    /// Per star, eight draws in a fixed order: shell radius, azimuth,
    /// inclination, size, then the four shift parameters. The
    /// inclination uses `acos(2u - 1)` so the distribution is uniform
    /// over the sphere rather than clustered at the poles.
    pub fn generate(params: FieldParams, count: u32, source: &mut impl UniformSource) -> Self {
        let mut positions = Vec::with_capacity(count as usize);
        let mut sizes = Vec::with_capacity(count as usize);
        let mut shifts = Vec::with_capacity(count as usize);

        let radius_span = params.outer_radius - params.inner_radius;
        for _ in 0..count {
            let radius = params.inner_radius + source.next_unit() * radius_span;
            let theta = source.next_unit() * TAU;
            let phi = (source.next_unit() * 2.0 - 1.0).acos();
            positions.push(Vec3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
            ));

            sizes.push(0.3 + source.next_unit());

            shifts.push([
                source.next_unit() * PI,
                source.next_unit() * TAU,
                (0.1 + source.next_unit() * 0.9) * PI * 0.1,
                0.1 + source.next_unit() * 0.9,
            ]);
        }

        tracing::debug!(count, "star field generated");
        Self {
            params,
            positions,
            sizes,
            shifts,
            time: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn shifts(&self) -> &[[f32; 4]] {
        &self.shifts
    }

    /// Shared field time, in π-scaled seconds.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn set_time(&mut self, time: f32) {
        self.time = time;
    }

    /// Displaced position of star `index` at field time `t`.
    ///
    /// The shift parameters trace a closed orbit: two phase angles
    /// advance at the star's angular speed and the resulting unit
    /// offset is scaled by its amplitude.
    pub fn position_at(&self, index: usize, t: f32) -> Vec3 {
        let [theta0, phi0, speed, amplitude] = self.shifts[index];
        let move_t = (theta0 + speed * t).rem_euclid(TAU);
        let move_s = (phi0 + speed * t).rem_euclid(TAU);
        let offset = Vec3::new(
            move_s.cos() * move_t.sin(),
            move_t.cos(),
            move_s.sin() * move_t.sin(),
        ) * amplitude;
        self.positions[index] + offset
    }

    /// Displaced position of star `index` at the current field time.
    pub fn displaced(&self, index: usize) -> Vec3 {
        self.position_at(index, self.time)
    }

    /// Color of star `index`: distance-blended between the near and far
    /// colors, saturating at the falloff distance.
    pub fn color_at(&self, index: usize) -> Rgb {
        let d = (self.positions[index].length() / self.params.color_falloff).clamp(0.0, 1.0);
        self.params.near_color.lerp(self.params.far_color, d)
    }
}
