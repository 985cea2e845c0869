use glam::{Mat4, Vec3};

/// Orbit camera circling a fixed target with damped pointer input.
/// Pan is intentionally unsupported; the scene sits at the origin.
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub sensitivity: f32,
    pub zoom_speed: f32,
    /// Exponential decay rate of drag inertia, per second.
    pub damping: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        // Initial pose matches the reference scene: eye at (0, 4, 21)
        // looking at the origin.
        let eye = Vec3::new(0.0, 4.0, 21.0);
        let distance = eye.length();
        Self {
            target: Vec3::ZERO,
            distance,
            yaw: 0.0,
            pitch: (eye.y / distance).asin(),
            fov: 60.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 1.0,
            far: 1000.0,
            sensitivity: 0.005,
            zoom_speed: 0.1,
            damping: 8.0,
            min_distance: 3.0,
            max_distance: 120.0,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
        }
    }
}

impl OrbitCamera {
    /// Feed a pointer drag delta into the orbit inertia.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw_velocity -= dx * self.sensitivity;
        self.pitch_velocity -= dy * self.sensitivity;
    }

    /// Scale the orbit distance by a scroll step, clamped.
    pub fn zoom(&mut self, scroll: f32) {
        self.distance = (self.distance * (1.0 - scroll * self.zoom_speed))
            .clamp(self.min_distance, self.max_distance);
    }

    /// Integrate drag inertia and decay it.
    pub fn update(&mut self, dt: f32) {
        self.yaw += self.yaw_velocity;
        self.pitch = (self.pitch + self.pitch_velocity).clamp(
            -89.0_f32.to_radians(),
            89.0_f32.to_radians(),
        );
        let decay = (-self.damping * dt.max(0.0)).exp();
        self.yaw_velocity *= decay;
        self.pitch_velocity *= decay;
    }

    pub fn eye(&self) -> Vec3 {
        let dir = Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        );
        self.target + dir * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pose_matches_reference_eye() {
        let cam = OrbitCamera::default();
        let eye = cam.eye();
        assert!(eye.x.abs() < 1e-4);
        assert!((eye.y - 4.0).abs() < 1e-4);
        assert!((eye.z - 21.0).abs() < 1e-4);
        let vp = cam.view_projection();
        assert!(vp.to_cols_array().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn drag_orbits_the_eye() {
        let mut cam = OrbitCamera::default();
        let start = cam.eye();
        cam.rotate(40.0, 0.0);
        cam.update(1.0 / 60.0);
        assert_ne!(cam.eye(), start);
        // Orbiting keeps the distance to the target.
        assert!((cam.eye().distance(cam.target) - cam.distance).abs() < 1e-3);
    }

    #[test]
    fn inertia_decays() {
        let mut cam = OrbitCamera::default();
        cam.rotate(100.0, 0.0);
        for _ in 0..600 {
            cam.update(1.0 / 60.0);
        }
        let settled = cam.yaw;
        cam.update(1.0 / 60.0);
        assert!((cam.yaw - settled).abs() < 1e-4);
    }

    #[test]
    fn zoom_clamps_to_bounds() {
        let mut cam = OrbitCamera::default();
        for _ in 0..500 {
            cam.zoom(1.0);
        }
        assert_eq!(cam.distance, cam.min_distance);
        for _ in 0..500 {
            cam.zoom(-1.0);
        }
        assert_eq!(cam.distance, cam.max_distance);
    }

    #[test]
    fn pitch_clamp_avoids_the_poles() {
        let mut cam = OrbitCamera::default();
        cam.rotate(0.0, -1.0e6);
        cam.update(1.0);
        assert!(cam.pitch <= 89.0_f32.to_radians() + 1e-6);
        assert!(cam.view_matrix().to_cols_array().iter().all(|v| v.is_finite()));
    }
}
