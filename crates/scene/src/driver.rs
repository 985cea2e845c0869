use glam::Vec3;
use pulsefield_assets::MeshSubscription;
use std::f32::consts::FRAC_PI_2;
use std::f64::consts::PI;

use crate::clock::FrameClock;
use crate::scene::Scene;

// Load transform baked into the heart snapshot on arrival: the OBJ is
// modeled Z-up at unit scale, the scene wants Y-up at 0.15 with the
// lobes centered slightly below the origin.
const HEART_BAKE_SCALE: f32 = 0.15;
const HEART_BAKE_OFFSET: Vec3 = Vec3::new(0.0, -0.4, 0.0);

/// Per-tick state update for the scene.
///
/// One tick: poll the mesh channel, read the clock once, push time into
/// the star field, rotate field and heart, deform the heart if present.
/// Drawing is the embedding loop's job; the driver only mutates state.
#[derive(Debug)]
pub struct AnimationDriver {
    clock: FrameClock,
    scene: Scene,
    mesh_source: Option<MeshSubscription>,
    ticks: u64,
}

impl AnimationDriver {
    pub fn new(scene: Scene) -> Self {
        Self {
            clock: FrameClock::new(),
            scene,
            mesh_source: None,
            ticks: 0,
        }
    }

    /// Attach the channel on which the heart mesh will arrive.
    pub fn with_mesh_source(mut self, source: MeshSubscription) -> Self {
        self.mesh_source = Some(source);
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance using the real clock. Returns the elapsed time used.
    pub fn tick(&mut self) -> f64 {
        let t = self.clock.elapsed();
        self.advance_to(t);
        t
    }

    /// Advance to an explicit elapsed time (headless/deterministic use).
    pub fn advance_to(&mut self, t: f64) {
        self.poll_mesh();

        self.scene.field_mut().set_time((t * PI) as f32);
        let tf = t as f32;
        self.scene.field_rot_y = -tf * 0.03;
        self.scene.field_rot_x = (tf * 0.3).cos() * 0.02;

        // The only failure/edge path: the heart has not arrived yet, so
        // its rotation and deformation are skipped entirely.
        if let Some(heart) = self.scene.heart.as_mut() {
            self.scene.heart_rot_y = tf * 0.08;
            self.scene.heart_rot_x = (tf * 0.5).sin() * 0.05;
            heart.deform(t);
        }

        self.ticks += 1;
    }

    /// Non-blocking check of the mesh channel, once per tick. On
    /// arrival the load transform is baked and the snapshot captured;
    /// on failure the heart stays permanently absent.
    fn poll_mesh(&mut self) {
        let Some(source) = &self.mesh_source else {
            return;
        };
        match source.try_take() {
            None => {}
            Some(Ok(mut mesh)) => {
                mesh.rotate_x(-FRAC_PI_2);
                mesh.scale_uniform(HEART_BAKE_SCALE);
                mesh.translate(HEART_BAKE_OFFSET);
                self.scene.install_heart(mesh.into_positions());
                self.mesh_source = None;
            }
            Some(Err(e)) => {
                tracing::warn!("heart mesh failed to load: {e}");
                self.mesh_source = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsefield_assets::{AssetError, MeshAsset, mesh_channel};
    use pulsefield_common::SceneConfig;

    fn small_scene() -> Scene {
        let mut cfg = SceneConfig::default();
        cfg.star_count = 16;
        Scene::new(cfg, 42)
    }

    #[test]
    fn tick_without_mesh_is_a_no_op_for_the_heart() {
        let mut driver = AnimationDriver::new(small_scene());
        driver.advance_to(0.5);
        assert!(driver.scene().heart().is_none());
        assert_eq!(driver.ticks(), 1);
    }

    #[test]
    fn advance_sets_field_time_and_rotations() {
        let mut driver = AnimationDriver::new(small_scene());
        driver.advance_to(2.0);

        let scene = driver.scene();
        assert!((scene.field().time() - (2.0 * PI) as f32).abs() < 1e-6);
        assert!((scene.field_rot_y - (-0.06)).abs() < 1e-6);
        assert!((scene.field_rot_x - (2.0f32 * 0.3).cos() * 0.02).abs() < 1e-6);
        // Heart rotation untouched while the mesh is absent.
        assert_eq!(scene.heart_rot_y, 0.0);
    }

    #[test]
    fn mesh_is_picked_up_on_the_next_tick() {
        let (tx, rx) = mesh_channel();
        let mut driver = AnimationDriver::new(small_scene()).with_mesh_source(rx);

        driver.advance_to(0.0);
        assert!(driver.scene().heart().is_none());

        tx.send(Ok(MeshAsset::from_positions(
            "heart",
            vec![Vec3::new(0.0, 0.0, 1.0)],
        )))
        .unwrap();

        driver.advance_to(1.0);
        let heart = driver.scene().heart().expect("heart installed");
        assert_eq!(heart.vertex_count(), 1);
    }

    #[test]
    fn bake_transform_is_applied_once_at_install() {
        let (tx, rx) = mesh_channel();
        let mut driver = AnimationDriver::new(small_scene()).with_mesh_source(rx);

        // A vertex at +Z rotates to +Y under the -pi/2 X rotation, then
        // scales to 0.15 and drops by the bake offset.
        tx.send(Ok(MeshAsset::from_positions(
            "heart",
            vec![Vec3::new(0.0, 0.0, 1.0)],
        )))
        .unwrap();
        driver.advance_to(0.0);

        let heart = driver.scene().heart().unwrap();
        let v = heart.original()[0];
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - (0.15 - 0.4)).abs() < 1e-6);
        assert!(v.z.abs() < 1e-6);
    }

    #[test]
    fn heart_rotation_and_deform_run_once_present() {
        let (tx, rx) = mesh_channel();
        let mut driver = AnimationDriver::new(small_scene()).with_mesh_source(rx);
        tx.send(Ok(MeshAsset::from_positions(
            "heart",
            vec![Vec3::new(1.0, 0.0, 0.0)],
        )))
        .unwrap();

        driver.advance_to(3.0);
        let scene = driver.scene();
        assert!((scene.heart_rot_y - 0.24).abs() < 1e-6);
        assert!((scene.heart_rot_x - (3.0f32 * 0.5).sin() * 0.05).abs() < 1e-6);

        let heart = scene.heart().unwrap();
        let expected_scale = heart.breathing_scale(3.0);
        assert_eq!(heart.deformed()[0], heart.original()[0] * expected_scale);
    }

    #[test]
    fn load_failure_leaves_the_heart_absent() {
        let (tx, rx) = mesh_channel();
        let mut driver = AnimationDriver::new(small_scene()).with_mesh_source(rx);
        tx.send(Err(AssetError::EmptyMesh)).unwrap();

        driver.advance_to(0.1);
        driver.advance_to(0.2);
        assert!(driver.scene().heart().is_none());
    }

    #[test]
    fn real_clock_tick_is_monotonic() {
        let mut driver = AnimationDriver::new(small_scene());
        let a = driver.tick();
        let b = driver.tick();
        assert!(b >= a);
        assert_eq!(driver.ticks(), 2);
    }
}
