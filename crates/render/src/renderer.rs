use glam::Vec3;
use pulsefield_common::Rgb;
use pulsefield_scene::Scene;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 4.0, 21.0),
            target: Vec3::ZERO,
            fov_degrees: 60.0,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads scene state and a view, and produces output. It
/// never mutates the scene; all per-frame mutation happens in the
/// animation driver.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene state and view.
    fn render(&self, scene: &Scene, view: &RenderView) -> Self::Output;
}

/// One star with its displacement and color fully evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedStar {
    /// World-space position (field rotation applied).
    pub position: Vec3,
    pub color: Rgb,
    pub size: f32,
}

/// A frame's geometry with every formula evaluated on the CPU.
#[derive(Debug, Clone)]
pub struct ResolvedFrame {
    /// The field time the frame was resolved at.
    pub time: f32,
    pub stars: Vec<ResolvedStar>,
    /// World-space heart vertices, if the mesh has arrived.
    pub heart: Option<Vec<Vec3>>,
}

impl ResolvedFrame {
    /// Deterministic FNV-1a digest of the resolved geometry. Two frames
    /// resolved from the same seed and time always agree.
    pub fn digest(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mut mix = |bytes: &[u8]| {
            for &b in bytes {
                h ^= b as u64;
                h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&self.time.to_le_bytes());
        for star in &self.stars {
            mix(&star.position.x.to_le_bytes());
            mix(&star.position.y.to_le_bytes());
            mix(&star.position.z.to_le_bytes());
            mix(&star.size.to_le_bytes());
        }
        if let Some(heart) = &self.heart {
            for v in heart {
                mix(&v.x.to_le_bytes());
                mix(&v.y.to_le_bytes());
                mix(&v.z.to_le_bytes());
            }
        }
        h
    }
}

/// CPU reference backend.
///
/// Resolves the displaced position and color of every star and the
/// deformed heart vertices in world space, using the exact host-side
/// formulas the GPU shader mirrors.
#[derive(Debug, Default)]
pub struct CpuRenderer;

impl CpuRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for CpuRenderer {
    type Output = ResolvedFrame;

    fn render(&self, scene: &Scene, _view: &RenderView) -> ResolvedFrame {
        let field = scene.field();
        let model = scene.field_transform();

        let stars = (0..field.len())
            .map(|i| ResolvedStar {
                position: model.transform_point3(field.displaced(i)),
                color: field.color_at(i),
                size: field.sizes()[i],
            })
            .collect();

        let heart = scene.heart().map(|mesh| {
            let model = scene.heart_transform();
            mesh.deformed()
                .iter()
                .map(|&v| model.transform_point3(v))
                .collect()
        });

        ResolvedFrame {
            time: field.time(),
            stars,
            heart,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsefield_common::SceneConfig;

    fn small_scene() -> Scene {
        let mut cfg = SceneConfig::default();
        cfg.star_count = 32;
        Scene::new(cfg, 42)
    }

    #[test]
    fn resolved_stars_match_the_field_formulas() {
        let mut scene = small_scene();
        scene.field_mut().set_time(1.75);

        let frame = CpuRenderer::new().render(&scene, &RenderView::default());
        assert_eq!(frame.stars.len(), 32);
        // Field transform is identity before the driver runs, so the
        // resolved positions are exactly the displaced positions.
        let field = scene.field();
        for (i, star) in frame.stars.iter().enumerate() {
            assert_eq!(star.position, field.position_at(i, 1.75));
            assert_eq!(star.color, field.color_at(i));
            assert_eq!(star.size, field.sizes()[i]);
        }
    }

    #[test]
    fn heart_absent_resolves_to_none() {
        let frame = CpuRenderer::new().render(&small_scene(), &RenderView::default());
        assert!(frame.heart.is_none());
    }

    #[test]
    fn heart_vertices_resolve_in_world_space() {
        let mut scene = small_scene();
        scene.install_heart(vec![Vec3::new(1.0, 0.0, 0.0)]);

        let frame = CpuRenderer::new().render(&scene, &RenderView::default());
        let heart = frame.heart.unwrap();
        assert_eq!(heart.len(), 1);
        assert_eq!(heart[0], Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn digest_is_stable_for_equal_state() {
        let mut a = small_scene();
        let mut b = small_scene();
        a.field_mut().set_time(0.5);
        b.field_mut().set_time(0.5);

        let renderer = CpuRenderer::new();
        let view = RenderView::default();
        assert_eq!(
            renderer.render(&a, &view).digest(),
            renderer.render(&b, &view).digest()
        );

        b.field_mut().set_time(0.6);
        assert_ne!(
            renderer.render(&a, &view).digest(),
            renderer.render(&b, &view).digest()
        );
    }
}
