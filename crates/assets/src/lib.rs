//! Mesh assets for the scene.
//!
//! Assets are identified by content-addressed hashes and loaded on a
//! background thread. The loader publishes exactly one completion per
//! asset over a channel; the animation driver polls it once per tick
//! with no further synchronization.

mod loader;
mod obj;

pub use loader::{MeshResult, MeshSubscription, load_obj, load_obj_async, mesh_channel};
pub use obj::parse_obj;

use glam::Vec3;
use sha2::{Digest, Sha256};

/// Content-addressed asset ID computed from the vertex data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(pub u64);

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("OBJ parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("mesh has no geometry")]
    EmptyMesh,
}

pub type Result<T> = std::result::Result<T, AssetError>;

/// A triangle-soup mesh: flat list of triangle vertex positions.
///
/// Geometry transforms bake into the positions, mirroring one-time
/// import adjustments (axis fix-up, unit scale, recentering).
#[derive(Debug, Clone)]
pub struct MeshAsset {
    name: String,
    id: AssetId,
    positions: Vec<Vec3>,
}

impl MeshAsset {
    pub fn from_positions(name: impl Into<String>, positions: Vec<Vec3>) -> Self {
        let id = content_hash(&positions);
        Self {
            name: name.into(),
            id,
            positions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> AssetId {
        self.id
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn into_positions(self) -> Vec<Vec3> {
        self.positions
    }

    /// Rotate every vertex about the X axis by `angle` radians.
    pub fn rotate_x(&mut self, angle: f32) {
        let (sin, cos) = angle.sin_cos();
        for v in &mut self.positions {
            let (y, z) = (v.y, v.z);
            v.y = y * cos - z * sin;
            v.z = y * sin + z * cos;
        }
    }

    /// Uniformly scale every vertex about the origin.
    pub fn scale_uniform(&mut self, factor: f32) {
        for v in &mut self.positions {
            *v *= factor;
        }
    }

    /// Translate every vertex.
    pub fn translate(&mut self, offset: Vec3) {
        for v in &mut self.positions {
            *v += offset;
        }
    }
}

fn content_hash(positions: &[Vec3]) -> AssetId {
    let mut hasher = Sha256::new();
    for v in positions {
        hasher.update(v.x.to_le_bytes());
        hasher.update(v.y.to_le_bytes());
        hasher.update(v.z.to_le_bytes());
    }
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    AssetId(u64::from_le_bytes(bytes))
}

pub fn crate_info() -> &'static str {
    concat!("pulsefield-assets v", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn content_hash_is_stable() {
        let a = MeshAsset::from_positions("a", vec![Vec3::ONE, Vec3::ZERO]);
        let b = MeshAsset::from_positions("b", vec![Vec3::ONE, Vec3::ZERO]);
        assert_eq!(a.id(), b.id());

        let c = MeshAsset::from_positions("c", vec![Vec3::ZERO, Vec3::ONE]);
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn rotate_x_quarter_turn_maps_z_up_to_y_up() {
        let mut mesh = MeshAsset::from_positions("m", vec![Vec3::new(0.0, 0.0, 1.0)]);
        mesh.rotate_x(-FRAC_PI_2);
        let v = mesh.positions()[0];
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
        assert!(v.z.abs() < 1e-6);
    }

    #[test]
    fn scale_and_translate_compose() {
        let mut mesh = MeshAsset::from_positions("m", vec![Vec3::new(2.0, 4.0, -2.0)]);
        mesh.scale_uniform(0.5);
        mesh.translate(Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(mesh.positions()[0], Vec3::new(1.0, 1.0, -1.0));
    }
}
