use crossbeam_channel::{Receiver, Sender, bounded};
use std::path::{Path, PathBuf};

use crate::obj::parse_obj;
use crate::{MeshAsset, Result};

pub type MeshResult = Result<MeshAsset>;

/// Receiving side of a mesh load: the driver polls it once per tick.
///
/// Exactly one completion is ever published per subscription; after it
/// has been taken the channel stays silent.
#[derive(Debug)]
pub struct MeshSubscription {
    rx: Receiver<MeshResult>,
}

impl MeshSubscription {
    /// Non-blocking poll. `None` while the load is still in flight.
    pub fn try_take(&self) -> Option<MeshResult> {
        self.rx.try_recv().ok()
    }
}

/// Channel pair for publishing a mesh load completion.
pub fn mesh_channel() -> (Sender<MeshResult>, MeshSubscription) {
    let (tx, rx) = bounded(1);
    (tx, MeshSubscription { rx })
}

/// Load and parse an OBJ file synchronously.
pub fn load_obj(path: &Path) -> MeshResult {
    let text = std::fs::read_to_string(path)?;
    let positions = parse_obj(&text)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mesh".into());
    let mesh = MeshAsset::from_positions(name, positions);
    tracing::info!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        id = mesh.id().0,
        "mesh loaded"
    );
    Ok(mesh)
}

/// Load an OBJ file on a background thread.
///
/// The completion (success or error) is published on the returned
/// subscription; there are no retries and no cancellation.
pub fn load_obj_async(path: impl Into<PathBuf>) -> MeshSubscription {
    let path = path.into();
    let (tx, subscription) = mesh_channel();
    std::thread::spawn(move || {
        let result = load_obj(&path);
        if let Err(e) = &result {
            tracing::warn!(path = %path.display(), "mesh load failed: {e}");
        }
        // The receiver may already be gone if the scene was torn down.
        let _ = tx.send(result);
    });
    subscription
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AssetError;
    use std::io::Write;

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    #[test]
    fn load_obj_reads_a_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(TRIANGLE.as_bytes()).unwrap();

        let mesh = load_obj(tmp.path()).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn async_load_publishes_exactly_once() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(TRIANGLE.as_bytes()).unwrap();

        let sub = load_obj_async(tmp.path().to_path_buf());
        // Poll until the loader thread publishes.
        let mut taken = None;
        for _ in 0..500 {
            if let Some(result) = sub.try_take() {
                taken = Some(result);
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
        assert!(taken.unwrap().is_ok());
        assert!(sub.try_take().is_none());
    }

    #[test]
    fn missing_file_publishes_an_error() {
        let sub = load_obj_async("/definitely/not/here.obj");
        let mut result = None;
        for _ in 0..500 {
            if let Some(r) = sub.try_take() {
                result = Some(r);
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
        assert!(matches!(result.unwrap(), Err(AssetError::Io(_))));
    }
}
