use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::Rgb;

/// Errors from reading or writing a scene configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Scene configuration.
///
/// Defaults carry the reference constants of the demo; a JSON file can
/// override any subset of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Number of stars generated at startup.
    pub star_count: u32,
    /// Inner radius of the spherical shell the stars are sampled on.
    pub shell_inner_radius: f32,
    /// Outer radius of the shell (exclusive).
    pub shell_outer_radius: f32,
    /// Base sprite size; multiplied by each star's own size factor.
    pub star_sprite_size: f32,
    /// Distance at which star color fully fades to the far color.
    pub color_falloff_distance: f32,
    /// Near (bright) star color.
    pub star_color_near: Rgb,
    /// Far (dim) star color.
    pub star_color_far: Rgb,
    /// Breathing amplitude of the heart mesh.
    pub breath_amplitude: f32,
    /// Breathing angular frequency in rad/s.
    pub breath_frequency: f32,
    /// Scene background color.
    pub background: Rgb,
    /// Heart mesh color.
    pub heart_color: Rgb,
    /// Path of the heart OBJ asset.
    pub heart_obj_path: String,
    /// Caption drawn under the heart.
    pub caption: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            star_count: 20_000,
            shell_inner_radius: 12.0,
            shell_outer_radius: 27.0,
            star_sprite_size: 0.12,
            color_falloff_distance: 20.0,
            star_color_near: Rgb::from_u8(150, 150, 255),
            star_color_far: Rgb::from_u8(80, 50, 120),
            breath_amplitude: 0.1,
            breath_frequency: 8.0,
            background: Rgb::from_u8(0x16, 0x00, 0x16),
            heart_color: Rgb::from_u8(0xff, 0x55, 0x55),
            heart_obj_path: "assets/heart.obj".into(),
            caption: "I love you".into(),
        }
    }
}

impl SceneConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let cfg = SceneConfig::default();
        assert_eq!(cfg.star_count, 20_000);
        assert_eq!(cfg.shell_inner_radius, 12.0);
        assert_eq!(cfg.shell_outer_radius, 27.0);
        assert_eq!(cfg.breath_amplitude, 0.1);
        assert_eq!(cfg.breath_frequency, 8.0);
    }

    #[test]
    fn save_and_load_round_trip() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut cfg = SceneConfig::default();
        cfg.star_count = 300;
        cfg.caption = "hello".into();
        cfg.save(tmp.path()).unwrap();

        let loaded = SceneConfig::load(tmp.path()).unwrap();
        assert_eq!(loaded.star_count, 300);
        assert_eq!(loaded.caption, "hello");
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: SceneConfig = serde_json::from_str(r#"{"star_count": 12}"#).unwrap();
        assert_eq!(cfg.star_count, 12);
        assert_eq!(cfg.shell_outer_radius, 27.0);
    }
}
