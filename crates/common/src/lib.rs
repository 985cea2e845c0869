//! Shared types and configuration for the pulsefield scene.

pub mod color;
pub mod config;

pub use color::Rgb;
pub use config::{ConfigError, SceneConfig};
