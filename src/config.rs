use std::path::Path;

use anyhow::Context;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::{FirstPersonState, ModeBank, OrbitalState, ThirdPersonState};

/// Demo tunables, overridable from a JSON file via `--config`
///
/// Defaults reproduce the built-in constants; any subset of fields may appear
/// in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Vertical field of view, degrees
    pub fov_deg: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    /// Camera start position, world space
    pub start_position: [f32; 3],
    /// Third-person camera offset from its target
    pub third_person_offset: [f32; 3],
    pub orbit_radius: f32,
    /// Degrees of orbit rotation per viewport-length of cursor travel
    pub orbit_sensitivity: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fov_deg: 45.0,
            near_plane: 0.1,
            far_plane: 100.0,
            start_position: [0.0, 0.0, 2.0],
            third_person_offset: [0.0, 2.0, 8.0],
            orbit_radius: 10.0,
            orbit_sensitivity: 100.0,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn start_position(&self) -> Vec3 {
        Vec3::from_array(self.start_position)
    }

    /// Initial per-mode camera states derived from the tunables
    pub fn mode_bank(&self) -> ModeBank {
        ModeBank::new(
            FirstPersonState::default(),
            ThirdPersonState {
                offset: Vec3::from_array(self.third_person_offset),
                ..ThirdPersonState::default()
            },
            OrbitalState {
                radius: self.orbit_radius,
                sensitivity: self.orbit_sensitivity,
                ..OrbitalState::default()
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_builtin_constants() {
        let config = Config::default();
        assert_eq!(config.fov_deg, 45.0);
        assert_eq!(config.near_plane, 0.1);
        assert_eq!(config.far_plane, 100.0);
        assert_eq!(config.orbit_radius, 10.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{ "fov_deg": 60.0 }"#).unwrap();
        assert_eq!(config.fov_deg, 60.0);
        assert_eq!(config.far_plane, 100.0);
    }

    #[test]
    fn test_round_trips_through_json() {
        let config = Config::default();
        let text = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&text).unwrap();
        assert_eq!(back.orbit_sensitivity, config.orbit_sensitivity);
    }
}
