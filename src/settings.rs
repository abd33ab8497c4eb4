//! Viewer Settings
//!
//! Tunables for the viewer: camera setup, the fly-to animation, catalog
//! filtering and the purely cosmetic parts of planet spawning.
//!
//! ```rust,ignore
//! use orrery::settings::ViewerSettings;
//!
//! // Slower jumps, everything else default
//! let settings = ViewerSettings {
//!     jump_duration_seconds: 2.5,
//!     ..Default::default()
//! };
//!
//! // Or from a JSON file shipped next to the assets
//! let settings = ViewerSettings::from_json_str(r#"{ "camera_fov_degrees": 60 }"#)?;
//! ```

use glam::Vec3;
use serde::Deserialize;

use crate::errors::{OrreryError, Result};

/// Configuration consumed by [`Viewer::new`](crate::app::Viewer::new).
///
/// | Field                    | Default        |
/// |--------------------------|----------------|
/// | `camera_fov_degrees`     | 75             |
/// | `camera_near`            | 0.1            |
/// | `camera_far`             | 10000          |
/// | `camera_start`           | (0, 0, 10)     |
/// | `jump_duration_seconds`  | 1              |
/// | `jump_offset`            | (0, 2, -5)     |
/// | `catalog_max_distance`   | 50             |
/// | `body_spin_rate`         | 0.12 rad/s     |
/// | `cloud_shell_scale`      | 1.02           |
/// | `label_height_factor`    | 1.5            |
/// | `earth_tilt_degrees`     | -23.4          |
///
/// Missing JSON fields fall back to these defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    // === Camera ===
    /// Vertical field of view in degrees.
    pub camera_fov_degrees: f32,
    pub camera_near: f32,
    pub camera_far: f32,
    /// Initial camera position; the camera starts out looking at the origin.
    pub camera_start: Vec3,

    // === Fly-to ===
    pub jump_duration_seconds: f32,
    /// Where the camera ends up relative to the body it flies to.
    pub jump_offset: Vec3,

    // === Catalog ===
    /// Catalog planets farther than this from the camera start are not loaded.
    pub catalog_max_distance: f32,

    // === Cosmetics ===
    /// Self-rotation of every body about its local Y axis, radians per second.
    pub body_spin_rate: f32,
    /// Scale of the cloud shell added around each planet mesh.
    pub cloud_shell_scale: f32,
    /// Label height above a planet, in planet radii.
    pub label_height_factor: f32,
    /// Axial tilt of the Earth group about Z.
    pub earth_tilt_degrees: f32,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            camera_fov_degrees: 75.0,
            camera_near: 0.1,
            camera_far: 10_000.0,
            camera_start: Vec3::new(0.0, 0.0, 10.0),

            jump_duration_seconds: 1.0,
            jump_offset: Vec3::new(0.0, 2.0, -5.0),

            catalog_max_distance: 50.0,

            body_spin_rate: 0.12,
            cloud_shell_scale: 1.02,
            label_height_factor: 1.5,
            earth_tilt_degrees: -23.4,
        }
    }
}

impl ViewerSettings {
    /// Parses settings from JSON and validates them.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects values the viewer cannot work with. NaN fails every check.
    pub fn validate(&self) -> Result<()> {
        require(
            self.camera_fov_degrees > 0.0 && self.camera_fov_degrees < 180.0,
            "camera_fov_degrees",
            "must be in (0, 180)",
        )?;
        require(self.camera_near > 0.0, "camera_near", "must be positive")?;
        require(
            self.camera_far > self.camera_near,
            "camera_far",
            "must be greater than camera_near",
        )?;
        require(self.camera_start.is_finite(), "camera_start", "must be finite")?;
        require(
            self.jump_duration_seconds >= 0.0,
            "jump_duration_seconds",
            "must not be negative",
        )?;
        require(self.jump_offset.is_finite(), "jump_offset", "must be finite")?;
        require(
            self.catalog_max_distance >= 0.0,
            "catalog_max_distance",
            "must not be negative",
        )?;
        require(self.cloud_shell_scale > 0.0, "cloud_shell_scale", "must be positive")
    }
}

fn require(ok: bool, field: &'static str, reason: &str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(OrreryError::InvalidSetting {
            field,
            reason: reason.to_string(),
        })
    }
}
