//! Scene configuration loaded from YAML.
//!
//! Every section and field has a default, so an empty file (or no file)
//! gives the stock scene.

use carscene_common::{Color, radians};
use carscene_render::OrbitSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fastest accepted motion tick rate.
pub const MAX_TICK_RATE_HZ: u32 = 1000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "carscene".into(),
            width: 1280,
            height: 720,
        }
    }
}

/// Perspective camera placed at `offset` from the car, looking at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub offset: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            offset: [0.0, 50.0, -120.0],
        }
    }
}

/// Orbit controls. Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub min_polar_deg: f32,
    pub max_polar_deg: f32,
    pub enable_pan: bool,
    pub enable_zoom: bool,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            min_polar_deg: 20.0,
            max_polar_deg: 120.0,
            enable_pan: false,
            enable_zoom: false,
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
        }
    }
}

impl ControlsConfig {
    pub fn orbit_settings(&self) -> OrbitSettings {
        OrbitSettings {
            min_polar: radians(self.min_polar_deg),
            max_polar: radians(self.max_polar_deg),
            enable_pan: self.enable_pan,
            enable_zoom: self.enable_zoom,
            enable_damping: self.enable_damping,
            damping_factor: self.damping_factor,
            rotate_speed: self.rotate_speed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowConfig,
    /// Background as `0xRRGGBB`.
    pub clear_color: u32,
    /// Add the directional light and its helper at startup.
    pub lights: bool,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    /// Fixed motion ticks per second.
    pub tick_rate_hz: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            clear_color: 0x0e2255,
            lights: true,
            camera: CameraConfig::default(),
            controls: ControlsConfig::default(),
            tick_rate_hz: 60,
        }
    }
}

impl SceneConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        // an empty document parses as unit, not as an empty map
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded scene config");
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn clear_color(&self) -> Color {
        Color::from_hex(self.clear_color)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.controls;
        if !(0.0..=180.0).contains(&c.min_polar_deg)
            || !(0.0..=180.0).contains(&c.max_polar_deg)
            || c.min_polar_deg > c.max_polar_deg
        {
            return Err(ConfigError::Invalid(format!(
                "polar range {}..{} must lie within 0..180 with min <= max",
                c.min_polar_deg, c.max_polar_deg
            )));
        }
        if !(c.damping_factor > 0.0 && c.damping_factor <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "damping_factor {} must be in (0, 1]",
                c.damping_factor
            )));
        }
        if !(1..=MAX_TICK_RATE_HZ).contains(&self.tick_rate_hz) {
            return Err(ConfigError::Invalid(format!(
                "tick_rate_hz {} must be in 1..={MAX_TICK_RATE_HZ}",
                self.tick_rate_hz
            )));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size {}x{} must be non-zero",
                self.window.width, self.window.height
            )));
        }
        let cam = &self.camera;
        if !(cam.fov > 0.0 && cam.fov < 180.0) {
            return Err(ConfigError::Invalid(format!("fov {} out of range", cam.fov)));
        }
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return Err(ConfigError::Invalid(format!(
                "clip planes near={} far={} must satisfy 0 < near < far",
                cam.near, cam.far
            )));
        }
        if self.clear_color > 0xff_ffff {
            return Err(ConfigError::Invalid(format!(
                "clear_color {:#x} is not an RGB value",
                self.clear_color
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_stock_scene() {
        let config = SceneConfig::default();
        assert_eq!(config.camera.fov, 75.0);
        assert_eq!(config.camera.offset, [0.0, 50.0, -120.0]);
        assert_eq!(config.clear_color, 0x0e2255);
        assert!(config.lights);
        assert!(!config.controls.enable_pan);
        assert!(!config.controls.enable_zoom);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_yaml_gives_defaults() {
        assert_eq!(SceneConfig::from_yaml_str("").unwrap(), SceneConfig::default());
        assert_eq!(SceneConfig::from_yaml_str("{}").unwrap(), SceneConfig::default());
    }

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let yaml = "lights: false\ncamera:\n  fov: 60\ncontrols:\n  enable_zoom: true\n";
        let config = SceneConfig::from_yaml_str(yaml).unwrap();
        assert!(!config.lights);
        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.camera.near, 0.1);
        assert!(config.controls.enable_zoom);
        assert_eq!(config.controls.min_polar_deg, 20.0);
        assert_eq!(config.tick_rate_hz, 60);
    }

    #[test]
    fn inverted_polar_range_rejected() {
        let yaml = "controls:\n  min_polar_deg: 120\n  max_polar_deg: 20\n";
        assert!(matches!(
            SceneConfig::from_yaml_str(yaml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn tick_rate_out_of_range_rejected() {
        for yaml in ["tick_rate_hz: 0", "tick_rate_hz: 10000000"] {
            assert!(matches!(
                SceneConfig::from_yaml_str(yaml),
                Err(ConfigError::Invalid(_))
            ));
        }
        let fastest = format!("tick_rate_hz: {MAX_TICK_RATE_HZ}");
        assert!(SceneConfig::from_yaml_str(&fastest).is_ok());
    }

    #[test]
    fn zero_window_size_rejected() {
        for yaml in ["window:\n  width: 0", "window:\n  height: 0"] {
            assert!(matches!(
                SceneConfig::from_yaml_str(yaml),
                Err(ConfigError::Invalid(_))
            ));
        }
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        assert!(matches!(
            SceneConfig::from_yaml_str("camera: [1, 2"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "window:\n  title: test\n  width: 640\n  height: 480").unwrap();
        drop(file);

        let config = SceneConfig::load(&path).unwrap();
        assert_eq!(config.window.title, "test");
        assert_eq!(config.window.width, 640);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SceneConfig::load(dir.path().join("nope.yaml")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn yaml_round_trip() {
        let config = SceneConfig::default();
        let yaml = config.to_yaml().unwrap();
        assert_eq!(SceneConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn orbit_settings_in_radians() {
        let settings = ControlsConfig::default().orbit_settings();
        assert!((settings.min_polar - radians(20.0)).abs() < 1e-6);
        assert!((settings.max_polar - radians(120.0)).abs() < 1e-6);
        assert!(settings.enable_damping);
    }
}
