use crate::scene::{default_lights, Light};
use std::path::Path;

pub const CONFIG_ENV_VAR: &str = "PHONEVIEW_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("camera distance range [{min}, {max}] does not contain default {default}")]
    DistanceRange { min: f32, max: f32, default: f32 },
    #[error("light {index} has negative intensity {intensity}")]
    LightIntensity { index: usize, intensity: f32 },
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub default_distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub zoom_step: f32,
    /// Yaw applied to the active model per rotate button press, in radians.
    pub rotate_step: f32,
    pub rotate_speed: f32,
    pub damping_factor: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 75.0,
            near: 0.1,
            far: 1000.0,
            default_distance: 5.0,
            min_distance: 2.0,
            max_distance: 10.0,
            zoom_step: 0.5,
            rotate_step: std::f32::consts::FRAC_PI_4,
            rotate_speed: 0.7,
            damping_factor: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window_title: String,
    pub window_size: [u32; 2],
    pub background: [f32; 3],
    pub panel_width: f32,
    pub camera: CameraConfig,
    pub lights: Vec<Light>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_title: "Phone Showcase".to_string(),
            window_size: [1280, 720],
            // #ecf0f1
            background: [0.925, 0.941, 0.945],
            panel_width: 320.0,
            camera: CameraConfig::default(),
            lights: default_lights(),
        }
    }
}

impl ViewerConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: ViewerConfig =
            serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the file named by `PHONEVIEW_CONFIG`, or defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let camera = &self.camera;
        if !(camera.min_distance <= camera.default_distance
            && camera.default_distance <= camera.max_distance)
        {
            return Err(ConfigError::DistanceRange {
                min: camera.min_distance,
                max: camera.max_distance,
                default: camera.default_distance,
            });
        }
        for (index, light) in self.lights.iter().enumerate() {
            if !(light.intensity() >= 0.0) {
                return Err(ConfigError::LightIntensity {
                    index,
                    intensity: light.intensity(),
                });
            }
        }
        Ok(())
    }
}
