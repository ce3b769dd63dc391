use crate::error::Result;
use log::info;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default = "default_lights")]
    pub lights: Vec<LightConfig>,
    #[serde(default = "default_objects")]
    pub objects: Vec<ObjectConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            camera: CameraConfig::default(),
            lights: default_lights(),
            objects: default_objects(),
        }
    }
}

fn default_lights() -> Vec<LightConfig> {
    vec![
        LightConfig {
            r#type: "directional".to_string(),
            position: [5.0, 1.5, 0.5],
            intensity: [255, 0, 0],
            ..LightConfig::default()
        },
        LightConfig {
            r#type: "ambient".to_string(),
            intensity: [100, 100, 100],
            ..LightConfig::default()
        },
        LightConfig {
            r#type: "point".to_string(),
            position: [-5.0, 1.5, 0.1],
            intensity: [0, 0, 255],
            ..LightConfig::default()
        },
    ]
}

fn default_objects() -> Vec<ObjectConfig> {
    vec![
        ObjectConfig {
            position: [0.0, 0.0, 0.3],
            spin: 1.0,
            ..ObjectConfig::default()
        },
        ObjectConfig {
            position: [0.0, -0.5, 1.5],
            pulse: true,
            ..ObjectConfig::default()
        },
    ]
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    // --- Output ---
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_background")]
    pub background: [u8; 3],

    // --- Pipeline ---
    /// Draw mode name, used when `display_mode` is not set.
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Index into the fifteen display modes; overrides `mode`.
    #[serde(default)]
    pub display_mode: Option<usize>,
    /// Animation frames to advance before the captured frame.
    #[serde(default)]
    pub frames: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            background: default_background(),
            mode: default_mode(),
            display_mode: None,
            frames: 0,
        }
    }
}

fn default_width() -> usize {
    640
}
fn default_height() -> usize {
    480
}
fn default_output() -> String {
    "output.png".to_string()
}
fn default_background() -> [u8; 3] {
    [70, 130, 180]
}
fn default_mode() -> String {
    "gouraud".to_string()
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    /// Euler angles in radians.
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            rotation: [0.0; 3],
            position: default_camera_position(),
        }
    }
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 0.5, -3.0]
}

#[derive(Debug, Deserialize)]
pub struct LightConfig {
    /// `ambient`, `directional`, `point` or `spot`.
    pub r#type: String,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default = "default_intensity")]
    pub intensity: [u8; 3],
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_attenuation")]
    pub attenuation: [f32; 3],
    #[serde(default = "default_inner_angle")]
    pub inner_angle: f32,
    #[serde(default = "default_outer_angle")]
    pub outer_angle: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            r#type: "ambient".to_string(),
            position: [0.0; 3],
            intensity: default_intensity(),
            enabled: true,
            attenuation: default_attenuation(),
            inner_angle: default_inner_angle(),
            outer_angle: default_outer_angle(),
        }
    }
}

fn default_intensity() -> [u8; 3] {
    [255, 255, 255]
}
fn default_attenuation() -> [f32; 3] {
    [0.0, 0.1, 0.0]
}
fn default_inner_angle() -> f32 {
    0.3
}
fn default_outer_angle() -> f32 {
    0.6
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct ObjectConfig {
    /// OBJ file; the built-in cube is used when absent.
    #[serde(default)]
    pub path: Option<String>,

    // --- Surface ---
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub normal_map: Option<String>,
    #[serde(default = "default_true")]
    pub normal_map_enabled: bool,
    #[serde(default = "default_reflection")]
    pub reflection: [f32; 3],

    // --- Transform ---
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],

    // --- Animation ---
    #[serde(default)]
    pub spin: f32,
    #[serde(default)]
    pub pulse: bool,
}

impl Default for ObjectConfig {
    fn default() -> Self {
        Self {
            path: None,
            texture: None,
            normal_map: None,
            normal_map_enabled: true,
            reflection: default_reflection(),
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: default_scale(),
            spin: 0.0,
            pulse: false,
        }
    }
}

fn default_reflection() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}
fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading config '{}'", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
