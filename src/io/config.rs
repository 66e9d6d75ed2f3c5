use crate::error::{RenderError, Result};
use crate::scene::texture::TextureFilter;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Lighting model used for the main pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ShadingModel {
    /// Per-face normal, diffuse only.
    #[default]
    Flat,
    /// Smoothed normals, diffuse only.
    Lambert,
    /// Smoothed normals, ambient + diffuse + specular.
    Phong,
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub light: LightConfig,
    #[serde(default)]
    pub phong: PhongConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
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
    /// Grayscale dump of the depth buffer; `None` skips it.
    #[serde(default = "default_depth_output")]
    pub depth_output: Option<String>,

    // --- Pipeline ---
    #[serde(default)]
    pub shader: ShadingModel,
    #[serde(default)]
    pub background: [f32; 3],
    #[serde(default)]
    pub texture_filter: TextureFilter,

    // --- Debug ---
    #[serde(default)]
    pub wireframe: bool,
    #[serde(default = "default_wireframe_color")]
    pub wireframe_color: [f32; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            depth_output: default_depth_output(),
            shader: ShadingModel::default(),
            background: [0.0, 0.0, 0.0],
            texture_filter: TextureFilter::default(),
            wireframe: false,
            wireframe_color: default_wireframe_color(),
        }
    }
}

fn default_width() -> usize {
    800
}
fn default_height() -> usize {
    800
}
fn default_output() -> String {
    "output.png".to_string()
}
fn default_depth_output() -> Option<String> {
    Some("zbuffer.png".to_string())
}
fn default_wireframe_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    #[serde(default)]
    pub target: [f32; 3],
    #[serde(default = "default_up")]
    pub up: [f32; 3],
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            target: [0.0, 0.0, 0.0],
            up: default_up(),
            fov: default_fov(),
            near: default_near(),
            far: default_far(),
        }
    }
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 1.0, -1.0]
}
fn default_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}
fn default_fov() -> f32 {
    60.0
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    100.0
}

#[derive(Debug, Deserialize)]
pub struct LightConfig {
    /// Direction the light travels.
    #[serde(default = "default_light_direction")]
    pub direction: [f32; 3],
    #[serde(default = "default_light_color")]
    pub color: [f32; 3],
    #[serde(default = "default_one")]
    pub intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: default_light_direction(),
            color: default_light_color(),
            intensity: default_one(),
        }
    }
}

fn default_light_direction() -> [f32; 3] {
    [0.0, 0.0, -1.0]
}
fn default_light_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}
fn default_one() -> f32 {
    1.0
}

#[derive(Debug, Deserialize)]
pub struct PhongConfig {
    #[serde(default = "default_ambient_strength")]
    pub ambient_strength: f32,
    #[serde(default = "default_specular_strength")]
    pub specular_strength: f32,
    #[serde(default = "default_shininess")]
    pub shininess: f32,
}

impl Default for PhongConfig {
    fn default() -> Self {
        Self {
            ambient_strength: default_ambient_strength(),
            specular_strength: default_specular_strength(),
            shininess: default_shininess(),
        }
    }
}

fn default_ambient_strength() -> f32 {
    0.1
}
fn default_specular_strength() -> f32 {
    0.5
}
fn default_shininess() -> f32 {
    32.0
}

#[derive(Debug, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_path")]
    pub path: String,
    #[serde(default)]
    pub texture: Option<String>,
    /// Recentre and rescale the mesh to fit [-1, 1].
    #[serde(default)]
    pub normalize: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            texture: None,
            normalize: false,
        }
    }
}

fn default_model_path() -> String {
    "assets/cube.obj".to_string()
}

#[derive(Debug, Deserialize)]
pub struct AnimationConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_frames")]
    pub frames: usize,
    #[serde(default = "default_pulse_amplitude")]
    pub pulse_amplitude: f32,
    #[serde(default = "default_pulse_cycles")]
    pub pulse_cycles: f32,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            frames: default_frames(),
            pulse_amplitude: default_pulse_amplitude(),
            pulse_cycles: default_pulse_cycles(),
            output_dir: default_output_dir(),
            prefix: default_prefix(),
        }
    }
}

fn default_frames() -> usize {
    20
}
fn default_pulse_amplitude() -> f32 {
    0.3
}
fn default_pulse_cycles() -> f32 {
    2.0
}
fn default_output_dir() -> String {
    "gif".to_string()
}
fn default_prefix() -> String {
    "frame".to_string()
}

impl AnimationConfig {
    /// Output path of frame `index`: `<output_dir>/<prefix>_<index>.png`.
    pub fn frame_path(&self, index: usize) -> PathBuf {
        Path::new(&self.output_dir).join(format!("{}_{}.png", self.prefix, index))
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| RenderError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.render.width as f32 / self.render.height as f32
    }
}
