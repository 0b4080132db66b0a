//! Configuration file handling for signlens.
//!
//! Loads configuration from `<config dir>/signlens/config.toml` or a custom path.
//! Every field has a default, so an absent file means the built-in defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::camera::{CameraConstraints, FacingMode, Resolution};
use crate::input::{InputLimits, DEFAULT_MAX_BYTES};
use crate::preprocess::{PreprocessOptions, DEFAULT_SCALE, DEFAULT_THRESHOLD};
use crate::services::{
    DEFAULT_BACKEND_URL, DEFAULT_TARGET_LANGUAGE, QUICK_TRANSLATE_BASE_URL,
    TRANSLATE_API_BASE_URL,
};

/// Configuration file structure for signlens.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub preprocess: PreprocessConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub translate: TranslateConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    #[serde(default)]
    pub device: u32,
    /// "environment", "user" or "any"
    #[serde(default = "default_facing")]
    pub facing: String,
    #[serde(default)]
    pub mirror: bool,
    /// Size assumed for streams that don't report one
    #[serde(default = "default_fallback_width")]
    pub fallback_width: u32,
    #[serde(default = "default_fallback_height")]
    pub fallback_height: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: 0,
            facing: default_facing(),
            mirror: false,
            fallback_width: default_fallback_width(),
            fallback_height: default_fallback_height(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PreprocessConfig {
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default = "default_threshold")]
    pub threshold: u8,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            threshold: default_threshold(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TranslateConfig {
    #[serde(default = "default_target_language")]
    pub default_target: String,
    #[serde(default = "default_translate_api_url")]
    pub api_url: String,
    #[serde(default = "default_quick_translate_url")]
    pub quick_url: String,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            default_target: default_target_language(),
            api_url: default_translate_api_url(),
            quick_url: default_quick_translate_url(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct StorageConfig {
    /// Settings store file, defaults to the platform data dir
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_facing() -> String {
    "environment".to_string()
}

fn default_fallback_width() -> u32 {
    Resolution::VGA.width
}

fn default_fallback_height() -> u32 {
    Resolution::VGA.height
}

fn default_scale() -> f64 {
    DEFAULT_SCALE
}

fn default_threshold() -> u8 {
    DEFAULT_THRESHOLD
}

fn default_max_bytes() -> u64 {
    DEFAULT_MAX_BYTES
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_target_language() -> String {
    DEFAULT_TARGET_LANGUAGE.to_string()
}

fn default_translate_api_url() -> String {
    TRANSLATE_API_BASE_URL.to_string()
}

fn default_quick_translate_url() -> String {
    QUICK_TRANSLATE_BASE_URL.to_string()
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            Self::parse(&content, &path)
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }

    /// Parse configuration text; `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn camera_constraints(&self) -> CameraConstraints {
        let facing = FacingMode::from_str(&self.camera.facing).unwrap_or_else(|| {
            log::warn!(
                "Unknown camera facing '{}', using environment",
                self.camera.facing
            );
            FacingMode::Environment
        });
        CameraConstraints {
            device_index: self.camera.device,
            facing,
            resolution: None,
            mirror: self.camera.mirror,
        }
    }

    pub fn fallback_resolution(&self) -> Resolution {
        Resolution::new(self.camera.fallback_width, self.camera.fallback_height)
    }

    pub fn preprocess_options(&self) -> PreprocessOptions {
        PreprocessOptions {
            scale: self.preprocess.scale,
            threshold: self.preprocess.threshold,
        }
    }

    pub fn input_limits(&self) -> InputLimits {
        InputLimits {
            max_bytes: self.upload.max_bytes,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", path.display())]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("signlens").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/signlens/config.toml")
        })
}

/// Contents written by `config init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# signlens configuration

[camera]
# Camera device index
device = 0
# Preferred camera: environment (rear), user (front), any
facing = "environment"
# Mirror captured photos horizontally
mirror = false
# Photo size used when the camera doesn't report its resolution
fallback_width = 640
fallback_height = 480

[preprocess]
# Resampling factor applied before binarization
scale = 1.3
# Pixels whose channel mean is <= threshold become black
threshold = 140

[upload]
# Largest accepted image, in bytes (10 MiB)
max_bytes = 10485760

[backend]
# Recognition backend (road signs, sign language, speech)
url = "http://localhost:5050"

[translate]
# Target language when none is chosen
default_target = "ms"
# The API key is read from GOOGLE_TRANSLATE_API_KEY
api_url = "https://translation.googleapis.com"
quick_url = "https://translate.googleapis.com"

[storage]
# Settings store file (default: platform data dir)
# path = "/path/to/storage.json"
"#;
