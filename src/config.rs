//! Server configuration from environment variables.
//!
//! | Variable                 | Default              |
//! |--------------------------|----------------------|
//! | `PORT`                   | 3000                 |
//! | `MODEL_PATH`             | unset (static stub)  |
//! | `CLASS_NAMES`            | model metadata       |
//! | `MODEL_INPUT_SIZE`       | 640                  |
//! | `CONFIDENCE_THRESHOLD`   | 0.25                 |
//! | `IOU_THRESHOLD`          | 0.45                 |
//! | `DETECTION_TIMEOUT_SECS` | 30                   |
//! | `MAX_UPLOAD_BYTES`       | 10 MiB               |
//! | `BACKGROUND_IMAGE`       | cotton_bg.jpg        |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_INPUT_SIZE: u32 = 640;
const DEFAULT_CONFIDENCE: f32 = 0.25;
const DEFAULT_IOU: f32 = 0.45;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_BACKGROUND: &str = "cotton_bg.jpg";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} has invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub model_path: Option<PathBuf>,
    /// Overrides the class table embedded in the model
    pub class_names: Option<Vec<String>>,
    pub model_input_size: u32,
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    pub detection_timeout: Duration,
    pub max_upload_bytes: usize,
    pub background_image: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            model_path: None,
            class_names: None,
            model_input_size: DEFAULT_INPUT_SIZE,
            confidence_threshold: DEFAULT_CONFIDENCE,
            iou_threshold: DEFAULT_IOU,
            detection_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            background_image: PathBuf::from(DEFAULT_BACKGROUND),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any key lookup; unset or empty keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(v) = get("PORT") {
            config.port = parse("PORT", &v)?;
        }
        if let Some(v) = get("MODEL_PATH") {
            config.model_path = Some(PathBuf::from(v));
        }
        if let Some(v) = get("CLASS_NAMES") {
            let names: Vec<String> = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if names.is_empty() {
                return Err(invalid("CLASS_NAMES", &v, "no class names given"));
            }
            config.class_names = Some(names);
        }
        if let Some(v) = get("MODEL_INPUT_SIZE") {
            let size: u32 = parse("MODEL_INPUT_SIZE", &v)?;
            if size == 0 || size % 32 != 0 {
                return Err(invalid("MODEL_INPUT_SIZE", &v, "must be a positive multiple of 32"));
            }
            config.model_input_size = size;
        }
        if let Some(v) = get("CONFIDENCE_THRESHOLD") {
            config.confidence_threshold = parse_unit("CONFIDENCE_THRESHOLD", &v)?;
        }
        if let Some(v) = get("IOU_THRESHOLD") {
            config.iou_threshold = parse_unit("IOU_THRESHOLD", &v)?;
        }
        if let Some(v) = get("DETECTION_TIMEOUT_SECS") {
            let secs: u64 = parse("DETECTION_TIMEOUT_SECS", &v)?;
            if secs == 0 {
                return Err(invalid("DETECTION_TIMEOUT_SECS", &v, "must be at least 1"));
            }
            config.detection_timeout = Duration::from_secs(secs);
        }
        if let Some(v) = get("MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = parse("MAX_UPLOAD_BYTES", &v)?;
        }
        if let Some(v) = get("BACKGROUND_IMAGE") {
            config.background_image = PathBuf::from(v);
        }

        Ok(config)
    }
}

fn invalid(name: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| invalid(name, value, e.to_string()))
}

fn parse_unit(name: &'static str, value: &str) -> Result<f32, ConfigError> {
    let v: f32 = parse(name, value)?;
    if !(0.0..=1.0).contains(&v) {
        return Err(invalid(name, value, "must be between 0 and 1"));
    }
    Ok(v)
}
