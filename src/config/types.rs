//! Configuration type definitions.

use crate::constants::{
    self, DEFAULT_BORING_LABELS, DEFAULT_DEBOUNCE_SECS, DEFAULT_THRESHOLD, DEFAULT_TOP_K,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Detection loop settings.
    pub detection: DetectionConfig,

    /// Camera settings.
    pub camera: CameraConfig,

    /// Inference helper settings.
    pub inference: InferenceConfig,

    /// Output locations.
    pub output: OutputConfig,

    /// LED and buzzer settings.
    pub feedback: FeedbackConfig,

    /// Push button settings for manual capture.
    pub button: ButtonConfig,
}

/// Vision model category.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Bird species classifier.
    #[default]
    Birds,
    /// Insect species classifier.
    Insects,
    /// Plant species classifier.
    Plants,
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Birds => write!(f, "birds"),
            Self::Insects => write!(f, "insects"),
            Self::Plants => write!(f, "plants"),
        }
    }
}

impl std::str::FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "birds" => Ok(Self::Birds),
            "insects" => Ok(Self::Insects),
            "plants" => Ok(Self::Plants),
            other => Err(format!("unknown model: {other}")),
        }
    }
}

/// Detection loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Minimum classification score (inclusive).
    pub threshold: f32,

    /// Maximum number of classes taken from each result.
    pub top_k: usize,

    /// Model to run.
    pub model: ModelKind,

    /// Pause after each accepted detection, in seconds.
    pub debounce_secs: u64,

    /// Labels that never trigger a capture.
    pub boring: Vec<String>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            top_k: DEFAULT_TOP_K,
            model: ModelKind::default(),
            debounce_secs: DEFAULT_DEBOUNCE_SECS,
            boring: DEFAULT_BORING_LABELS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Camera settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Still capture program.
    pub program: String,

    /// Capture width in pixels.
    pub width: u32,

    /// Capture height in pixels.
    pub height: u32,

    /// White balance mode passed to the capture program.
    pub awb: String,

    /// Region of interest as normalized `[x, y, width, height]`.
    pub roi: Option<[f32; 4]>,

    /// Delay before the shutter fires, in milliseconds.
    pub capture_timeout_ms: u64,

    /// Embed the detected species in the image description.
    pub annotate: bool,

    /// Settle time before inference starts, in seconds.
    pub warmup_secs: u64,

    /// Capture a region-of-interest sample when the session opens.
    pub roi_sample: bool,

    /// Extra arguments appended to every capture.
    pub extra_args: Vec<String>,

    /// Preview program and arguments, run for the lifetime of the session.
    pub preview_command: Vec<String>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            program: constants::camera::PROGRAM.to_string(),
            width: constants::camera::WIDTH,
            height: constants::camera::HEIGHT,
            awb: constants::camera::AWB.to_string(),
            roi: None,
            capture_timeout_ms: constants::camera::CAPTURE_TIMEOUT_MS,
            annotate: true,
            warmup_secs: constants::camera::WARMUP_SECS,
            roi_sample: true,
            extra_args: Vec::new(),
            preview_command: Vec::new(),
        }
    }
}

/// Inference helper settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Program that prints one classification result per line.
    pub program: String,

    /// Arguments placed before `--model`.
    pub args: Vec<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            program: constants::inference::PROGRAM.to_string(),
            args: Vec::new(),
        }
    }
}

/// Output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for captured images.
    pub image_dir: PathBuf,

    /// Append-only observation log.
    pub log_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from(constants::output::IMAGE_DIR),
            log_file: PathBuf::from(constants::output::LOG_FILE),
        }
    }
}

/// LED and buzzer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Drive the LED and buzzer at all.
    pub enabled: bool,

    /// Directory holding the `red`, `green` and `blue` LED class devices.
    pub led_root: PathBuf,

    /// Brightness written for a lit channel.
    pub brightness: u32,

    /// PWM channel driving the buzzer, if fitted.
    pub pwm_dir: Option<PathBuf>,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            led_root: PathBuf::from(constants::feedback::LED_ROOT),
            brightness: constants::feedback::BRIGHTNESS,
            pwm_dir: None,
        }
    }
}

/// Push button settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonConfig {
    /// GPIO value file.
    pub value_path: PathBuf,

    /// A `0` reading means pressed.
    pub active_low: bool,

    /// Polling interval in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            value_path: PathBuf::from(constants::button::VALUE_PATH),
            active_low: true,
            poll_interval_ms: constants::button::POLL_INTERVAL_MS,
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_model_kind_from_str() {
        assert_eq!("birds".parse::<ModelKind>().ok(), Some(ModelKind::Birds));
        assert_eq!(
            "Insects".parse::<ModelKind>().ok(),
            Some(ModelKind::Insects)
        );
        assert_eq!("plants".parse::<ModelKind>().ok(), Some(ModelKind::Plants));
        assert!("fungi".parse::<ModelKind>().is_err());
    }

    #[test]
    fn test_model_kind_display() {
        assert_eq!(ModelKind::Birds.to_string(), "birds");
        assert_eq!(ModelKind::Plants.to_string(), "plants");
    }

    #[test]
    fn test_detection_config_default_values() {
        let detection = DetectionConfig::default();
        assert_eq!(detection.threshold, 0.1);
        assert_eq!(detection.top_k, 1);
        assert_eq!(detection.model, ModelKind::Birds);
        assert_eq!(detection.debounce_secs, 20);
        assert!(detection.boring.iter().any(|l| l == "background"));
    }

    #[test]
    fn test_camera_config_default_resolution() {
        let camera = CameraConfig::default();
        assert_eq!((camera.width, camera.height), (1640, 922));
        assert_eq!(camera.program, "rpicam-still");
        assert!(camera.roi.is_none());
    }
}
