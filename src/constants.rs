//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "birdwatch";

/// Default minimum classification score for a detection to count.
pub const DEFAULT_THRESHOLD: f32 = 0.1;

/// Default number of classes taken from each inference result.
pub const DEFAULT_TOP_K: usize = 1;

/// Default pause after an accepted detection, in seconds.
///
/// Keeps a bird that stays on the feeder from filling the card with
/// near-identical pictures.
pub const DEFAULT_DEBOUNCE_SECS: u64 = 20;

/// Labels that never trigger a capture.
///
/// The feeder itself classifies as a turkey surprisingly often.
pub const DEFAULT_BORING_LABELS: &[&str] = &["Meleagris gallopavo (Wild Turkey)", "background"];

/// Timestamp format used in log lines and image file names (`YY-MM-DD_HH-MM-SS`).
pub const TIMESTAMP_FORMAT: &str = "%y-%m-%d_%H-%M-%S";

/// Decimal places for the score in observation log lines.
pub const LOG_SCORE_DECIMALS: usize = 6;

/// Image file extension for captures.
pub const IMAGE_EXTENSION: &str = "jpg";

/// Classification score bounds.
pub mod score {
    /// Minimum valid score.
    pub const MIN: f32 = 0.0;
    /// Maximum valid score.
    pub const MAX: f32 = 1.0;
}

/// Camera defaults, matching sensor mode 4 of the v2 camera module.
pub mod camera {
    /// Still capture program shipped with Raspberry Pi OS.
    pub const PROGRAM: &str = "rpicam-still";
    /// Capture width in pixels.
    pub const WIDTH: u32 = 1640;
    /// Capture height in pixels.
    pub const HEIGHT: u32 = 922;
    /// Automatic white balance mode.
    pub const AWB: &str = "auto";
    /// Delay before the shutter fires, in milliseconds.
    pub const CAPTURE_TIMEOUT_MS: u64 = 1;
    /// Settle time between opening the session and starting inference, in seconds.
    pub const WARMUP_SECS: u64 = 2;
    /// File name of the region-of-interest sample taken at session start.
    pub const ROI_SAMPLE_NAME: &str = "ROI_sample.jpg";
}

/// Inference helper defaults.
pub mod inference {
    /// Program that runs the vision model and prints JSON lines.
    pub const PROGRAM: &str = "birdwatch-infer";
}

/// Output location defaults.
pub mod output {
    /// Directory for captured images.
    pub const IMAGE_DIR: &str = "birdimages";
    /// Observation log path.
    pub const LOG_FILE: &str = "birdimages/birdlist.txt";
}

/// Feedback peripheral defaults.
pub mod feedback {
    /// Root of the LED class devices.
    pub const LED_ROOT: &str = "/sys/class/leds";
    /// Brightness written for a lit LED channel.
    pub const BRIGHTNESS: u32 = 255;
    /// Start-of-session tone frequency in Hz.
    pub const START_TONE_HZ: u32 = 880;
    /// End-of-session tone frequency in Hz.
    pub const STOP_TONE_HZ: u32 = 440;
    /// Tone length in milliseconds.
    pub const TONE_MS: u64 = 150;
}

/// Push button defaults.
pub mod button {
    /// GPIO value file of the AIY kit button.
    pub const VALUE_PATH: &str = "/sys/class/gpio/gpio23/value";
    /// Polling interval in milliseconds.
    pub const POLL_INTERVAL_MS: u64 = 20;
}
