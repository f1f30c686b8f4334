//! Feedback through Linux sysfs LED and PWM class devices.

use crate::config::FeedbackConfig;
use crate::error::{Error, Result};
use crate::feedback::{Feedback, LedColor, Tone};
use std::path::{Path, PathBuf};
use tracing::debug;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// RGB LED under `<led_root>/{red,green,blue}` and an optional PWM buzzer.
///
/// The PWM channel must already be exported.
pub struct SysfsFeedback {
    led_root: PathBuf,
    brightness: u32,
    pwm_dir: Option<PathBuf>,
}

impl SysfsFeedback {
    /// Create from configuration.
    pub fn new(config: &FeedbackConfig) -> Self {
        Self {
            led_root: config.led_root.clone(),
            brightness: config.brightness,
            pwm_dir: config.pwm_dir.clone(),
        }
    }

    fn write_led(&self, channel: &str, lit: bool) -> Result<()> {
        let value = if lit { self.brightness } else { 0 };
        write_attr(
            &self.led_root.join(channel).join("brightness"),
            &value.to_string(),
        )
    }
}

impl Feedback for SysfsFeedback {
    fn set_led(&mut self, color: LedColor) -> Result<()> {
        let (red, green, blue) = color.channels();
        debug!("LED -> {color:?}");
        self.write_led("red", red)?;
        self.write_led("green", green)?;
        self.write_led("blue", blue)
    }

    fn play_tone(&mut self, tone: Tone) -> Result<()> {
        let Some(pwm) = &self.pwm_dir else {
            debug!("No buzzer configured, skipping tone");
            return Ok(());
        };
        if tone.frequency_hz == 0 {
            return Ok(());
        }

        let period = NANOS_PER_SEC / u64::from(tone.frequency_hz);
        // Lower the duty cycle first; the kernel rejects duty > period.
        write_attr(&pwm.join("duty_cycle"), "0")?;
        write_attr(&pwm.join("period"), &period.to_string())?;
        write_attr(&pwm.join("duty_cycle"), &(period / 2).to_string())?;
        write_attr(&pwm.join("enable"), "1")?;
        std::thread::sleep(tone.duration);
        write_attr(&pwm.join("enable"), "0")
    }
}

fn write_attr(path: &Path, value: &str) -> Result<()> {
    std::fs::write(path, value).map_err(|e| Error::Feedback {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn led_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        for channel in ["red", "green", "blue"] {
            fs::create_dir(dir.path().join(channel)).unwrap();
        }
        dir
    }

    fn read(path: PathBuf) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_set_led_writes_each_channel() {
        let dir = led_tree();
        let config = FeedbackConfig {
            enabled: true,
            led_root: dir.path().to_path_buf(),
            brightness: 1,
            pwm_dir: None,
        };
        let mut feedback = SysfsFeedback::new(&config);

        feedback.set_led(LedColor::Purple).unwrap();
        assert_eq!(read(dir.path().join("red/brightness")), "1");
        assert_eq!(read(dir.path().join("green/brightness")), "0");
        assert_eq!(read(dir.path().join("blue/brightness")), "1");

        feedback.set_led(LedColor::Off).unwrap();
        assert_eq!(read(dir.path().join("red/brightness")), "0");
    }

    #[test]
    fn test_missing_led_is_an_error() {
        let config = FeedbackConfig {
            enabled: true,
            led_root: PathBuf::from("/nonexistent/leds"),
            ..FeedbackConfig::default()
        };
        let mut feedback = SysfsFeedback::new(&config);
        assert!(matches!(
            feedback.set_led(LedColor::Red),
            Err(Error::Feedback { .. })
        ));
    }

    #[test]
    fn test_tone_programs_pwm_and_disables_it() {
        let dir = TempDir::new().unwrap();
        let config = FeedbackConfig {
            enabled: true,
            pwm_dir: Some(dir.path().to_path_buf()),
            ..FeedbackConfig::default()
        };
        let mut feedback = SysfsFeedback::new(&config);

        feedback
            .play_tone(Tone::new(1000, Duration::from_millis(1)))
            .unwrap();
        assert_eq!(read(dir.path().join("period")), "1000000");
        assert_eq!(read(dir.path().join("duty_cycle")), "500000");
        assert_eq!(read(dir.path().join("enable")), "0");
    }

    #[test]
    fn test_tone_without_buzzer_is_noop() {
        let config = FeedbackConfig::default();
        let mut feedback = SysfsFeedback::new(&config);
        assert!(
            feedback
                .play_tone(Tone::new(440, Duration::from_millis(1)))
                .is_ok()
        );
    }
}
