//! LED and buzzer feedback.

mod sysfs;

pub use sysfs::SysfsFeedback;

use crate::config::FeedbackConfig;
use crate::error::Result;
use std::time::Duration;
use tracing::warn;

/// Color of the RGB status LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedColor {
    /// All channels off.
    Off,
    /// Red.
    Red,
    /// Green.
    Green,
    /// Blue.
    Blue,
    /// Red and green.
    Yellow,
    /// Green and blue.
    Cyan,
    /// Red and blue.
    Purple,
    /// All channels on.
    White,
}

impl LedColor {
    /// Color shown while the detection loop is watching.
    pub const WATCHING: Self = Self::Blue;
    /// Color shown while a capture is in progress.
    pub const BUSY: Self = Self::Red;
    /// Color shown while waiting for the button.
    pub const READY: Self = Self::Green;

    /// Which of the red, green and blue channels are lit.
    pub const fn channels(self) -> (bool, bool, bool) {
        match self {
            Self::Off => (false, false, false),
            Self::Red => (true, false, false),
            Self::Green => (false, true, false),
            Self::Blue => (false, false, true),
            Self::Yellow => (true, true, false),
            Self::Cyan => (false, true, true),
            Self::Purple => (true, false, true),
            Self::White => (true, true, true),
        }
    }
}

/// A buzzer tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    /// Frequency in Hz.
    pub frequency_hz: u32,
    /// How long the tone plays.
    pub duration: Duration,
}

impl Tone {
    /// Create a tone.
    pub const fn new(frequency_hz: u32, duration: Duration) -> Self {
        Self {
            frequency_hz,
            duration,
        }
    }
}

/// Status LED and buzzer.
pub trait Feedback {
    /// Set the LED color.
    fn set_led(&mut self, color: LedColor) -> Result<()>;

    /// Play a tone, blocking for its duration.
    fn play_tone(&mut self, tone: Tone) -> Result<()>;
}

/// Feedback that does nothing, for boards without the AIY bonnet.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFeedback;

impl Feedback for NullFeedback {
    fn set_led(&mut self, _color: LedColor) -> Result<()> {
        Ok(())
    }

    fn play_tone(&mut self, _tone: Tone) -> Result<()> {
        Ok(())
    }
}

impl<F: Feedback + ?Sized> Feedback for Box<F> {
    fn set_led(&mut self, color: LedColor) -> Result<()> {
        (**self).set_led(color)
    }

    fn play_tone(&mut self, tone: Tone) -> Result<()> {
        (**self).play_tone(tone)
    }
}

/// Build the configured feedback backend.
pub fn from_config(config: &FeedbackConfig) -> Box<dyn Feedback> {
    if config.enabled {
        Box::new(SysfsFeedback::new(config))
    } else {
        Box::new(NullFeedback)
    }
}

/// Feedback is optional; failures are logged and otherwise ignored.
pub fn set_led_or_warn<F: Feedback + ?Sized>(feedback: &mut F, color: LedColor) {
    if let Err(e) = feedback.set_led(color) {
        warn!("Failed to set LED to {color:?}: {e}");
    }
}

/// Play a tone, logging failures.
pub fn play_tone_or_warn<F: Feedback + ?Sized>(feedback: &mut F, tone: Tone) {
    if let Err(e) = feedback.play_tone(tone) {
        warn!("Failed to play {} Hz tone: {e}", tone.frequency_hz);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_led_channels() {
        assert_eq!(LedColor::Off.channels(), (false, false, false));
        assert_eq!(LedColor::Yellow.channels(), (true, true, false));
        assert_eq!(LedColor::WATCHING.channels(), (false, false, true));
    }

    #[test]
    fn test_disabled_config_gives_null_feedback() {
        let config = FeedbackConfig::default();
        let mut feedback = from_config(&config);
        assert!(feedback.set_led(LedColor::Red).is_ok());
        assert!(
            feedback
                .play_tone(Tone::new(440, Duration::from_millis(1)))
                .is_ok()
        );
    }
}
