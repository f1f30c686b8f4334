//! Peripheral session held for the lifetime of a run.

use crate::camera::Camera;
use crate::constants::feedback::{START_TONE_HZ, STOP_TONE_HZ, TONE_MS};
use crate::error::Result;
use crate::feedback::{Feedback, LedColor, Tone, play_tone_or_warn, set_led_or_warn};
use std::time::Duration;
use tracing::{debug, warn};

/// Owns the camera and feedback peripheral while a run is active.
///
/// Opening starts the preview and lights the LED; dropping stops the
/// preview and turns the LED off, on every exit path.
pub struct Session<C: Camera, F: Feedback> {
    camera: C,
    feedback: F,
}

impl<C: Camera, F: Feedback> Session<C, F> {
    /// Start the preview and signal that the run has begun.
    pub fn open(mut camera: C, mut feedback: F, idle_color: LedColor) -> Result<Self> {
        camera.start_preview()?;
        set_led_or_warn(&mut feedback, idle_color);
        play_tone_or_warn(
            &mut feedback,
            Tone::new(START_TONE_HZ, Duration::from_millis(TONE_MS)),
        );
        debug!("Session opened");
        Ok(Self { camera, feedback })
    }

    /// Borrow the camera and feedback together.
    pub fn parts(&mut self) -> (&mut C, &mut F) {
        (&mut self.camera, &mut self.feedback)
    }
}

impl<C: Camera, F: Feedback> Drop for Session<C, F> {
    fn drop(&mut self) {
        if let Err(e) = self.camera.stop_preview() {
            warn!("Failed to stop camera preview: {e}");
        }
        set_led_or_warn(&mut self.feedback, LedColor::Off);
        play_tone_or_warn(
            &mut self.feedback,
            Tone::new(STOP_TONE_HZ, Duration::from_millis(TONE_MS)),
        );
        debug!("Session closed");
    }
}
