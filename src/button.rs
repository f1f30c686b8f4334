//! Push button input for manual capture.

use crate::config::ButtonConfig;
use crate::error::{Error, Result};
use crate::shutdown::Pause;
use std::path::PathBuf;
use std::time::Duration;

/// A momentary push button.
pub trait Button {
    /// Current state of the button.
    fn is_pressed(&mut self) -> Result<bool>;
}

/// Button read from a sysfs GPIO `value` file.
pub struct SysfsButton {
    value_path: PathBuf,
    active_low: bool,
}

impl SysfsButton {
    /// Create from configuration. The GPIO must already be exported as an input.
    pub fn new(config: &ButtonConfig) -> Self {
        Self {
            value_path: config.value_path.clone(),
            active_low: config.active_low,
        }
    }
}

impl Button for SysfsButton {
    fn is_pressed(&mut self) -> Result<bool> {
        let raw = std::fs::read_to_string(&self.value_path).map_err(|e| Error::ButtonRead {
            path: self.value_path.clone(),
            source: e,
        })?;
        let high = match raw.trim() {
            "1" => true,
            "0" => false,
            other => {
                return Err(Error::ButtonValue {
                    path: self.value_path.clone(),
                    value: other.to_string(),
                });
            }
        };
        Ok(high != self.active_low)
    }
}

/// Poll until the button reaches `pressed`.
///
/// Returns `Ok(false)` if shutdown was requested first.
pub fn wait_for<B, P>(button: &mut B, pause: &P, pressed: bool, poll: Duration) -> Result<bool>
where
    B: Button + ?Sized,
    P: Pause + ?Sized,
{
    loop {
        if pause.stopping() {
            return Ok(false);
        }
        if button.is_pressed()? == pressed {
            return Ok(true);
        }
        if !pause.pause(poll) {
            return Ok(false);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::shutdown::Shutdown;
    use std::collections::VecDeque;
    use tempfile::NamedTempFile;

    struct Scripted(VecDeque<bool>);

    impl Button for Scripted {
        fn is_pressed(&mut self) -> Result<bool> {
            Ok(self.0.pop_front().unwrap_or(false))
        }
    }

    fn sysfs(value: &str, active_low: bool) -> (NamedTempFile, SysfsButton) {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), value).unwrap();
        let button = SysfsButton::new(&ButtonConfig {
            value_path: file.path().to_path_buf(),
            active_low,
            poll_interval_ms: 1,
        });
        (file, button)
    }

    #[test]
    fn test_active_low_reading() {
        let (_file, mut button) = sysfs("0\n", true);
        assert!(button.is_pressed().unwrap());
        let (_file, mut button) = sysfs("1\n", true);
        assert!(!button.is_pressed().unwrap());
    }

    #[test]
    fn test_active_high_reading() {
        let (_file, mut button) = sysfs("1\n", false);
        assert!(button.is_pressed().unwrap());
    }

    #[test]
    fn test_garbage_value_is_an_error() {
        let (_file, mut button) = sysfs("x\n", true);
        assert!(matches!(
            button.is_pressed(),
            Err(Error::ButtonValue { .. })
        ));
    }

    #[test]
    fn test_wait_for_press_polls_until_pressed() {
        let mut button = Scripted(VecDeque::from([false, false, true]));
        let shutdown = Shutdown::new();
        let reached = wait_for(&mut button, &shutdown, true, Duration::from_millis(1)).unwrap();
        assert!(reached);
        assert!(button.0.is_empty());
    }

    #[test]
    fn test_wait_for_stops_on_shutdown() {
        let mut button = Scripted(VecDeque::new());
        let shutdown = Shutdown::new();
        shutdown.trigger();
        let reached = wait_for(&mut button, &shutdown, true, Duration::from_millis(1)).unwrap();
        assert!(!reached);
    }
}
