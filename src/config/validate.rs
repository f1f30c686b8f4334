//! Configuration validation.

use crate::config::Config;
use crate::constants::score;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_detection(config)?;
    validate_camera(config)?;

    if config.inference.program.trim().is_empty() {
        return Err(invalid("inference.program must not be empty"));
    }

    if config.button.poll_interval_ms == 0 {
        return Err(invalid("button.poll_interval_ms must be at least 1"));
    }

    Ok(())
}

/// Validate detection loop settings.
fn validate_detection(config: &Config) -> Result<()> {
    let detection = &config.detection;

    // Zero would accept every class the model knows about.
    if !(detection.threshold > score::MIN && detection.threshold <= score::MAX) {
        return Err(invalid(format!(
            "threshold must be greater than {} and at most {}, got {}",
            score::MIN,
            score::MAX,
            detection.threshold
        )));
    }

    if detection.top_k == 0 {
        return Err(invalid("top_k must be at least 1"));
    }

    Ok(())
}

/// Validate camera settings.
fn validate_camera(config: &Config) -> Result<()> {
    let camera = &config.camera;

    if camera.program.trim().is_empty() {
        return Err(invalid("camera.program must not be empty"));
    }

    if camera.width == 0 || camera.height == 0 {
        return Err(invalid(format!(
            "camera resolution must be non-zero, got {}x{}",
            camera.width, camera.height
        )));
    }

    if let Some(roi) = camera.roi
        && roi.iter().any(|v| !(0.0..=1.0).contains(v))
    {
        return Err(invalid(format!(
            "camera.roi components must be between 0.0 and 1.0, got {roi:?}"
        )));
    }

    Ok(())
}

fn invalid(message: impl Into<String>) -> Error {
    Error::ConfigValidation {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_threshold() {
        let mut config = Config::default();
        config.detection.threshold = 0.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_threshold_of_one_is_allowed() {
        let mut config = Config::default();
        config.detection.threshold = 1.0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_threshold_above_one() {
        let mut config = Config::default();
        config.detection.threshold = 1.5;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_top_k() {
        let mut config = Config::default();
        config.detection.top_k = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_roi_out_of_range() {
        let mut config = Config::default();
        config.camera.roi = Some([0.0, 0.0, 1.2, 0.5]);
        assert!(matches!(
            validate_config(&config),
            Err(Error::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_validate_empty_inference_program() {
        let mut config = Config::default();
        config.inference.program = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_poll_interval() {
        let mut config = Config::default();
        config.button.poll_interval_ms = 0;
        assert!(validate_config(&config).is_err());
    }
}
