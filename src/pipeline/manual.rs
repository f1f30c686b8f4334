//! Button-triggered capture without inference.

use crate::button::{Button, wait_for};
use crate::camera::Camera;
use crate::error::Result;
use crate::feedback::{Feedback, LedColor, set_led_or_warn};
use crate::output::{Clock, ensure_dir, manual_image_name, unique_path};
use crate::pipeline::Session;
use crate::shutdown::Pause;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Settings for manual capture.
#[derive(Debug, Clone)]
pub struct ManualSettings {
    /// Directory for captured images.
    pub image_dir: PathBuf,
    /// Button polling interval.
    pub poll_interval: Duration,
}

/// Take a picture each time the button is pressed and released.
///
/// The LED shows busy while the button is held and returns to ready after
/// the capture. Returns the number of pictures taken once shutdown is
/// requested.
pub fn run_manual<B, C, F, P, K>(
    settings: &ManualSettings,
    button: &mut B,
    camera: C,
    feedback: F,
    pause: &P,
    clock: &K,
) -> Result<usize>
where
    B: Button + ?Sized,
    C: Camera,
    F: Feedback,
    P: Pause + ?Sized,
    K: Clock + ?Sized,
{
    ensure_dir(&settings.image_dir)?;

    let mut session = Session::open(camera, feedback, LedColor::READY)?;
    let (camera, feedback) = session.parts();
    let mut captured = 0;

    info!("Press the button to take a picture");
    loop {
        if !wait_for(button, pause, true, settings.poll_interval)? {
            break;
        }
        set_led_or_warn(feedback, LedColor::BUSY);

        if !wait_for(button, pause, false, settings.poll_interval)? {
            break;
        }
        let path = unique_path(&settings.image_dir, &manual_image_name(clock.now()));
        match camera.capture(&path) {
            Ok(()) => captured += 1,
            Err(e) if pause.stopping() => {
                warn!("Capture interrupted by shutdown: {e}");
                break;
            }
            Err(e) => return Err(e),
        }
        info!("Saved {}", path.display());

        set_led_or_warn(feedback, LedColor::READY);
    }

    Ok(captured)
}
