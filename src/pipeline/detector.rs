//! The detection loop: classify, filter, log, capture, debounce.

use crate::camera::Camera;
use crate::config::Config;
use crate::constants::camera::ROI_SAMPLE_NAME;
use crate::error::Result;
use crate::feedback::{Feedback, LedColor, set_led_or_warn};
use crate::inference::{Classification, ClassificationResult};
use crate::output::{
    Clock, Observation, ObservationLog, SpeciesName, detection_image_name, ensure_dir,
    unique_path,
};
use crate::pipeline::{BoringSet, Session, select_top};
use crate::shutdown::Pause;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Settings for one detection run.
#[derive(Debug, Clone)]
pub struct DetectionSettings {
    /// Minimum score, inclusive.
    pub threshold: f32,
    /// Maximum classes considered per result.
    pub top_k: usize,
    /// Pause after each accepted detection.
    pub debounce: Duration,
    /// Labels that never trigger a capture.
    pub boring: BoringSet,
    /// Directory for captured images.
    pub image_dir: PathBuf,
    /// Capture a region-of-interest sample when the session opens.
    pub roi_sample: bool,
    /// Settle time between opening the session and starting inference.
    pub warmup: Duration,
}

impl DetectionSettings {
    /// Settings from a loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            threshold: config.detection.threshold,
            top_k: config.detection.top_k,
            debounce: Duration::from_secs(config.detection.debounce_secs),
            boring: config.detection.boring.iter().cloned().collect(),
            image_dir: config.output.image_dir.clone(),
            roi_sample: config.camera.roi_sample,
            warmup: Duration::from_secs(config.camera.warmup_secs),
        }
    }
}

/// Counters reported when a run ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    /// Inference results consumed.
    pub results: usize,
    /// Detections logged and captured.
    pub detections: usize,
    /// Selected classes skipped because they were boring.
    pub skipped_boring: usize,
    /// The run ended because shutdown was requested.
    pub interrupted: bool,
}

/// Processes inference results against one camera and log.
pub struct DetectionLoop<'a, C, F, P, K>
where
    C: Camera + ?Sized,
    F: Feedback + ?Sized,
    P: Pause + ?Sized,
    K: Clock + ?Sized,
{
    settings: &'a DetectionSettings,
    camera: &'a mut C,
    feedback: &'a mut F,
    log: &'a ObservationLog,
    pause: &'a P,
    clock: &'a K,
    idle_color: LedColor,
    summary: LoopSummary,
}

impl<'a, C, F, P, K> DetectionLoop<'a, C, F, P, K>
where
    C: Camera + ?Sized,
    F: Feedback + ?Sized,
    P: Pause + ?Sized,
    K: Clock + ?Sized,
{
    /// Create a loop over borrowed collaborators.
    pub fn new(
        settings: &'a DetectionSettings,
        camera: &'a mut C,
        feedback: &'a mut F,
        log: &'a ObservationLog,
        pause: &'a P,
        clock: &'a K,
    ) -> Self {
        Self {
            settings,
            camera,
            feedback,
            log,
            pause,
            clock,
            idle_color: LedColor::WATCHING,
            summary: LoopSummary::default(),
        }
    }

    /// Counters so far.
    pub fn summary(&self) -> LoopSummary {
        self.summary
    }

    /// Consume results until the stream ends, an error occurs or shutdown is requested.
    pub fn run<I>(mut self, results: I) -> Result<LoopSummary>
    where
        I: IntoIterator<Item = Result<ClassificationResult>>,
    {
        let mut results = results.into_iter();
        loop {
            if self.pause.stopping() {
                break;
            }
            let Some(result) = results.next() else {
                info!("Inference stream ended");
                break;
            };
            // The pull may have blocked through a shutdown request.
            if self.pause.stopping() {
                if let Err(e) = result {
                    debug!("Inference ended during shutdown: {e}");
                }
                break;
            }
            self.process(&result?)?;
        }

        self.summary.interrupted = self.pause.stopping();
        Ok(self.summary)
    }

    /// Handle one result. Returns the number of detections accepted.
    pub fn process(&mut self, result: &ClassificationResult) -> Result<usize> {
        self.summary.results += 1;

        let selected = select_top(&result.classes, self.settings.threshold, self.settings.top_k);
        let mut accepted = 0;

        for class in selected {
            if self.settings.boring.contains(&class.label) {
                debug!("Ignoring {} (prob={:.2})", class.label, class.score);
                self.summary.skipped_boring += 1;
                continue;
            }

            match self.accept(class) {
                Ok(()) => accepted += 1,
                // A terminal interrupt also reaches the capture program.
                Err(e) if self.pause.stopping() => {
                    warn!("Capture interrupted by shutdown: {e}");
                    break;
                }
                Err(e) => return Err(e),
            }

            if !self.pause.pause(self.settings.debounce) {
                break;
            }
        }

        Ok(accepted)
    }

    fn accept(&mut self, class: &Classification) -> Result<()> {
        let timestamp = self.clock.now();
        let observation = Observation {
            timestamp,
            label: class.label.clone(),
            score: class.score,
        };
        info!("Detected {} (prob={:.6})", class.label, class.score);
        self.log.append(&observation)?;

        let name = SpeciesName::from_label(&class.label);
        let path = unique_path(
            &self.settings.image_dir,
            &detection_image_name(timestamp, &name),
        );

        set_led_or_warn(&mut *self.feedback, LedColor::BUSY);
        self.camera.set_annotation(Some(name.annotation(class.score)));
        self.camera.capture(&path)?;
        set_led_or_warn(&mut *self.feedback, self.idle_color);

        info!("Saved {}", path.display());
        self.summary.detections += 1;
        Ok(())
    }
}

/// Run a complete detection session.
///
/// Creates output directories, opens the peripheral session, takes the ROI
/// sample, waits for the camera to settle, then starts inference and loops.
/// The inference stream is dropped before the session closes.
pub fn run_detection<C, F, I, S, P, K>(
    settings: &DetectionSettings,
    camera: C,
    feedback: F,
    log: &ObservationLog,
    start_inference: S,
    pause: &P,
    clock: &K,
) -> Result<LoopSummary>
where
    C: Camera,
    F: Feedback,
    I: IntoIterator<Item = Result<ClassificationResult>>,
    S: FnOnce() -> Result<I>,
    P: Pause + ?Sized,
    K: Clock + ?Sized,
{
    ensure_dir(&settings.image_dir)?;
    if let Some(parent) = log.path().parent() {
        ensure_dir(parent)?;
    }

    let mut session = Session::open(camera, feedback, LedColor::WATCHING)?;
    let (camera, feedback) = session.parts();

    if settings.roi_sample {
        let sample = settings.image_dir.join(ROI_SAMPLE_NAME);
        camera.set_annotation(None);
        match camera.capture(&sample) {
            Ok(()) => info!("Saved ROI sample {}", sample.display()),
            Err(e) if pause.stopping() => {
                warn!("ROI sample interrupted by shutdown: {e}");
                return Ok(interrupted());
            }
            Err(e) => return Err(e),
        }
    }

    info!("Running bird trigger camera");
    if !pause.pause(settings.warmup) {
        return Ok(interrupted());
    }

    let results = start_inference()?;
    DetectionLoop::new(settings, camera, feedback, log, pause, clock).run(results)
}

fn interrupted() -> LoopSummary {
    LoopSummary {
        interrupted: true,
        ..LoopSummary::default()
    }
}
