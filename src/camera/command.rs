//! Camera driven through the `rpicam-apps` command line tools.

use crate::camera::Camera;
use crate::config::CameraConfig;
use crate::error::{Error, Result};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use tracing::{debug, info};

/// Camera backed by an external still capture program.
///
/// Each capture runs the configured program once. The optional preview
/// command runs as a child process between `start_preview` and
/// `stop_preview`, and is killed on drop.
pub struct CommandCamera {
    config: CameraConfig,
    annotation: Option<String>,
    preview: Option<Child>,
}

impl CommandCamera {
    /// Create a camera from configuration. Nothing is started yet.
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            annotation: None,
            preview: None,
        }
    }

    /// Arguments for a capture to `path`.
    pub fn capture_args(&self, path: &Path) -> Vec<String> {
        let config = &self.config;
        let mut args = vec![
            "-n".to_string(),
            "-t".to_string(),
            config.capture_timeout_ms.to_string(),
            "--width".to_string(),
            config.width.to_string(),
            "--height".to_string(),
            config.height.to_string(),
            "--awb".to_string(),
            config.awb.clone(),
        ];

        if let Some([x, y, w, h]) = config.roi {
            args.push("--roi".to_string());
            args.push(format!("{x},{y},{w},{h}"));
        }

        if config.annotate
            && let Some(text) = &self.annotation
        {
            args.push("--exif".to_string());
            args.push(format!("IFD0.ImageDescription={text}"));
        }

        args.extend(config.extra_args.iter().cloned());
        args.push("-o".to_string());
        args.push(path.to_string_lossy().into_owned());
        args
    }

    /// Whether the preview child is running.
    pub fn previewing(&self) -> bool {
        self.preview.is_some()
    }
}

impl Camera for CommandCamera {
    fn start_preview(&mut self) -> Result<()> {
        if self.preview.is_some() {
            return Ok(());
        }
        let Some((program, args)) = self.config.preview_command.split_first() else {
            debug!("No preview command configured");
            return Ok(());
        };

        info!("Starting camera preview: {program}");
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| Error::Preview {
                program: program.clone(),
                source: e,
            })?;
        self.preview = Some(child);
        Ok(())
    }

    fn stop_preview(&mut self) -> Result<()> {
        if let Some(mut child) = self.preview.take() {
            info!("Stopping camera preview");
            let _ = child.kill();
            child.wait().map_err(|e| Error::Preview {
                program: self
                    .config
                    .preview_command
                    .first()
                    .cloned()
                    .unwrap_or_default(),
                source: e,
            })?;
        }
        Ok(())
    }

    fn set_annotation(&mut self, text: Option<String>) {
        self.annotation = text;
    }

    fn capture(&mut self, path: &Path) -> Result<()> {
        let args = self.capture_args(path);
        debug!("{} args: {:?}", self.config.program, args);

        let status = Command::new(&self.config.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .status()
            .map_err(|e| Error::CameraSpawn {
                program: self.config.program.clone(),
                source: e,
            })?;

        if !status.success() {
            return Err(Error::CaptureFailed {
                path: path.to_path_buf(),
                status,
            });
        }

        debug!("Captured {}", path.display());
        Ok(())
    }
}

impl Drop for CommandCamera {
    fn drop(&mut self) {
        let _ = self.stop_preview();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn position(args: &[String], flag: &str) -> Option<String> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1).cloned())
    }

    #[test]
    fn test_capture_args_defaults() {
        let camera = CommandCamera::new(CameraConfig::default());
        let args = camera.capture_args(&PathBuf::from("birdimages/x.jpg"));

        assert_eq!(position(&args, "--width").as_deref(), Some("1640"));
        assert_eq!(position(&args, "--height").as_deref(), Some("922"));
        assert_eq!(position(&args, "--awb").as_deref(), Some("auto"));
        assert_eq!(args.last().map(String::as_str), Some("birdimages/x.jpg"));
        assert!(!args.contains(&"--roi".to_string()));
        assert!(!args.contains(&"--exif".to_string()));
    }

    #[test]
    fn test_capture_args_roi_and_annotation() {
        let config = CameraConfig {
            roi: Some([0.25, 0.0, 0.5, 1.0]),
            extra_args: vec!["--quality".to_string(), "90".to_string()],
            ..CameraConfig::default()
        };
        let mut camera = CommandCamera::new(config);
        camera.set_annotation(Some("Turdus migratorius (prob= 0.82)".to_string()));
        let args = camera.capture_args(Path::new("out.jpg"));

        assert_eq!(position(&args, "--roi").as_deref(), Some("0.25,0,0.5,1"));
        assert_eq!(
            position(&args, "--exif").as_deref(),
            Some("IFD0.ImageDescription=Turdus migratorius (prob= 0.82)")
        );
        assert_eq!(position(&args, "--quality").as_deref(), Some("90"));
        assert_eq!(position(&args, "-o").as_deref(), Some("out.jpg"));
    }

    #[test]
    fn test_annotation_ignored_when_disabled() {
        let config = CameraConfig {
            annotate: false,
            ..CameraConfig::default()
        };
        let mut camera = CommandCamera::new(config);
        camera.set_annotation(Some("anything".to_string()));
        assert!(!camera.capture_args(Path::new("a.jpg")).contains(&"--exif".to_string()));
    }

    #[test]
    fn test_preview_without_command_is_noop() {
        let mut camera = CommandCamera::new(CameraConfig::default());
        camera.start_preview().unwrap();
        assert!(!camera.previewing());
        camera.stop_preview().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_preview_child_lifecycle() {
        let config = CameraConfig {
            preview_command: vec!["sleep".to_string(), "30".to_string()],
            ..CameraConfig::default()
        };
        let mut camera = CommandCamera::new(config);
        camera.start_preview().unwrap();
        assert!(camera.previewing());
        camera.stop_preview().unwrap();
        assert!(!camera.previewing());
    }

    #[cfg(unix)]
    #[test]
    fn test_capture_failure_status() {
        let config = CameraConfig {
            program: "false".to_string(),
            ..CameraConfig::default()
        };
        let mut camera = CommandCamera::new(config);
        let result = camera.capture(Path::new("never.jpg"));
        assert!(matches!(result, Err(Error::CaptureFailed { .. })));
    }

    #[test]
    fn test_capture_missing_program() {
        let config = CameraConfig {
            program: "/nonexistent/rpicam-still".to_string(),
            ..CameraConfig::default()
        };
        let mut camera = CommandCamera::new(config);
        let result = camera.capture(Path::new("never.jpg"));
        assert!(matches!(result, Err(Error::CameraSpawn { .. })));
    }
}
