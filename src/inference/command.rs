//! Inference helper run as a child process.

use crate::config::{InferenceConfig, ModelKind};
use crate::error::{Error, Result};
use crate::inference::{ClassificationResult, JsonLines};
use std::io::BufReader;
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

const EXIT_POLL: Duration = Duration::from_millis(20);

type SharedChild = Arc<Mutex<Child>>;

fn lock(child: &SharedChild) -> MutexGuard<'_, Child> {
    child.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Streams classification results from an external inference program.
///
/// The program is started as `<program> <args> --model <model> [--sparse]`
/// and must print one JSON result per line on stdout. It is killed when
/// this value is dropped, or through a [`KillHandle`] from another thread.
pub struct CommandInference {
    child: Option<SharedChild>,
    lines: JsonLines<BufReader<ChildStdout>>,
}

impl CommandInference {
    /// Start the inference program for `model`.
    pub fn start(config: &InferenceConfig, model: ModelKind, sparse: bool) -> Result<Self> {
        let mut args = config.args.clone();
        args.push("--model".to_string());
        args.push(model.to_string());
        if sparse {
            args.push("--sparse".to_string());
        }

        info!("Starting inference: {} ({model} model)", config.program);
        debug!("Inference args: {:?}", args);

        let mut child = Command::new(&config.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::InferenceSpawn {
                program: config.program.clone(),
                source: e,
            })?;

        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(Error::InferenceSpawn {
                program: config.program.clone(),
                source: std::io::Error::other("stdout was not captured"),
            });
        };

        Ok(Self {
            child: Some(Arc::new(Mutex::new(child))),
            lines: JsonLines::new(BufReader::new(stdout)),
        })
    }

    /// Handle that kills the program, ending a blocked read with EOF.
    ///
    /// Returns `None` once the program has been reaped.
    pub fn kill_handle(&self) -> Option<KillHandle> {
        self.child.as_ref().map(|child| KillHandle(Arc::clone(child)))
    }

    /// Stop the inference program if it is still running.
    pub fn stop(&mut self) {
        if let Some(child) = self.child.take() {
            info!("Stopping inference");
            let mut child = lock(&child);
            let _ = child.kill();
            let _ = child.wait();
        }
    }

    /// Reap the child after stdout closed and turn its status into a stream end.
    fn finish(&mut self) -> Option<Result<ClassificationResult>> {
        let child = self.child.take()?;
        match wait_unlocked(&child) {
            Ok(status) if status.success() => {
                info!("Inference program finished");
                None
            }
            Ok(status) => {
                warn!("Inference program exited with {status}");
                Some(Err(Error::InferenceExited { status }))
            }
            Err(e) => Some(Err(Error::InferenceRead { source: e })),
        }
    }
}

/// Poll for exit without holding the lock across a blocking wait.
fn wait_unlocked(child: &SharedChild) -> std::io::Result<ExitStatus> {
    loop {
        let polled = lock(child).try_wait()?;
        if let Some(status) = polled {
            return Ok(status);
        }
        std::thread::sleep(EXIT_POLL);
    }
}

/// Kills a running inference program from any thread.
#[derive(Debug, Clone)]
pub struct KillHandle(SharedChild);

impl KillHandle {
    /// Send a kill signal. A program that has already exited is left alone.
    pub fn kill(&self) {
        let mut child = lock(&self.0);
        if matches!(child.try_wait(), Ok(None)) {
            debug!("Killing inference program {}", child.id());
            let _ = child.kill();
        }
    }
}

impl Iterator for CommandInference {
    type Item = Result<ClassificationResult>;

    fn next(&mut self) -> Option<Self::Item> {
        self.child.as_ref()?;
        match self.lines.next() {
            Some(item) => Some(item),
            None => self.finish(),
        }
    }
}

impl Drop for CommandInference {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shell(script: &str) -> InferenceConfig {
        InferenceConfig {
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                script.to_string(),
                "birdwatch-infer".to_string(),
            ],
        }
    }

    #[test]
    fn test_streams_lines_then_ends_on_clean_exit() {
        let config = shell(
            r#"printf '%s\n' '{"classes":[{"label":"Sitta europaea (Eurasian Nuthatch)","score":0.4}]}'"#,
        );
        let mut inference = CommandInference::start(&config, ModelKind::Birds, false).unwrap();

        let first = inference.next().unwrap().unwrap();
        assert_eq!(first.classes[0].label, "Sitta europaea (Eurasian Nuthatch)");
        assert!(inference.next().is_none());
        assert!(inference.next().is_none());
    }

    #[test]
    fn test_model_and_sparse_are_forwarded() {
        // Echo the forwarded arguments back as a label.
        let config = shell(r#"printf '{"classes":[{"label":"%s %s %s","score":1.0}]}\n' "$@""#);
        let mut inference = CommandInference::start(&config, ModelKind::Plants, true).unwrap();

        let result = inference.next().unwrap().unwrap();
        assert_eq!(result.classes[0].label, "--model plants --sparse");
    }

    #[test]
    fn test_failed_exit_is_an_error() {
        let config = shell("exit 3");
        let mut inference = CommandInference::start(&config, ModelKind::Birds, false).unwrap();

        let err = inference.next().unwrap().unwrap_err();
        assert!(matches!(err, Error::InferenceExited { .. }));
        assert!(inference.next().is_none());
    }

    #[test]
    fn test_missing_program_fails_to_start() {
        let config = InferenceConfig {
            program: "/nonexistent/birdwatch-infer".to_string(),
            args: Vec::new(),
        };
        let result = CommandInference::start(&config, ModelKind::Birds, false);
        assert!(matches!(result, Err(Error::InferenceSpawn { .. })));
    }

    #[test]
    fn test_kill_handle_unblocks_silent_program() {
        let config = shell("exec sleep 30");
        let mut inference = CommandInference::start(&config, ModelKind::Birds, false).unwrap();
        let handle = inference.kill_handle().unwrap();
        let killer = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(50));
            handle.kill();
        });

        let start = std::time::Instant::now();
        let err = inference.next().unwrap().unwrap_err();
        assert!(matches!(err, Error::InferenceExited { .. }));
        assert!(start.elapsed() < std::time::Duration::from_secs(10));
        assert!(inference.kill_handle().is_none());
        let _ = killer.join();
    }

    #[test]
    fn test_drop_kills_running_program() {
        let config = shell("sleep 30");
        let inference = CommandInference::start(&config, ModelKind::Birds, false).unwrap();
        let start = std::time::Instant::now();
        drop(inference);
        assert!(start.elapsed() < std::time::Duration::from_secs(10));
    }
}
