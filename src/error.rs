//! Error types for birdwatch.

use std::path::PathBuf;
use std::process::ExitStatus;

/// Result type alias for birdwatch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for birdwatch.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Failed to create output directory.
    #[error("failed to create output directory '{path}'")]
    OutputDirCreateFailed {
        /// Path to the output directory.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to append to the observation log.
    #[error("failed to write observation log '{path}'")]
    LogWrite {
        /// Path to the log file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Camera program could not be started.
    #[error("failed to run camera program '{program}'")]
    CameraSpawn {
        /// Camera program name.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Camera program exited with a failure status.
    #[error("camera capture to '{path}' failed ({status})")]
    CaptureFailed {
        /// Requested image path.
        path: PathBuf,
        /// Exit status of the camera program.
        status: ExitStatus,
    },

    /// Preview program could not be started or stopped.
    #[error("camera preview '{program}' failed")]
    Preview {
        /// Preview program name.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Inference helper could not be started.
    #[error("failed to start inference program '{program}'")]
    InferenceSpawn {
        /// Inference program name.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Reading from the inference stream failed.
    #[error("failed to read inference results")]
    InferenceRead {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An inference result line could not be parsed.
    #[error("malformed inference result on line {line}")]
    InferenceParse {
        /// 1-based line number in the stream.
        line: usize,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Inference helper exited with a failure status.
    #[error("inference program exited unexpectedly ({status})")]
    InferenceExited {
        /// Exit status of the helper.
        status: ExitStatus,
    },

    /// Failed to open a replay file.
    #[error("failed to open replay file '{path}'")]
    ReplayRead {
        /// Path to the replay file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing to a feedback peripheral failed.
    #[error("failed to drive feedback peripheral '{path}'")]
    Feedback {
        /// Sysfs attribute that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Reading the button state failed.
    #[error("failed to read button state from '{path}'")]
    ButtonRead {
        /// GPIO value file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The button value file held something other than `0` or `1`.
    #[error("unexpected button value '{value}' in '{path}'")]
    ButtonValue {
        /// GPIO value file.
        path: PathBuf,
        /// Raw contents.
        value: String,
    },
}
