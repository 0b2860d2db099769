//! Error types emitted by the Sahasi CLI.
//!
//! Keep this error type reasonably small, as the CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use sahasi_core::{SearchRadiusError, SmoothingFactorError};
use sahasi_data::ProviderBuildError;
use sahasi_scorer::CacheCapacityError;
use thiserror::Error;

/// Errors emitted by the Sahasi CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// The configured search radius is unusable.
    #[error("invalid --{field} {value}: {source}")]
    InvalidRadius {
        /// Option name.
        field: &'static str,
        /// Rejected value in metres.
        value: u32,
        /// Validation failure.
        #[source]
        source: SearchRadiusError,
    },
    /// The configured smoothing factor is unusable.
    #[error("invalid --{field}: {source}")]
    InvalidSmoothing {
        /// Option name.
        field: &'static str,
        /// Validation failure.
        #[source]
        source: SmoothingFactorError,
    },
    /// The configured cache capacity is unusable.
    #[error("invalid --{field} {value}: {source}")]
    InvalidCacheCapacity {
        /// Option name.
        field: &'static str,
        /// Rejected capacity.
        value: usize,
        /// Validation failure.
        #[source]
        source: CacheCapacityError,
    },
    /// The configured request timeout is zero.
    #[error("--{field} must be at least 1 second")]
    ZeroTimeout {
        /// Option name.
        field: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Option name.
        field: &'static str,
        /// Missing path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Option name.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Option name.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Opening the entries file failed.
    #[error("failed to open entries at {path:?}: {source}")]
    OpenInput {
        /// Entries file.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Reading a line of input failed.
    #[error("failed to read entry on line {line}: {source}")]
    ReadInput {
        /// One-based line number.
        line: usize,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// A line of input is not a JSON location entry.
    #[error("failed to parse entry on line {line}: {source}")]
    ParseEntry {
        /// One-based line number.
        line: usize,
        /// Decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// Constructing the Overpass provider failed.
    #[error("failed to build proximity provider for {endpoint:?}: {source}")]
    BuildProvider {
        /// Interpreter URL.
        endpoint: String,
        /// Construction failure.
        #[source]
        source: ProviderBuildError,
    },
    /// Writing a score failed.
    #[error("failed to write scores: {0}")]
    WriteOutput(#[source] std::io::Error),
}
