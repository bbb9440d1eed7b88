//! Domain error taxonomy for droidscout
//!
//! Per-record decode problems are not errors: they degrade to the `unknown`
//! sentinel and are logged. Everything that crosses a module boundary as a
//! failure is one of the variants below; no raw OS error escapes to callers.

use thiserror::Error;

/// Errors surfaced by the extraction and report pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// The bridge executable is missing, timed out, or could not be launched,
    /// or an invocation failed in a way the caller cannot interpret.
    #[error("bridge tool unavailable: {0}")]
    ExternalTool(String),

    /// A pull from the device failed for one remote path.
    #[error("download of '{remote}' failed: {detail}")]
    Download { remote: String, detail: String },

    /// Empty filter result, missing artifact, or missing device.
    #[error("{0} not found")]
    NotFound(String),

    /// Report assembly failed as a whole (a single bad asset never does this).
    #[error("report generation failed: {0}")]
    Report(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;
