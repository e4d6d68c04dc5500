// ============================================================
// Layer 3 - Error Taxonomy
// ============================================================
// Typed failures for the pipeline. Orchestration code propagates
// these through anyhow; only the sanitizer recovers locally (a
// file that fails to decode is deleted from the clean tree and
// the pass continues). Everything else is fatal and terminates
// the run with a diagnostic. There is no retry policy anywhere.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// An input directory that must exist does not
    #[error("directory not found: '{0}'")]
    NotFound(PathBuf),

    /// No trained model artifact at the expected path
    #[error("no trained model artifact at '{0}' (run `train` first)")]
    ArtifactNotFound(PathBuf),

    /// A file is not a valid image
    #[error("cannot decode image '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Directory mirroring cannot proceed at this destination
    #[error("cannot mirror '{src}' into '{dst}': destination entry is the wrong kind")]
    Copy { src: PathBuf, dst: PathBuf },

    /// An unreadable or unwritable filesystem path
    #[error("I/O failure on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn decode(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Decode { path: path.into(), source }
    }
}
