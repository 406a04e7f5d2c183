use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Caller passed something the runner refuses to launch
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("expected a {expected} but got a {found}")]
    ShapeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("invocation #{index} is empty")]
    EmptyInvocation { index: usize },
}

/// Faults that interrupt a `run` call. A non-zero exit is not one of them.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("usage error: {0}")]
    Usage(#[from] UsageError),

    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The child started but collecting its exit status failed
    #[error("failed waiting for `{command}`: {source}")]
    Wait {
        command: String,
        #[source]
        source: io::Error,
    },

    /// An output file could not be opened; raised before anything is launched
    #[error("failed to open output file {}: {source}", path.display())]
    Redirect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RunError {
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }
}
