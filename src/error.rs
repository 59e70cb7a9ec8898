use std::path::PathBuf;

use thiserror::Error;

/// Failures this layer can hit while reflecting racer state into the UI.
///
/// All of these are surfaced as toasts; the screen keeps its previously
/// rendered state when a load or collaborator call fails.
#[derive(Debug, Error)]
pub enum GuiError {
    /// A state or batch file is absent on disk.
    #[error("not found: {path}")]
    NotFound { path: PathBuf },

    /// A state or batch file exists but cannot be read or interpreted.
    #[error("{0}")]
    MalformedState(String),

    /// A call on the racer collaborator failed.
    #[error("racer call failed: {0}")]
    Collaborator(String),
}

impl GuiError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedState(msg.into())
    }
}

pub type GuiResult<T> = Result<T, GuiError>;
