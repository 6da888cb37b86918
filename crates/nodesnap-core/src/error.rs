//! Error types for the snapping engine.

use thiserror::Error;

/// Snapping errors.
///
/// Absence of a snap target is not an error; these only cover failures of
/// the collaborators the engine is wired to and of scene loading.
#[derive(Debug, Error)]
pub enum SnapError {
    #[error("Projection error: {0}")]
    Projection(String),
    #[error("Collection error: {0}")]
    Collection(String),
    #[error("Scene error: {0}")]
    Scene(String),
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for snapping operations.
pub type SnapResult<T> = Result<T, SnapError>;
