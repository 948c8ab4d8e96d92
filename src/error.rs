//! Error types for the scene core.
//!
//! The simulation does no I/O, so the taxonomy is small:
//! - [`TransitionError`]: a lifecycle method was called from the wrong state.
//!   This is a logic defect upstream. Debug builds panic; release builds log
//!   and leave the state untouched.
//! - [`SceneError`]: host-facing failures (bad stage index, inconsistent
//!   catalog, unreadable config).

use std::fmt;

/// An illegal lifecycle transition on a refuse or a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionError {
    /// Which kind of object rejected the transition ("refuse", "stage").
    pub entity: &'static str,
    /// State the object was actually in.
    pub from: &'static str,
    /// State the caller asked for.
    pub to: &'static str,
}

impl TransitionError {
    /// Report the violation: fatal in debug builds, logged in release.
    pub(crate) fn raise(self) -> Self {
        debug_assert!(false, "{self}");
        log::error!("{self}");
        self
    }
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "illegal {} transition: {} -> {}",
            self.entity, self.from, self.to
        )
    }
}

impl std::error::Error for TransitionError {}

/// Top-level error enum for host-facing scene operations.
#[derive(Debug)]
pub enum SceneError {
    /// `prepare` was asked for a stage the catalog does not have.
    UnknownStage {
        index: usize,
        stage_count: usize,
    },

    /// `prepare` was called on a scene that already holds a stage.
    AlreadyPrepared,

    /// A catalog cross-reference is broken (route/species/kind index out of
    /// range, mismatched route counts, empty candidate lists).
    InvalidCatalog(String),

    /// Configuration JSON could not be parsed or written.
    Config(serde_json::Error),

    /// Configuration file could not be read.
    Io(std::io::Error),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::UnknownStage { index, stage_count } => {
                write!(f, "stage {index} out of range ({stage_count} stages)")
            }
            SceneError::AlreadyPrepared => write!(f, "scene is already prepared"),
            SceneError::InvalidCatalog(reason) => write!(f, "invalid catalog: {reason}"),
            SceneError::Config(e) => write!(f, "config error: {e}"),
            SceneError::Io(e) => write!(f, "i/o error: {e}"),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Config(e) => Some(e),
            SceneError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SceneError {
    fn from(e: serde_json::Error) -> Self {
        SceneError::Config(e)
    }
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        SceneError::Io(e)
    }
}
