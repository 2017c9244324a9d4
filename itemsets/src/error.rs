//! Error types for itemset mining.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, MiningError>;

/// Errors raised by the mining engine.
///
/// Every error fails the call outright; no partial result is ever returned.
#[derive(Error, Debug)]
pub enum MiningError {
    #[error("Minimum support must be positive")]
    NonPositiveSupport,

    #[error("Relative minimum support must lie in (0, 1], got {0}")]
    InvalidFraction(f64),

    #[error("Pre-built tree threshold {tree} exceeds requested minimum support {requested}")]
    TreeThresholdTooHigh { tree: usize, requested: usize },

    #[error("Unknown {kind} '{name}'")]
    UnknownName { kind: &'static str, name: String },

    #[error("Shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("Cannot {operation} in phase {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: &'static str,
    },

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Mining worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("Result collector lock poisoned")]
    LockPoisoned,
}
