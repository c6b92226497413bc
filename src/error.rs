use thiserror::Error;

/// Rejected configuration values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("grid must be at least 2x2, got {cols}x{rows}")]
    GridTooSmall { cols: usize, rows: usize },

    #[error("obstacle density must be in (0, 1), got {0}")]
    InvalidDensity(f64),

    #[error("density range is empty: min {min} > max {max}")]
    InvalidDensityRange { min: f64, max: f64 },

    #[error("density step must be positive, got {0}")]
    InvalidDensityStep(f64),
}

/// Errors raised by the execution controller.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    #[error("a search is already running; cancel it first")]
    RunInProgress,
}

/// Errors raised while running a batch benchmark.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("failed to write results: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
