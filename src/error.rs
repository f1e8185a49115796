use thiserror::Error;

use crate::hydrostatics::DraftSolution;

/// Top-level error type for the Hydrolis engine.
#[derive(Debug, Error)]
pub enum HydrolisError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Hydrostatic(#[from] HydrostaticError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised at the geometry provider boundary.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("split failed: {0}")]
    SplitFailed(String),

    #[error("stitch failed: {0}")]
    StitchFailed(String),

    #[error("cannot cap section: {0}")]
    CapFailed(String),
}

/// Errors raised by the hydrostatic procedures.
#[derive(Debug, Error)]
pub enum HydrostaticError {
    #[error("hull is punctured: watertight volume at waterline {waterline} resolves to {volume}")]
    PuncturedHull { waterline: f64, volume: f64 },

    #[error("draft search did not converge after {iterations} iterations")]
    Unconverged {
        iterations: usize,
        best: Option<DraftSolution>,
    },

    #[error("target weight must be positive, got {0}")]
    InvalidTarget(f64),

    #[error("invalid bracket: {0}")]
    InvalidBracket(String),

    #[error("no bodies selected")]
    EmptySelection,

    #[error("draft must be non-negative, got {0}")]
    NegativeDraft(f64),
}

/// Errors related to engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    OutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Convenience type alias for results using [`HydrolisError`].
pub type Result<T> = std::result::Result<T, HydrolisError>;
