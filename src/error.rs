//! Error types for element construction and condensation

use thiserror::Error;

/// Failures reported synchronously by element constructors and setters
#[derive(Error, Debug)]
pub enum ElementError {
    #[error("degenerate geometry: {0}")]
    GeometryDegenerate(String),

    #[error("invalid parameter {name} = {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("expected a {expected}-element array, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("static condensation pivot at DOF {dof} is below tolerance")]
    SingularCondensation { dof: usize },
}

/// Result type for element operations
pub type ElementResult<T> = Result<T, ElementError>;
