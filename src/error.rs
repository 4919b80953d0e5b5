//! Errors raised while building primitives.
//!
//! Intersection itself never fails; these only come out of strict
//! constructors and configuration loading.

use thiserror::Error;

use crate::vec3::Vec3;

#[derive(Error, Debug)]
pub enum Error {
    /// Transformation matrix has no inverse.
    #[error("transformation matrix is singular (determinant {0})")]
    SingularMatrix(f64),

    /// Implicit surfaces need at least one marching step.
    #[error("implicit surface step count must be positive")]
    InvalidStepCount,

    /// Bounding box with `min` not strictly below `max` on every axis.
    #[error("empty bounding box: min {min:?}, max {max:?}")]
    InvalidBounds { min: Vec3<f64>, max: Vec3<f64> },

    /// Clip range with `min > max`.
    #[error("invalid range: {min} > {max}")]
    InvalidRange { min: f64, max: f64 },

    /// Size parameter that must be strictly positive.
    #[error("{what} must be positive, got {value}")]
    NonPositive { what: &'static str, value: f64 },

    /// Direction parameter that cannot be normalized.
    #[error("{0} must have non-zero length")]
    ZeroVector(&'static str),

    #[error("failed to parse primitive configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
