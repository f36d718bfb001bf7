//! Error types for vorograph.

use crate::bounds::Point;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or exchanging neighbour graphs.
#[derive(Error, Debug)]
pub enum Error {
    /// Point and owner sequences differ in length.
    #[error("{points} points but {owners} owner ids")]
    InputShapeMismatch {
        /// Number of points.
        points: usize,
        /// Number of owner ids.
        owners: usize,
    },

    /// A flat coordinate buffer does not hold whole 3D points.
    #[error("coordinate buffer of length {0} is not a sequence of 3D points")]
    MalformedCoordinates(usize),

    /// A point has a NaN or infinite coordinate.
    #[error("point {index} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Index of the point in the input sequence.
        index: usize,
    },

    /// A domain range is empty or unbounded.
    #[error("invalid domain {min:?} .. {max:?}")]
    InvalidDomain {
        /// Minimum corner.
        min: Point,
        /// Maximum corner.
        max: Point,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The points do not span a 3D tessellation.
    #[error("degenerate geometry: {0}")]
    GeometryDegenerate(String),

    /// A neighbour list line could not be parsed.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        message: String,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON input or configuration.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The stage of a run that failed, for user-facing messages.
    pub fn stage(&self) -> &'static str {
        match self {
            Error::InputShapeMismatch { .. }
            | Error::MalformedCoordinates(_)
            | Error::NonFiniteCoordinate { .. }
            | Error::InvalidDomain { .. }
            | Error::InvalidConfig(_) => "input validation",
            Error::GeometryDegenerate(_) => "tessellation construction",
            Error::Parse { .. } | Error::Io(_) | Error::Json(_) => "i/o",
        }
    }
}
