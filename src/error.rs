use thiserror::Error;

/// Errors raised by points, cluster accumulators and the clustering engine.
///
/// All of them signal a contract violation by the caller; none is retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KMeansError {
    /// Two operands do not share the same number of dimensions
    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// The supplied initial centers have the wrong count or dimension
    #[error("Invalid centers: {0}")]
    InvalidCenters(String),

    /// The point to remove is not a member of the cluster
    #[error("Point is not a member of this cluster")]
    NotFound,

    /// A dimension index outside the arity of a point
    #[error("Dimension index {index} out of range for a point with {dimensions} dimensions")]
    IndexOutOfRange { index: usize, dimensions: usize },

    /// The number of clusters k is invalid (must be > 0)
    #[error("Invalid k value: {0}")]
    InvalidK(String),

    /// Not enough data points for the requested number of clusters
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// A raw input value has no f64 representation
    #[error("Value in dimension {dimension} is not representable as f64")]
    NonNumeric { dimension: usize },
}

pub type Result<T> = std::result::Result<T, KMeansError>;
