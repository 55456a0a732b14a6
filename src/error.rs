use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NdError {
    #[error("Index out of bounds: {index} for dimension of size {size} at level {level}")]
    IndexOutOfBounds {
        index: isize,
        size: usize,
        level: usize,
    },
    #[error("Invalid range: [{first}, {last}) for dimension of size {size}")]
    InvalidRange {
        first: isize,
        last: isize,
        size: usize,
    },
    #[error("Invalid step: {step} for range [{first}, {last})")]
    InvalidStep {
        first: isize,
        last: isize,
        step: isize,
    },
    #[error("Dimension mismatch: expected {expected} indices, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("Size mismatch: dimensions describe {expected} elements, buffer holds {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("Shape mismatch: source {src_shape:?} and destination {dst_shape:?}")]
    ShapeMismatch {
        src_shape: Vec<usize>,
        dst_shape: Vec<usize>,
    },
    #[error("Too many spans: {spans} for a view of depth {depth}")]
    TooManySpans { spans: usize, depth: usize },
    #[error("Invalid level: {level} for iterating sub-views of a view of depth {depth}")]
    InvalidLevel { level: usize, depth: usize },
    #[error("Every dimension was consumed by a scalar span")]
    ZeroDepth,
    #[error("Storage position {position} outside buffer of length {len}")]
    StorageOutOfBounds { position: isize, len: usize },
}

impl NdError {
    pub fn index_out_of_bounds(index: isize, size: usize, level: usize) -> Self {
        Self::IndexOutOfBounds { index, size, level }
    }

    pub fn invalid_range(first: isize, last: isize, size: usize) -> Self {
        Self::InvalidRange { first, last, size }
    }

    pub fn invalid_step(first: isize, last: isize, step: isize) -> Self {
        Self::InvalidStep { first, last, step }
    }

    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    pub fn size_mismatch(expected: usize, actual: usize) -> Self {
        Self::SizeMismatch { expected, actual }
    }

    pub fn shape_mismatch(src_shape: Vec<usize>, dst_shape: Vec<usize>) -> Self {
        Self::ShapeMismatch {
            src_shape,
            dst_shape,
        }
    }
}

pub type Result<T> = std::result::Result<T, NdError>;
