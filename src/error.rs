use thiserror::Error;

pub type ArrayResult<T> = Result<T, ArrayError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArrayError {
    #[error("rank mismatch: expected {expected} indices, got {got}")]
    RankMismatch { expected: usize, got: usize },
    #[error("index {index:?} out of range for shape {shape:?}")]
    IndexOutOfRange { index: Vec<usize>, shape: Vec<usize> },
    #[error("shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },
    #[error("cannot resize a borrowed buffer from {from:?} to {to:?}")]
    NotResizable { from: Vec<usize>, to: Vec<usize> },
    #[error("{op}: dimension {dim} is invalid for rank {rank}")]
    InvalidDimension {
        dim: usize,
        rank: usize,
        op: &'static str,
    },
    #[error("{op}: {msg}")]
    InvalidArgument { op: &'static str, msg: String },
    #[error("buffer too small: need {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    #[error("{op}: no buffer attached")]
    EmptyBuffer { op: &'static str },
}

impl ArrayError {
    pub(crate) fn invalid_argument(op: &'static str, msg: impl Into<String>) -> Self {
        ArrayError::InvalidArgument {
            op,
            msg: msg.into(),
        }
    }
}

impl From<ArrayError> for String {
    fn from(e: ArrayError) -> Self {
        format!("{}", e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = ArrayError::RankMismatch {
            expected: 4,
            got: 3,
        };
        assert_eq!(e.to_string(), "rank mismatch: expected 4 indices, got 3");

        let e = ArrayError::InvalidDimension {
            dim: 3,
            rank: 3,
            op: "slice",
        };
        let s: String = e.into();
        assert_eq!(s, "slice: dimension 3 is invalid for rank 3");
    }
}
