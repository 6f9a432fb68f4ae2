use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by table construction, persistence and indexing.
#[derive(Debug, Error)]
pub enum TableError {
    /// A table needs at least one attribute per row.
    #[error("invalid dimension {0}: a table needs at least one attribute")]
    InvalidDimension(usize),

    /// Leaf size must be at least one row.
    #[error("invalid leaf size {0}: must be at least 1")]
    InvalidLeafSize(usize),

    #[error("row {index} out of range for table with {len} rows")]
    RowOutOfRange { index: usize, len: usize },

    /// The flat data buffer does not hold a whole number of rows.
    #[error("data length {len} is not a multiple of dimension {dim}")]
    RaggedData { len: usize, dim: usize },

    /// Rows and weights must be finite for bounds to enclose them.
    #[error("row {row} holds a non-finite value")]
    NonFiniteValue { row: usize },

    #[error("expected {expected} weights, found {found}")]
    WeightCountMismatch { expected: usize, found: usize },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error in {} at line {line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The dimension of a table cannot be inferred from a file without rows.
    #[error("{} holds no rows", path.display())]
    EmptyDataset { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, TableError>;
