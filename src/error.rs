//! Error type shared by the table loader, the selection workflow and the export path.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CurveCutError {
    #[error("failed to parse CSV input: {0}")]
    Load(#[from] csv::Error),
    #[error("the uploaded file contains no header row")]
    EmptyInput,
    #[error("row {row} has {found} fields, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("column '{0}' does not exist in the loaded table")]
    UnknownColumn(String),
    #[error("column '{column}' is assigned to both the {first} and {second} roles")]
    RoleCollision {
        column: String,
        first: &'static str,
        second: &'static str,
    },
    #[error("start index ({start}) must be less than or equal to end index ({end})")]
    SelectionOrder { start: usize, end: usize },
    #[error("row index {index} is out of range for a batch of {len} rows")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("committed columns {found:?} do not match the export columns {expected:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("no validated selection to export yet")]
    EmptyExport,
    #[error("no data loaded")]
    NoData,
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CurveCutError>;
