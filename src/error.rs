use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum StatError {
    #[error("dataset is empty")]
    EmptyDataset,

    #[error("expected a JSON array of records")]
    NotAnArray,

    #[error("record {index} is not a JSON object")]
    RecordNotObject { index: usize },

    #[error("record {index} has a nested value in column {column:?}")]
    NestedValue { index: usize, column: String },

    #[error("column index {index} out of range ({count} columns)")]
    ColumnOutOfRange { index: usize, count: usize },

    #[error("reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),
}
