/// Errors raised while turning a data source into a training set.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("fetching {url}: {message}")]
    Http { url: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// A feature cell that is not a number.
    #[error("parse error at row {row}, column {column}: '{value}' is not a number")]
    Parse {
        /// 1-based data row (header excluded).
        row: usize,
        /// 0-based column index.
        column: usize,
        value: String,
    },

    #[error("row {row}: {message}")]
    Shape { row: usize, message: String },

    #[error("row {row}: unknown label '{label}'")]
    UnknownLabel { row: usize, label: String },

    /// A fitted encoder saw fewer than the three known species.
    #[error("dataset is missing classes: {}", .missing.join(", "))]
    MissingClasses { missing: Vec<&'static str> },

    #[error("dataset contains no rows")]
    Empty,
}

/// Errors from fitting or querying a classifier.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("cannot fit with zero samples")]
    EmptyInput,

    #[error("{samples} samples but {labels} labels")]
    LengthMismatch { samples: usize, labels: usize },

    #[error("label {label} out of range for {n_classes} classes")]
    LabelOutOfRange { label: usize, n_classes: usize },

    #[error("model not fitted yet")]
    NotFitted,

    #[error("solver failed: {0}")]
    Fit(String),
}

/// Rejected form submission. The message is shown verbatim on the page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Invalid input: {field} must be a number")]
    NotANumber { field: &'static str },
}
