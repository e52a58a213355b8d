use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConvertError>;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid invocation: {0}")]
    InvalidInvocation(String),

    #[error("Source read failure: {0}")]
    SourceRead(String),

    #[error("Variable '{0}' is not supported")]
    UnsupportedVariable(String),

    #[error("Missing required metadata: {0}")]
    MissingMetadata(String),

    #[error("Unknown unit string: '{0}'")]
    UnknownUnit(String),

    #[error("Unit mismatch: expected {expected}, got {found}")]
    UnitMismatch { expected: String, found: String },

    #[error("Array shape mismatch: {0}")]
    ShapeMismatch(String),
}
