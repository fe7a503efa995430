use thiserror::Error;

pub type SheetBindResult<T> = Result<T, SheetBindError>;

#[derive(Error, Debug)]
pub enum SheetBindError {
    #[error("Invalid schema for '{record}': field '{field}' {reason}")]
    InvalidSchema {
        record: String,
        field: String,
        reason: String,
    },

    #[error("Sheet '{0}' already exists in the workbook")]
    DuplicateSheet(String),

    #[error("Field '{field}' is marked for translation but no localizer was configured")]
    MissingLocalizer { field: String },

    #[error("Sheet with index {0} does not exist")]
    SheetNotFound(usize),

    #[error("Cannot read value at row {row}, column {col}: {message}")]
    CellRead {
        row: u32,
        col: u32,
        field: Option<String>,
        message: String,
    },

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Failed to write field '{field}': {message}")]
    FieldWrite { field: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Failed(String),
}

impl SheetBindError {
    /// Unwraps a domain error carried by an `anyhow::Error`, or wraps any
    /// other fault into [`SheetBindError::Failed`] keeping its message.
    pub fn from_any(err: anyhow::Error) -> Self {
        match err.downcast::<SheetBindError>() {
            Ok(domain) => domain,
            Err(other) => SheetBindError::Failed(format!("{:#}", other)),
        }
    }

    /// Field key attached to a cell read failure, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            SheetBindError::CellRead { field, .. } => field.as_deref(),
            SheetBindError::FieldWrite { field, .. } => Some(field),
            SheetBindError::MissingLocalizer { field } => Some(field),
            SheetBindError::InvalidSchema { field, .. } => Some(field),
            _ => None,
        }
    }
}
