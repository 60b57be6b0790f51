use crate::schema::FieldKind;

/// Category of a conversion or layout error. Lets the caller decide
/// whether to fail the job or skip the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid configuration. Permanent; fail at startup.
    Config,
    /// I/O error while reading schemas or containers.
    Io,
    /// Corrupt or misdeclared source data.
    Format,
    /// Row type and source schema disagree.
    Schema,
    /// A declared kind the codec or sink cannot handle.
    Unsupported,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Config => f.write_str("config"),
            ErrorKind::Io => f.write_str("io"),
            ErrorKind::Format => f.write_str("format"),
            ErrorKind::Schema => f.write_str("schema"),
            ErrorKind::Unsupported => f.write_str("unsupported"),
        }
    }
}

/// Errors raised while building row types and sink layouts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    #[error("duplicate field '{0}' in row type")]
    DuplicateField(String),

    #[error("key field '{0}' not found in row type")]
    KeyNotFound(String),

    #[error("unsupported field type {kind} for field '{field}'")]
    UnsupportedSinkField { field: String, kind: FieldKind },
}

impl RowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RowError::DuplicateField(_) | RowError::KeyNotFound(_) => ErrorKind::Config,
            RowError::UnsupportedSinkField { .. } => ErrorKind::Unsupported,
        }
    }
}
