use tabula_api::{ErrorKind, FieldKind};

use crate::logical::LogicalTypeError;

/// Errors raised while converting Avro records into rows.
///
/// Every variant aborts the current conversion; no partial row is returned.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("field '{field}': avro format does not support data type [{kind}]")]
    UnsupportedType { field: String, kind: FieldKind },

    #[error("field '{field}': avro array format does not support element type [{kind}]")]
    UnsupportedArrayElement { field: String, kind: FieldKind },

    #[error("field '{field}': {source}")]
    LogicalType {
        field: String,
        #[source]
        source: LogicalTypeError,
    },

    #[error("field '{field}': expected {expected}, found avro {found}")]
    TypeMismatch {
        field: String,
        expected: FieldKind,
        found: String,
    },

    #[error("field '{field}': source schema has no {expected} logical type")]
    MissingLogicalType { field: String, expected: &'static str },

    #[error("expected avro record, found {found}")]
    NotARecord { found: String },

    #[error("config: {0}")]
    Config(String),

    #[error("avro: {0}")]
    Avro(#[from] apache_avro::Error),

    #[error("avro: failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::UnsupportedType { .. } | ConvertError::UnsupportedArrayElement { .. } => {
                ErrorKind::Unsupported
            }
            ConvertError::LogicalType { .. } | ConvertError::Avro(_) => ErrorKind::Format,
            ConvertError::TypeMismatch { .. }
            | ConvertError::MissingLogicalType { .. }
            | ConvertError::NotARecord { .. } => ErrorKind::Schema,
            ConvertError::Config(_) => ErrorKind::Config,
            ConvertError::Io { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn mismatch(
        field: &str,
        expected: &FieldKind,
        found: &apache_avro::types::Value,
    ) -> Self {
        ConvertError::TypeMismatch {
            field: field.to_string(),
            expected: expected.clone(),
            found: value_name(found).to_string(),
        }
    }
}

/// Short Avro type name of a value, for error messages.
pub(crate) fn value_name(value: &apache_avro::types::Value) -> &'static str {
    use apache_avro::types::Value;
    match value {
        Value::Null => "null",
        Value::Boolean(_) => "boolean",
        Value::Int(_) => "int",
        Value::Long(_) => "long",
        Value::Float(_) => "float",
        Value::Double(_) => "double",
        Value::Bytes(_) => "bytes",
        Value::String(_) => "string",
        Value::Fixed(..) => "fixed",
        Value::Enum(..) => "enum",
        Value::Union(..) => "union",
        Value::Array(_) => "array",
        Value::Map(_) => "map",
        Value::Record(_) => "record",
        Value::Date(_) => "date",
        Value::Decimal(_) => "decimal",
        Value::BigDecimal(_) => "big-decimal",
        Value::TimeMillis(_) => "time-millis",
        Value::TimeMicros(_) => "time-micros",
        Value::TimestampMillis(_) => "timestamp-millis",
        Value::TimestampMicros(_) => "timestamp-micros",
        Value::TimestampNanos(_) => "timestamp-nanos",
        Value::LocalTimestampMillis(_) => "local-timestamp-millis",
        Value::LocalTimestampMicros(_) => "local-timestamp-micros",
        Value::LocalTimestampNanos(_) => "local-timestamp-nanos",
        Value::Duration(_) => "duration",
        Value::Uuid(_) => "uuid",
    }
}
