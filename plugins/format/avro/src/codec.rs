use std::io::Read;

use apache_avro::Schema;
use apache_avro::types::Value;
use chrono::FixedOffset;
use tabula_api::{Row, RowType};

use crate::config::AvroRowConfig;
use crate::error::ConvertError;
use crate::schema::NamedSchemas;
use crate::source::SourceRecord;

// ═══════════════════════════════════════════════════════════════
//  AvroRowConverter
// ═══════════════════════════════════════════════════════════════

/// Converts Avro records into rows.
///
/// Everything is built at construction and never mutated afterwards, so
/// one converter can be shared across threads behind an `Arc`.
#[derive(Debug)]
pub struct AvroRowConverter {
    pub(crate) schema: Schema,
    pub(crate) named: NamedSchemas,
    pub(crate) offset: FixedOffset,
}

impl AvroRowConverter {
    pub fn new(schema: Schema, offset: FixedOffset) -> Self {
        let named = NamedSchemas::collect(&schema);
        tracing::debug!(
            schema = ?schema.name().map(|n| n.fullname(None)),
            named_types = named.len(),
            %offset,
            "avro row converter ready"
        );
        Self {
            schema,
            named,
            offset,
        }
    }

    pub fn from_config(cfg: &AvroRowConfig) -> Result<Self, ConvertError> {
        if cfg.schema_path.is_empty() {
            return Err(ConvertError::Config("avro: schema_path is required".to_string()));
        }

        let schema_str =
            std::fs::read_to_string(&cfg.schema_path).map_err(|source| ConvertError::Io {
                path: cfg.schema_path.clone(),
                source,
            })?;

        let schema = Schema::parse_str(&schema_str)
            .map_err(|e| ConvertError::Config(format!("avro: failed to parse schema: {e}")))?;

        Ok(Self::new(schema, cfg.offset()?))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Convert a record value written against this converter's schema.
    pub fn convert_value(&self, value: &Value, row_type: &RowType) -> Result<Row, ConvertError> {
        let record = self
            .named
            .record_schema(&self.schema)
            .ok_or_else(|| ConvertError::NotARecord {
                found: format!("schema {:?}", self.schema.name()),
            })?;
        let source = SourceRecord::from_value(record, value)?;
        self.convert(&source, row_type)
    }

    /// Decode one Avro binary datum and convert it.
    pub fn decode(&self, data: &[u8], row_type: &RowType) -> Result<Row, ConvertError> {
        let mut reader = data;
        let value = apache_avro::from_avro_datum(&self.schema, &mut reader, None)?;
        self.convert_value(&value, row_type)
    }

    /// Read an Avro object container and convert every record.
    ///
    /// The writer schema stored in the container is resolved against this
    /// converter's schema. The first failing record aborts the read.
    pub fn read_container<R: Read>(
        &self,
        input: R,
        row_type: &RowType,
    ) -> Result<Vec<Row>, ConvertError> {
        let reader = apache_avro::Reader::with_schema(&self.schema, input)?;
        let rows = reader
            .map(|value| self.convert_value(&value?, row_type))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(records = rows.len(), "avro container converted");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SCHEMA: &str = r#"{"type": "record", "name": "Tick", "fields": [
        {"name": "symbol", "type": "string"},
        {"name": "bid", "type": "double"}
    ]}"#;

    #[test]
    fn loads_schema_from_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SCHEMA.as_bytes()).unwrap();

        let cfg = AvroRowConfig {
            schema_path: file.path().to_string_lossy().into_owned(),
            zone_offset: "+01:00".into(),
        };
        let converter = AvroRowConverter::from_config(&cfg).unwrap();
        assert_eq!(converter.offset().local_minus_utc(), 3600);
        assert!(matches!(converter.schema(), Schema::Record(_)));
    }

    #[test]
    fn missing_schema_path_is_a_config_error() {
        let err = AvroRowConverter::from_config(&AvroRowConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "config: avro: schema_path is required");
    }

    #[test]
    fn unreadable_schema_file_is_an_io_error() {
        let cfg = AvroRowConfig {
            schema_path: "/nonexistent/tick.avsc".into(),
            ..Default::default()
        };
        let err = AvroRowConverter::from_config(&cfg).unwrap_err();
        assert_eq!(err.kind(), tabula_api::ErrorKind::Io);
        match &err {
            ConvertError::Io { path, source } => {
                assert_eq!(path, "/nonexistent/tick.avsc");
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn invalid_schema_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"type\": \"nope\"}").unwrap();
        let cfg = AvroRowConfig {
            schema_path: file.path().to_string_lossy().into_owned(),
            ..Default::default()
        };
        assert!(matches!(
            AvroRowConverter::from_config(&cfg),
            Err(ConvertError::Config(_))
        ));
    }

    #[test]
    fn non_record_schema_cannot_convert() {
        let converter = AvroRowConverter::new(Schema::Long, FixedOffset::east_opt(0).unwrap());
        let rt = RowType::new(vec![]).unwrap();
        let err = converter.convert_value(&Value::Long(1), &rt).unwrap_err();
        assert!(matches!(err, ConvertError::NotARecord { .. }));
    }
}
