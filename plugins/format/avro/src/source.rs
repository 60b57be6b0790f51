use apache_avro::schema::{RecordField, RecordSchema};
use apache_avro::types::Value;

use crate::error::{ConvertError, value_name};
use crate::schema::resolve_field;

/// Borrowed view of one Avro record: its schema plus its field values.
///
/// The converter reads from it and never keeps it past one call.
#[derive(Debug, Clone, Copy)]
pub struct SourceRecord<'a> {
    schema: &'a RecordSchema,
    fields: &'a [(String, Value)],
}

impl<'a> SourceRecord<'a> {
    pub fn new(schema: &'a RecordSchema, fields: &'a [(String, Value)]) -> Self {
        Self { schema, fields }
    }

    /// View over a `Value::Record` (unions are looked through).
    pub fn from_value(schema: &'a RecordSchema, value: &'a Value) -> Result<Self, ConvertError> {
        match value {
            Value::Record(fields) => Ok(Self::new(schema, fields)),
            Value::Union(_, inner) => Self::from_value(schema, inner),
            other => Err(ConvertError::NotARecord {
                found: value_name(other).to_string(),
            }),
        }
    }

    pub fn schema(&self) -> &'a RecordSchema {
        self.schema
    }

    pub fn field(&self, name: &str) -> Option<&'a RecordField> {
        resolve_field(self.schema, name)
    }

    /// Value of a named field. A field declared in the schema but missing
    /// from the value list reads as `Value::Null`.
    pub fn get(&self, field: &RecordField) -> &'a Value {
        const NULL: &Value = &Value::Null;
        match self.fields.get(field.position) {
            Some((name, value)) if *name == field.name => value,
            _ => self
                .fields
                .iter()
                .find(|(name, _)| *name == field.name)
                .map(|(_, value)| value)
                .unwrap_or(NULL),
        }
    }
}

#[cfg(test)]
mod tests {
    use apache_avro::Schema;

    use super::*;

    fn schema() -> Schema {
        Schema::parse_str(
            r#"{"type": "record", "name": "Pair", "fields": [
                {"name": "a", "type": "int"},
                {"name": "b", "type": "string"}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn reads_fields_by_name() {
        let schema = schema();
        let Schema::Record(record) = &schema else { panic!("record") };
        let value = Value::Record(vec![
            ("a".into(), Value::Int(1)),
            ("b".into(), Value::String("x".into())),
        ]);
        let source = SourceRecord::from_value(record, &value).unwrap();
        let b = source.field("b").unwrap();
        assert_eq!(source.get(b), &Value::String("x".into()));
        assert!(source.field("c").is_none());
    }

    #[test]
    fn out_of_order_values_are_found() {
        let schema = schema();
        let Schema::Record(record) = &schema else { panic!("record") };
        let fields = vec![("b".to_string(), Value::String("x".into()))];
        let source = SourceRecord::new(record, &fields);
        assert_eq!(source.get(source.field("b").unwrap()), &Value::String("x".into()));
        assert_eq!(source.get(source.field("a").unwrap()), &Value::Null);
    }

    #[test]
    fn non_record_value_is_rejected() {
        let schema = schema();
        let Schema::Record(record) = &schema else { panic!("record") };
        let err = SourceRecord::from_value(record, &Value::Long(1)).unwrap_err();
        assert!(matches!(err, ConvertError::NotARecord { found } if found == "long"));
    }
}
