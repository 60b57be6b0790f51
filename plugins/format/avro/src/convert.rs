use std::borrow::Cow;
use std::collections::BTreeMap;

use apache_avro::Schema;
use apache_avro::types::Value;
use bigdecimal::BigDecimal;
use chrono::DateTime;
use tabula_api::{FieldKind, Row, RowType, RowValue};

use crate::array::coerce_array;
use crate::codec::AvroRowConverter;
use crate::error::ConvertError;
use crate::logical::{self, LogicalTypeError};
use crate::schema::resolve_field;
use crate::source::SourceRecord;

const NO_SCHEMA: &Schema = &Schema::Null;

// ═══════════════════════════════════════════════════════════════
//  Avro record → Row
// ═══════════════════════════════════════════════════════════════

impl AvroRowConverter {
    /// Convert one source record into a row of `row_type`.
    ///
    /// Fields the source schema does not declare become `RowValue::Null`.
    /// Nested `Row` kinds re-enter this method with the sub-record.
    pub fn convert(
        &self,
        record: &SourceRecord<'_>,
        row_type: &RowType,
    ) -> Result<Row, ConvertError> {
        let mut values = Vec::with_capacity(row_type.len());
        for field in row_type.fields() {
            let value = match record.field(&field.name) {
                Some(source_field) => self.convert_field(
                    &field.name,
                    &field.kind,
                    &source_field.schema,
                    record.get(source_field),
                )?,
                None => {
                    tracing::trace!(field = %field.name, "absent from source schema");
                    RowValue::Null
                }
            };
            values.push(value);
        }
        Ok(Row::new(values))
    }

    fn convert_field(
        &self,
        name: &str,
        kind: &FieldKind,
        schema: &Schema,
        value: &Value,
    ) -> Result<RowValue, ConvertError> {
        let (value, schema) = self.named.strip_union(value, schema);
        let mismatch = || ConvertError::mismatch(name, kind, value);
        let decode_err = |source: LogicalTypeError| ConvertError::LogicalType {
            field: name.to_string(),
            source,
        };

        let converted = match kind {
            FieldKind::Time => {
                tracing::warn!(field = %name, %kind, "avro codec cannot decode kind");
                return Err(ConvertError::UnsupportedType {
                    field: name.to_string(),
                    kind: kind.clone(),
                });
            }
            _ if matches!(value, Value::Null) => RowValue::Null,
            FieldKind::Null => RowValue::Null,
            FieldKind::Boolean => match value {
                Value::Boolean(b) => RowValue::Boolean(*b),
                _ => return Err(mismatch()),
            },
            // Low-byte truncation, no overflow check: 200 becomes -56.
            FieldKind::TinyInt => match value {
                Value::Int(i) => RowValue::TinyInt(*i as i8),
                Value::Long(l) => RowValue::TinyInt(*l as i8),
                _ => return Err(mismatch()),
            },
            FieldKind::SmallInt => match value {
                Value::Int(i) => RowValue::SmallInt(i16::try_from(*i).map_err(|_| mismatch())?),
                _ => return Err(mismatch()),
            },
            FieldKind::Int => match value {
                Value::Int(i) => RowValue::Int(*i),
                _ => return Err(mismatch()),
            },
            FieldKind::BigInt => match value {
                Value::Long(l) => RowValue::BigInt(*l),
                Value::Int(i) => RowValue::BigInt(i64::from(*i)),
                _ => return Err(mismatch()),
            },
            FieldKind::Float => match value {
                Value::Float(f) => RowValue::Float(*f),
                _ => return Err(mismatch()),
            },
            FieldKind::Double => match value {
                Value::Double(d) => RowValue::Double(*d),
                Value::Float(f) => RowValue::Double(f64::from(*f)),
                _ => return Err(mismatch()),
            },
            FieldKind::String => match value {
                Value::String(s) | Value::Enum(_, s) => RowValue::String(s.clone()),
                Value::Uuid(u) => RowValue::String(u.to_string()),
                _ => return Err(mismatch()),
            },
            FieldKind::Bytes => match value {
                Value::Bytes(b) | Value::Fixed(_, b) => RowValue::Bytes(b.clone()),
                _ => return Err(mismatch()),
            },
            FieldKind::Map => match (value, schema) {
                (Value::Map(entries), Schema::Map(map)) => {
                    let mut out = BTreeMap::new();
                    for (key, entry) in entries {
                        out.insert(key.clone(), self.structural_value(name, entry, &map.types)?);
                    }
                    RowValue::Map(out)
                }
                _ => return Err(mismatch()),
            },
            FieldKind::Decimal { .. } => {
                RowValue::Decimal(self.decimal_value(name, value, schema)?.ok_or_else(mismatch)?)
            }
            FieldKind::Date => {
                let epoch_day = match value {
                    Value::Date(d) | Value::Int(d) => i64::from(*d),
                    Value::Long(l) => *l,
                    _ => return Err(mismatch()),
                };
                RowValue::Date(logical::decode_date(epoch_day).map_err(decode_err)?)
            }
            FieldKind::Timestamp => {
                let ts = match value {
                    Value::TimestampMillis(ms)
                    | Value::LocalTimestampMillis(ms)
                    | Value::Long(ms) => logical::decode_timestamp(*ms, &self.offset),
                    Value::TimestampMicros(us) | Value::LocalTimestampMicros(us) => {
                        logical::decode_timestamp_micros(*us, &self.offset)
                    }
                    _ => return Err(mismatch()),
                };
                RowValue::Timestamp(ts.map_err(decode_err)?)
            }
            FieldKind::Array(element) => match value {
                Value::Array(items) => coerce_array(name, Some(items.as_slice()), element)
                    .inspect_err(|e| {
                        if let ConvertError::UnsupportedArrayElement { .. } = e {
                            tracing::warn!(field = %name, %kind, "avro codec cannot decode kind");
                        }
                    })?
                    .map_or(RowValue::Null, RowValue::Array),
                _ => return Err(mismatch()),
            },
            FieldKind::Row(nested) => match (value, schema) {
                (Value::Record(fields), Schema::Record(record)) => {
                    RowValue::Row(self.convert(&SourceRecord::new(record, fields), nested)?)
                }
                _ => return Err(mismatch()),
            },
        };
        Ok(converted)
    }

    /// `None` when the value is not decimal-shaped.
    fn decimal_value(
        &self,
        name: &str,
        value: &Value,
        schema: &Schema,
    ) -> Result<Option<BigDecimal>, ConvertError> {
        let bytes = match value {
            Value::BigDecimal(d) => return Ok(Some(d.clone())),
            Value::Decimal(d) => Cow::Owned(Vec::<u8>::try_from(d)?),
            Value::Bytes(b) | Value::Fixed(_, b) => Cow::Borrowed(b.as_slice()),
            _ => return Ok(None),
        };
        let Schema::Decimal(decimal) = schema else {
            return Err(ConvertError::MissingLogicalType {
                field: name.to_string(),
                expected: "decimal",
            });
        };
        logical::decode_decimal(&bytes, decimal.scale)
            .map(Some)
            .map_err(|source| ConvertError::LogicalType {
                field: name.to_string(),
                source,
            })
    }

    /// Schema-driven mapping of an Avro value with no declared row kind,
    /// used for map entries.
    fn structural_value(
        &self,
        name: &str,
        value: &Value,
        schema: &Schema,
    ) -> Result<RowValue, ConvertError> {
        let (value, schema) = self.named.strip_union(value, schema);
        let decode_err = |source: LogicalTypeError| ConvertError::LogicalType {
            field: name.to_string(),
            source,
        };

        let converted = match value {
            Value::Null => RowValue::Null,
            Value::Boolean(b) => RowValue::Boolean(*b),
            Value::Int(i) | Value::TimeMillis(i) => RowValue::Int(*i),
            Value::Long(l) | Value::TimeMicros(l) => RowValue::BigInt(*l),
            Value::Float(f) => RowValue::Float(*f),
            Value::Double(d) => RowValue::Double(*d),
            Value::Bytes(b) | Value::Fixed(_, b) if !matches!(schema, Schema::Decimal(_)) => {
                RowValue::Bytes(b.clone())
            }
            Value::Bytes(_) | Value::Fixed(..) | Value::Decimal(_) | Value::BigDecimal(_) => {
                match self.decimal_value(name, value, schema)? {
                    Some(d) => RowValue::Decimal(d),
                    None => return Err(ConvertError::mismatch(name, &FieldKind::Map, value)),
                }
            }
            Value::String(s) | Value::Enum(_, s) => RowValue::String(s.clone()),
            Value::Uuid(u) => RowValue::String(u.to_string()),
            Value::Union(_, inner) => self.structural_value(name, inner, schema)?,
            Value::Array(items) => {
                let items_schema = match schema {
                    Schema::Array(array) => array.items.as_ref(),
                    _ => schema,
                };
                RowValue::List(
                    items
                        .iter()
                        .map(|item| self.structural_value(name, item, items_schema))
                        .collect::<Result<_, _>>()?,
                )
            }
            Value::Map(entries) => {
                let values_schema = match schema {
                    Schema::Map(map) => map.types.as_ref(),
                    _ => schema,
                };
                let mut out = BTreeMap::new();
                for (key, entry) in entries {
                    out.insert(key.clone(), self.structural_value(name, entry, values_schema)?);
                }
                RowValue::Map(out)
            }
            Value::Record(fields) => {
                let record = match schema {
                    Schema::Record(record) => Some(record),
                    _ => None,
                };
                let mut out = BTreeMap::new();
                for (key, entry) in fields {
                    let field_schema = record
                        .and_then(|r| resolve_field(r, key))
                        .map_or(NO_SCHEMA, |f| &f.schema);
                    out.insert(key.clone(), self.structural_value(name, entry, field_schema)?);
                }
                RowValue::Map(out)
            }
            Value::Date(d) => {
                RowValue::Date(logical::decode_date(i64::from(*d)).map_err(decode_err)?)
            }
            Value::TimestampMillis(ms) | Value::LocalTimestampMillis(ms) => {
                let ts = logical::decode_timestamp(*ms, &self.offset).map_err(decode_err)?;
                RowValue::Timestamp(ts)
            }
            Value::TimestampMicros(us) | Value::LocalTimestampMicros(us) => {
                let ts = logical::decode_timestamp_micros(*us, &self.offset).map_err(decode_err)?;
                RowValue::Timestamp(ts)
            }
            Value::TimestampNanos(ns) | Value::LocalTimestampNanos(ns) => {
                let secs = ns.div_euclid(1_000_000_000);
                let nanos = ns.rem_euclid(1_000_000_000) as u32;
                let utc = DateTime::from_timestamp(secs, nanos)
                    .ok_or(LogicalTypeError::TimestampOutOfRange { epoch: *ns })
                    .map_err(decode_err)?;
                RowValue::Timestamp(utc.with_timezone(&self.offset).naive_local())
            }
            Value::Duration(_) => return Err(ConvertError::mismatch(name, &FieldKind::Map, value)),
        };
        Ok(converted)
    }
}
