use std::collections::HashMap;

use apache_avro::Schema;
use apache_avro::schema::{RecordField, RecordSchema};
use apache_avro::types::Value;
use tabula_api::{FieldKind, RowField, RowType};

use crate::error::ConvertError;

// ═══════════════════════════════════════════════════════════════
//  Field resolver
// ═══════════════════════════════════════════════════════════════

/// Look up a field by name. `None` is a normal outcome: the caller maps it
/// to a null row value.
pub fn resolve_field<'s>(schema: &'s RecordSchema, name: &str) -> Option<&'s RecordField> {
    schema
        .lookup
        .get(name)
        .and_then(|&pos| schema.fields.get(pos))
}

// ═══════════════════════════════════════════════════════════════
//  Named schemas
// ═══════════════════════════════════════════════════════════════

/// Named types (records, enums, fixed) of a schema, keyed by full name.
///
/// Built once when the codec is created so `Schema::Ref` nodes can be
/// followed during conversion without re-walking the schema.
#[derive(Debug, Default, Clone)]
pub struct NamedSchemas {
    by_name: HashMap<String, Schema>,
}

impl NamedSchemas {
    pub fn collect(schema: &Schema) -> Self {
        let mut named = Self::default();
        named.visit(schema);
        named
    }

    fn visit(&mut self, schema: &Schema) {
        match schema {
            Schema::Record(record) => {
                let key = record.name.fullname(None);
                if self.by_name.contains_key(&key) {
                    return;
                }
                self.by_name.insert(key, schema.clone());
                for field in &record.fields {
                    self.visit(&field.schema);
                }
            }
            Schema::Enum(e) => {
                self.by_name.insert(e.name.fullname(None), schema.clone());
            }
            Schema::Fixed(f) => {
                self.by_name.insert(f.name.fullname(None), schema.clone());
            }
            Schema::Array(array) => self.visit(&array.items),
            Schema::Map(map) => self.visit(&map.types),
            Schema::Union(union) => {
                for variant in union.variants() {
                    self.visit(variant);
                }
            }
            Schema::Decimal(decimal) => self.visit(&decimal.inner),
            _ => {}
        }
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Follow a `Schema::Ref`; any other schema is returned as is.
    /// Unknown references are returned unresolved.
    pub fn resolve<'s>(&'s self, schema: &'s Schema) -> &'s Schema {
        match schema {
            Schema::Ref { name } => self.by_name.get(&name.fullname(None)).unwrap_or(schema),
            other => other,
        }
    }

    /// Strip a union from a value/schema pair and resolve references.
    ///
    /// The branch index of a `Value::Union` selects the schema variant. A
    /// bare value under a union schema takes the first non-null variant.
    pub fn strip_union<'v, 's>(
        &'s self,
        value: &'v Value,
        schema: &'s Schema,
    ) -> (&'v Value, &'s Schema) {
        let schema = self.resolve(schema);
        match (value, schema) {
            (Value::Union(idx, inner), Schema::Union(union)) => {
                let variant = union
                    .variants()
                    .get(*idx as usize)
                    .unwrap_or(schema);
                self.strip_union(inner, variant)
            }
            (Value::Union(_, inner), _) => self.strip_union(inner, schema),
            (_, Schema::Union(union)) => match non_null_variant(union.variants()) {
                Some(variant) => (value, self.resolve(variant)),
                None => (value, schema),
            },
            _ => (value, schema),
        }
    }

    /// Record schema behind `schema`, looking through refs and nullable unions.
    pub fn record_schema<'s>(&'s self, schema: &'s Schema) -> Option<&'s RecordSchema> {
        match self.resolve(schema) {
            Schema::Record(record) => Some(record),
            Schema::Union(union) => union
                .variants()
                .iter()
                .find_map(|variant| match self.resolve(variant) {
                    Schema::Record(record) => Some(record),
                    _ => None,
                }),
            _ => None,
        }
    }
}

fn non_null_variant(variants: &[Schema]) -> Option<&Schema> {
    variants.iter().find(|v| !matches!(v, Schema::Null))
}

// ═══════════════════════════════════════════════════════════════
//  Avro schema → RowType
// ═══════════════════════════════════════════════════════════════

/// Default row type for an Avro record schema: one field per record
/// field, in declaration order.
pub fn row_type_from_schema(schema: &Schema) -> Result<RowType, ConvertError> {
    let named = NamedSchemas::collect(schema);
    match named.record_schema(schema) {
        Some(record) => record_row_type(record, &named),
        None => Err(ConvertError::NotARecord {
            found: format!("{schema:?}"),
        }),
    }
}

fn record_row_type(record: &RecordSchema, named: &NamedSchemas) -> Result<RowType, ConvertError> {
    let fields = record
        .fields
        .iter()
        .map(|f| Ok(RowField::new(f.name.clone(), schema_kind(&f.name, &f.schema, named)?)))
        .collect::<Result<Vec<_>, ConvertError>>()?;
    RowType::new(fields).map_err(|e| ConvertError::Config(e.to_string()))
}

fn schema_kind(
    field: &str,
    schema: &Schema,
    named: &NamedSchemas,
) -> Result<FieldKind, ConvertError> {
    let kind = match named.resolve(schema) {
        Schema::Null => FieldKind::Null,
        Schema::Boolean => FieldKind::Boolean,
        Schema::Int => FieldKind::Int,
        Schema::Long => FieldKind::BigInt,
        Schema::Float => FieldKind::Float,
        Schema::Double => FieldKind::Double,
        Schema::String | Schema::Enum(_) | Schema::Uuid => FieldKind::String,
        Schema::Bytes | Schema::Fixed(_) => FieldKind::Bytes,
        Schema::Decimal(d) => FieldKind::Decimal {
            precision: u8::try_from(d.precision).unwrap_or(u8::MAX),
            scale: u8::try_from(d.scale).unwrap_or(u8::MAX),
        },
        Schema::Date => FieldKind::Date,
        Schema::TimeMillis | Schema::TimeMicros => FieldKind::Time,
        Schema::TimestampMillis
        | Schema::TimestampMicros
        | Schema::LocalTimestampMillis
        | Schema::LocalTimestampMicros => FieldKind::Timestamp,
        Schema::Array(array) => FieldKind::array(schema_kind(field, &array.items, named)?),
        Schema::Map(_) => FieldKind::Map,
        Schema::Record(record) => FieldKind::Row(record_row_type(record, named)?),
        Schema::Union(union) => match non_null_variant(union.variants()) {
            Some(variant) if union.variants().len() <= 2 => schema_kind(field, variant, named)?,
            _ => {
                return Err(ConvertError::Config(format!(
                    "field '{field}': only [\"null\", T] unions map to a row field"
                )));
            }
        },
        other => {
            return Err(ConvertError::Config(format!(
                "field '{field}': no row kind for avro schema {other:?}"
            )));
        }
    };
    Ok(kind)
}
