use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::schema::{FieldKind, RowType};

/// Owned row value.
///
/// One variant per [`FieldKind`], plus `List` for untyped sequences that
/// only appear inside `Map` values.
#[derive(Debug, Clone, PartialEq)]
pub enum RowValue {
    Null,
    Boolean(bool),
    TinyInt(i8),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Decimal(BigDecimal),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    Array(TypedArray),
    Row(Row),
    Map(BTreeMap<String, RowValue>),
    List(Vec<RowValue>),
}

impl RowValue {
    pub fn is_null(&self) -> bool {
        matches!(self, RowValue::Null)
    }

    /// `true` if this value may sit in a field of `kind`. Null fits any kind.
    pub fn conforms_to(&self, kind: &FieldKind) -> bool {
        match (self, kind) {
            (RowValue::Null, _) => true,
            (RowValue::Boolean(_), FieldKind::Boolean)
            | (RowValue::TinyInt(_), FieldKind::TinyInt)
            | (RowValue::SmallInt(_), FieldKind::SmallInt)
            | (RowValue::Int(_), FieldKind::Int)
            | (RowValue::BigInt(_), FieldKind::BigInt)
            | (RowValue::Float(_), FieldKind::Float)
            | (RowValue::Double(_), FieldKind::Double)
            | (RowValue::String(_), FieldKind::String)
            | (RowValue::Bytes(_), FieldKind::Bytes)
            | (RowValue::Decimal(_), FieldKind::Decimal { .. })
            | (RowValue::Date(_), FieldKind::Date)
            | (RowValue::Time(_), FieldKind::Time)
            | (RowValue::Timestamp(_), FieldKind::Timestamp)
            | (RowValue::Map(_), FieldKind::Map) => true,
            (RowValue::Array(array), FieldKind::Array(element)) => {
                array.element_kind() == **element
            }
            (RowValue::Row(row), FieldKind::Row(row_type)) => row.conforms_to(row_type),
            _ => false,
        }
    }
}

// ════════════════════════════════════════════════════════════════
//  TypedArray
// ════════════════════════════════════════════════════════════════

/// Fixed-length homogeneous array. Elements may be individually null.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedArray {
    Boolean(Vec<Option<bool>>),
    TinyInt(Vec<Option<i8>>),
    SmallInt(Vec<Option<i16>>),
    Int(Vec<Option<i32>>),
    BigInt(Vec<Option<i64>>),
    Float(Vec<Option<f32>>),
    Double(Vec<Option<f64>>),
    String(Vec<Option<String>>),
    Bytes(Vec<Option<Vec<u8>>>),
}

impl TypedArray {
    pub fn len(&self) -> usize {
        match self {
            TypedArray::Boolean(v) => v.len(),
            TypedArray::TinyInt(v) => v.len(),
            TypedArray::SmallInt(v) => v.len(),
            TypedArray::Int(v) => v.len(),
            TypedArray::BigInt(v) => v.len(),
            TypedArray::Float(v) => v.len(),
            TypedArray::Double(v) => v.len(),
            TypedArray::String(v) => v.len(),
            TypedArray::Bytes(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn element_kind(&self) -> FieldKind {
        match self {
            TypedArray::Boolean(_) => FieldKind::Boolean,
            TypedArray::TinyInt(_) => FieldKind::TinyInt,
            TypedArray::SmallInt(_) => FieldKind::SmallInt,
            TypedArray::Int(_) => FieldKind::Int,
            TypedArray::BigInt(_) => FieldKind::BigInt,
            TypedArray::Float(_) => FieldKind::Float,
            TypedArray::Double(_) => FieldKind::Double,
            TypedArray::String(_) => FieldKind::String,
            TypedArray::Bytes(_) => FieldKind::Bytes,
        }
    }
}

// ════════════════════════════════════════════════════════════════
//  Row
// ════════════════════════════════════════════════════════════════

/// Positional array of values. Order matches `RowType::fields`.
///
/// Values only, no names or kinds: all metadata lives in the [`RowType`]
/// the row was built for. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Row(Vec<RowValue>);

impl Row {
    pub fn new(values: Vec<RowValue>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RowValue> {
        self.0.get(index)
    }

    pub fn values(&self) -> &[RowValue] {
        &self.0
    }

    pub fn into_values(self) -> Vec<RowValue> {
        self.0
    }

    /// Length matches and every position conforms to its field kind,
    /// recursively through arrays and nested rows.
    pub fn conforms_to(&self, row_type: &RowType) -> bool {
        self.len() == row_type.len()
            && self
                .0
                .iter()
                .zip(row_type.fields())
                .all(|(value, field)| value.conforms_to(&field.kind))
    }
}
