use serde::{Deserialize, Serialize};

use crate::error::RowError;

// ════════════════════════════════════════════════════════════════
//  Field Kind
// ════════════════════════════════════════════════════════════════

/// Logical type of a row field.
///
/// Closed set: every dispatch site matches it exhaustively, so adding a
/// variant forces each codec and sink to decide how to handle it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Boolean,
    #[serde(rename = "tinyint")]
    TinyInt,
    #[serde(rename = "smallint")]
    SmallInt,
    Int,
    #[serde(rename = "bigint")]
    BigInt,
    Float,
    Double,
    String,
    Bytes,
    /// Arbitrary precision. The scale applied on decode comes from the
    /// source schema; these values describe the target column.
    Decimal { precision: u8, scale: u8 },
    /// Calendar date without zone.
    Date,
    /// Time of day without zone.
    Time,
    /// Date-time rendered at the codec's zone offset.
    Timestamp,
    /// Homogeneous array. Only scalar element kinds can be coerced.
    Array(Box<FieldKind>),
    /// Nested row.
    Row(RowType),
    /// String-keyed map carried structurally.
    Map,
    Null,
}

impl FieldKind {
    pub fn array(element: FieldKind) -> Self {
        FieldKind::Array(Box::new(element))
    }

    /// Scalar kinds that need no logical-type decoding.
    pub fn is_basic(&self) -> bool {
        matches!(
            self,
            FieldKind::Boolean
                | FieldKind::TinyInt
                | FieldKind::SmallInt
                | FieldKind::Int
                | FieldKind::BigInt
                | FieldKind::Float
                | FieldKind::Double
                | FieldKind::String
                | FieldKind::Bytes
        )
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::Boolean => write!(f, "boolean"),
            FieldKind::TinyInt => write!(f, "tinyint"),
            FieldKind::SmallInt => write!(f, "smallint"),
            FieldKind::Int => write!(f, "int"),
            FieldKind::BigInt => write!(f, "bigint"),
            FieldKind::Float => write!(f, "float"),
            FieldKind::Double => write!(f, "double"),
            FieldKind::String => write!(f, "string"),
            FieldKind::Bytes => write!(f, "bytes"),
            FieldKind::Decimal { precision, scale } => write!(f, "decimal({precision},{scale})"),
            FieldKind::Date => write!(f, "date"),
            FieldKind::Time => write!(f, "time"),
            FieldKind::Timestamp => write!(f, "timestamp"),
            FieldKind::Array(element) => write!(f, "array<{element}>"),
            FieldKind::Row(row_type) => {
                write!(f, "row<")?;
                for (i, field) in row_type.fields().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.kind)?;
                }
                write!(f, ">")
            }
            FieldKind::Map => write!(f, "map"),
            FieldKind::Null => write!(f, "null"),
        }
    }
}

// ════════════════════════════════════════════════════════════════
//  RowField & RowType
// ════════════════════════════════════════════════════════════════

/// One named field of a row type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowField {
    pub name: String,
    pub kind: FieldKind,
}

impl RowField {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered field list. Position `i` here is position `i` in every [`Row`]
/// built for this type.
///
/// Names are unique. Nested row types are owned, so the tree is finite and
/// acyclic and recursive conversion always terminates.
///
/// [`Row`]: crate::value::Row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RowField>", into = "Vec<RowField>")]
pub struct RowType {
    fields: Vec<RowField>,
}

impl RowType {
    pub fn new(fields: Vec<RowField>) -> Result<Self, RowError> {
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(RowError::DuplicateField(field.name.clone()));
            }
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[RowField] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&RowField> {
        self.fields.get(index)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Nesting depth: 1 for a flat row, +1 per level of nested `Row` kinds.
    pub fn depth(&self) -> usize {
        1 + self
            .fields
            .iter()
            .map(|f| kind_depth(&f.kind))
            .max()
            .unwrap_or(0)
    }
}

fn kind_depth(kind: &FieldKind) -> usize {
    match kind {
        FieldKind::Row(nested) => nested.depth(),
        FieldKind::Array(element) => kind_depth(element),
        _ => 0,
    }
}

impl TryFrom<Vec<RowField>> for RowType {
    type Error = RowError;

    fn try_from(fields: Vec<RowField>) -> Result<Self, Self::Error> {
        RowType::new(fields)
    }
}

impl From<RowType> for Vec<RowField> {
    fn from(row_type: RowType) -> Self {
        row_type.fields
    }
}
