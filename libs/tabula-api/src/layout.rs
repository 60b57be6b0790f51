use crate::error::RowError;
use crate::schema::RowType;
use crate::value::{Row, RowValue};

/// Row layout for key-value sinks: one field is the record key, the
/// remaining fields become columns.
///
/// Built once per sink from the row type it consumes. Only basic scalar
/// kinds can be stored, so construction rejects anything else up front.
#[derive(Debug, Clone)]
pub struct KeyedRowLayout {
    names: Vec<String>,
    key_index: usize,
}

impl KeyedRowLayout {
    pub fn new(row_type: &RowType, key_alias: &str) -> Result<Self, RowError> {
        let key_index = row_type
            .index_of(key_alias)
            .ok_or_else(|| RowError::KeyNotFound(key_alias.to_string()))?;

        for field in row_type.fields() {
            if !field.kind.is_basic() {
                return Err(RowError::UnsupportedSinkField {
                    field: field.name.clone(),
                    kind: field.kind.clone(),
                });
            }
        }

        Ok(Self {
            names: row_type.field_names().map(str::to_string).collect(),
            key_index,
        })
    }

    pub fn key_index(&self) -> usize {
        self.key_index
    }

    pub fn key_name(&self) -> &str {
        &self.names[self.key_index]
    }

    pub fn key<'r>(&self, row: &'r Row) -> Option<&'r RowValue> {
        row.get(self.key_index)
    }

    /// Non-key `(name, value)` pairs in row order.
    ///
    /// `row` must conform to the row type the layout was built from.
    pub fn columns<'r>(&'r self, row: &'r Row) -> impl Iterator<Item = (&'r str, &'r RowValue)> {
        debug_assert_eq!(row.len(), self.names.len(), "row does not match keyed layout");
        self.names
            .iter()
            .zip(row.values())
            .enumerate()
            .filter(move |(i, _)| *i != self.key_index)
            .map(|(_, (name, value))| (name.as_str(), value))
    }
}
