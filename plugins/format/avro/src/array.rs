use apache_avro::types::Value;
use tabula_api::{FieldKind, TypedArray};

use crate::error::ConvertError;

/// Coerce an Avro array into a typed array of `element` kind.
///
/// `None` in gives `None` out, never an empty array. Only the nine scalar
/// kinds are accepted as elements; composite and logical kinds fail with
/// [`ConvertError::UnsupportedArrayElement`].
pub fn coerce_array(
    field: &str,
    values: Option<&[Value]>,
    element: &FieldKind,
) -> Result<Option<TypedArray>, ConvertError> {
    let Some(values) = values else {
        return Ok(None);
    };

    let array = match element {
        FieldKind::Boolean => TypedArray::Boolean(cast_each(field, values, element, |v| match v {
            Value::Boolean(b) => Some(*b),
            _ => None,
        })?),
        // Same low-byte truncation as scalar tinyint fields.
        FieldKind::TinyInt => TypedArray::TinyInt(cast_each(field, values, element, |v| match v {
            Value::Int(i) => Some(*i as i8),
            Value::Long(l) => Some(*l as i8),
            _ => None,
        })?),
        FieldKind::SmallInt => TypedArray::SmallInt(cast_each(field, values, element, |v| match v {
            Value::Int(i) => i16::try_from(*i).ok(),
            _ => None,
        })?),
        FieldKind::Int => TypedArray::Int(cast_each(field, values, element, |v| match v {
            Value::Int(i) => Some(*i),
            _ => None,
        })?),
        FieldKind::BigInt => TypedArray::BigInt(cast_each(field, values, element, |v| match v {
            Value::Long(l) => Some(*l),
            Value::Int(i) => Some(i64::from(*i)),
            _ => None,
        })?),
        FieldKind::Float => TypedArray::Float(cast_each(field, values, element, |v| match v {
            Value::Float(f) => Some(*f),
            _ => None,
        })?),
        FieldKind::Double => TypedArray::Double(cast_each(field, values, element, |v| match v {
            Value::Double(d) => Some(*d),
            Value::Float(f) => Some(f64::from(*f)),
            _ => None,
        })?),
        FieldKind::String => TypedArray::String(cast_each(field, values, element, element_text)?),
        FieldKind::Bytes => TypedArray::Bytes(cast_each(field, values, element, |v| match v {
            Value::Bytes(b) | Value::Fixed(_, b) => Some(b.clone()),
            _ => None,
        })?),
        FieldKind::Decimal { .. }
        | FieldKind::Date
        | FieldKind::Time
        | FieldKind::Timestamp
        | FieldKind::Array(_)
        | FieldKind::Row(_)
        | FieldKind::Map
        | FieldKind::Null => {
            return Err(ConvertError::UnsupportedArrayElement {
                field: field.to_string(),
                kind: element.clone(),
            });
        }
    };
    Ok(Some(array))
}

/// Text form of a scalar array element.
fn element_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) | Value::Enum(_, s) => Some(s.clone()),
        Value::Uuid(u) => Some(u.to_string()),
        Value::Boolean(b) => Some(b.to_string()),
        Value::Int(i) => Some(i.to_string()),
        Value::Long(l) => Some(l.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Double(d) => Some(d.to_string()),
        _ => None,
    }
}

fn cast_each<T>(
    field: &str,
    values: &[Value],
    element: &FieldKind,
    cast: impl Fn(&Value) -> Option<T>,
) -> Result<Vec<Option<T>>, ConvertError> {
    values
        .iter()
        .map(|value| match strip(value) {
            Value::Null => Ok(None),
            v => cast(v)
                .map(Some)
                .ok_or_else(|| ConvertError::mismatch(field, element, v)),
        })
        .collect()
}

fn strip(value: &Value) -> &Value {
    match value {
        Value::Union(_, inner) => strip(inner),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use tabula_api::{RowField, RowType};

    use super::*;

    fn strings(items: &[&str]) -> Vec<Value> {
        items.iter().map(|s| Value::String(s.to_string())).collect()
    }

    #[test]
    fn strings_keep_order_and_length() {
        let values = strings(&["a", "b", "c"]);
        let out = coerce_array("tags", Some(values.as_slice()), &FieldKind::String).unwrap();
        assert_eq!(
            out,
            Some(TypedArray::String(vec![
                Some("a".into()),
                Some("b".into()),
                Some("c".into()),
            ]))
        );
    }

    #[test]
    fn null_input_stays_null() {
        for kind in [FieldKind::String, FieldKind::Int, FieldKind::Double] {
            assert_eq!(coerce_array("f", None, &kind).unwrap(), None);
        }
    }

    #[test]
    fn empty_input_is_an_empty_array() {
        let out = coerce_array("f", Some(&[] as &[Value]), &FieldKind::BigInt).unwrap();
        assert_eq!(out, Some(TypedArray::BigInt(vec![])));
    }

    #[test]
    fn nullable_elements_are_kept() {
        let values = vec![
            Value::Union(1, Box::new(Value::Long(5))),
            Value::Union(0, Box::new(Value::Null)),
        ];
        let out = coerce_array("f", Some(values.as_slice()), &FieldKind::BigInt).unwrap();
        assert_eq!(out, Some(TypedArray::BigInt(vec![Some(5), None])));
    }

    #[test]
    fn tinyint_elements_truncate() {
        let values = vec![Value::Int(200), Value::Int(-1), Value::Int(256)];
        let out = coerce_array("f", Some(values.as_slice()), &FieldKind::TinyInt).unwrap();
        assert_eq!(out, Some(TypedArray::TinyInt(vec![Some(-56), Some(-1), Some(0)])));
    }

    #[test]
    fn smallint_elements_are_range_checked() {
        let values = vec![Value::Int(70_000)];
        let err = coerce_array("f", Some(values.as_slice()), &FieldKind::SmallInt).unwrap_err();
        assert!(matches!(err, ConvertError::TypeMismatch { .. }));
    }

    #[test]
    fn mismatched_element_fails() {
        let values = vec![Value::Int(1), Value::String("x".into())];
        let err = coerce_array("ids", Some(values.as_slice()), &FieldKind::Int).unwrap_err();
        assert_eq!(err.to_string(), "field 'ids': expected int, found avro string");
    }

    #[test]
    fn composite_elements_are_unsupported() {
        let nested = RowType::new(vec![RowField::new("x", FieldKind::Int)]).unwrap();
        for kind in [
            FieldKind::Row(nested),
            FieldKind::array(FieldKind::Int),
            FieldKind::Decimal { precision: 10, scale: 2 },
            FieldKind::Date,
            FieldKind::Timestamp,
        ] {
            let err = coerce_array("f", Some(&[] as &[Value]), &kind).unwrap_err();
            assert!(
                matches!(&err, ConvertError::UnsupportedArrayElement { kind: k, .. } if *k == kind),
                "{err}"
            );
        }
    }
}
