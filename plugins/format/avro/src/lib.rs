//! Avro → row conversion.
//!
//! [`AvroRowConverter`] turns schema-tagged Avro records into [`Row`]s that
//! conform to a caller-supplied [`RowType`]. Fields missing from the source
//! schema become `null`; everything else is dispatched on the declared
//! [`FieldKind`](tabula_api::FieldKind).
//!
//! [`Row`]: tabula_api::Row
//! [`RowType`]: tabula_api::RowType

mod array;
mod codec;
mod config;
mod convert;
mod error;
pub mod logical;
mod schema;
mod source;

pub use array::coerce_array;
pub use codec::AvroRowConverter;
pub use config::{AvroRowConfig, parse_zone_offset};
pub use error::ConvertError;
pub use logical::LogicalTypeError;
pub use schema::{NamedSchemas, resolve_field, row_type_from_schema};
pub use source::SourceRecord;
