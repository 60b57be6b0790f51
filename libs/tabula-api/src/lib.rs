//! Row model shared by every format codec and sink.
//!
//! A [`RowType`] is configuration-time state describing an ordered list of
//! named, typed fields. A [`Row`] is the positional value tuple that conforms
//! to it. Codecs produce rows, sinks consume them; neither side needs to know
//! the other's wire format.

pub mod error;
pub mod layout;
pub mod schema;
pub mod value;

pub use error::{ErrorKind, RowError};
pub use layout::KeyedRowLayout;
pub use schema::{FieldKind, RowField, RowType};
pub use value::{Row, RowValue, TypedArray};
