//! Decoders for Avro logical types layered on primitive encodings.
//!
//! Pure functions: no schema lookups, no allocation beyond the result.

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use num_bigint::BigInt;

/// `NaiveDate::num_days_from_ce()` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogicalTypeError {
    #[error("decimal has no unscaled bytes")]
    EmptyDecimal,

    #[error("decimal scale {scale} is out of range")]
    ScaleOutOfRange { scale: usize },

    #[error("epoch day {epoch_day} is outside the supported date range")]
    DateOutOfRange { epoch_day: i64 },

    #[error("epoch timestamp {epoch} is outside the supported date-time range")]
    TimestampOutOfRange { epoch: i64 },
}

/// `bytes` is the big-endian two's-complement unscaled value;
/// result is `unscaled × 10^-scale`.
pub fn decode_decimal(bytes: &[u8], scale: usize) -> Result<BigDecimal, LogicalTypeError> {
    if bytes.is_empty() {
        return Err(LogicalTypeError::EmptyDecimal);
    }
    let scale = i64::try_from(scale).map_err(|_| LogicalTypeError::ScaleOutOfRange { scale })?;
    let unscaled = BigInt::from_signed_bytes_be(bytes);
    Ok(BigDecimal::new(unscaled, scale))
}

/// 1970-01-01 plus `epoch_day` days.
pub fn decode_date(epoch_day: i64) -> Result<NaiveDate, LogicalTypeError> {
    i32::try_from(epoch_day)
        .ok()
        .and_then(|days| days.checked_add(UNIX_EPOCH_DAYS_FROM_CE))
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or(LogicalTypeError::DateOutOfRange { epoch_day })
}

/// Epoch plus `epoch_millis`, as local date-time at `offset`.
pub fn decode_timestamp(
    epoch_millis: i64,
    offset: &FixedOffset,
) -> Result<NaiveDateTime, LogicalTypeError> {
    DateTime::from_timestamp_millis(epoch_millis)
        .map(|utc| utc.with_timezone(offset).naive_local())
        .ok_or(LogicalTypeError::TimestampOutOfRange { epoch: epoch_millis })
}

/// Microsecond variant of [`decode_timestamp`].
pub fn decode_timestamp_micros(
    epoch_micros: i64,
    offset: &FixedOffset,
) -> Result<NaiveDateTime, LogicalTypeError> {
    DateTime::from_timestamp_micros(epoch_micros)
        .map(|utc| utc.with_timezone(offset).naive_local())
        .ok_or(LogicalTypeError::TimestampOutOfRange { epoch: epoch_micros })
}
