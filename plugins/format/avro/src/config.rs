use chrono::FixedOffset;

use crate::error::ConvertError;

/// Codec configuration, usually embedded as JSON in a pipeline config.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct AvroRowConfig {
    /// Path to the Avro schema file (.avsc).
    pub schema_path: String,
    /// Fixed offset timestamps are rendered at, e.g. `"+02:00"`. Empty means UTC.
    pub zone_offset: String,
}

impl AvroRowConfig {
    pub fn from_json(json: &str) -> Result<Self, ConvertError> {
        serde_json::from_str(json).map_err(|e| ConvertError::Config(format!("avro config: {e}")))
    }

    pub fn offset(&self) -> Result<FixedOffset, ConvertError> {
        parse_zone_offset(&self.zone_offset)
    }
}

/// Parse `"Z"`, `"UTC"`, `"+05:30"` or `"-0800"` into a fixed offset.
pub fn parse_zone_offset(s: &str) -> Result<FixedOffset, ConvertError> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(|| ConvertError::Config("utc offset".into()));
    }
    s.parse::<FixedOffset>()
        .map_err(|e| ConvertError::Config(format!("invalid zone_offset '{s}': {e}")))
}
