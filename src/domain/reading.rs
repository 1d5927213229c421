use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use super::BridgeError;

/// Payload served before the decoder has produced anything.
pub const ZERO_READING: &str = "{\"attention\":\"0\",\"meditation\":\"0\",\"delta\":\"0\",\"theta\":\"0\",\"low_alpha\":\"0\",\"high_alpha\":\"0\",\"low_beta\":\"0\",\"high_beta\":\"0\",\"low_gamma\":\"0\",\"mid_gamma\":\"0\"}";

/// One JSON snapshot of the EEG band values, kept as opaque text.
///
/// The bridge never parses what the decoder hands over; it stores and forwards
/// the exact bytes. Cloning is a pointer copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reading(Arc<str>);

impl Reading {
    pub fn new<P: Into<Arc<str>>>(payload: P) -> Self {
        Self(payload.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Reading {
    fn default() -> Self {
        Self::new(ZERO_READING)
    }
}

impl From<String> for Reading {
    fn from(payload: String) -> Self {
        Self::new(payload)
    }
}

impl From<&str> for Reading {
    fn from(payload: &str) -> Self {
        Self::new(payload)
    }
}

impl AsRef<str> for Reading {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Typed band powers for sources that build readings in-process.
///
/// Values serialize as JSON strings (`"attention":"42"`) because that is what
/// the headset library emits and what existing dashboards read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandPowers {
    #[serde(serialize_with = "band_to_str", deserialize_with = "band_from_str")]
    pub attention:  u32,
    #[serde(serialize_with = "band_to_str", deserialize_with = "band_from_str")]
    pub meditation: u32,
    #[serde(serialize_with = "band_to_str", deserialize_with = "band_from_str")]
    pub delta:      u32,
    #[serde(serialize_with = "band_to_str", deserialize_with = "band_from_str")]
    pub theta:      u32,
    #[serde(serialize_with = "band_to_str", deserialize_with = "band_from_str")]
    pub low_alpha:  u32,
    #[serde(serialize_with = "band_to_str", deserialize_with = "band_from_str")]
    pub high_alpha: u32,
    #[serde(serialize_with = "band_to_str", deserialize_with = "band_from_str")]
    pub low_beta:   u32,
    #[serde(serialize_with = "band_to_str", deserialize_with = "band_from_str")]
    pub high_beta:  u32,
    #[serde(serialize_with = "band_to_str", deserialize_with = "band_from_str")]
    pub low_gamma:  u32,
    #[serde(serialize_with = "band_to_str", deserialize_with = "band_from_str")]
    pub mid_gamma:  u32
}

impl BandPowers {
    pub fn to_reading(&self) -> Result<Reading, BridgeError> {
        Ok(Reading::from(serde_json::to_string(self)?))
    }

    pub fn from_reading(reading: &Reading) -> Result<Self, BridgeError> {
        Ok(serde_json::from_str(reading.as_str())?)
    }
}

fn band_to_str<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

fn band_from_str<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = String::deserialize(deserializer)?;
    u32::from_str(&raw).map_err(de::Error::custom)
}
