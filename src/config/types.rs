use std::time::Duration;

use serde::Deserialize;

use crate::args::{OutputFormat, PayloadKind, parse_duration_value};
use crate::error::ValidationError;

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub port: Option<PortValue>,
    pub host: Option<String>,
    pub path: Option<String>,
    pub url: Option<String>,
    pub payload: Option<String>,
    pub payload_kind: Option<PayloadKind>,
    pub content_type: Option<String>,
    pub stages: Option<Vec<StageConfig>>,
    pub pace: Option<DurationValue>,
    pub tick: Option<DurationValue>,
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub expected_status: Option<u16>,
    pub summary_json: Option<String>,
    pub output_format: Option<OutputFormat>,
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StageConfig {
    pub duration: DurationValue,
    pub target: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    Number(u16),
    Text(String),
}

impl PortValue {
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            PortValue::Number(port) => port.to_string(),
            PortValue::Text(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_value(text),
        }
    }

    pub(crate) fn to_positive_duration(&self) -> Result<Duration, ValidationError> {
        let duration = self.to_duration()?;
        if duration.is_zero() {
            return Err(ValidationError::DurationZero);
        }
        Ok(duration)
    }
}
