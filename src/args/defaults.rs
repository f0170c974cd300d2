use std::time::Duration;

use crate::domain::Stage;

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("loadstage/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_PORT: &str = "8500";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PATH: &str = "/predict";
pub const DEFAULT_PAYLOAD_PATH: &str = "larry.jpeg";
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";
pub const DEFAULT_EXPECTED_STATUS: u16 = 200;

/// Ramp to 5 users over 30s, hold for a minute, ramp down over 10s.
#[must_use]
pub fn default_stages() -> Vec<Stage> {
    vec![
        Stage::new(Duration::from_secs(30), 5),
        Stage::new(Duration::from_secs(60), 5),
        Stage::new(Duration::from_secs(10), 0),
    ]
}
