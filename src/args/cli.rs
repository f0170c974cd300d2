use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::Stage;

use super::defaults::{
    DEFAULT_CONTENT_TYPE, DEFAULT_EXPECTED_STATUS, DEFAULT_HOST, DEFAULT_PATH,
    DEFAULT_PAYLOAD_PATH, DEFAULT_PORT,
};
use super::parsers::{parse_duration_arg, parse_positive_duration_arg, parse_stage_arg};
use super::types::{OutputFormat, PayloadKind};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Staged virtual-user HTTP load generator - ramps concurrent clients through timed stages, checks every response, and reports an aggregate summary."
)]
pub struct LoadArgs {
    /// Target port; the target is http://<host>:<port><path>
    #[arg(long, env = "PORT", default_value = DEFAULT_PORT)]
    pub port: String,

    /// Target host
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Request path on the target
    #[arg(long, default_value = DEFAULT_PATH)]
    pub path: String,

    /// Full base URL (overrides host and port; path is still joined)
    #[arg(long, short)]
    pub url: Option<String>,

    /// Payload file, read once at startup
    #[arg(long, short = 'p', default_value = DEFAULT_PAYLOAD_PATH)]
    pub payload: PathBuf,

    /// How the payload is sent
    #[arg(long = "payload-kind", value_enum, default_value_t = PayloadKind::Binary, ignore_case = true)]
    pub payload_kind: PayloadKind,

    /// Content-Type of the payload
    #[arg(long = "content-type", short = 'T', default_value = DEFAULT_CONTENT_TYPE)]
    pub content_type: String,

    /// Stage as DURATION:TARGET (repeatable, e.g. -s 30s:5 -s 1m:5 -s 10s:0)
    #[arg(long = "stage", short = 's', value_parser = parse_stage_arg)]
    pub stages: Vec<Stage>,

    /// Delay between iterations of one virtual user (supports ms/s/m/h)
    #[arg(long, value_parser = parse_duration_arg, default_value = "500ms")]
    pub pace: Duration,

    /// Control loop interval of the stage scheduler (supports ms/s/m/h)
    #[arg(long, value_parser = parse_positive_duration_arg, default_value = "1s")]
    pub tick: Duration,

    /// Request timeout (supports ms/s/m/h)
    #[arg(long = "timeout", value_parser = parse_positive_duration_arg, default_value = "60s")]
    pub request_timeout: Duration,

    /// Connect timeout (supports ms/s/m/h)
    #[arg(long = "connect-timeout", value_parser = parse_positive_duration_arg, default_value = "10s")]
    pub connect_timeout: Duration,

    /// Status code the check expects
    #[arg(long = "expected-status", default_value_t = DEFAULT_EXPECTED_STATUS)]
    pub expected_status: u16,

    /// Path to config file (TOML or JSON)
    #[arg(long, short)]
    pub config: Option<String>,

    /// Write the final summary as JSON to this path
    #[arg(long = "summary-json")]
    pub summary_json: Option<PathBuf>,

    /// Summary format printed to stdout
    #[arg(long = "output-format", value_enum, default_value_t = OutputFormat::Text, ignore_case = true)]
    pub output_format: OutputFormat,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}
