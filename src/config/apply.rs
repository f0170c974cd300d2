use clap::ArgMatches;
use clap::parser::ValueSource;
use std::path::PathBuf;

use crate::args::LoadArgs;
use crate::domain::Stage;
use crate::error::{ConfigError, ValidationError};

use super::types::{ConfigFile, DurationValue};

/// Applies configuration values to CLI arguments.
///
/// Values given on the command line or through the environment win; the file
/// only replaces built-in defaults.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(
    args: &mut LoadArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> Result<(), ConfigError> {
    if is_default(matches, "port")
        && let Some(port) = config.port.as_ref()
    {
        args.port = port.as_text();
    }

    if is_default(matches, "host")
        && let Some(host) = config.host.clone()
    {
        args.host = host;
    }

    if is_default(matches, "path")
        && let Some(path) = config.path.clone()
    {
        args.path = path;
    }

    if is_default(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = Some(url);
    }

    if is_default(matches, "payload")
        && let Some(payload) = config.payload.as_ref()
    {
        args.payload = PathBuf::from(payload);
    }

    if is_default(matches, "payload_kind")
        && let Some(kind) = config.payload_kind
    {
        args.payload_kind = kind;
    }

    if is_default(matches, "content_type")
        && let Some(content_type) = config.content_type.clone()
    {
        args.content_type = content_type;
    }

    if is_default(matches, "stages")
        && let Some(stages) = config.stages.as_ref()
    {
        let mut parsed = Vec::with_capacity(stages.len());
        for (index, stage) in stages.iter().enumerate() {
            let duration = stage
                .duration
                .to_duration()
                .map_err(|err| invalid_field(format!("stages[{}].duration", index), err))?;
            parsed.push(Stage::new(duration, stage.target));
        }
        if parsed.is_empty() {
            return Err(ConfigError::StagesEmpty);
        }
        args.stages = parsed;
    }

    if is_default(matches, "pace")
        && let Some(pace) = config.pace.as_ref()
    {
        args.pace = pace
            .to_duration()
            .map_err(|err| invalid_field("pace".to_owned(), err))?;
    }

    if is_default(matches, "tick")
        && let Some(tick) = config.tick.as_ref()
    {
        args.tick = positive(tick, "tick")?;
    }

    if is_default(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = positive(timeout, "timeout")?;
    }

    if is_default(matches, "connect_timeout")
        && let Some(timeout) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = positive(timeout, "connect_timeout")?;
    }

    if is_default(matches, "expected_status")
        && let Some(status) = config.expected_status
    {
        args.expected_status = status;
    }

    if is_default(matches, "summary_json")
        && let Some(path) = config.summary_json.as_ref()
    {
        args.summary_json = Some(PathBuf::from(path));
    }

    if is_default(matches, "output_format")
        && let Some(format) = config.output_format
    {
        args.output_format = format;
    }

    if is_default(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        args.verbose = verbose;
    }

    Ok(())
}

fn is_default(matches: &ArgMatches, name: &str) -> bool {
    !matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn positive(value: &DurationValue, field: &str) -> Result<std::time::Duration, ConfigError> {
    value
        .to_positive_duration()
        .map_err(|err| invalid_field(field.to_owned(), err))
}

const fn invalid_field(field: String, source: ValidationError) -> ConfigError {
    ConfigError::InvalidField { field, source }
}
