use std::time::Duration;

use crate::domain::Stage;
use crate::error::{AppError, AppResult, ValidationError};

/// Parses a duration such as `500ms`, `30s`, `1m`, `2h`, or a compound
/// `1m30s`. A bare number is read as seconds. Zero is accepted.
///
/// # Errors
///
/// Returns an error for empty input, unknown units, or overflow.
pub(crate) fn parse_duration_value(s: &str) -> Result<Duration, ValidationError> {
    let value = s.trim();
    if value.is_empty() {
        return Err(ValidationError::DurationEmpty);
    }
    if value.chars().all(|ch| ch.is_ascii_digit()) {
        let secs: u64 = value
            .parse()
            .map_err(|err| ValidationError::InvalidDurationNumber {
                value: value.to_owned(),
                source: err,
            })?;
        return Ok(Duration::from_secs(secs));
    }

    let mut total = Duration::ZERO;
    let mut rest = value;
    while !rest.is_empty() {
        let digits_len = rest
            .find(|ch: char| !ch.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits_len == 0 {
            return Err(ValidationError::InvalidDurationFormat {
                value: value.to_owned(),
            });
        }
        let (num_part, after_num) = rest.split_at(digits_len);
        let unit_len = after_num
            .find(|ch: char| ch.is_ascii_digit())
            .unwrap_or(after_num.len());
        let (unit, remaining) = after_num.split_at(unit_len);
        if unit.is_empty() {
            return Err(ValidationError::InvalidDurationFormat {
                value: value.to_owned(),
            });
        }

        let number: u64 = num_part
            .parse()
            .map_err(|err| ValidationError::InvalidDurationNumber {
                value: value.to_owned(),
                source: err,
            })?;
        let segment = match unit {
            "ms" => Duration::from_millis(number),
            "s" => Duration::from_secs(number),
            "m" => Duration::from_secs(
                number
                    .checked_mul(60)
                    .ok_or(ValidationError::DurationOverflow)?,
            ),
            "h" => Duration::from_secs(
                number
                    .checked_mul(3_600)
                    .ok_or(ValidationError::DurationOverflow)?,
            ),
            _ => {
                return Err(ValidationError::InvalidDurationUnit {
                    unit: unit.to_owned(),
                });
            }
        };
        total = total
            .checked_add(segment)
            .ok_or(ValidationError::DurationOverflow)?;
        rest = remaining;
    }

    Ok(total)
}

pub(crate) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    parse_duration_value(s).map_err(AppError::validation)
}

pub(crate) fn parse_positive_duration_arg(s: &str) -> AppResult<Duration> {
    let duration = parse_duration_arg(s)?;
    if duration.is_zero() {
        return Err(AppError::validation(ValidationError::DurationZero));
    }
    Ok(duration)
}

/// Parses a `DURATION:TARGET` stage, e.g. `30s:5`.
///
/// # Errors
///
/// Returns an error when the separator is missing or either side is invalid.
pub(crate) fn parse_stage(s: &str) -> Result<Stage, ValidationError> {
    let value = s.trim();
    let (duration_part, target_part) =
        value
            .rsplit_once(':')
            .ok_or_else(|| ValidationError::InvalidStageFormat {
                value: value.to_owned(),
            })?;
    let duration =
        parse_duration_value(duration_part).map_err(|err| ValidationError::InvalidStageDuration {
            value: value.to_owned(),
            source: Box::new(err),
        })?;
    let target: u64 =
        target_part
            .trim()
            .parse()
            .map_err(|err| ValidationError::InvalidStageTarget {
                value: value.to_owned(),
                source: err,
            })?;
    Ok(Stage::new(duration, target))
}

pub(crate) fn parse_stage_arg(s: &str) -> AppResult<Stage> {
    parse_stage(s).map_err(AppError::validation)
}
