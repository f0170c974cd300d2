use std::time::Duration;

use clap::{CommandFactory, FromArgMatches};

use super::parsers::{parse_duration_value, parse_stage};
use super::*;
use crate::domain::Stage;
use crate::error::ValidationError;

fn parse_args(argv: &[&str]) -> Result<LoadArgs, String> {
    let matches = LoadArgs::command()
        .try_get_matches_from(argv)
        .map_err(|err| format!("parse failed: {}", err))?;
    LoadArgs::from_arg_matches(&matches).map_err(|err| format!("extract failed: {}", err))
}

#[test]
fn duration_units_parse() -> Result<(), String> {
    let cases = [
        ("500ms", Duration::from_millis(500)),
        ("30s", Duration::from_secs(30)),
        ("45", Duration::from_secs(45)),
        ("1m", Duration::from_secs(60)),
        ("2h", Duration::from_secs(7_200)),
        ("1m30s", Duration::from_secs(90)),
        ("0s", Duration::ZERO),
    ];
    for (input, expected) in cases {
        let parsed = parse_duration_value(input)
            .map_err(|err| format!("'{}' failed to parse: {}", input, err))?;
        if parsed != expected {
            return Err(format!(
                "'{}': expected {:?}, got {:?}",
                input, expected, parsed
            ));
        }
    }
    Ok(())
}

#[test]
fn duration_rejects_bad_input() -> Result<(), String> {
    match parse_duration_value("") {
        Err(ValidationError::DurationEmpty) => {}
        other => return Err(format!("Expected DurationEmpty, got {:?}", other)),
    }
    match parse_duration_value("10x") {
        Err(ValidationError::InvalidDurationUnit { unit }) if unit == "x" => {}
        other => return Err(format!("Expected InvalidDurationUnit, got {:?}", other)),
    }
    match parse_duration_value("s10") {
        Err(ValidationError::InvalidDurationFormat { .. }) => {}
        other => return Err(format!("Expected InvalidDurationFormat, got {:?}", other)),
    }
    Ok(())
}

#[test]
fn stage_parses_duration_and_target() -> Result<(), String> {
    let stage = parse_stage("1m:5").map_err(|err| format!("parse failed: {}", err))?;
    if stage != Stage::new(Duration::from_secs(60), 5) {
        return Err(format!("Unexpected stage {:?}", stage));
    }
    match parse_stage("30s") {
        Err(ValidationError::InvalidStageFormat { .. }) => {}
        other => return Err(format!("Expected InvalidStageFormat, got {:?}", other)),
    }
    match parse_stage("30s:many") {
        Err(ValidationError::InvalidStageTarget { .. }) => {}
        other => return Err(format!("Expected InvalidStageTarget, got {:?}", other)),
    }
    Ok(())
}

#[test]
fn defaults_match_workload() -> Result<(), String> {
    let args = parse_args(&["loadstage"])?;
    if args.host != DEFAULT_HOST || args.path != DEFAULT_PATH {
        return Err(format!("Unexpected target {}{}", args.host, args.path));
    }
    if args.pace != Duration::from_millis(500) {
        return Err(format!("Unexpected pace {:?}", args.pace));
    }
    if args.tick != Duration::from_secs(1) {
        return Err(format!("Unexpected tick {:?}", args.tick));
    }
    if args.payload_kind != PayloadKind::Binary {
        return Err("Expected binary payload by default".to_owned());
    }
    if !args.stages.is_empty() {
        return Err("Expected no explicit stages".to_owned());
    }
    if default_stages().len() != 3 {
        return Err("Expected three default stages".to_owned());
    }
    Ok(())
}

#[test]
fn repeated_stage_flags_keep_order() -> Result<(), String> {
    let args = parse_args(&["loadstage", "-s", "10s:2", "--stage", "5s:0"])?;
    let expected = vec![
        Stage::new(Duration::from_secs(10), 2),
        Stage::new(Duration::from_secs(5), 0),
    ];
    if args.stages != expected {
        return Err(format!("Unexpected stages {:?}", args.stages));
    }
    Ok(())
}

#[test]
fn zero_tick_is_rejected() -> Result<(), String> {
    if parse_args(&["loadstage", "--tick", "0s"]).is_ok() {
        return Err("Expected zero tick to be rejected".to_owned());
    }
    Ok(())
}

#[test]
fn payload_kind_is_case_insensitive() -> Result<(), String> {
    let args = parse_args(&["loadstage", "--payload-kind", "Multipart"])?;
    if args.payload_kind != PayloadKind::Multipart {
        return Err(format!("Unexpected payload kind {:?}", args.payload_kind));
    }
    if args.payload_kind.label() != "Multipart" {
        return Err("Unexpected payload label".to_owned());
    }
    Ok(())
}
