use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::summary::summary_lines;
use super::*;
use crate::args::{LoadArgs, default_stages};
use crate::checks::{Check, CheckEvaluator};
use crate::domain::{Stage, StagePlan};
use crate::error::{AppError, NetworkError};
use crate::http::RequestIssuer;
use crate::metrics::RunSummary;
use crate::shutdown::shutdown_channel;
use crate::test_support::{ScriptedIssuer, run_paused_test, test_diagnostic, test_payload};

const STATUS_CHECK: &str = "status is 200";

fn workload_spec() -> Result<RunSpec, String> {
    Ok(RunSpec {
        plan: StagePlan::new(default_stages()).map_err(|err| format!("plan: {}", err))?,
        pace: Duration::from_millis(500),
        tick: Duration::from_secs(1),
    })
}

fn workload(issuer: Arc<dyn RequestIssuer>) -> Workload {
    Workload {
        issuer,
        payload: test_payload(),
        checks: CheckEvaluator::new(vec![Check::status_is(200)]),
        diagnostic: test_diagnostic(),
    }
}

async fn run_scripted(spec: RunSpec, issuer: Arc<dyn RequestIssuer>) -> Result<RunSummary, String> {
    let (shutdown_tx, _) = shutdown_channel();
    run_with_issuer(spec, workload(issuer), &shutdown_tx)
        .await
        .map_err(|err| format!("run failed: {}", err))
}

fn assert_drained(summary: &RunSummary) -> Result<(), String> {
    if summary.live_vus_at_exit != 0 {
        return Err(format!("{} VUs still live", summary.live_vus_at_exit));
    }
    if summary.iterations_started != summary.iterations_completed
        || summary.iterations_joined != summary.iterations_completed
    {
        return Err(format!(
            "Started {}, joined {}, aggregated {} iterations",
            summary.iterations_started, summary.iterations_joined, summary.iterations_completed
        ));
    }
    Ok(())
}

#[test]
fn healthy_target_passes_every_check() -> Result<(), String> {
    run_paused_test(async {
        let summary = run_scripted(workload_spec()?, ScriptedIssuer::status(200)).await?;
        assert_drained(&summary)?;

        let completed = summary.iterations_completed;
        if completed == 0 {
            return Err("Expected iterations".to_owned());
        }
        if summary.checks_passed(STATUS_CHECK) != completed
            || summary.checks_failed(STATUS_CHECK) != 0
        {
            return Err(format!("Unexpected check tally {:?}", summary.checks));
        }
        if summary.status_codes.get(&200) != Some(&completed) || summary.network_error_total() != 0 {
            return Err(format!("Unexpected status codes {:?}", summary.status_codes));
        }
        if summary.peak_vus != 5 || summary.stages != 3 || summary.interrupted {
            return Err(format!("Unexpected run facts {:?}", summary));
        }
        // 5 VUs at two iterations per second bound the total
        if completed > 1_000 {
            return Err(format!("Too many iterations: {}", completed));
        }
        if summary.success_rate_x100() != 10_000 {
            return Err(format!("Unexpected success rate {}", summary.success_rate_x100()));
        }
        Ok(())
    })
}

#[test]
fn failing_target_still_completes_on_schedule() -> Result<(), String> {
    run_paused_test(async {
        let summary = run_scripted(workload_spec()?, ScriptedIssuer::status(500)).await?;
        assert_drained(&summary)?;

        let completed = summary.iterations_completed;
        if summary.checks_failed(STATUS_CHECK) != completed || summary.checks_passed(STATUS_CHECK) != 0 {
            return Err(format!("Unexpected check tally {:?}", summary.checks));
        }
        if summary.status_codes.get(&500) != Some(&completed) {
            return Err(format!("Unexpected status codes {:?}", summary.status_codes));
        }
        if !(100_000..=101_000).contains(&summary.elapsed_ms) {
            return Err(format!("Unexpected run length {}ms", summary.elapsed_ms));
        }
        Ok(())
    })
}

#[test]
fn unreachable_target_counts_network_errors() -> Result<(), String> {
    run_paused_test(async {
        let summary = run_scripted(
            workload_spec()?,
            ScriptedIssuer::failing(NetworkError::Connect),
        )
        .await?;
        assert_drained(&summary)?;

        let completed = summary.iterations_completed;
        if completed == 0 || summary.network_errors.get("connect") != Some(&completed) {
            return Err(format!("Unexpected network errors {:?}", summary.network_errors));
        }
        if !summary.status_codes.is_empty() {
            return Err(format!("Expected no status codes, got {:?}", summary.status_codes));
        }
        if summary.checks_failed(STATUS_CHECK) != completed {
            return Err(format!("Unexpected check tally {:?}", summary.checks));
        }
        Ok(())
    })
}

#[test]
fn slow_responses_keep_iterations_sequential() -> Result<(), String> {
    run_paused_test(async {
        let spec = RunSpec {
            plan: StagePlan::new(vec![
                Stage::new(Duration::ZERO, 1),
                Stage::new(Duration::from_secs(10), 1),
            ])
            .map_err(|err| format!("plan: {}", err))?,
            pace: Duration::from_millis(400),
            tick: Duration::from_secs(1),
        };
        let issuer = ScriptedIssuer::with_latency(200, Duration::from_secs(2));
        let summary = run_scripted(spec, issuer).await?;
        assert_drained(&summary)?;

        // one user: 2s request then 0.4s pause; the fifth starts at 9.6s
        // and is allowed to finish after the stages end
        if summary.iterations_completed != 5 {
            return Err(format!(
                "Expected 5 iterations, got {}",
                summary.iterations_completed
            ));
        }
        if !(1_990_000..=2_010_000).contains(&summary.latency.min_us) {
            return Err(format!("Unexpected latency {:?}", summary.latency));
        }
        if summary.elapsed_ms != 11_600 {
            return Err(format!("Unexpected run length {}ms", summary.elapsed_ms));
        }
        Ok(())
    })
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn text(&self) -> Result<String, String> {
        let bytes = self
            .0
            .lock()
            .map_err(|err| format!("log buffer poisoned: {}", err))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self
            .0
            .lock()
            .map_err(|err| io::Error::other(err.to_string()))?;
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn diagnostic_is_logged_exactly_once_per_run() -> Result<(), String> {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);

    let result = run_paused_test(async {
        let summary = run_scripted(workload_spec()?, ScriptedIssuer::status(200)).await?;
        if summary.iterations_completed < 2 {
            return Err("Expected more than one iteration".to_owned());
        }
        Ok(())
    });
    drop(guard);
    result?;

    let text = logs.text()?;
    let count = text
        .matches("Testing Port 8500 using Binary payload")
        .count();
    if count != 1 {
        return Err(format!("Expected one diagnostic line, found {}:\n{}", count, text));
    }
    Ok(())
}

#[test]
fn shutdown_returns_an_interrupted_summary() -> Result<(), String> {
    run_paused_test(async {
        let (shutdown_tx, _) = shutdown_channel();
        let trigger = shutdown_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(45)).await;
            drop(trigger.send(()));
        });

        let summary = run_with_issuer(
            workload_spec()?,
            workload(ScriptedIssuer::status(200)),
            &shutdown_tx,
        )
        .await
        .map_err(|err| format!("run failed: {}", err))?;
        assert_drained(&summary)?;
        if !summary.interrupted || summary.elapsed_ms >= 46_000 {
            return Err(format!(
                "Expected an interrupted run near 45s, got {}ms",
                summary.elapsed_ms
            ));
        }
        Ok(())
    })
}

#[test]
fn summary_lines_report_checks_and_errors() -> Result<(), String> {
    run_paused_test(async {
        let spec = RunSpec {
            plan: StagePlan::new(vec![
                Stage::new(Duration::ZERO, 1),
                Stage::new(Duration::from_secs(3), 1),
            ])
            .map_err(|err| format!("plan: {}", err))?,
            pace: Duration::from_millis(500),
            tick: Duration::from_secs(1),
        };
        let summary = run_scripted(spec, ScriptedIssuer::failing(NetworkError::Timeout)).await?;
        let lines = summary_lines(&summary);
        let expect = |needle: &str| {
            if lines.iter().any(|line| line.contains(needle)) {
                Ok(())
            } else {
                Err(format!("Missing {:?} in {:?}", needle, lines))
            }
        };
        expect("Run completed after 3.000s (2 stages)")?;
        expect("Check \"status is 200\": 0 passed")?;
        expect("FAILED")?;
        expect("Network errors: timeout=")?;
        expect("Successful: 0.00%")?;
        Ok(())
    })
}

#[test]
fn missing_payload_is_a_configuration_error() -> Result<(), String> {
    use clap::Parser;

    let dir = tempfile::tempdir().map_err(|err| format!("tempdir: {}", err))?;
    let missing = dir.path().join("absent.jpeg");
    let missing = missing.to_string_lossy().into_owned();
    let args = LoadArgs::try_parse_from(["loadstage", "--payload", missing.as_str()])
        .map_err(|err| format!("parse: {}", err))?;

    run_paused_test(async move {
        let (shutdown_tx, _) = shutdown_channel();
        match run_load(&args, &shutdown_tx).await {
            Err(AppError::Config(_)) => Ok(()),
            Err(other) => Err(format!("Expected a configuration error, got {}", other)),
            Ok(_) => Err("Expected the run to be refused".to_owned()),
        }
    })
}

#[test]
fn run_spec_falls_back_to_the_built_in_stages() -> Result<(), String> {
    use clap::Parser;

    let args = LoadArgs::try_parse_from(["loadstage"]).map_err(|err| format!("parse: {}", err))?;
    let spec = RunSpec::from_args(&args).map_err(|err| format!("spec: {}", err))?;
    if spec.plan.total_duration() != Duration::from_secs(100) || spec.plan.peak_target() != 5 {
        return Err(format!("Unexpected plan {:?}", spec.plan));
    }
    Ok(())
}
