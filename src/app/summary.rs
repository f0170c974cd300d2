use crate::args::OutputFormat;
use crate::error::AppResult;
use crate::metrics::RunSummary;

/// Divisor for percentages stored in hundredths.
const PERCENT_DIVISOR: u64 = 100;
/// Microseconds per millisecond.
const US_PER_MS: u64 = 1_000;
/// Milliseconds per second.
const MS_PER_SEC: u64 = 1_000;

/// Print the final summary to stdout in `format`.
///
/// # Errors
///
/// Returns an error if the summary cannot be serialized as JSON.
pub(crate) fn print_summary(summary: &RunSummary, format: OutputFormat) -> AppResult<()> {
    match format {
        OutputFormat::Text => {
            for line in summary_lines(summary) {
                println!("{}", line);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

pub(crate) fn summary_lines(summary: &RunSummary) -> Vec<String> {
    let mut lines = Vec::new();

    let status = if summary.interrupted {
        "interrupted"
    } else {
        "completed"
    };
    lines.push(format!(
        "Run {} after {} ({} stages)",
        status,
        format_ms(summary.elapsed_ms),
        summary.stages
    ));
    lines.push(format!(
        "Iterations: {} started, {} completed",
        summary.iterations_started, summary.iterations_completed
    ));
    lines.push(format!(
        "Peak VUs: {} (live at exit: {})",
        summary.peak_vus, summary.live_vus_at_exit
    ));
    let success = summary.success_rate_x100();
    lines.push(format!(
        "Successful: {}.{:02}%",
        success / PERCENT_DIVISOR,
        success % PERCENT_DIVISOR
    ));

    for (name, tally) in &summary.checks {
        let total = tally.passed.saturating_add(tally.failed);
        lines.push(format!(
            "Check \"{}\": {} passed, {} failed ({})",
            name,
            tally.passed,
            tally.failed,
            mark(tally.failed == 0 && total > 0)
        ));
    }

    if !summary.status_codes.is_empty() {
        let codes: Vec<String> = summary
            .status_codes
            .iter()
            .map(|(code, count)| format!("{}={}", code, count))
            .collect();
        lines.push(format!("Status codes: {}", codes.join(", ")));
    }
    if summary.network_error_total() > 0 {
        let errors: Vec<String> = summary
            .network_errors
            .iter()
            .map(|(kind, count)| format!("{}={}", kind, count))
            .collect();
        lines.push(format!("Network errors: {}", errors.join(", ")));
    }

    let latency = &summary.latency;
    lines.push(format!(
        "Latency min/avg/max: {} / {} / {}",
        format_us(latency.min_us),
        format_us(latency.avg_us),
        format_us(latency.max_us)
    ));
    lines.push(format!(
        "Latency p50/p90/p95/p99: {} / {} / {} / {}",
        format_us(latency.p50_us),
        format_us(latency.p90_us),
        format_us(latency.p95_us),
        format_us(latency.p99_us)
    ));
    lines.push(format!(
        "Data: {} bytes sent, {} bytes received",
        summary.bytes_sent, summary.bytes_received
    ));
    lines
}

const fn mark(passed: bool) -> &'static str {
    if passed { "ok" } else { "FAILED" }
}

fn format_us(micros: u64) -> String {
    format!("{}.{:03}ms", micros / US_PER_MS, micros % US_PER_MS)
}

fn format_ms(millis: u64) -> String {
    format!("{}.{:03}s", millis / MS_PER_SEC, millis % MS_PER_SEC)
}
