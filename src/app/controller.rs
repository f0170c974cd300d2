use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::args::{LoadArgs, default_stages};
use crate::checks::{Check, CheckEvaluator};
use crate::domain::{RunClock, StagePlan};
use crate::error::AppResult;
use crate::http::{ClientSettings, HttpIssuer, Payload, RequestIssuer, Target, TargetSettings};
use crate::metrics::{RunCounters, RunFacts, RunSummary, spawn_aggregator};
use crate::scheduler::StageScheduler;
use crate::shutdown::ShutdownSender;
use crate::vu::{Diagnostic, VuContext};

/// Results buffered between virtual users and the aggregator.
const RESULT_CHANNEL_CAPACITY: usize = 1_024;

/// Timing of a run.
#[derive(Debug, Clone)]
pub struct RunSpec {
    pub plan: StagePlan,
    pub pace: Duration,
    pub tick: Duration,
}

impl RunSpec {
    /// Build the plan from `args`, falling back to the built-in stages when
    /// none were given.
    ///
    /// # Errors
    ///
    /// Returns an error when the stage list is invalid.
    pub fn from_args(args: &LoadArgs) -> AppResult<Self> {
        let stages = if args.stages.is_empty() {
            default_stages()
        } else {
            args.stages.clone()
        };
        Ok(Self {
            plan: StagePlan::new(stages)?,
            pace: args.pace,
            tick: args.tick,
        })
    }
}

/// What every virtual user does on each iteration.
pub struct Workload {
    pub issuer: Arc<dyn RequestIssuer>,
    pub payload: Payload,
    pub checks: CheckEvaluator,
    pub diagnostic: Diagnostic,
}

/// Resolve the target, load the payload, and run the stages against it.
///
/// Everything that can be misconfigured is checked before the first
/// virtual user starts; once running, request failures are only counted.
///
/// # Errors
///
/// Returns an error for invalid stages, target, payload, or HTTP client
/// settings.
pub async fn run_load(args: &LoadArgs, shutdown: &ShutdownSender) -> AppResult<RunSummary> {
    let spec = RunSpec::from_args(args)?;
    let target = Target::resolve(&TargetSettings {
        port: args.port.clone(),
        host: args.host.clone(),
        path: args.path.clone(),
        base_url: args.url.clone(),
    })?;
    let payload = Payload::load(&args.payload, args.payload_kind, &args.content_type)?;
    let issuer = HttpIssuer::new(
        &target,
        &ClientSettings {
            request_timeout: args.request_timeout,
            connect_timeout: args.connect_timeout,
        },
        &payload,
    )?;
    info!(
        url = %target.url(),
        payload_bytes = payload.len(),
        "Target resolved."
    );

    let workload = Workload {
        issuer: Arc::new(issuer),
        diagnostic: Diagnostic {
            port: target.port().to_owned(),
            kind: payload.kind(),
        },
        payload,
        checks: CheckEvaluator::new(vec![Check::status_is(args.expected_status)]),
    };
    run_with_issuer(spec, workload, shutdown).await
}

/// Run the stages with an arbitrary issuer and return the aggregated summary.
///
/// Returns only after every virtual user has exited and every result has
/// been aggregated.
///
/// # Errors
///
/// Returns an error if the aggregator task fails.
pub async fn run_with_issuer(
    spec: RunSpec,
    workload: Workload,
    shutdown: &ShutdownSender,
) -> AppResult<RunSummary> {
    let mut shutdown_rx = shutdown.subscribe();
    let (results_tx, results_rx) = mpsc::channel(RESULT_CHANNEL_CAPACITY);
    let aggregator = spawn_aggregator(results_rx, &workload.checks.names());

    let counters = Arc::new(RunCounters::default());
    let context = Arc::new(VuContext {
        issuer: workload.issuer,
        payload: workload.payload,
        checks: workload.checks,
        pace: spec.pace,
        results: results_tx,
        counters: Arc::clone(&counters),
        diagnostic: workload.diagnostic,
    });

    let stages = spec.plan.stages().len();
    let scheduler = StageScheduler::new(spec.plan, spec.tick);
    let report = scheduler
        .run(context, RunClock::start(), &mut shutdown_rx)
        .await;

    let tally = aggregator.await?;
    if report.iterations_joined != tally.iterations_completed {
        warn!(
            joined = report.iterations_joined,
            aggregated = tally.iterations_completed,
            "Virtual users reported a different iteration count than was aggregated."
        );
    }
    let facts = RunFacts {
        elapsed: report.elapsed,
        interrupted: report.interrupted,
        stages,
        iterations_started: counters.iterations_started(),
        iterations_joined: report.iterations_joined,
        peak_vus: report.peak_vus,
        live_vus_at_exit: counters.live_vus(),
        timeline: report.timeline,
    };
    let summary = RunSummary::from_parts(tally, facts);
    info!(
        iterations = summary.iterations_completed,
        elapsed_ms = summary.elapsed_ms,
        "Run finished."
    );
    Ok(summary)
}
