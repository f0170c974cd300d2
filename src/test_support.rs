use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::args::PayloadKind;
use crate::checks::{Check, CheckEvaluator};
use crate::error::NetworkError;
use crate::http::{IssuedResponse, Payload, RequestIssuer};
use crate::metrics::{IterationResult, RunCounters};
use crate::vu::{Diagnostic, VuContext};

/// In-memory issuer that answers every request the same way.
pub(crate) struct ScriptedIssuer {
    reply: Result<u16, NetworkError>,
    latency: Duration,
    calls: AtomicU64,
}

impl ScriptedIssuer {
    pub(crate) fn status(status: u16) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(status),
            latency: Duration::ZERO,
            calls: AtomicU64::new(0),
        })
    }

    pub(crate) fn failing(kind: NetworkError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(kind),
            latency: Duration::ZERO,
            calls: AtomicU64::new(0),
        })
    }

    pub(crate) fn with_latency(status: u16, latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(status),
            latency,
            calls: AtomicU64::new(0),
        })
    }

    pub(crate) fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RequestIssuer for ScriptedIssuer {
    async fn send(&self, payload: &Payload) -> Result<IssuedResponse, NetworkError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let status = self.reply?;
        Ok(IssuedResponse {
            status,
            latency: self.latency,
            bytes_sent: payload.len(),
            bytes_received: 0,
        })
    }
}

pub(crate) fn test_payload() -> Payload {
    Payload::from_bytes(vec![0xff, 0xd8, 0xff], PayloadKind::Binary, "image/jpeg")
}

pub(crate) fn test_diagnostic() -> Diagnostic {
    Diagnostic {
        port: "8500".to_owned(),
        kind: PayloadKind::Binary,
    }
}

pub(crate) fn test_context(
    issuer: Arc<dyn RequestIssuer>,
    pace: Duration,
) -> (Arc<VuContext>, mpsc::Receiver<IterationResult>) {
    let (results, results_rx) = mpsc::channel(1_024);
    let context = VuContext {
        issuer,
        payload: test_payload(),
        checks: CheckEvaluator::new(vec![Check::status_is(200)]),
        pace,
        results,
        counters: Arc::new(RunCounters::default()),
        diagnostic: test_diagnostic(),
    };
    (Arc::new(context), results_rx)
}

/// Runs `future` on a current-thread runtime with the clock paused, so
/// timers auto-advance whenever every task is idle.
pub(crate) fn run_paused_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}
