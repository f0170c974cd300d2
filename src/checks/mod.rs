//! Named assertions evaluated against every iteration's outcome.
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::debug;

use crate::metrics::Outcome;


type Predicate = dyn Fn(&Outcome) -> Result<bool, String> + Send + Sync;

/// A named predicate over an iteration outcome.
pub struct Check {
    name: Arc<str>,
    predicate: Box<Predicate>,
}

impl Check {
    pub fn new<F>(name: &str, predicate: F) -> Self
    where
        F: Fn(&Outcome) -> Result<bool, String> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            predicate: Box::new(predicate),
        }
    }

    /// `"status is <expected>"`; fails for network errors.
    #[must_use]
    pub fn status_is(expected: u16) -> Self {
        Self::new(&format!("status is {}", expected), move |outcome| {
            Ok(outcome.status() == Some(expected))
        })
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check").field("name", &self.name).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: Arc<str>,
    pub passed: bool,
}

#[derive(Debug, Default)]
pub struct CheckEvaluator {
    checks: Vec<Check>,
}

impl CheckEvaluator {
    #[must_use]
    pub const fn new(checks: Vec<Check>) -> Self {
        Self { checks }
    }

    /// Evaluate every check in declaration order. A predicate that returns
    /// an error counts as failed. So does one that panics, as long as the
    /// build unwinds; the release profile uses `panic = "abort"`, where a
    /// panicking predicate ends the process.
    #[must_use]
    pub fn evaluate(&self, outcome: &Outcome) -> Vec<CheckResult> {
        self.checks
            .iter()
            .map(|check| {
                let verdict = panic::catch_unwind(AssertUnwindSafe(|| (check.predicate)(outcome)));
                let passed = match verdict {
                    Ok(Ok(passed)) => passed,
                    Ok(Err(err)) => {
                        debug!("Check '{}' errored: {}", check.name, err);
                        false
                    }
                    Err(_payload) => {
                        debug!("Check '{}' panicked.", check.name);
                        false
                    }
                };
                CheckResult {
                    name: Arc::clone(&check.name),
                    passed,
                }
            })
            .collect()
    }

    #[must_use]
    pub fn names(&self) -> Vec<Arc<str>> {
        self.checks
            .iter()
            .map(|check| Arc::clone(&check.name))
            .collect()
    }
}
