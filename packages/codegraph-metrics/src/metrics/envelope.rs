//! Result envelope shared by every metrics record

use crate::errors::AnalysisFailure;
use std::fmt;
use std::time::{Duration, Instant};

/// What an analysis run produced
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome<T> {
    /// The engine returned a payload
    Completed(T),

    /// The engine reported failure; there is no payload
    Failed(AnalysisFailure),

    /// Record rebuilt from a text report; only the reported numbers exist
    Recovered,
}

/// Timing and outcome of a single analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct RunMetrics<T> {
    /// Wall-clock time spent in the engine
    pub duration: Duration,
    pub outcome: RunOutcome<T>,
}

impl<T> Default for RunMetrics<T> {
    fn default() -> Self {
        Self::recovered(Duration::ZERO)
    }
}

impl<T> RunMetrics<T> {
    pub fn completed(duration: Duration, payload: T) -> Self {
        Self {
            duration,
            outcome: RunOutcome::Completed(payload),
        }
    }

    pub fn failed(duration: Duration, failure: AnalysisFailure) -> Self {
        Self {
            duration,
            outcome: RunOutcome::Failed(failure),
        }
    }

    pub fn recovered(duration: Duration) -> Self {
        Self {
            duration,
            outcome: RunOutcome::Recovered,
        }
    }

    /// `false` only when the engine reported failure
    pub fn is_ok(&self) -> bool {
        !matches!(self.outcome, RunOutcome::Failed(_))
    }

    pub fn failure(&self) -> Option<&AnalysisFailure> {
        match &self.outcome {
            RunOutcome::Failed(f) => Some(f),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&T> {
        match &self.outcome {
            RunOutcome::Completed(p) => Some(p),
            _ => None,
        }
    }

    pub fn into_payload(self) -> Option<T> {
        match self.outcome {
            RunOutcome::Completed(p) => Some(p),
            _ => None,
        }
    }

    /// Split into payload and failure.
    ///
    /// A recovered record unpacks to `Ok(None)`.
    pub fn unpack(&self) -> Result<Option<&T>, &AnalysisFailure> {
        match &self.outcome {
            RunOutcome::Completed(p) => Ok(Some(p)),
            RunOutcome::Failed(f) => Err(f),
            RunOutcome::Recovered => Ok(None),
        }
    }

    /// Transform the payload, keeping duration and failure state
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RunMetrics<U> {
        let outcome = match self.outcome {
            RunOutcome::Completed(p) => RunOutcome::Completed(f(p)),
            RunOutcome::Failed(e) => RunOutcome::Failed(e),
            RunOutcome::Recovered => RunOutcome::Recovered,
        };
        RunMetrics {
            duration: self.duration,
            outcome,
        }
    }
}

impl<T> fmt::Display for RunMetrics<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BASE METRICS:")?;
        writeln!(f, "- Duration: {:.6}s", self.duration.as_secs_f64())
    }
}

/// Time a fallible engine call and wrap its result.
///
/// The elapsed time is recorded whether or not the call succeeds.
pub fn measure<T, E: fmt::Display>(f: impl FnOnce() -> Result<T, E>) -> RunMetrics<T> {
    let start = Instant::now();
    let result = f();
    let duration = start.elapsed();

    match result {
        Ok(payload) => RunMetrics::completed(duration, payload),
        Err(e) => RunMetrics::failed(duration, AnalysisFailure::from_error(e)),
    }
}
