//! Circuit breaker for outbound calls.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: dependency assumed down, calls fail fast
//! - Half-Open: a single trial call tests whether it recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive failures > failure_threshold
//! Open → Half-Open: first call after cool_down has elapsed
//! Half-Open → Closed: trial call succeeds
//! Half-Open → Open: trial call fails (open-time restarts)
//! ```
//!
//! # Design Decisions
//! - One breaker per client pipeline, owned by it (no globals)
//! - State lives behind a mutex that is never held across the operation
//! - Single trial in Half-Open; concurrent callers are rejected, not queued
//! - The breaker only sees success/failure; mapping statuses is the caller's job

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::observability::metrics;
use crate::resilience::clock::{Clock, SystemClock};

/// Externally visible breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

impl BreakerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakerState::Closed => "closed",
            BreakerState::Open => "open",
            BreakerState::HalfOpen => "half_open",
        }
    }
}

impl fmt::Display for BreakerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`CircuitBreaker::execute`].
#[derive(Debug, Error)]
pub enum BreakerError<E> {
    /// The call was rejected without running the operation.
    #[error("circuit breaker is open")]
    Open,

    /// The operation ran and failed.
    #[error(transparent)]
    Operation(E),
}

/// Breaker tuning.
#[derive(Debug, Clone)]
pub struct BreakerSettings {
    /// Name used in logs and metrics.
    pub name: String,
    /// The breaker opens once consecutive failures exceed this value.
    pub failure_threshold: u32,
    /// How long the breaker stays open before allowing a trial call.
    pub cool_down: Duration,
}

impl Default for BreakerSettings {
    fn default() -> Self {
        Self {
            name: "outbound-http".to_string(),
            failure_threshold: 3,
            cool_down: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Closed,
    Open { since: Instant },
    HalfOpen,
}

impl Phase {
    fn state(&self) -> BreakerState {
        match self {
            Phase::Closed => BreakerState::Closed,
            Phase::Open { .. } => BreakerState::Open,
            Phase::HalfOpen => BreakerState::HalfOpen,
        }
    }
}

#[derive(Debug)]
struct Inner {
    phase: Phase,
    consecutive_failures: u32,
    /// Bumped on every transition. Outcomes of calls admitted under an older
    /// generation are stale.
    generation: u64,
}

/// How a call was let through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Admission {
    Normal,
    Trial,
}

/// A consecutive-failure circuit breaker.
#[derive(Debug)]
pub struct CircuitBreaker {
    settings: BreakerSettings,
    clock: Arc<dyn Clock>,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    /// Create a closed breaker using the system clock.
    pub fn new(settings: BreakerSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    /// Create a closed breaker reading time from `clock`.
    pub fn with_clock(settings: BreakerSettings, clock: Arc<dyn Clock>) -> Self {
        metrics::record_breaker_state(&settings.name, BreakerState::Closed);
        Self {
            settings,
            clock,
            inner: Mutex::new(Inner {
                phase: Phase::Closed,
                consecutive_failures: 0,
                generation: 0,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.settings.name
    }

    pub fn state(&self) -> BreakerState {
        self.lock().phase.state()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.lock().consecutive_failures
    }

    /// Run `operation` under the breaker.
    ///
    /// Returns [`BreakerError::Open`] without calling `operation` when the
    /// circuit is open or a trial call is already in flight. Otherwise the
    /// outcome is recorded and the operation's result is passed back.
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let Some(permit) = self.admit() else {
            tracing::debug!(breaker = %self.settings.name, "Call rejected, circuit open");
            metrics::record_breaker_rejection(&self.settings.name);
            return Err(BreakerError::Open);
        };

        let result = operation().await;
        permit.finish(result.is_ok());
        result.map_err(BreakerError::Operation)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn admit(&self) -> Option<Permit<'_>> {
        let mut inner = self.lock();
        match inner.phase {
            Phase::Closed => Some(Permit::new(self, Admission::Normal, inner.generation)),
            Phase::Open { since } => {
                let elapsed = self.clock.now().saturating_duration_since(since);
                if elapsed < self.settings.cool_down {
                    return None;
                }
                self.transition(&mut inner, Phase::HalfOpen);
                Some(Permit::new(self, Admission::Trial, inner.generation))
            }
            Phase::HalfOpen => None,
        }
    }

    fn record(&self, admission: Admission, generation: u64, success: bool) {
        let mut inner = self.lock();
        if generation != inner.generation {
            // Admitted before the last transition.
            return;
        }
        match (admission, inner.phase) {
            (Admission::Trial, Phase::HalfOpen) => {
                if success {
                    inner.consecutive_failures = 0;
                    self.transition(&mut inner, Phase::Closed);
                } else {
                    let since = self.clock.now();
                    self.transition(&mut inner, Phase::Open { since });
                }
            }
            (Admission::Normal, Phase::Closed) => {
                if success {
                    inner.consecutive_failures = 0;
                    return;
                }
                inner.consecutive_failures = inner.consecutive_failures.saturating_add(1);
                if inner.consecutive_failures > self.settings.failure_threshold {
                    tracing::warn!(
                        breaker = %self.settings.name,
                        failures = inner.consecutive_failures,
                        threshold = self.settings.failure_threshold,
                        "Failure threshold exceeded"
                    );
                    let since = self.clock.now();
                    self.transition(&mut inner, Phase::Open { since });
                }
            }
            _ => {}
        }
    }

    fn transition(&self, inner: &mut Inner, to: Phase) {
        let from = inner.phase.state();
        inner.phase = to;
        inner.generation = inner.generation.wrapping_add(1);
        if !matches!(to, Phase::Closed) {
            inner.consecutive_failures = 0;
        }

        let to = to.state();
        tracing::info!(
            breaker = %self.settings.name,
            from = %from,
            to = %to,
            "Circuit breaker state changed"
        );
        metrics::record_breaker_transition(&self.settings.name, from, to);
    }
}

/// Admission ticket for one call. A trial dropped before `finish` counts as
/// a failed trial so the breaker cannot stay half-open forever.
struct Permit<'a> {
    breaker: &'a CircuitBreaker,
    admission: Admission,
    generation: u64,
    finished: bool,
}

impl<'a> Permit<'a> {
    fn new(breaker: &'a CircuitBreaker, admission: Admission, generation: u64) -> Self {
        Self {
            breaker,
            admission,
            generation,
            finished: false,
        }
    }

    fn finish(mut self, success: bool) {
        self.finished = true;
        self.breaker.record(self.admission, self.generation, success);
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        if !self.finished && self.admission == Admission::Trial {
            self.breaker.record(Admission::Trial, self.generation, false);
        }
    }
}
