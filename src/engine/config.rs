//! Executor configuration
//!
//! The delay and the observer are instrumentation: they let tests and the
//! trace viewer see how work is scheduled without touching evaluation logic.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Receives every variable the executor finishes computing.
///
/// Called exactly once per required variable, from whichever worker thread
/// computed it. Closures taking just the variable name implement this trait.
pub trait ExecutionObserver: Send + Sync {
    fn on_computed(&self, var: &str, value: i64);
}

impl<F> ExecutionObserver for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_computed(&self, var: &str, _value: i64) {
        self(var)
    }
}

/// How arithmetic identities (`x * 0`, `x * 1`, `x + 0`, `x - 0`) are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortCircuitPolicy {
    /// Answer identities immediately, without the simulated delay
    #[default]
    SkipDelay,
    /// Every operation takes the full path, delay included
    Disabled,
}

#[derive(Clone, Default)]
pub struct ExecutorConfig {
    /// Simulated unit of work before each full operation; zero disables it
    pub operation_delay: Duration,
    pub short_circuit: ShortCircuitPolicy,
    pub observer: Option<Arc<dyn ExecutionObserver>>,
}

impl ExecutorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operation_delay(mut self, delay: Duration) -> Self {
        self.operation_delay = delay;
        self
    }

    pub fn with_short_circuit(mut self, policy: ShortCircuitPolicy) -> Self {
        self.short_circuit = policy;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub(crate) fn notify(&self, var: &str, value: i64) {
        if let Some(observer) = &self.observer {
            observer.on_computed(var, value);
        }
    }
}

impl fmt::Debug for ExecutorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutorConfig")
            .field("operation_delay", &self.operation_delay)
            .field("short_circuit", &self.short_circuit)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
