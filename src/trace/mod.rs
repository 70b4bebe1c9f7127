//! Execution trace for step-by-step replay

use crate::engine::config::ExecutionObserver;
use crate::engine::instruction::PrintResult;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::thread;
use std::time::{Duration, Instant};

/// One finished computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    pub var: String,
    pub value: i64,
    /// Time since the recorder was created
    pub elapsed: Duration,
    /// Name of the worker thread that computed the value
    pub worker: Option<String>,
}

/// Observer that records every computed variable in completion order
#[derive(Debug)]
pub struct TraceRecorder {
    started: Instant,
    events: Mutex<Vec<TraceEvent>>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        TraceRecorder {
            started: Instant::now(),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Take the recorded events, leaving the recorder empty
    pub fn finish(&self) -> ExecutionTrace {
        ExecutionTrace::new(std::mem::take(&mut *self.events.lock()))
    }
}

impl Default for TraceRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionObserver for TraceRecorder {
    fn on_computed(&self, var: &str, value: i64) {
        let event = TraceEvent {
            var: var.to_string(),
            value,
            elapsed: self.started.elapsed(),
            worker: thread::current().name().map(str::to_string),
        };
        self.events.lock().push(event);
    }
}

/// Completion history of one execution, navigable by step.
///
/// Step `k` means the first `k` events have happened: step 0 is before any
/// computation finished, step `len()` is the end of the run.
#[derive(Debug, Clone, Default)]
pub struct ExecutionTrace {
    events: Vec<TraceEvent>,
    step_of: FxHashMap<String, usize>,
}

impl ExecutionTrace {
    pub fn new(events: Vec<TraceEvent>) -> Self {
        let step_of = events
            .iter()
            .enumerate()
            .map(|(i, event)| (event.var.clone(), i + 1))
            .collect();
        ExecutionTrace { events, step_of }
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The event for `var`, if it was computed at or before `step`.
    pub fn computed_at(&self, var: &str, step: usize) -> Option<&TraceEvent> {
        match self.step_of.get(var) {
            Some(&done) if done <= step => self.events.get(done - 1),
            _ => None,
        }
    }

    /// Prints whose value is known at `step`, in print order.
    ///
    /// Output is emitted in order, so a print only appears once every
    /// earlier print has appeared too.
    pub fn visible_output<'r>(
        &self,
        results: &'r [PrintResult],
        step: usize,
    ) -> &'r [PrintResult] {
        let shown = results
            .iter()
            .take_while(|result| self.computed_at(&result.var, step).is_some())
            .count();
        &results[..shown]
    }

    /// Wall time from the first to the last completion.
    pub fn span(&self) -> Duration {
        match (self.events.first(), self.events.last()) {
            (Some(first), Some(last)) => last.elapsed.saturating_sub(first.elapsed),
            _ => Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(var: &str, value: i64, ms: u64) -> TraceEvent {
        TraceEvent {
            var: var.to_string(),
            value,
            elapsed: Duration::from_millis(ms),
            worker: None,
        }
    }

    #[test]
    fn test_steps() {
        let trace = ExecutionTrace::new(vec![event("x", 12, 5), event("y", 60, 9)]);
        assert!(trace.computed_at("x", 0).is_none());
        assert_eq!(trace.computed_at("x", 1).map(|e| e.value), Some(12));
        assert!(trace.computed_at("y", 1).is_none());
        assert_eq!(trace.computed_at("y", 2).map(|e| e.value), Some(60));
        assert!(trace.computed_at("nope", 2).is_none());
        assert_eq!(trace.span(), Duration::from_millis(4));
    }

    #[test]
    fn test_output_appears_in_print_order() {
        let trace = ExecutionTrace::new(vec![event("y", 60, 1), event("x", 12, 2)]);
        let results = vec![PrintResult::new("x", 12), PrintResult::new("y", 60)];
        assert!(trace.visible_output(&results, 1).is_empty());
        assert_eq!(trace.visible_output(&results, 2).len(), 2);
    }

    #[test]
    fn test_recorder() {
        let recorder = TraceRecorder::new();
        recorder.on_computed("a", 1);
        recorder.on_computed("b", 2);
        let trace = recorder.finish();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.events()[1].var, "b");
        assert!(recorder.finish().is_empty());
    }
}
