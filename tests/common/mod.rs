// Shared helpers for the integration tests
#![allow(dead_code)]

use calcflow::engine::{
    ExecError, ExecutorConfig, Instruction, InstructionExecutor, PrintResult, WorkerPool,
};
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// One pool for the whole test binary, like the process-wide pool in the CLI.
pub fn pool() -> &'static WorkerPool {
    static POOL: OnceLock<WorkerPool> = OnceLock::new();
    POOL.get_or_init(|| WorkerPool::new(4).expect("Failed to start worker pool"))
}

pub fn executor(config: ExecutorConfig) -> InstructionExecutor {
    InstructionExecutor::new(pool(), config)
}

pub fn run(instructions: &[Instruction]) -> Result<Vec<PrintResult>, ExecError> {
    executor(ExecutorConfig::new()).execute(instructions)
}

/// Records the name of every computed variable, in completion order.
#[derive(Debug, Default, Clone)]
pub struct Computed(Arc<Mutex<Vec<String>>>);

impl Computed {
    pub fn config(&self) -> ExecutorConfig {
        let seen = Arc::clone(&self.0);
        let observer = Arc::new(move |var: &str| seen.lock().push(var.to_string()));
        ExecutorConfig::new().with_observer(observer)
    }

    pub fn names(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn sorted(&self) -> Vec<String> {
        let mut names = self.names();
        names.sort();
        names
    }

    pub fn count(&self) -> usize {
        self.0.lock().len()
    }
}

pub fn run_observed(
    instructions: &[Instruction],
    delay: Duration,
) -> (Result<Vec<PrintResult>, ExecError>, Computed) {
    let computed = Computed::default();
    let config = computed.config().with_operation_delay(delay);
    let outcome = executor(config).execute(instructions);
    (outcome, computed)
}

pub fn results(pairs: &[(&str, i64)]) -> Vec<PrintResult> {
    pairs
        .iter()
        .map(|&(var, value)| PrintResult::new(var, value))
        .collect()
}
