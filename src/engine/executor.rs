//! Entry point: instruction list in, printed values out

use super::config::ExecutorConfig;
use super::errors::ExecError;
use super::instruction::{Instruction, PrintResult};
use super::plan::{classify, ExecutionPlan};
use super::pool::WorkerPool;
use super::resolver::Resolver;
use futures::executor::block_on;
use log::{debug, warn};
use std::sync::Arc;
use tokio::runtime::Handle;

/// Executes programs on a shared worker pool.
///
/// Holds no state between calls besides the pool handle and configuration;
/// one executor may serve any number of calls, including concurrent ones.
///
/// `execute` blocks the calling thread while waiting for print values, so it
/// must not be called from inside the pool's own async context.
#[derive(Debug, Clone)]
pub struct InstructionExecutor {
    handle: Handle,
    config: Arc<ExecutorConfig>,
}

impl InstructionExecutor {
    pub fn new(pool: &WorkerPool, config: ExecutorConfig) -> Self {
        Self::from_handle(pool.handle().clone(), config)
    }

    pub fn from_handle(handle: Handle, config: ExecutorConfig) -> Self {
        InstructionExecutor {
            handle,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run `instructions` and return one result per print, in print order.
    ///
    /// Every computation the prints need is started before the first wait,
    /// so independent branches overlap regardless of which print needs them.
    pub fn execute(&self, instructions: &[Instruction]) -> Result<Vec<PrintResult>, ExecError> {
        debug_assert!(
            Handle::try_current().is_err(),
            "InstructionExecutor::execute blocks and must not run inside a tokio runtime"
        );
        let outcome = self.run(instructions);
        if let Err(err) = &outcome {
            warn!("execution failed: {}", err);
        }
        outcome
    }

    fn run(&self, instructions: &[Instruction]) -> Result<Vec<PrintResult>, ExecError> {
        let program = classify(instructions)?;
        if !program.has_prints() {
            debug!(
                "no print instructions, skipping {} calculation(s)",
                program.definitions.len()
            );
            return Ok(Vec::new());
        }

        let plan = ExecutionPlan::build(&program)?;
        let resolver = Resolver::new(plan, Arc::clone(&self.config), self.handle.clone());

        let pending = program
            .prints
            .iter()
            .map(|print| Ok((print, resolver.resolve(&print.var)?)))
            .collect::<Result<Vec<_>, ExecError>>()?;

        pending
            .into_iter()
            .map(|(print, value)| {
                let value = block_on(value)?;
                Ok(PrintResult::new(print.var.clone(), value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::instruction::{ArithmeticOp, Operand::Literal};

    fn program() -> Vec<Instruction> {
        vec![
            Instruction::calc("x", ArithmeticOp::Add, Literal(10), Literal(2)),
            Instruction::print("x"),
        ]
    }

    #[test]
    fn test_execute_from_plain_thread() {
        let pool = WorkerPool::new(2).unwrap();
        let executor = InstructionExecutor::new(&pool, ExecutorConfig::default());
        let outcome = executor.execute(&program());
        assert_eq!(outcome, Ok(vec![PrintResult::new("x", 12)]));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "must not run inside a tokio runtime")]
    fn test_execute_inside_runtime_panics() {
        let pool = WorkerPool::new(2).unwrap();
        let executor = InstructionExecutor::new(&pool, ExecutorConfig::default());
        let handle = pool.handle();
        let _ = handle.block_on(async { executor.execute(&program()) });
    }
}
