//! Instruction execution engine
//!
//! This module turns a flat instruction list into printed values:
//! - [`instruction`]: program model (`Calc`, `Print`, operands, results)
//! - [`plan`]: classification, required-variable discovery, cycle detection
//! - [`resolver`]: memoized evaluation on the worker pool
//! - [`executor`]: [`InstructionExecutor`], the public entry point
//! - [`ops`]: arithmetic semantics and short-circuit identities
//! - [`config`], [`pool`], [`errors`]: configuration, threads, failures
//!
//! # Execution Model
//!
//! Only variables reachable from a print are ever evaluated. Each of them is
//! computed exactly once per call, however many prints or calculations depend
//! on it, and unrelated branches run concurrently. The caller blocks only
//! while collecting the value for each print, in print order.

pub mod config;
pub mod errors;
pub mod executor;
pub mod instruction;
pub mod ops;
pub mod plan;
pub mod pool;
pub mod resolver;

pub use config::{ExecutionObserver, ExecutorConfig, ShortCircuitPolicy};
pub use errors::ExecError;
pub use executor::InstructionExecutor;
pub use instruction::{
    ArithmeticOp, CalcInstruction, Instruction, Operand, PrintInstruction, PrintResult,
};
pub use pool::WorkerPool;
