//! # Introduction
//!
//! calcflow runs small calculator programs: a flat list of `Calc`
//! instructions that define variables from literals and other variables, and
//! `Print` instructions that ask for values. Only what the prints need is
//! computed, each variable exactly once, with independent branches evaluated
//! concurrently on a worker pool.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Parser → Instructions → Plan → Resolver → Results (+ Trace) → TUI
//! ```
//!
//! 1. [`parser`]: loads the text or JSON program format into
//!    [`engine::Instruction`]s.
//! 2. [`engine`]: classifies instructions, builds the required-variable
//!    [`engine::plan::ExecutionPlan`] (rejecting undefined names and
//!    cycles) and evaluates it through [`engine::InstructionExecutor`].
//! 3. [`trace`]: an observer that records each completed computation so the
//!    run can be replayed step by step.
//! 4. [`ui`]: ratatui-based replay viewer; not part of the stable library
//!    API.

pub mod engine;
pub mod parser;
pub mod trace;
pub mod ui;
