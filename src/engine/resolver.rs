//! Memoized concurrent evaluation
//!
//! Each required variable gets one shared, single-assignment result cell. The
//! first resolution of a variable spawns its computation on the worker pool
//! and stores the cell; every later reference, whether from a print or from
//! another calculation, awaits that same cell. A computation awaits both of
//! its operands and only then applies the operation, so independent subtrees
//! run on separate workers.

use super::config::{ExecutorConfig, ShortCircuitPolicy};
use super::errors::ExecError;
use super::instruction::{CalcInstruction, Operand};
use super::plan::ExecutionPlan;
use futures::future::{self, BoxFuture, FutureExt, Shared};
use log::trace;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tokio::runtime::Handle;

/// Awaitable result of one variable, cloneable across waiters
pub type PendingValue = Shared<BoxFuture<'static, Result<i64, ExecError>>>;

/// An operand after lookup.
enum Resolved {
    Ready(i64),
    Pending(PendingValue),
}

impl Resolved {
    async fn value(self) -> Result<i64, ExecError> {
        match self {
            Resolved::Ready(value) => Ok(value),
            Resolved::Pending(pending) => pending.await,
        }
    }
}

/// Per-call cache of started computations.
///
/// Owned by exactly one execution call and dropped with it.
pub struct Resolver {
    plan: ExecutionPlan,
    config: Arc<ExecutorConfig>,
    handle: Handle,
    cells: Mutex<FxHashMap<String, PendingValue>>,
}

impl Resolver {
    pub fn new(plan: ExecutionPlan, config: Arc<ExecutorConfig>, handle: Handle) -> Self {
        let capacity = plan.len();
        Resolver {
            plan,
            config,
            handle,
            cells: Mutex::new(FxHashMap::with_capacity_and_hasher(
                capacity,
                Default::default(),
            )),
        }
    }

    pub fn plan(&self) -> &ExecutionPlan {
        &self.plan
    }

    /// Start `var` and any of its dependencies that are not started yet, and
    /// return its result cell. Never blocks on a computation.
    ///
    /// Dependencies are started before their dependents using an explicit
    /// stack, so deep chains do not recurse.
    pub fn resolve<'s>(&'s self, var: &'s str) -> Result<PendingValue, ExecError> {
        let mut stack: Vec<&'s str> = vec![var];

        while let Some(&current) = stack.last() {
            if self.cells.lock().contains_key(current) {
                stack.pop();
                continue;
            }

            let calc = self.plan.calculation(current)?;
            let waiting: Vec<&'s str> = {
                let cells = self.cells.lock();
                calc.dependencies()
                    .filter(|dep| !cells.contains_key(*dep))
                    .collect()
            };
            if !waiting.is_empty() {
                stack.extend(waiting);
                continue;
            }

            let left = self.operand(&calc.left)?;
            let right = self.operand(&calc.right)?;
            // A racing resolver may have claimed the name since the check
            // above; the first insert wins and nothing else is spawned.
            self.cells
                .lock()
                .entry(current.to_string())
                .or_insert_with(|| self.spawn(calc, left, right));
            stack.pop();
        }

        self.cells
            .lock()
            .get(var)
            .cloned()
            .ok_or_else(|| ExecError::NotRequired(var.to_string()))
    }

    fn operand(&self, operand: &Operand) -> Result<Resolved, ExecError> {
        match operand {
            Operand::Literal(value) => Ok(Resolved::Ready(*value)),
            Operand::Variable(name) => self
                .cells
                .lock()
                .get(name)
                .cloned()
                .map(Resolved::Pending)
                .ok_or_else(|| ExecError::NotRequired(name.clone())),
        }
    }

    fn spawn(&self, calc: &CalcInstruction, left: Resolved, right: Resolved) -> PendingValue {
        trace!("scheduling '{}'", calc.var);
        let calc = calc.clone();
        let config = Arc::clone(&self.config);

        let task = self.handle.spawn(async move {
            let (left, right) = future::try_join(left.value(), right.value()).await?;
            Ok::<_, ExecError>(compute(&calc, left, right, &config).await)
        });

        async move { task.await? }.boxed().shared()
    }
}

/// Apply `calc.op`, honouring the short-circuit policy and the simulated delay,
/// then report the result to the observer.
async fn compute(calc: &CalcInstruction, left: i64, right: i64, config: &ExecutorConfig) -> i64 {
    let shortcut = match config.short_circuit {
        ShortCircuitPolicy::SkipDelay => calc.op.short_circuit(left, right),
        ShortCircuitPolicy::Disabled => None,
    };

    let value = match shortcut {
        Some(value) => value,
        None => {
            if !config.operation_delay.is_zero() {
                tokio::time::sleep(config.operation_delay).await;
            }
            calc.op.apply(left, right)
        }
    };

    trace!("computed '{}' = {}", calc.var, value);
    config.notify(&calc.var, value);
    value
}
