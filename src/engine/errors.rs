//! Error types for program execution
//!
//! [`ExecError`] covers everything that can go wrong between receiving an
//! instruction list and handing back the printed values. All of them abort the
//! whole call: there are no partial results.

use thiserror::Error;
use tokio::task::JoinError;

/// Errors reported by [`InstructionExecutor`](super::executor::InstructionExecutor)
///
/// `Clone` so that a failed shared computation can be reported to every
/// print that waits on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    /// More than one `Calc` instruction assigns the same variable
    #[error("variable '{0}' is already defined")]
    DuplicateDefinition(String),

    /// A required variable has no defining `Calc` instruction
    #[error("variable '{0}' is never calculated")]
    UndefinedVariable(String),

    /// Dependency cycle among required variables, reported as the edge that closes it
    #[error("cyclic dependency detected between '{0}' and '{1}'")]
    CyclicDependency(String, String),

    /// A print or operand references a variable outside the execution plan
    #[error("variable '{0}' is not required by any print")]
    NotRequired(String),

    /// Empty or whitespace-only variable name in the instruction at `index`
    #[error("instruction #{index}: variable name must be provided")]
    BlankName { index: usize },

    /// Operation symbol outside `+`, `-`, `*`
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The worker running a computation was cancelled before it finished
    #[error("computation was interrupted before completing")]
    InterruptedComputation,

    /// Unexpected fault outside the validation taxonomy
    #[error("internal fault: {0}")]
    Internal(String),
}

impl ExecError {
    /// Whether the error is caused by the submitted program rather than by
    /// the executor itself.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            ExecError::InterruptedComputation | ExecError::Internal(_)
        )
    }
}

impl From<JoinError> for ExecError {
    fn from(err: JoinError) -> Self {
        match err.try_into_panic() {
            Ok(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "worker panicked".to_string());
                ExecError::Internal(message)
            }
            Err(err) if err.is_cancelled() => ExecError::InterruptedComputation,
            Err(err) => ExecError::Internal(err.to_string()),
        }
    }
}
