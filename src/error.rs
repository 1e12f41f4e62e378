use thiserror::Error;

/// Precondition failures reported by the evaluator. Raised before any
/// computation happens, so a failed call never yields a partial trace.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A weight matrix or bias vector does not fit the fixed 1-3-3-1 topology.
    #[error("{field}: expected shape {expected}, got {actual}")]
    ShapeMismatch {
        field: &'static str,
        expected: String,
        actual: String,
    },

    /// Zero input samples — nothing to plot.
    #[error("input domain is empty")]
    EmptyDomain,
}
