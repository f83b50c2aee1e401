//! Domain validation errors for core domain types.
//!
//! These errors are returned by `try_new` constructors that validate inputs.
//!
//! # Examples
//!
//! ```
//! use edgescout::domain::error::DomainError;
//! use edgescout::domain::judgment::{Confidence, Decision, Judgment};
//!
//! let result = Judgment::try_new(Decision::Yes, 1.3, Confidence::High, "too sure");
//! assert!(matches!(result, Err(DomainError::ProbabilityOutOfRange { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Probabilities must lie in `[0, 1]`.
    #[error("probability must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { value: f64 },

    /// An opportunity cannot be built from an abstaining judgment.
    #[error("cannot build an opportunity from an abstaining judgment")]
    AbstainingJudgment,
}
