//! Typed errors for data-contract violations.
//!
//! Missing or unclassifiable clinical text is never an error (it degrades to
//! empty results or warning-annotated sentinels). `DomainError` is reserved
//! for malformed structured input that must not be masked.

use thiserror::Error;

/// A data-contract violation in structured input or rule configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Patient age was negative, NaN, or otherwise non-finite.
    #[error("age must be a finite, non-negative number of years (got {0})")]
    InvalidAge(f64),

    /// Age range table violated its ordering/exhaustiveness invariants.
    #[error("age ranges must be strictly ascending and end with an unbounded range")]
    InvalidAgeRanges,
}
