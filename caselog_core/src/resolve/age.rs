//! Patient age band resolution.
//!
//! Ages in years are matched against an ordered range table; the first range
//! whose upper bound strictly exceeds the age wins. The table is validated at
//! construction: bounds strictly ascending, last bound unbounded, so every
//! finite non-negative age resolves to exactly one band.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Standardized age bands for case-log reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeCategory {
    /// Under 3 months.
    Neonate,
    /// 3 months to under 3 years.
    Infant,
    /// 3 years to under 12 years.
    Child,
    /// 12 years to under 65 years.
    Adult,
    /// 65 years and older.
    Geriatric,
}

impl AgeCategory {
    /// Standardized case-log label for this band.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neonate => "a. < 3 months",
            Self::Infant => "b. >= 3 mos. and < 3 yr.",
            Self::Child => "c. >= 3 yr. and < 12 yr.",
            Self::Adult => "d. >= 12 yr. and < 65 yr.",
            Self::Geriatric => "e. >= 65 year",
        }
    }
}

/// One age range: everything below `upper_bound_years` (exclusive) that no
/// earlier range claimed.
#[derive(Debug, Clone, Copy)]
pub struct AgeRange {
    /// Exclusive upper bound in years; `f64::INFINITY` for the last range.
    pub upper_bound_years: f64,

    /// Band assigned to ages in this range.
    pub category: AgeCategory,
}

/// Default range table. Months are expressed as fractional years.
#[must_use]
pub fn default_age_ranges() -> Vec<AgeRange> {
    vec![
        AgeRange {
            upper_bound_years: 0.25,
            category: AgeCategory::Neonate,
        },
        AgeRange {
            upper_bound_years: 3.0,
            category: AgeCategory::Infant,
        },
        AgeRange {
            upper_bound_years: 12.0,
            category: AgeCategory::Child,
        },
        AgeRange {
            upper_bound_years: 65.0,
            category: AgeCategory::Adult,
        },
        AgeRange {
            upper_bound_years: f64::INFINITY,
            category: AgeCategory::Geriatric,
        },
    ]
}

/// Resolver over a validated, ordered age range table.
#[derive(Debug, Clone)]
pub struct AgeResolver {
    ranges: Vec<AgeRange>,
}

impl AgeResolver {
    /// Create a resolver, validating the range table invariants.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidAgeRanges`] if bounds are not strictly
    /// ascending or the last bound is not unbounded.
    pub fn new(ranges: Vec<AgeRange>) -> Result<Self, DomainError> {
        let ascending = ranges
            .windows(2)
            .all(|pair| pair[0].upper_bound_years < pair[1].upper_bound_years);
        let exhaustive = ranges
            .last()
            .is_some_and(|range| range.upper_bound_years.is_infinite());

        if !ascending || !exhaustive {
            return Err(DomainError::InvalidAgeRanges);
        }

        Ok(Self { ranges })
    }

    /// Create a resolver with the default range table.
    ///
    /// # Errors
    /// Returns an error if the default table is invalid (it is not).
    pub fn with_defaults() -> Result<Self, DomainError> {
        Self::new(default_age_ranges())
    }

    /// Resolve an age in years to its band.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidAge`] for negative or non-finite ages;
    /// upstream data-quality defects must not be masked.
    pub fn resolve(&self, age_years: f64) -> Result<AgeCategory, DomainError> {
        if !age_years.is_finite() || age_years < 0.0 {
            return Err(DomainError::InvalidAge(age_years));
        }

        self.ranges
            .iter()
            .find(|range| age_years < range.upper_bound_years)
            .map(|range| range.category)
            // Unreachable for valid tables: the last bound is infinite.
            .ok_or(DomainError::InvalidAgeRanges)
    }
}
