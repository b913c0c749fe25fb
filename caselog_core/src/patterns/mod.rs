//! Configurable extraction patterns for clinical concepts.
//!
//! Pattern tables are declarative data: each concept variant carries ordered
//! lists of `primary`, `supporting` and `negating` regex patterns. Tables can
//! be loaded from configuration rather than hardcoded; the defaults in the
//! sibling modules cover the standard case-log concepts.
//!
//! Tables never mutate after [`ConceptSetDef::build`], so a compiled
//! [`ConceptSet`] is freely shareable across concurrent extraction calls.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::finding::Concept;

pub mod airway;
pub mod monitoring;
pub mod vascular;

/// Error type for pattern building.
#[derive(Debug)]
pub enum BuildError {
    /// A regex pattern failed to compile.
    Regex(String),

    /// A variant was declared without any primary pattern.
    MissingPrimary(String),
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Regex(e) => write!(f, "invalid regex: {e}"),
            Self::MissingPrimary(v) => write!(f, "variant {v} has no primary pattern"),
        }
    }
}

impl std::error::Error for BuildError {}

impl From<regex::Error> for BuildError {
    fn from(err: regex::Error) -> Self {
        Self::Regex(err.to_string())
    }
}

/// Definition of one concept variant's pattern tiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantDef<V> {
    /// The value this variant classifies to.
    pub value: V,

    /// Patterns that must match for a finding to exist. At least one required.
    pub primary: Vec<String>,

    /// Patterns that corroborate the finding (+confidence, capped).
    #[serde(default)]
    pub supporting: Vec<String>,

    /// Patterns that contradict the finding (-confidence, uncapped).
    #[serde(default)]
    pub negating: Vec<String>,
}

/// Definition of a full concept pattern set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptSetDef<V> {
    /// The concept these variants classify.
    pub concept: Concept,

    /// Variants in declaration order. Order is a tie-break for equal
    /// confidence in extractor output.
    pub variants: Vec<VariantDef<V>>,
}

impl<V: Copy + std::fmt::Debug> ConceptSetDef<V> {
    /// Compile every pattern in this definition.
    ///
    /// # Errors
    /// Returns an error if any regex is invalid or a variant lacks a
    /// primary pattern.
    pub fn build(&self) -> Result<ConceptSet<V>, BuildError> {
        let variants = self
            .variants
            .iter()
            .map(VariantDef::build)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ConceptSet {
            concept: self.concept,
            variants,
        })
    }
}

impl<V: Copy + std::fmt::Debug> VariantDef<V> {
    fn build(&self) -> Result<CompiledVariant<V>, BuildError> {
        if self.primary.is_empty() {
            return Err(BuildError::MissingPrimary(format!("{:?}", self.value)));
        }

        Ok(CompiledVariant {
            value: self.value,
            primary: compile_all(&self.primary)?,
            supporting: compile_all(&self.supporting)?,
            negating: compile_all(&self.negating)?,
        })
    }
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>, BuildError> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .map_err(BuildError::from)
        })
        .collect()
}

/// A compiled, immutable concept pattern set.
#[derive(Debug, Clone)]
pub struct ConceptSet<V> {
    concept: Concept,
    variants: Vec<CompiledVariant<V>>,
}

impl<V> ConceptSet<V> {
    /// The concept these variants classify.
    #[must_use]
    pub const fn concept(&self) -> Concept {
        self.concept
    }

    /// The compiled variants in declaration order.
    #[must_use]
    pub fn variants(&self) -> &[CompiledVariant<V>] {
        &self.variants
    }
}

/// One compiled concept variant.
#[derive(Debug, Clone)]
pub struct CompiledVariant<V> {
    pub(crate) value: V,
    pub(crate) primary: Vec<Regex>,
    pub(crate) supporting: Vec<Regex>,
    pub(crate) negating: Vec<Regex>,
}

impl<V: Copy> CompiledVariant<V> {
    /// The value this variant classifies to.
    #[must_use]
    pub fn value(&self) -> V {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::AirwayManagement;

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn build_compiles_case_insensitive_patterns() {
        let def = ConceptSetDef {
            concept: Concept::Airway,
            variants: vec![VariantDef {
                value: AirwayManagement::Mask,
                primary: vec![r"\bmask\s+vent(ilation)?\b".to_string()],
                supporting: vec![],
                negating: vec![],
            }],
        };

        let set = def.build().expect("valid definition should build");
        assert_eq!(set.concept(), Concept::Airway);
        assert!(set.variants()[0].primary[0].is_match("MASK VENTILATION"));
    }

    #[test]
    fn variant_without_primary_is_rejected() {
        let def = ConceptSetDef {
            concept: Concept::Airway,
            variants: vec![VariantDef {
                value: AirwayManagement::Mask,
                primary: vec![],
                supporting: vec![r"\bmask\b".to_string()],
                negating: vec![],
            }],
        };

        assert!(matches!(def.build(), Err(BuildError::MissingPrimary(_))));
    }

    #[test]
    fn invalid_regex_is_rejected() {
        let def = ConceptSetDef {
            concept: Concept::Airway,
            variants: vec![VariantDef {
                value: AirwayManagement::Mask,
                primary: vec![r"\bmask(\b".to_string()],
                supporting: vec![],
                negating: vec![],
            }],
        };

        assert!(matches!(def.build(), Err(BuildError::Regex(_))));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn definitions_serialize_round_trip() {
        let def = ConceptSetDef {
            concept: Concept::VascularAccess,
            variants: vec![VariantDef {
                value: crate::finding::VascularAccess::ArterialCatheter,
                primary: vec![r"\barterial\s+line\b".to_string()],
                supporting: vec![],
                negating: vec![r"\bno\s+".to_string()],
            }],
        };

        let json = serde_json::to_string(&def).expect("definition should serialize");
        let back: ConceptSetDef<crate::finding::VascularAccess> =
            serde_json::from_str(&json).expect("valid JSON should deserialize");
        assert_eq!(back.variants.len(), 1);
        assert_eq!(back.variants[0].negating.len(), 1);
    }
}
