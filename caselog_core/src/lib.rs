#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]

//! Extraction and categorization engine for clinical case-log reporting.
//!
//! The engine turns unstructured procedure notes and service tags into typed,
//! confidence-scored findings and a single auditable procedure category. It
//! is purely functional over immutable rule tables: every entry point is safe
//! to call from parallel workers, and no call performs I/O.

pub mod category;
pub mod error;
pub mod extraction;
pub mod finding;
pub mod mappings;
pub mod patterns;
pub mod processor;
pub mod resolve;
mod scoring;

pub use category::{
    BaseCategory, CategoryEngine, CategoryResult, CategoryRule, ProcedureCategory,
};
pub use category::detectors::{
    Approach, CpbStatus, Pathology, detect_approach, detect_cpb, detect_intracerebral_pathology,
    is_cesarean,
};
pub use error::DomainError;
pub use extraction::engine::{ExtractionConfig, FindingExtractor};
pub use finding::{AirwayManagement, Concept, Finding, MonitoringTechnique, VascularAccess};
pub use patterns::{BuildError, ConceptSet, ConceptSetDef, VariantDef};
pub use patterns::airway::default_airway_set;
pub use patterns::monitoring::default_monitoring_set;
pub use patterns::vascular::default_vascular_set;
pub use processor::{CaseProcessor, CaseRecord, EngineBuildError, ParsedCase};
pub use resolve::age::{AgeCategory, AgeRange, AgeResolver, default_age_ranges};
pub use resolve::anesthesia::{AnesthesiaMapper, AnesthesiaRule, AnesthesiaType};
pub use scoring::{DEFAULT_REVIEW_THRESHOLD, ScoreWeights, score};
