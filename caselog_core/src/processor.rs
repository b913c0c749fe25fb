//! Row processing: compose the engine outputs for one case.
//!
//! The processor owns read-only, prebuilt rule tables (injected or defaults)
//! and turns a row-like [`CaseRecord`] into an immutable [`ParsedCase`].
//! It never aborts a batch: clinical ambiguity and unmapped values degrade
//! to warning-annotated best guesses, and the only hard failures (domain
//! errors on malformed primitives) are converted to per-case warnings here
//! at the boundary.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::category::{CategoryEngine, CategoryResult};
use crate::error::DomainError;
use crate::extraction::engine::FindingExtractor;
use crate::finding::{AirwayManagement, Finding, MonitoringTechnique, VascularAccess};
use crate::patterns::{BuildError, ConceptSet};
use crate::patterns::airway::default_airway_set;
use crate::patterns::monitoring::default_monitoring_set;
use crate::patterns::vascular::default_vascular_set;
use crate::resolve::age::{AgeCategory, AgeResolver};
use crate::resolve::anesthesia::{AnesthesiaMapper, AnesthesiaType};

/// Cases below this aggregate confidence are considered low-confidence in
/// validation reporting.
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.4;

/// Error building a processor from configuration.
#[derive(Debug, Error)]
pub enum EngineBuildError {
    #[error(transparent)]
    Pattern(#[from] BuildError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// One input row as exposed by the I/O layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseRecord {
    pub episode_id: Option<String>,
    pub case_date: Option<String>,
    pub anesthesiologist: Option<String>,
    pub age_years: Option<f64>,
    pub emergent: Option<bool>,
    pub asa: Option<String>,
    pub anesthesia_type: Option<String>,
    pub procedure_notes: Option<String>,
    pub procedure: Option<String>,
    pub services: Vec<String>,
}

/// One fully classified case. Immutable once produced.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedCase {
    pub case_id: Option<String>,
    pub case_date: Option<String>,
    pub supervisor: Option<String>,
    pub age_category: Option<AgeCategory>,
    pub original_procedure: Option<String>,
    /// ASA status with the emergency suffix applied when warranted.
    pub asa_status: Option<String>,
    pub anesthesia_type: Option<AnesthesiaType>,
    pub raw_anesthesia_type: Option<String>,
    pub airway: Vec<Finding<AirwayManagement>>,
    pub vascular: Vec<Finding<VascularAccess>>,
    pub monitoring: Vec<Finding<MonitoringTechnique>>,
    pub category: CategoryResult,
    /// Parsing warnings for this row (category warnings live on `category`).
    pub parsing_warnings: Vec<String>,
    /// Mean finding confidence; 1.0 when nothing was extracted.
    pub confidence_score: f64,
}

impl ParsedCase {
    /// Semicolon-joined airway cell. Findings are already ordered by
    /// descending confidence with declaration-order ties; entries under the
    /// review threshold are excluded from the cell (they stay on the case
    /// and are surfaced through review warnings).
    #[must_use]
    pub fn airway_display(&self, review_threshold: f64) -> String {
        join_cell(&self.airway, review_threshold, |v| v.as_str())
    }

    /// Semicolon-joined vascular access cell.
    #[must_use]
    pub fn vascular_display(&self, review_threshold: f64) -> String {
        join_cell(&self.vascular, review_threshold, |v| v.as_str())
    }

    /// Semicolon-joined monitoring cell.
    #[must_use]
    pub fn monitoring_display(&self, review_threshold: f64) -> String {
        join_cell(&self.monitoring, review_threshold, |v| v.as_str())
    }

    /// Anesthesia cell: the standardized label, or the raw value passed
    /// through when unmapped.
    #[must_use]
    pub fn anesthesia_display(&self) -> String {
        self.anesthesia_type.map_or_else(
            || self.raw_anesthesia_type.clone().unwrap_or_default(),
            |t| t.as_str().to_string(),
        )
    }

    /// All warnings for the case: parsing warnings then category warnings.
    #[must_use]
    pub fn all_warnings(&self) -> Vec<&str> {
        self.parsing_warnings
            .iter()
            .map(String::as_str)
            .chain(self.category.warnings.iter().map(String::as_str))
            .collect()
    }

    /// Whether the case carries any warning.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.parsing_warnings.is_empty() || !self.category.warnings.is_empty()
    }

    /// Whether aggregate confidence falls under the reporting threshold.
    #[must_use]
    pub fn is_low_confidence(&self) -> bool {
        self.confidence_score < LOW_CONFIDENCE_THRESHOLD
    }

    /// Critical fields that are missing on this case.
    #[must_use]
    pub fn missing_critical_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.case_id.is_none() {
            missing.push("episode_id");
        }
        if self.supervisor.is_none() {
            missing.push("provider");
        }
        if self.original_procedure.is_none() {
            missing.push("procedure");
        }
        if self.age_category.is_none() {
            missing.push("age_category");
        }
        missing
    }
}

fn join_cell<V: Copy>(
    findings: &[Finding<V>],
    review_threshold: f64,
    label: impl Fn(V) -> &'static str,
) -> String {
    findings
        .iter()
        .filter(|f| f.confidence >= review_threshold)
        .map(|f| label(f.value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Processor composing extraction, categorization and resolution for rows.
///
/// All rule tables are read-only after construction, so one processor can
/// serve any number of parallel workers.
#[derive(Debug)]
pub struct CaseProcessor {
    extractor: FindingExtractor,
    airway: ConceptSet<AirwayManagement>,
    vascular: ConceptSet<VascularAccess>,
    monitoring: ConceptSet<MonitoringTechnique>,
    categories: CategoryEngine,
    ages: AgeResolver,
    anesthesia: AnesthesiaMapper,
}

impl CaseProcessor {
    /// Create a processor from prebuilt components.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        extractor: FindingExtractor,
        airway: ConceptSet<AirwayManagement>,
        vascular: ConceptSet<VascularAccess>,
        monitoring: ConceptSet<MonitoringTechnique>,
        categories: CategoryEngine,
        ages: AgeResolver,
        anesthesia: AnesthesiaMapper,
    ) -> Self {
        Self {
            extractor,
            airway,
            vascular,
            monitoring,
            categories,
            ages,
            anesthesia,
        }
    }

    /// Create a processor over the default rule tables.
    ///
    /// # Errors
    /// Returns an error if any default table fails to build.
    pub fn with_defaults(extractor: FindingExtractor) -> Result<Self, EngineBuildError> {
        Ok(Self::new(
            extractor,
            default_airway_set().build()?,
            default_vascular_set().build()?,
            default_monitoring_set().build()?,
            CategoryEngine::with_defaults(),
            AgeResolver::with_defaults()?,
            AnesthesiaMapper::with_defaults(),
        ))
    }

    /// The review threshold the extractor was configured with.
    #[must_use]
    pub const fn review_threshold(&self) -> f64 {
        self.extractor.config().review_threshold
    }

    /// Classify one case.
    #[must_use]
    pub fn process(&self, record: &CaseRecord) -> ParsedCase {
        let mut warnings = Vec::new();

        let notes = record.procedure_notes.as_deref();
        let airway = self.extractor.extract(notes, &self.airway, "procedure_notes");
        let vascular = self
            .extractor
            .extract(notes, &self.vascular, "procedure_notes");
        let monitoring = self
            .extractor
            .extract(notes, &self.monitoring, "procedure_notes");

        let category = self.categories.categorize(
            record.procedure.as_deref().unwrap_or(""),
            &record.services,
        );

        let age_category = match record.age_years {
            None => None,
            Some(age) => match self.ages.resolve(age) {
                Ok(category) => Some(category),
                Err(err) => {
                    warnings.push(err.to_string());
                    None
                }
            },
        };

        let anesthesia_type = record
            .anesthesia_type
            .as_deref()
            .and_then(|raw| {
                let mapped = self.anesthesia.map(raw);
                if mapped.is_none() && !raw.trim().is_empty() {
                    warnings.push(format!("unmapped anesthesia type: {}", raw.trim()));
                }
                mapped
            });

        let asa_status = record.asa.as_deref().map(|asa| {
            let mut status = asa.trim().to_uppercase();
            if record.emergent == Some(true) && !status.is_empty() && !status.ends_with('E') {
                status.push('E');
            }
            status
        });

        let threshold = self.review_threshold();
        push_review_warnings(&mut warnings, &airway, threshold, |v| v.as_str());
        push_review_warnings(&mut warnings, &vascular, threshold, |v| v.as_str());
        push_review_warnings(&mut warnings, &monitoring, threshold, |v| v.as_str());

        let confidence_score = aggregate_confidence(&airway, &vascular, &monitoring);

        debug!(
            case_id = record.episode_id.as_deref().unwrap_or(""),
            category = category.category.as_str(),
            findings = airway.len() + vascular.len() + monitoring.len(),
            "processed case"
        );

        ParsedCase {
            case_id: record.episode_id.clone(),
            case_date: record.case_date.clone(),
            supervisor: record.anesthesiologist.clone(),
            age_category,
            original_procedure: record.procedure.clone(),
            asa_status,
            anesthesia_type,
            raw_anesthesia_type: record.anesthesia_type.clone(),
            airway,
            vascular,
            monitoring,
            category,
            parsing_warnings: warnings,
            confidence_score,
        }
    }

    /// Classify a batch of cases with row-level parallelism. Row order is
    /// preserved; rows are independent by construction.
    #[must_use]
    pub fn process_batch(&self, records: &[CaseRecord]) -> Vec<ParsedCase> {
        records.par_iter().map(|r| self.process(r)).collect()
    }
}

fn push_review_warnings<V: Copy>(
    warnings: &mut Vec<String>,
    findings: &[Finding<V>],
    threshold: f64,
    label: impl Fn(V) -> &'static str,
) {
    for finding in findings {
        if finding.needs_review(threshold) {
            warnings.push(format!(
                "low-confidence {} finding ({:.2}); flagged for review",
                label(finding.value),
                finding.confidence
            ));
        }
    }
}

fn aggregate_confidence(
    airway: &[Finding<AirwayManagement>],
    vascular: &[Finding<VascularAccess>],
    monitoring: &[Finding<MonitoringTechnique>],
) -> f64 {
    let sum: f64 = airway
        .iter()
        .map(|f| f.confidence)
        .chain(vascular.iter().map(|f| f.confidence))
        .chain(monitoring.iter().map(|f| f.confidence))
        .sum();
    let count = airway.len() + vascular.len() + monitoring.len();

    if count == 0 {
        1.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let mean = sum / count as f64;
        mean
    }
}
