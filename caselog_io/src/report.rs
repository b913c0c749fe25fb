//! Validation reporting for parsed cases.
//!
//! Summarizes a processed batch for human review: warning counts, aggregate
//! confidence, missing critical fields, extraction statistics and a listing
//! of problematic cases. Rendered as plain text or JSON.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use caselog_core::ParsedCase;

/// A case is problematic when it carries at least this many warnings...
const PROBLEM_MIN_WARNINGS: usize = 1;
/// ...or, with no warnings at all, falls under this aggregate confidence.
const PROBLEM_MAX_CONFIDENCE: f64 = 0.4;

/// Overall batch statistics.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub total_cases: usize,
    pub cases_with_warnings: usize,
    pub low_confidence_cases: usize,
    pub average_confidence: f64,
    pub warning_types: BTreeMap<String, usize>,
    pub missing_fields: MissingFields,
}

/// Counts of cases missing each critical field.
#[derive(Debug, Serialize)]
pub struct MissingFields {
    pub episode_id: usize,
    pub provider: usize,
    pub procedure: usize,
    pub age_category: usize,
}

/// Per-concept extraction statistics.
#[derive(Debug, Serialize)]
pub struct ExtractionStatistics {
    pub cases_with_airway_extraction: usize,
    pub cases_with_vascular_extraction: usize,
    pub cases_with_monitoring_extraction: usize,
    pub airway_types: BTreeMap<String, usize>,
    pub vascular_types: BTreeMap<String, usize>,
    pub monitoring_types: BTreeMap<String, usize>,
    pub extraction_rate: ExtractionRate,
}

#[derive(Debug, Serialize)]
pub struct ExtractionRate {
    pub airway: f64,
    pub vascular: f64,
    pub monitoring: f64,
}

/// Validation report over a batch of parsed cases.
pub struct ValidationReport<'a> {
    cases: &'a [ParsedCase],
}

impl<'a> ValidationReport<'a> {
    /// Create a report over a processed batch.
    #[must_use]
    pub const fn new(cases: &'a [ParsedCase]) -> Self {
        Self { cases }
    }

    /// Overall validation summary statistics.
    #[must_use]
    pub fn summary(&self) -> Summary {
        let total = self.cases.len();
        let cases_with_warnings = self.cases.iter().filter(|c| c.has_warnings()).count();
        let low_confidence_cases = self.cases.iter().filter(|c| c.is_low_confidence()).count();

        let mut warning_types = BTreeMap::new();
        for case in self.cases {
            for warning in case.all_warnings() {
                *warning_types.entry(warning.to_string()).or_insert(0) += 1;
            }
        }

        let average_confidence = if total == 0 {
            0.0
        } else {
            let sum: f64 = self.cases.iter().map(|c| c.confidence_score).sum();
            round3(sum / total as f64)
        };

        Summary {
            total_cases: total,
            cases_with_warnings,
            low_confidence_cases,
            average_confidence,
            warning_types,
            missing_fields: MissingFields {
                episode_id: self.count_missing("episode_id"),
                provider: self.count_missing("provider"),
                procedure: self.count_missing("procedure"),
                age_category: self.count_missing("age_category"),
            },
        }
    }

    fn count_missing(&self, field: &str) -> usize {
        self.cases
            .iter()
            .filter(|c| c.missing_critical_fields().contains(&field))
            .count()
    }

    /// Cases with warnings, or warning-free cases with very low confidence.
    /// Routine cases with moderate confidence and no warnings are not
    /// flagged.
    #[must_use]
    pub fn problematic_cases(&self) -> Vec<&ParsedCase> {
        self.cases
            .iter()
            .filter(|case| {
                case.all_warnings().len() >= PROBLEM_MIN_WARNINGS
                    || (case.confidence_score < PROBLEM_MAX_CONFIDENCE
                        && case.all_warnings().is_empty())
            })
            .collect()
    }

    /// Statistics about extraction performance across the batch.
    #[must_use]
    pub fn extraction_statistics(&self) -> ExtractionStatistics {
        let total = self.cases.len();
        let airway_extractions = self.cases.iter().filter(|c| !c.airway.is_empty()).count();
        let vascular_extractions = self.cases.iter().filter(|c| !c.vascular.is_empty()).count();
        let monitoring_extractions = self
            .cases
            .iter()
            .filter(|c| !c.monitoring.is_empty())
            .count();

        let mut airway_types = BTreeMap::new();
        let mut vascular_types = BTreeMap::new();
        let mut monitoring_types = BTreeMap::new();
        for case in self.cases {
            for finding in &case.airway {
                *airway_types
                    .entry(finding.value.as_str().to_string())
                    .or_insert(0) += 1;
            }
            for finding in &case.vascular {
                *vascular_types
                    .entry(finding.value.as_str().to_string())
                    .or_insert(0) += 1;
            }
            for finding in &case.monitoring {
                *monitoring_types
                    .entry(finding.value.as_str().to_string())
                    .or_insert(0) += 1;
            }
        }

        let rate = |count: usize| {
            if total == 0 {
                0.0
            } else {
                round3(count as f64 / total as f64)
            }
        };

        ExtractionStatistics {
            cases_with_airway_extraction: airway_extractions,
            cases_with_vascular_extraction: vascular_extractions,
            cases_with_monitoring_extraction: monitoring_extractions,
            airway_types,
            vascular_types,
            monitoring_types,
            extraction_rate: ExtractionRate {
                airway: rate(airway_extractions),
                vascular: rate(vascular_extractions),
                monitoring: rate(monitoring_extractions),
            },
        }
    }

    /// Render the report as human-readable text.
    #[must_use]
    pub fn generate_text_report(&self) -> String {
        let summary = self.summary();
        let total = summary.total_cases;
        let pct = |count: usize| {
            if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            }
        };

        let mut out = String::new();
        let _ = writeln!(out, "==== VALIDATION REPORT ====");
        let _ = writeln!(out);
        let _ = writeln!(out, "SUMMARY");
        let _ = writeln!(out, "  Total Cases:          {total}");
        let _ = writeln!(
            out,
            "  Cases with Warnings:  {} ({:.1}%)",
            summary.cases_with_warnings,
            pct(summary.cases_with_warnings)
        );
        let _ = writeln!(
            out,
            "  Low Confidence Cases: {} ({:.1}%)",
            summary.low_confidence_cases,
            pct(summary.low_confidence_cases)
        );
        let _ = writeln!(
            out,
            "  Average Confidence:   {:.3}",
            summary.average_confidence
        );
        let _ = writeln!(out);

        let missing = &summary.missing_fields;
        if missing.episode_id + missing.provider + missing.procedure + missing.age_category > 0 {
            let _ = writeln!(out, "MISSING CRITICAL FIELDS");
            for (name, count) in [
                ("episode_id", missing.episode_id),
                ("provider", missing.provider),
                ("procedure", missing.procedure),
                ("age_category", missing.age_category),
            ] {
                if count > 0 {
                    let _ = writeln!(out, "  {name}: {count} cases ({:.1}%)", pct(count));
                }
            }
            let _ = writeln!(out);
        }

        if !summary.warning_types.is_empty() {
            let _ = writeln!(out, "WARNING TYPES (Top 10)");
            let mut sorted: Vec<_> = summary.warning_types.iter().collect();
            sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            for (warning, count) in sorted.into_iter().take(10) {
                let _ = writeln!(out, "  {count:>4}  {warning}");
            }
            let _ = writeln!(out);
        }

        let problematic = self.problematic_cases();
        if !problematic.is_empty() {
            let _ = writeln!(out, "PROBLEMATIC CASES ({} cases)", problematic.len());
            for (i, case) in problematic.iter().take(20).enumerate() {
                let warnings = case.all_warnings();
                let missing = case.missing_critical_fields();
                let _ = writeln!(
                    out,
                    "  {}. Case ID: {}",
                    i + 1,
                    case.case_id.as_deref().unwrap_or("UNKNOWN")
                );
                let _ = writeln!(out, "     Confidence: {:.3}", case.confidence_score);
                let _ = writeln!(out, "     Warnings ({}):", warnings.len());
                for warning in &warnings {
                    let _ = writeln!(out, "       - {warning}");
                }
                let _ = writeln!(
                    out,
                    "     Missing fields: {}",
                    if missing.is_empty() {
                        "None".to_string()
                    } else {
                        missing.join(", ")
                    }
                );
            }
            if problematic.len() > 20 {
                let _ = writeln!(
                    out,
                    "  ... and {} more problematic cases",
                    problematic.len() - 20
                );
            }
            let _ = writeln!(out);
        }

        let _ = writeln!(out, "==== END OF REPORT ====");
        out
    }

    /// Render the report as machine-readable JSON.
    #[must_use]
    pub fn generate_json_report(&self) -> serde_json::Value {
        let problematic: Vec<_> = self
            .problematic_cases()
            .into_iter()
            .map(|case| {
                serde_json::json!({
                    "case_id": case.case_id,
                    "has_warnings": case.has_warnings(),
                    "warning_count": case.all_warnings().len(),
                    "warnings": case.all_warnings(),
                    "confidence_score": round3(case.confidence_score),
                    "is_low_confidence": case.is_low_confidence(),
                    "missing_fields": case.missing_critical_fields(),
                })
            })
            .collect();

        serde_json::json!({
            "summary": self.summary(),
            "problematic_cases": problematic,
            "extraction_details": self.extraction_statistics(),
        })
    }

    /// Save the report; the format is chosen by the file extension
    /// (`.json` for JSON, anything else for text).
    ///
    /// # Errors
    /// Fails if the file cannot be written.
    pub fn save_report(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        if is_json {
            let report = self.generate_json_report();
            std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        } else {
            std::fs::write(path, self.generate_text_report())?;
        }
        Ok(())
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use caselog_core::{CaseProcessor, CaseRecord, FindingExtractor};

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn batch() -> Vec<ParsedCase> {
        let processor = CaseProcessor::with_defaults(FindingExtractor::with_defaults())
            .expect("defaults should build");

        let clean = CaseRecord {
            episode_id: Some("C1".to_string()),
            anesthesiologist: Some("DOE, JANE".to_string()),
            age_years: Some(45.0),
            anesthesia_type: Some("General".to_string()),
            procedure_notes: Some("intubated with direct laryngoscopy".to_string()),
            procedure: Some("CABG".to_string()),
            services: vec!["CARDSURG".to_string()],
            ..CaseRecord::default()
        };
        let warned = CaseRecord {
            episode_id: Some("C2".to_string()),
            age_years: Some(-3.0),
            anesthesia_type: Some("Mesmerism".to_string()),
            procedure: Some("left knee arthroscopy".to_string()),
            ..CaseRecord::default()
        };

        processor.process_batch(&[clean, warned])
    }

    #[test]
    fn summary_counts_warnings_and_missing_fields() {
        let cases = batch();
        let report = ValidationReport::new(&cases);
        let summary = report.summary();

        assert_eq!(summary.total_cases, 2);
        assert_eq!(summary.cases_with_warnings, 1);
        assert_eq!(summary.missing_fields.provider, 1);
        assert_eq!(summary.missing_fields.age_category, 1);
        assert!(!summary.warning_types.is_empty());
    }

    #[test]
    fn problematic_cases_are_the_warned_ones() {
        let cases = batch();
        let report = ValidationReport::new(&cases);
        let problematic = report.problematic_cases();
        assert_eq!(problematic.len(), 1);
        assert_eq!(problematic[0].case_id.as_deref(), Some("C2"));
    }

    #[test]
    fn extraction_statistics_count_types() {
        let cases = batch();
        let report = ValidationReport::new(&cases);
        let stats = report.extraction_statistics();
        assert_eq!(stats.cases_with_airway_extraction, 1);
        assert_eq!(stats.airway_types.get("Oral ETT"), Some(&1));
        assert!((stats.extraction_rate.airway - 0.5).abs() < 1e-9);
    }

    #[test]
    fn text_report_renders_sections() {
        let cases = batch();
        let report = ValidationReport::new(&cases);
        let text = report.generate_text_report();
        assert!(text.contains("VALIDATION REPORT"));
        assert!(text.contains("Total Cases:          2"));
        assert!(text.contains("PROBLEMATIC CASES"));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn save_report_picks_format_by_extension() {
        let cases = batch();
        let report = ValidationReport::new(&cases);
        let dir = tempfile::tempdir().expect("tempdir");

        let json_path = dir.path().join("report.json");
        report.save_report(&json_path).expect("json report saves");
        let content = std::fs::read_to_string(&json_path).expect("json readable");
        let parsed: serde_json::Value =
            serde_json::from_str(&content).expect("report is valid JSON");
        assert!(parsed.get("summary").is_some());

        let text_path = dir.path().join("report.txt");
        report.save_report(&text_path).expect("text report saves");
        let content = std::fs::read_to_string(&text_path).expect("text readable");
        assert!(content.contains("VALIDATION REPORT"));
    }
}
