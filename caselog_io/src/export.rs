//! JSON export for the external form-filling client.
//!
//! Produces a self-describing document: export metadata, optional program
//! information, and one entry per case with both the human-readable labels
//! and the resolved form codes the client fills in.

use chrono::Utc;
use serde_json::{Value, json};
use std::path::Path;
use tracing::info;

use caselog_core::{ParsedCase, mappings};

const FORMAT_VERSION: &str = "1.0";

/// Export parsed cases to the form-client JSON document.
///
/// # Errors
/// Fails if the file cannot be written.
pub fn export_to_json(
    cases: &[ParsedCase],
    output_file: &Path,
    resident_id: Option<&str>,
    program_info: Option<&Value>,
    review_threshold: f64,
) -> anyhow::Result<()> {
    info!(
        "Exporting {} cases to JSON: {}",
        cases.len(),
        output_file.display()
    );

    let case_entries: Vec<Value> = cases
        .iter()
        .enumerate()
        .map(|(idx, case)| case_entry(case, idx, resident_id, review_threshold))
        .collect();

    let document = json!({
        "metadata": {
            "export_date": Utc::now().to_rfc3339(),
            "total_cases": case_entries.len(),
            "tool_version": env!("CARGO_PKG_VERSION"),
            "format_version": FORMAT_VERSION,
        },
        "program_info": program_info.cloned().unwrap_or_else(|| json!({})),
        "cases": case_entries,
    });

    std::fs::write(output_file, serde_json::to_string_pretty(&document)?)?;
    info!(
        "Successfully exported {} cases to {}",
        cases.len(),
        output_file.display()
    );
    Ok(())
}

fn case_entry(
    case: &ParsedCase,
    row_idx: usize,
    resident_id: Option<&str>,
    review_threshold: f64,
) -> Value {
    let age_label = case.age_category.map(|c| c.as_str());
    let asa_text = case.asa_status.as_deref().unwrap_or("");
    let asa_code = mappings::parse_asa_status(asa_text);

    let anesthesia_cell = case.anesthesia_display();
    let airway_cell = case.airway_display(review_threshold);
    let category_label = case.category.category.as_str();
    let vascular_cell = case.vascular_display(review_threshold);
    let monitoring_cell = case.monitoring_display(review_threshold);

    // One flat, deduplicated code list across every answered field.
    let mut codes: Vec<&str> = Vec::new();
    if let Some(code) = asa_code {
        codes.push(code);
    }
    for cell in [
        anesthesia_cell.as_str(),
        airway_cell.as_str(),
        category_label,
        vascular_cell.as_str(),
        monitoring_cell.as_str(),
    ] {
        for code in mappings::procedure_codes(cell) {
            if !codes.contains(&code) {
                codes.push(code);
            }
        }
    }

    json!({
        "row_number": row_idx + 1,
        "case_id": case.case_id.as_deref().unwrap_or(""),
        "case_date": case.case_date.as_deref().unwrap_or(""),
        "resident_id": resident_id,
        "patient": {
            "age_category": age_label,
            "age_code": age_label.and_then(mappings::patient_age_code),
        },
        "asa_status": {
            "text": asa_text,
            "code": asa_code,
        },
        "procedures": {
            "anesthesia_type": anesthesia_cell,
            "airway_management": airway_cell,
            "procedure_category": category_label,
            "vascular_access": vascular_cell,
            "monitoring": monitoring_cell,
        },
        "procedure_codes": codes,
        "warnings": case.all_warnings(),
    })
}

/// Write a template document showing the expected export format.
///
/// # Errors
/// Fails if the file cannot be written.
pub fn generate_import_template(output_file: &Path) -> anyhow::Result<()> {
    let template = json!({
        "metadata": {
            "export_date": "2025-01-15T12:00:00Z",
            "total_cases": 1,
            "tool_version": env!("CARGO_PKG_VERSION"),
            "format_version": FORMAT_VERSION,
        },
        "program_info": {
            "program_id": "0404121134",
            "program_name": "University of Pennsylvania Health System Program",
            "specialty": "Anesthesiology",
            "specialty_code": "040",
        },
        "cases": [
            {
                "row_number": 1,
                "case_id": "CASE001",
                "case_date": "11/15/2025",
                "resident_id": "1325527",
                "patient": {
                    "age_category": "d. >= 12 yr. and < 65 yr.",
                    "age_code": "33",
                },
                "asa_status": {"text": "2", "code": "156632"},
                "procedures": {
                    "anesthesia_type": "GA",
                    "airway_management": "Oral ETT; Laryngoscope - Direct",
                    "procedure_category": "Intrathoracic non-cardiac",
                    "vascular_access": "Arterial Catheter",
                    "monitoring": "",
                },
                "procedure_codes": [
                    "156632",
                    "1256330",
                    "156654",
                    "1256334",
                    "156683",
                    "1256338",
                ],
                "warnings": [],
            }
        ],
    });

    std::fs::write(output_file, serde_json::to_string_pretty(&template)?)?;
    info!("Generated template file: {}", output_file.display());
    Ok(())
}
