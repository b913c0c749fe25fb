//! CSV pair ingestion and output writing.
//!
//! The source system exports two files per extract: `<PREFIX>.CaseList.csv`
//! with one row per case and `<PREFIX>.ProcedureList.csv` with zero or more
//! procedure rows per case. Cases are joined to their procedures by case id,
//! selecting the most invasive anesthesia technique; procedures whose case
//! id has no matching case (standalone labor epidurals, nerve catheters)
//! are collected as orphan records so they still reach the processor.

use anyhow::Context;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use caselog_core::{CaseRecord, ParsedCase};

const CASE_SUFFIX: &str = ".CaseList.csv";
const PROC_SUFFIX: &str = ".ProcedureList.csv";

/// Output column order of the converted CSV.
pub const OUTPUT_COLUMNS: &[&str] = &[
    "Case ID",
    "Case Date",
    "Supervisor",
    "Age",
    "Original Procedure",
    "ASA Physical Status",
    "Anesthesia Type",
    "Airway Management",
    "Procedure Category",
    "Specialized Vascular Access",
    "Specialized Monitoring Techniques",
];

/// Invasiveness ranking for procedure-list technique names (higher = more
/// invasive). Used to pick the primary technique when a case has several.
fn technique_rank(name: &str) -> u8 {
    match name {
        "Intubation complex" => 6,
        "Intubation routine" => 5,
        "Spinal" => 4,
        "Epidural" => 3,
        "LMA" => 2,
        "Peripheral nerve block" => 1,
        _ => 0,
    }
}

#[derive(Debug, Deserialize)]
struct CaseRow {
    #[serde(rename = "MPOG_Case_ID")]
    case_id: String,
    #[serde(rename = "AIMS_Scheduled_DT", default)]
    scheduled: Option<String>,
    #[serde(rename = "AIMS_Patient_Age_Years", default)]
    age_years: Option<f64>,
    #[serde(rename = "ASA_Status", default)]
    asa: Option<String>,
    #[serde(rename = "AIMS_Actual_Procedure_Text", default)]
    procedure_text: Option<String>,
    #[serde(rename = "AnesAttendings", default)]
    attendings: Option<String>,
    #[serde(rename = "Emergent", default)]
    emergent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProcedureRow {
    #[serde(rename = "MPOG_Case_ID")]
    case_id: String,
    #[serde(rename = "ProcedureName", default)]
    procedure_name: Option<String>,
}

/// Discover matching CaseList/ProcedureList file pairs in a directory.
///
/// # Errors
/// Fails if the directory cannot be read or no matching pair exists.
pub fn discover_csv_pairs(directory: &Path) -> anyhow::Result<Vec<(PathBuf, PathBuf)>> {
    let mut case_files = BTreeMap::new();
    let mut proc_files = BTreeMap::new();

    for entry in std::fs::read_dir(directory)
        .with_context(|| format!("reading directory {}", directory.display()))?
    {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(prefix) = name.strip_suffix(CASE_SUFFIX) {
            case_files.insert(prefix.to_string(), path.clone());
        } else if let Some(prefix) = name.strip_suffix(PROC_SUFFIX) {
            proc_files.insert(prefix.to_string(), path.clone());
        }
    }

    let unpaired_case: Vec<_> = case_files
        .keys()
        .filter(|p| !proc_files.contains_key(*p))
        .cloned()
        .collect();
    let unpaired_proc: Vec<_> = proc_files
        .keys()
        .filter(|p| !case_files.contains_key(*p))
        .cloned()
        .collect();
    if !unpaired_case.is_empty() || !unpaired_proc.is_empty() {
        warn!(
            "Found unpaired files - CaseList: {:?}, ProcedureList: {:?}",
            unpaired_case, unpaired_proc
        );
    }

    let pairs: Vec<_> = case_files
        .into_iter()
        .filter_map(|(prefix, case_path)| {
            proc_files
                .get(&prefix)
                .map(|proc_path| (case_path, proc_path.clone()))
        })
        .collect();

    if pairs.is_empty() {
        anyhow::bail!(
            "No matching CSV pairs found in {}. Expected files matching pattern: \
             <PREFIX>{CASE_SUFFIX} and <PREFIX>{PROC_SUFFIX}",
            directory.display()
        );
    }

    info!("Discovered {} CSV pair(s)", pairs.len());
    Ok(pairs)
}

/// Read and join every CSV pair in a directory.
///
/// Returns `(cases, orphans)`: joined case records, then standalone
/// procedure records with no matching case row.
///
/// # Errors
/// Fails on unreadable files or malformed CSV.
pub fn read_csv_pairs(directory: &Path) -> anyhow::Result<(Vec<CaseRecord>, Vec<CaseRecord>)> {
    let pairs = discover_csv_pairs(directory)?;

    let mut records = Vec::new();
    let mut orphans = Vec::new();

    for (case_path, proc_path) in pairs {
        info!(
            "Reading pair: {}, {}",
            case_path.display(),
            proc_path.display()
        );

        let case_rows = read_case_rows(&case_path)?;
        let proc_rows = read_procedure_rows(&proc_path)?;

        let case_ids: HashSet<&str> = case_rows.iter().map(|r| r.case_id.as_str()).collect();

        // Primary technique per case, picked by invasiveness rank; the
        // name itself breaks rank ties, matching a lexicographic-maximum
        // selection.
        let mut techniques: HashMap<String, (u8, String)> = HashMap::new();
        for row in &proc_rows {
            let Some(name) = row.procedure_name.as_deref().map(str::trim) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            if !case_ids.contains(row.case_id.as_str()) {
                orphans.push(orphan_record(&row.case_id, name));
                continue;
            }
            let candidate = (technique_rank(name), name.to_string());
            techniques
                .entry(row.case_id.clone())
                .and_modify(|current| {
                    if candidate > *current {
                        *current = candidate.clone();
                    }
                })
                .or_insert(candidate);
        }

        let without_procedures = case_rows
            .iter()
            .filter(|r| !techniques.contains_key(&r.case_id))
            .count();
        info!(
            "Joined {} cases with procedures ({} cases without procedures)",
            case_rows.len(),
            without_procedures
        );

        for row in case_rows {
            let technique = techniques.remove(&row.case_id).map(|(_, name)| name);
            records.push(case_record(row, technique));
        }
    }

    if !orphans.is_empty() {
        info!("Found {} total orphan procedure(s)", orphans.len());
    }

    Ok((records, orphans))
}

fn read_case_rows(path: &Path) -> anyhow::Result<Vec<CaseRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    reader
        .deserialize()
        .collect::<Result<Vec<CaseRow>, _>>()
        .with_context(|| format!("parsing {}", path.display()))
}

fn read_procedure_rows(path: &Path) -> anyhow::Result<Vec<ProcedureRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    reader
        .deserialize()
        .collect::<Result<Vec<ProcedureRow>, _>>()
        .with_context(|| format!("parsing {}", path.display()))
}

fn case_record(row: CaseRow, technique: Option<String>) -> CaseRecord {
    CaseRecord {
        episode_id: Some(row.case_id),
        case_date: row.scheduled,
        anesthesiologist: row.attendings.as_deref().map(clean_attending_names),
        age_years: row.age_years,
        emergent: row.emergent.as_deref().map(parse_flag),
        asa: row.asa,
        // The selected technique doubles as the anesthesia hint and as
        // procedure notes so airway extraction runs through the normal flow.
        anesthesia_type: technique.clone(),
        procedure_notes: technique,
        procedure: row.procedure_text,
        services: Vec::new(),
    }
}

fn orphan_record(case_id: &str, procedure_name: &str) -> CaseRecord {
    CaseRecord {
        episode_id: Some(case_id.to_string()),
        procedure: Some(procedure_name.to_string()),
        anesthesia_type: Some(procedure_name.to_string()),
        procedure_notes: Some(procedure_name.to_string()),
        ..CaseRecord::default()
    }
}

/// Strip timestamps and secondary entries from an attendings cell like
/// `"DOE, JOHN@2023-01-01 08:00:00; ROE, JANE@..."`.
fn clean_attending_names(value: &str) -> String {
    value
        .split(';')
        .next()
        .unwrap_or("")
        .split('@')
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_uppercase().as_str(),
        "Y" | "YES" | "TRUE" | "1"
    )
}

/// Normalize a raw date cell to `MM/DD/YYYY`, using `default_year` for
/// year-less dates. Unparseable input is passed through unchanged.
#[must_use]
pub fn normalize_case_date(raw: &str, default_year: i32) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let date_part = trimmed.split_whitespace().next().unwrap_or(trimmed);

    for format in ["%m/%d/%Y", "%Y-%m-%d", "%m-%d-%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, format) {
            return date.format("%m/%d/%Y").to_string();
        }
    }

    // Month/day only: borrow the fallback year.
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{date_part}/{default_year}"), "%m/%d/%Y")
    {
        return date.format("%m/%d/%Y").to_string();
    }

    trimmed.to_string()
}

/// Write parsed cases to the output CSV in the standard column order.
///
/// # Errors
/// Fails if the file cannot be written.
pub fn write_output_csv(
    path: &Path,
    cases: &[ParsedCase],
    review_threshold: f64,
    default_year: i32,
) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    writer.write_record(OUTPUT_COLUMNS)?;
    for case in cases {
        writer.write_record([
            case.case_id.clone().unwrap_or_default(),
            normalize_case_date(case.case_date.as_deref().unwrap_or(""), default_year),
            case.supervisor.clone().unwrap_or_default(),
            case.age_category.map(|c| c.as_str()).unwrap_or_default().to_string(),
            case.original_procedure.clone().unwrap_or_default(),
            case.asa_status.clone().unwrap_or_default(),
            case.anesthesia_display(),
            case.airway_display(review_threshold),
            case.category.category.as_str().to_string(),
            case.vascular_display(review_threshold),
            case.monitoring_display(review_threshold),
        ])?;
    }

    writer.flush()?;
    info!("Wrote {} case(s) to {}", cases.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attending_names_lose_timestamps() {
        assert_eq!(
            clean_attending_names("DOE, JOHN@2023-01-01 08:00:00; ROE, JANE@2023-01-01"),
            "DOE, JOHN"
        );
        assert_eq!(clean_attending_names("SOLO, HAN"), "SOLO, HAN");
        assert_eq!(clean_attending_names(""), "");
    }

    #[test]
    fn flags_parse_loosely() {
        assert!(parse_flag("Y"));
        assert!(parse_flag("yes"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("N"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn dates_normalize_to_slash_format() {
        assert_eq!(normalize_case_date("2025-03-14", 2025), "03/14/2025");
        assert_eq!(normalize_case_date("3/14/2025 07:30", 2025), "03/14/2025");
        assert_eq!(normalize_case_date("3/14", 2024), "03/14/2024");
        assert_eq!(normalize_case_date("not a date", 2025), "not a date");
        assert_eq!(normalize_case_date("", 2025), "");
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn pairs_join_and_orphans_are_collected() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("2025Q1.CaseList.csv"),
            "MPOG_Case_ID,AIMS_Scheduled_DT,AIMS_Patient_Age_Years,ASA_Status,\
             AIMS_Actual_Procedure_Text,AnesAttendings,Emergent\n\
             C1,2025-01-10,61,3,CABG x3,\"DOE, JOHN@2025-01-10 07:00:00\",N\n\
             C2,2025-01-11,29,2,knee arthroscopy,\"ROE, JANE\",Y\n",
        )
        .expect("write case list");
        std::fs::write(
            dir.path().join("2025Q1.ProcedureList.csv"),
            "MPOG_Case_ID,ProcedureName\n\
             C1,Peripheral nerve block\n\
             C1,Intubation routine\n\
             C9,Epidural\n",
        )
        .expect("write procedure list");

        let (records, orphans) = read_csv_pairs(dir.path()).expect("pairs read");

        assert_eq!(records.len(), 2);
        let c1 = records
            .iter()
            .find(|r| r.episode_id.as_deref() == Some("C1"))
            .expect("C1 present");
        // The more invasive technique wins the join.
        assert_eq!(c1.anesthesia_type.as_deref(), Some("Intubation routine"));
        assert_eq!(c1.anesthesiologist.as_deref(), Some("DOE, JOHN"));
        assert_eq!(c1.emergent, Some(false));

        let c2 = records
            .iter()
            .find(|r| r.episode_id.as_deref() == Some("C2"))
            .expect("C2 present");
        assert_eq!(c2.anesthesia_type, None);
        assert_eq!(c2.emergent, Some(true));

        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].episode_id.as_deref(), Some("C9"));
        assert_eq!(orphans[0].anesthesia_type.as_deref(), Some("Epidural"));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn missing_pairs_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(read_csv_pairs(dir.path()).is_err());
    }
}
