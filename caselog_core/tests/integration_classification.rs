//! Integration tests for the classification engine.
//!
//! These tests verify the complete flow of:
//! - Pattern-based finding extraction with confidence scoring
//! - Ordered-rule categorization with secondary classification
//! - Age band and anesthesia type resolution
//! - Row composition through the case processor

use caselog_core::{
    AgeCategory, AgeResolver, AirwayManagement, AnesthesiaMapper, AnesthesiaType, CaseProcessor,
    CaseRecord, CategoryEngine, FindingExtractor, ProcedureCategory, default_airway_set,
};

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

/// An intubation note with video laryngoscopy yields both an
/// oral ETT finding (0.6) and a video laryngoscope finding.
#[test]
fn video_laryngoscopy_scenario() {
    let extractor = FindingExtractor::with_defaults();
    let set = default_airway_set().build().expect("defaults should build");

    let findings = extractor.extract(
        Some("Patient intubated with video laryngoscopy using Glidescope"),
        &set,
        "procedure_notes",
    );

    let oral = findings
        .iter()
        .find(|f| f.value == AirwayManagement::OralEtt)
        .expect("oral ETT expected");
    assert!((oral.confidence - 0.6).abs() < 1e-9);

    let video = findings
        .iter()
        .find(|f| f.value == AirwayManagement::VideoLaryngoscope)
        .expect("video laryngoscope expected");
    assert!(video.confidence >= 0.5);
}

/// Explicit negation suppresses the intubation finding while
/// the mask finding survives.
#[test]
fn negated_intubation_scenario() {
    let extractor = FindingExtractor::with_defaults();
    let set = default_airway_set().build().expect("defaults should build");

    let findings = extractor.extract(
        Some("no intubation, mask ventilation only"),
        &set,
        "procedure_notes",
    );

    let oral = findings
        .iter()
        .find(|f| f.value == AirwayManagement::OralEtt);
    if let Some(oral) = oral {
        assert!(oral.confidence <= 0.2);
    }
    assert!(
        findings
            .iter()
            .any(|f| f.value == AirwayManagement::Mask)
    );
}

/// TAVR under a cardiac service is catheter-based cardiac,
/// so the CPB detector defaults to "without CPB".
#[test]
fn tavr_scenario() {
    let engine = CategoryEngine::with_defaults();
    let result = engine.categorize("TAVR", &tags(&["CARDSURG"]));
    assert_eq!(result.category, ProcedureCategory::CardiacWithoutCpb);
}

/// An open aneurysm repair under a vascular service carries
/// the open qualifier.
#[test]
fn open_vascular_scenario() {
    let engine = CategoryEngine::with_defaults();
    let result = engine.categorize("open aortic aneurysm repair", &tags(&["VASCSURG"]));
    assert_eq!(result.category, ProcedureCategory::MajorVesselsOpen);
}

/// Age 10 resolves to band c (3-12 years).
#[test]
fn age_band_scenario() {
    let resolver = AgeResolver::with_defaults().expect("default table is valid");
    assert_eq!(resolver.resolve(10.0), Ok(AgeCategory::Child));
}

/// A cesarean section under an obstetric service splits from
/// vaginal delivery.
#[test]
fn cesarean_scenario() {
    let engine = CategoryEngine::with_defaults();
    let result = engine.categorize("CESAREAN SECTION, urgent", &tags(&["OBSTETRICS"]));
    assert_eq!(result.category, ProcedureCategory::CesareanSection);

    let vaginal = engine.categorize("induction of labor, vaginal delivery", &tags(&["OBSTETRICS"]));
    assert_eq!(vaginal.category, ProcedureCategory::VaginalDelivery);
}

/// Missing-input identity: extraction over absent text is empty, mapping an
/// absent anesthesia type is the unmapped sentinel.
#[test]
fn missing_input_identity() {
    let extractor = FindingExtractor::with_defaults();
    let set = default_airway_set().build().expect("defaults should build");
    assert!(extractor.extract(None, &set, "procedure_notes").is_empty());

    let mapper = AnesthesiaMapper::with_defaults();
    assert_eq!(mapper.map(""), None);
}

/// Rule-order determinism: the same inputs always produce the same category
/// and warning sequence, including across parallel batch processing.
#[test]
fn deterministic_across_batches() {
    let processor = CaseProcessor::with_defaults(FindingExtractor::with_defaults())
        .expect("defaults should build");

    let record = CaseRecord {
        episode_id: Some("EP-7".to_string()),
        age_years: Some(71.0),
        asa: Some("4".to_string()),
        emergent: Some(true),
        anesthesia_type: Some("General".to_string()),
        procedure_notes: Some(
            "intubated via direct laryngoscopy, right radial arterial line, TEE performed"
                .to_string(),
        ),
        procedure: Some("aortic valve replacement on cardiopulmonary bypass".to_string()),
        services: vec!["CARDSURG".to_string()],
        ..CaseRecord::default()
    };

    let records = vec![record; 64];
    let first_pass = processor.process_batch(&records);
    let second_pass = processor.process_batch(&records);

    for (a, b) in first_pass.iter().zip(second_pass.iter()) {
        assert_eq!(a.category.category, b.category.category);
        assert_eq!(a.category.warnings, b.category.warnings);
        assert_eq!(a.parsing_warnings, b.parsing_warnings);
        assert!((a.confidence_score - b.confidence_score).abs() < 1e-12);
    }

    let case = &first_pass[0];
    assert_eq!(case.category.category, ProcedureCategory::CardiacWithCpb);
    assert_eq!(case.age_category, Some(AgeCategory::Geriatric));
    assert_eq!(case.anesthesia_type, Some(AnesthesiaType::GeneralAnesthesia));
    assert_eq!(case.asa_status.as_deref(), Some("4E"));
    assert!(case.airway_display(0.5).contains("Oral ETT"));
    assert!(case.airway_display(0.5).contains("Laryngoscope - Direct"));
    assert!(case.vascular_display(0.5).contains("Arterial Catheter"));
    assert!(case
        .monitoring_display(0.5)
        .contains("Transesophageal Echo (TEE)"));
}

/// Display cells keep descending-confidence order with declaration-order
/// ties.
#[test]
fn display_cell_ordering() {
    let processor = CaseProcessor::with_defaults(FindingExtractor::with_defaults())
        .expect("defaults should build");

    let record = CaseRecord {
        procedure_notes: Some(
            "intubated with video laryngoscopy; TEE and SSEP neuromonitoring".to_string(),
        ),
        ..CaseRecord::default()
    };

    let parsed = processor.process(&record);
    let airway_cell = parsed.airway_display(0.5);
    let oral = airway_cell.find("Oral ETT").expect("oral in cell");
    let video = airway_cell
        .find("Laryngoscope - Indirect")
        .expect("video in cell");
    // Equal confidences (0.6 each) keep the declaration order of the table.
    assert!(oral < video);
}
