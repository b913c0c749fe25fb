//! Case-log form field code lookups.
//!
//! The external form client identifies every selectable option by a numeric
//! code string. These lookups translate the standardized labels produced by
//! the engine (and a handful of labels only ever entered by hand, like nerve
//! block sites) into those codes.

/// Age band label to form code.
#[must_use]
pub fn patient_age_code(label: &str) -> Option<&'static str> {
    match label {
        "a. < 3 months" => Some("30"),
        "b. >= 3 mos. and < 3 yr." => Some("31"),
        "c. >= 3 yr. and < 12 yr." => Some("32"),
        "d. >= 12 yr. and < 65 yr." => Some("33"),
        "e. >= 65 year" => Some("34"),
        _ => None,
    }
}

/// ASA physical status (with optional emergency suffix) to form code.
#[must_use]
pub fn asa_status_code(status: &str) -> Option<&'static str> {
    match status {
        "1" => Some("156628"),
        "2" => Some("156632"),
        "3" => Some("156634"),
        "4" => Some("156636"),
        "5" => Some("156630"),
        "6" => Some("156631"),
        "1E" => Some("156629"),
        "2E" => Some("156633"),
        "3E" => Some("156635"),
        "4E" => Some("156637"),
        "5E" => Some("156626"),
        _ => None,
    }
}

/// Parse free-form ASA text ("ASA 2", "3E") into a form code.
#[must_use]
pub fn parse_asa_status(asa_text: &str) -> Option<&'static str> {
    let cleaned = asa_text.trim().to_uppercase();
    if cleaned.is_empty() {
        return None;
    }

    if let Some(code) = asa_status_code(&cleaned) {
        return Some(code);
    }

    cleaned
        .strip_prefix("ASA")
        .and_then(|rest| asa_status_code(rest.trim()))
}

/// Anesthesia type label to form code. Accepts both the form's own option
/// labels and the engine's standardized short labels.
#[must_use]
pub fn anesthesia_type_code(label: &str) -> Option<&'static str> {
    match label {
        "CSE" => Some("156646"),
        "Epidural" => Some("1256332"),
        "General Maintenance" | "GA" => Some("1256330"),
        "MAC &/or Sedation" | "MAC" => Some("156641"),
        "Spinal" => Some("1256331"),
        "Peripheral Nerve Block Continuous" => Some("156647"),
        "Peripheral Nerve Block Single Shot" | "Peripheral nerve block" => Some("156648"),
        _ => None,
    }
}

/// Airway management label to form code.
#[must_use]
pub fn airway_code(label: &str) -> Option<&'static str> {
    match label {
        "Supraglottic Airway" => Some("1256333"),
        "Laryngoscope - Direct" => Some("1256334"),
        "Laryngoscope - Indirect" => Some("1256335"),
        "Oral ETT" => Some("156654"),
        "Nasal ETT" => Some("156655"),
        "Flexible Bronchoscopic" => Some("2298046"),
        "Awake Intubation" => Some("2298047"),
        "Bronchial Blocker" => Some("156674"),
        "DLT" => Some("1256336"),
        "Airway Management - Other" => Some("1256337"),
        "Jet Ventilation" => Some("156666"),
        "Mask" => Some("156650"),
        _ => None,
    }
}

/// Procedure category label to form code.
#[must_use]
pub fn procedure_category_code(label: &str) -> Option<&'static str> {
    match label {
        "Cardiac without CPB" => Some("156682"),
        "Cardiac with CPB" => Some("156681"),
        "Procedures on major vessels (endovascular)" => Some("156685"),
        "Procedures on major vessels (open)" => Some("156684"),
        "Intracerebral (endovascular)" => Some("156688"),
        "Intracerebral Nonvascular (open)" => Some("156689"),
        "Intracerebral Vascular (open)" => Some("156687"),
        "Cesarean Section" => Some("156692"),
        "Cesarean Section High-Risk" => Some("156686"),
        "Vaginal Delivery" => Some("156690"),
        "Vaginal Delivery High-Risk" => Some("156691"),
        "Intrathoracic non-cardiac" => Some("156683"),
        _ => None,
    }
}

/// Vascular access label to form code.
#[must_use]
pub fn vascular_access_code(label: &str) -> Option<&'static str> {
    match label {
        "Arterial Catheter" => Some("1256338"),
        "Central Venous Catheter" => Some("1256339"),
        "Pulmonary Artery Catheter" => Some("156700"),
        "Ultrasound used for line placement" => Some("156693"),
        _ => None,
    }
}

/// Monitoring label to form code.
#[must_use]
pub fn monitoring_code(label: &str) -> Option<&'static str> {
    match label {
        "CSF Drain" => Some("1256341"),
        "Electrophysiologic monitoring (SSEP, MEP, EMG, EEG)" => Some("156708"),
        "Transesophageal Echo (TEE)" => Some("156707"),
        _ => None,
    }
}

/// Neuraxial blockade site label to form code.
#[must_use]
pub fn neuraxial_site_code(label: &str) -> Option<&'static str> {
    match label {
        "Caudal" => Some("156723"),
        "Cervical" => Some("156719"),
        "Lumbar" => Some("156722"),
        "T 1-7" => Some("156720"),
        "T 8-12" => Some("156721"),
        _ => None,
    }
}

/// Peripheral nerve block site label to form code.
#[must_use]
pub fn peripheral_nerve_code(label: &str) -> Option<&'static str> {
    match label {
        "Adductor Canal" => Some("1911477"),
        "Ankle" => Some("156730"),
        "Axillary" => Some("156734"),
        "Erector Spinae Plane" => Some("1911478"),
        "Femoral" => Some("156735"),
        "Infraclavicular" => Some("156732"),
        "Interscalene" => Some("156731"),
        "Lumbar Plexus" => Some("156737"),
        "Paravertebral" => Some("156739"),
        "Popliteal" => Some("156729"),
        "Quadratus Lumborum" => Some("1911476"),
        "Retrobulbar" => Some("156738"),
        "Saphenous" => Some("156740"),
        "Sciatic" => Some("156736"),
        "Supraclavicular" => Some("156733"),
        "Transverse Abdominal Plane" => Some("1911475"),
        "Other - peripheral nerve blockade site" => Some("1256340"),
        _ => None,
    }
}

const INSTITUTIONS: &[(&str, &str)] = &[
    ("Children's Hospital of Philadelphia", "12763"),
    ("Pennsylvania Hospital (UPHS)", "12771"),
    ("Presbyterian Medical Center (UPHS)", "12871"),
    ("University of Pennsylvania Health System", "12748"),
    ("Other Site", "19367"),
];

/// Institution name to form code: exact match first, then partial in either
/// direction.
#[must_use]
pub fn institution_code(name: &str) -> Option<&'static str> {
    let lower = name.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    INSTITUTIONS
        .iter()
        .find(|(known, _)| known.to_lowercase() == lower)
        .or_else(|| {
            INSTITUTIONS.iter().find(|(known, _)| {
                let known_lower = known.to_lowercase();
                lower.contains(&known_lower) || known_lower.contains(&lower)
            })
        })
        .map(|(_, code)| *code)
}

/// Resolve a semicolon-joined cell of standardized labels into form codes,
/// trying each lookup table in turn per label.
#[must_use]
pub fn procedure_codes(cell: &str) -> Vec<&'static str> {
    cell.split(';')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .filter_map(|label| {
            anesthesia_type_code(label)
                .or_else(|| airway_code(label))
                .or_else(|| procedure_category_code(label))
                .or_else(|| vascular_access_code(label))
                .or_else(|| monitoring_code(label))
                .or_else(|| neuraxial_site_code(label))
                .or_else(|| peripheral_nerve_code(label))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asa_text_forms_parse() {
        assert_eq!(parse_asa_status("2"), Some("156632"));
        assert_eq!(parse_asa_status("ASA 2"), Some("156632"));
        assert_eq!(parse_asa_status("asa 3e"), Some("156635"));
        assert_eq!(parse_asa_status("ASA"), None);
        assert_eq!(parse_asa_status(""), None);
        assert_eq!(parse_asa_status("7"), None);
    }

    #[test]
    fn engine_labels_resolve_to_codes() {
        use crate::category::ProcedureCategory;
        use crate::finding::{AirwayManagement, MonitoringTechnique, VascularAccess};
        use crate::resolve::age::AgeCategory;
        use crate::resolve::anesthesia::AnesthesiaType;

        assert_eq!(patient_age_code(AgeCategory::Child.as_str()), Some("32"));
        assert_eq!(
            airway_code(AirwayManagement::VideoLaryngoscope.as_str()),
            Some("1256335")
        );
        assert_eq!(
            procedure_category_code(ProcedureCategory::CardiacWithoutCpb.as_str()),
            Some("156682")
        );
        assert_eq!(
            vascular_access_code(VascularAccess::ArterialCatheter.as_str()),
            Some("1256338")
        );
        assert_eq!(
            monitoring_code(MonitoringTechnique::Tee.as_str()),
            Some("156707")
        );
        assert_eq!(
            anesthesia_type_code(AnesthesiaType::GeneralAnesthesia.as_str()),
            Some("1256330")
        );
    }

    #[test]
    fn joined_cells_resolve_per_label() {
        let codes = procedure_codes("Oral ETT; Laryngoscope - Direct; Arterial Catheter");
        assert_eq!(codes, vec!["156654", "1256334", "1256338"]);
    }

    #[test]
    fn unknown_labels_are_skipped() {
        let codes = procedure_codes("Oral ETT; Telepathy; ");
        assert_eq!(codes, vec!["156654"]);
    }

    #[test]
    fn institution_partial_match() {
        assert_eq!(
            institution_code("University of Pennsylvania Health System"),
            Some("12748")
        );
        assert_eq!(institution_code("Pennsylvania Hospital"), Some("12771"));
        assert_eq!(institution_code("St. Elsewhere"), None);
    }
}
