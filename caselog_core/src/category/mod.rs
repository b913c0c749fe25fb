//! Procedure categorization engine.
//!
//! An ordered rule list assigns a base category from the service tags and
//! procedure text; categories that need a secondary classification (cardiac,
//! major vessels, intracerebral, obstetric) are refined through the
//! specialized detectors in one dispatch `match`. Rule order is the only
//! tie-break: categorization must be deterministic and explainable, so two
//! rules that could both match are disambiguated purely by declaration order.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::category::detectors::{
    Approach, CpbStatus, Pathology, cardiac_cpb_default, detect_approach, detect_cpb,
    detect_intracerebral_pathology, is_cesarean,
};

pub mod detectors;
pub mod rules;

/// Base category assigned by the rule list, before secondary classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseCategory {
    Cardiac,
    Intracerebral,
    IntrathoracicNonCardiac,
    MajorVessels,
    Obstetric,
    Other,
}

impl BaseCategory {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cardiac => "cardiac",
            Self::Intracerebral => "intracerebral",
            Self::IntrathoracicNonCardiac => "intrathoracic_non_cardiac",
            Self::MajorVessels => "major_vessels",
            Self::Obstetric => "obstetric",
            Self::Other => "other",
        }
    }
}

/// Final procedure category, after secondary classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcedureCategory {
    CardiacWithCpb,
    CardiacWithoutCpb,
    MajorVesselsEndovascular,
    MajorVesselsOpen,
    IntracerebralEndovascular,
    IntracerebralVascularOpen,
    IntracerebralNonvascularOpen,
    IntrathoracicNonCardiac,
    CesareanSection,
    VaginalDelivery,
    Other,
}

impl ProcedureCategory {
    /// Standardized case-log label for this category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CardiacWithCpb => "Cardiac with CPB",
            Self::CardiacWithoutCpb => "Cardiac without CPB",
            Self::MajorVesselsEndovascular => "Procedures on major vessels (endovascular)",
            Self::MajorVesselsOpen => "Procedures on major vessels (open)",
            Self::IntracerebralEndovascular => "Intracerebral (endovascular)",
            Self::IntracerebralVascularOpen => "Intracerebral Vascular (open)",
            Self::IntracerebralNonvascularOpen => "Intracerebral Nonvascular (open)",
            Self::IntrathoracicNonCardiac => "Intrathoracic non-cardiac",
            Self::CesareanSection => "Cesarean Section",
            Self::VaginalDelivery => "Vaginal Delivery",
            Self::Other => "Other (procedure cat)",
        }
    }
}

impl FromStr for ProcedureCategory {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cardiac with CPB" => Ok(Self::CardiacWithCpb),
            "Cardiac without CPB" => Ok(Self::CardiacWithoutCpb),
            "Procedures on major vessels (endovascular)" => Ok(Self::MajorVesselsEndovascular),
            "Procedures on major vessels (open)" => Ok(Self::MajorVesselsOpen),
            "Intracerebral (endovascular)" => Ok(Self::IntracerebralEndovascular),
            "Intracerebral Vascular (open)" => Ok(Self::IntracerebralVascularOpen),
            "Intracerebral Nonvascular (open)" => Ok(Self::IntracerebralNonvascularOpen),
            "Intrathoracic non-cardiac" => Ok(Self::IntrathoracicNonCardiac),
            "Cesarean Section" => Ok(Self::CesareanSection),
            "Vaginal Delivery" => Ok(Self::VaginalDelivery),
            "Other (procedure cat)" => Ok(Self::Other),
            _ => Err("unknown procedure category label"),
        }
    }
}

/// One categorization rule: ANY keyword present AND NONE of the excludes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Keywords, matched as uppercase substrings of the combined surface.
    pub keywords: Vec<String>,

    /// Keywords that veto this rule when present.
    #[serde(default)]
    pub exclude_keywords: Vec<String>,

    /// Base category assigned on match.
    pub category: BaseCategory,
}

impl CategoryRule {
    fn matches(&self, surface: &str) -> bool {
        self.keywords.iter().any(|k| surface.contains(k.as_str()))
            && !self
                .exclude_keywords
                .iter()
                .any(|k| surface.contains(k.as_str()))
    }
}

/// Final category plus informational, non-fatal warnings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResult {
    pub category: ProcedureCategory,
    pub warnings: Vec<String>,
}

/// Ordered-rule categorization engine.
#[derive(Debug, Clone)]
pub struct CategoryEngine {
    rules: Vec<CategoryRule>,
}

impl CategoryEngine {
    /// Create an engine from an ordered rule list.
    #[must_use]
    pub const fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    /// Create an engine with the default rule list.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(rules::default_rules())
    }

    /// The configured rules, in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Assign a single procedure category from procedure text and service
    /// tags. Never fails: an unmatched surface yields `Other` with a warning.
    #[must_use]
    pub fn categorize(&self, procedure_text: &str, services: &[String]) -> CategoryResult {
        let mut surface = services.join(" ");
        if !surface.is_empty() && !procedure_text.is_empty() {
            surface.push(' ');
        }
        surface.push_str(procedure_text);
        let surface = surface.to_uppercase();

        for rule in &self.rules {
            if rule.matches(&surface) {
                return refine(rule.category, &surface);
            }
        }

        CategoryResult {
            category: ProcedureCategory::Other,
            warnings: vec![format!(
                "no categorization rule matched service/procedure text: {}",
                truncate(surface.trim(), 80)
            )],
        }
    }
}

impl Default for CategoryEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Secondary classification for base categories that need one.
fn refine(base: BaseCategory, surface: &str) -> CategoryResult {
    let mut warnings = Vec::new();

    let category = match base {
        BaseCategory::Cardiac => {
            let status = detect_cpb(surface).unwrap_or_else(|| cardiac_cpb_default(surface));
            match status {
                CpbStatus::WithCpb => ProcedureCategory::CardiacWithCpb,
                CpbStatus::WithoutCpb => ProcedureCategory::CardiacWithoutCpb,
            }
        }
        BaseCategory::MajorVessels => {
            let detection = detect_approach(surface);
            if detection.contested {
                warnings.push(
                    "both endovascular and open keywords present; endovascular approach assumed"
                        .to_string(),
                );
            }
            match detection.approach {
                Approach::Endovascular => ProcedureCategory::MajorVesselsEndovascular,
                Approach::Open => ProcedureCategory::MajorVesselsOpen,
                Approach::Unknown => {
                    warnings.push("ambiguous approach; defaulted to open".to_string());
                    ProcedureCategory::MajorVesselsOpen
                }
            }
        }
        BaseCategory::Intracerebral => {
            let detection = detect_approach(surface);
            if detection.contested {
                warnings.push(
                    "both endovascular and open keywords present; endovascular approach assumed"
                        .to_string(),
                );
            }
            if detection.approach == Approach::Endovascular {
                ProcedureCategory::IntracerebralEndovascular
            } else {
                if detection.approach == Approach::Unknown {
                    warnings.push("ambiguous approach; defaulted to open".to_string());
                }
                let pathology = detect_intracerebral_pathology(surface);
                if pathology.contested {
                    warnings.push(
                        "both vascular and nonvascular pathology keywords present; vascular assumed"
                            .to_string(),
                    );
                }
                match pathology.pathology {
                    Pathology::Vascular => ProcedureCategory::IntracerebralVascularOpen,
                    Pathology::Nonvascular => ProcedureCategory::IntracerebralNonvascularOpen,
                    Pathology::Unknown => {
                        warnings
                            .push("no pathology keywords found; nonvascular assumed".to_string());
                        ProcedureCategory::IntracerebralNonvascularOpen
                    }
                }
            }
        }
        BaseCategory::Obstetric => {
            if is_cesarean(surface) {
                ProcedureCategory::CesareanSection
            } else {
                ProcedureCategory::VaginalDelivery
            }
        }
        BaseCategory::IntrathoracicNonCardiac => ProcedureCategory::IntrathoracicNonCardiac,
        BaseCategory::Other => ProcedureCategory::Other,
    };

    CategoryResult { category, warnings }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn tavr_is_cardiac_without_cpb() {
        let engine = CategoryEngine::with_defaults();
        let result = engine.categorize("TAVR", &tags(&["CARDSURG"]));
        assert_eq!(result.category, ProcedureCategory::CardiacWithoutCpb);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn open_cardiac_defaults_to_cpb() {
        let engine = CategoryEngine::with_defaults();
        let result = engine.categorize("mitral valve replacement", &tags(&["CARDSURG"]));
        assert_eq!(result.category, ProcedureCategory::CardiacWithCpb);
    }

    #[test]
    fn open_aneurysm_repair_is_open_major_vessels() {
        let engine = CategoryEngine::with_defaults();
        let result = engine.categorize("open aortic aneurysm repair", &tags(&["VASCSURG"]));
        assert_eq!(result.category, ProcedureCategory::MajorVesselsOpen);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn unknown_vascular_approach_defaults_to_open_with_warning() {
        let engine = CategoryEngine::with_defaults();
        let result = engine.categorize("aortic aneurysm", &tags(&["VASCSURG"]));
        assert_eq!(result.category, ProcedureCategory::MajorVesselsOpen);
        assert_eq!(
            result.warnings,
            vec!["ambiguous approach; defaulted to open".to_string()]
        );
    }

    #[test]
    fn neuro_coiling_is_endovascular_intracerebral() {
        let engine = CategoryEngine::with_defaults();
        let result = engine.categorize("aneurysm coiling", &tags(&["NEUROSURG"]));
        assert_eq!(result.category, ProcedureCategory::IntracerebralEndovascular);
    }

    #[test]
    fn neuro_tumor_craniotomy_is_nonvascular_open() {
        let engine = CategoryEngine::with_defaults();
        let result = engine.categorize("craniotomy for tumor resection", &tags(&["NEUROSURG"]));
        assert_eq!(
            result.category,
            ProcedureCategory::IntracerebralNonvascularOpen
        );
    }

    #[test]
    fn spine_work_is_not_intracerebral() {
        let engine = CategoryEngine::with_defaults();
        let result = engine.categorize("L4-L5 laminectomy", &tags(&["NEUROSURG"]));
        assert_eq!(result.category, ProcedureCategory::Other);
    }

    #[test]
    fn thoracic_excluding_cardiac() {
        let engine = CategoryEngine::with_defaults();
        let result = engine.categorize("right upper lobectomy", &tags(&["THORACIC"]));
        assert_eq!(result.category, ProcedureCategory::IntrathoracicNonCardiac);

        let cardiothoracic = engine.categorize("CABG", &tags(&["CARDIOTHORACIC"]));
        assert_ne!(
            cardiothoracic.category,
            ProcedureCategory::IntrathoracicNonCardiac
        );
    }

    #[test]
    fn cesarean_splits_from_vaginal_delivery() {
        let engine = CategoryEngine::with_defaults();
        let cesarean = engine.categorize("CESAREAN SECTION", &tags(&["OBSTETRICS"]));
        assert_eq!(cesarean.category, ProcedureCategory::CesareanSection);

        let vaginal = engine.categorize("spontaneous vaginal delivery", &tags(&["OBSTETRICS"]));
        assert_eq!(vaginal.category, ProcedureCategory::VaginalDelivery);
    }

    #[test]
    fn unmatched_surface_is_other_with_warning() {
        let engine = CategoryEngine::with_defaults();
        let result = engine.categorize("knee arthroscopy", &tags(&["ORTHO"]));
        assert_eq!(result.category, ProcedureCategory::Other);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("no categorization rule matched"));
    }

    #[test]
    fn categorize_is_deterministic() {
        let engine = CategoryEngine::with_defaults();
        let first = engine.categorize("TAVR", &tags(&["CARDSURG"]));
        for _ in 0..10 {
            let again = engine.categorize("TAVR", &tags(&["CARDSURG"]));
            assert_eq!(again.category, first.category);
            assert_eq!(again.warnings, first.warnings);
        }
    }

    #[test]
    fn category_labels_round_trip() {
        use std::str::FromStr;
        for category in [
            ProcedureCategory::CardiacWithCpb,
            ProcedureCategory::CardiacWithoutCpb,
            ProcedureCategory::MajorVesselsEndovascular,
            ProcedureCategory::MajorVesselsOpen,
            ProcedureCategory::IntracerebralEndovascular,
            ProcedureCategory::IntracerebralVascularOpen,
            ProcedureCategory::IntracerebralNonvascularOpen,
            ProcedureCategory::IntrathoracicNonCardiac,
            ProcedureCategory::CesareanSection,
            ProcedureCategory::VaginalDelivery,
            ProcedureCategory::Other,
        ] {
            assert_eq!(ProcedureCategory::from_str(category.as_str()), Ok(category));
        }
    }
}
