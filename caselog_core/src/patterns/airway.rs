//! Default airway management pattern table.
//!
//! Variants cover endotracheal intubation (oral vs nasal), laryngoscopy
//! technique (direct vs video), supraglottic devices, bronchoscopic
//! intubation, mask ventilation and difficult airway encounters. Declaration
//! order is the tie-break order for equal-confidence findings.
//!
//! To add a pattern, append it to the relevant list. Patterns are compiled
//! case-insensitively and use standard regex syntax (no lookaround).

use crate::finding::{AirwayManagement, Concept};
use crate::patterns::{ConceptSetDef, VariantDef};

/// Negation phrases shared across concepts ("no arterial line", "without
/// intubation"). A match lowers confidence in an otherwise-matched finding.
#[must_use]
pub fn negation_patterns() -> Vec<String> {
    vec![
        r"\bno\s+".to_string(),
        r"\bnot\s+".to_string(),
        r"\bwithout\s+".to_string(),
        r"\bdenied\b".to_string(),
        r"\battempted\s+but\s+not\b".to_string(),
    ]
}

fn intubation_patterns() -> Vec<String> {
    vec![
        r"\bintubat(ed|ion|e)?\b".to_string(),
        r"\bETT\b".to_string(),
        r"\bendotrache(al)?\b".to_string(),
        r"\b(tube|ett)\s+(placed|inserted|exchanged)\b".to_string(),
        r"\bnasal\s+intubat".to_string(),
        r"\boral\s+intubat".to_string(),
    ]
}

fn direct_laryngoscopy_patterns() -> Vec<String> {
    vec![
        r"\bdirect\s+laryngosc".to_string(),
        r"\bDL\b".to_string(),
        // Miller and Macintosh blades
        r"\bmiller\b".to_string(),
        r"\bmacintosh\b".to_string(),
        // Mac 3, Mac 4, etc.
        r"\bmac\s+\d+\b".to_string(),
    ]
}

fn video_laryngoscopy_patterns() -> Vec<String> {
    vec![
        r"\bvideo\s+laryngosc".to_string(),
        r"\bVL\b".to_string(),
        r"\bglidescope\b".to_string(),
        r"\bc-?mac\b".to_string(),
        r"\bmcgrath\b".to_string(),
        r"\bking\s+vision\b".to_string(),
    ]
}

/// Default airway pattern set.
#[must_use]
pub fn default_airway_set() -> ConceptSetDef<AirwayManagement> {
    ConceptSetDef {
        concept: Concept::Airway,
        variants: vec![
            // Any intubation defaults to an oral ETT; a nasal mention both
            // negates this variant and raises the nasal variant below.
            VariantDef {
                value: AirwayManagement::OralEtt,
                primary: intubation_patterns(),
                supporting: vec![r"\blaryngosc".to_string(), r"\boral\b".to_string()],
                negating: {
                    let mut negating = negation_patterns();
                    negating.push(r"\bnasal\b".to_string());
                    negating
                },
            },
            VariantDef {
                value: AirwayManagement::NasalEtt,
                primary: vec![
                    r"\bnasal\s+intubat".to_string(),
                    r"\bnasotracheal\b".to_string(),
                    r"\bnasal\s+(ett|tube)\b".to_string(),
                ],
                supporting: vec![
                    r"\bintubat(ed|ion|e)?\b".to_string(),
                    r"\bETT\b".to_string(),
                ],
                negating: negation_patterns(),
            },
            VariantDef {
                value: AirwayManagement::DirectLaryngoscope,
                primary: direct_laryngoscopy_patterns(),
                supporting: intubation_patterns(),
                negating: vec![],
            },
            VariantDef {
                value: AirwayManagement::VideoLaryngoscope,
                primary: video_laryngoscopy_patterns(),
                supporting: intubation_patterns(),
                negating: vec![],
            },
            VariantDef {
                value: AirwayManagement::SupraglotticAirway,
                primary: vec![
                    r"\bLMA\b".to_string(),
                    r"\blaryngeal\s+mask\b".to_string(),
                    r"\bsupraglottic\b".to_string(),
                    r"\bi-?gel\b".to_string(),
                    r"\bair-?q\b".to_string(),
                ],
                supporting: vec![],
                negating: negation_patterns(),
            },
            VariantDef {
                value: AirwayManagement::FlexibleBronchoscopic,
                primary: vec![
                    r"\bbronchosc(op(y|e|ic))?\b".to_string(),
                    r"\bfiberoptic\b.*\bintubat".to_string(),
                    r"\bFOI\b".to_string(),
                ],
                supporting: intubation_patterns(),
                negating: vec![],
            },
            // An LMA mention counts against plain mask ventilation; the
            // supraglottic variant above claims those cases.
            VariantDef {
                value: AirwayManagement::Mask,
                primary: vec![
                    r"\bmask\s+vent(ilation)?\b".to_string(),
                    r"\bBVM\b".to_string(),
                    r"\bbag[- ]?mask\b".to_string(),
                    r"\bface\s+mask\b".to_string(),
                    r"\bmask\b".to_string(),
                ],
                supporting: vec![],
                negating: {
                    let mut negating = negation_patterns();
                    negating.push(r"\bLMA\b".to_string());
                    negating.push(r"\blaryngeal\s+mask\b".to_string());
                    negating
                },
            },
            VariantDef {
                value: AirwayManagement::DifficultAirway,
                primary: vec![
                    r"\bdifficult\s+(airway|intubat)".to_string(),
                    r"\bairway\s+difficult".to_string(),
                    r"\bfailed\s+intubat".to_string(),
                    r"\bmultiple\s+attempt".to_string(),
                ],
                supporting: vec![],
                negating: vec![],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn default_airway_set_builds() {
        let set = default_airway_set().build().expect("defaults should build");
        assert_eq!(set.concept(), Concept::Airway);
        assert_eq!(set.variants().len(), 8);
    }

    #[test]
    fn every_variant_has_a_primary_pattern() {
        for variant in default_airway_set().variants {
            assert!(!variant.primary.is_empty(), "{:?}", variant.value);
        }
    }
}
