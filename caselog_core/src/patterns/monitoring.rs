//! Default specialized monitoring pattern table.
//!
//! Covers transesophageal echocardiography, electrophysiologic
//! neuromonitoring, CSF drains and invasive neurological monitoring.

use crate::finding::{Concept, MonitoringTechnique};
use crate::patterns::{ConceptSetDef, VariantDef};

/// Default monitoring pattern set.
#[must_use]
pub fn default_monitoring_set() -> ConceptSetDef<MonitoringTechnique> {
    ConceptSetDef {
        concept: Concept::Monitoring,
        variants: vec![
            VariantDef {
                value: MonitoringTechnique::Tee,
                primary: vec![
                    r"\bTEE\b".to_string(),
                    r"\btransesophageal\s+echo(cardiograph(y|ic))?\b".to_string(),
                    r"\btrans[- ]?esophageal\b".to_string(),
                ],
                supporting: vec![],
                negating: vec![],
            },
            VariantDef {
                value: MonitoringTechnique::ElectrophysiologicMon,
                primary: vec![
                    r"\belectrophysiolog(ic|y)\b".to_string(),
                    r"\bEP\s+stud(y|ies)\b".to_string(),
                    // Somatosensory cortical/evoked potentials
                    r"\bSSCP\b".to_string(),
                    r"\bSSEP\b".to_string(),
                    r"\bneuro(physiologic)?\s+monitor".to_string(),
                    r"\bevoked\s+potential".to_string(),
                ],
                supporting: vec![],
                negating: vec![],
            },
            VariantDef {
                value: MonitoringTechnique::CsfDrain,
                primary: vec![
                    r"\bCSF\s+(drain(age)?|catheter)\b".to_string(),
                    r"\blumbar\s+drain\b".to_string(),
                    r"\bcerebrospinal\s+fluid\s+drain".to_string(),
                    r"\bspinal\s+drain\b".to_string(),
                ],
                supporting: vec![],
                negating: vec![],
            },
            VariantDef {
                value: MonitoringTechnique::InvasiveNeuroMon,
                primary: vec![
                    r"\bICP\s+(monitor|catheter)\b".to_string(),
                    r"\bintracranial\s+pressure\b".to_string(),
                    r"\bventriculostomy\b".to_string(),
                    r"\bEVD\b".to_string(),
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
    fn default_monitoring_set_builds() {
        let set = default_monitoring_set()
            .build()
            .expect("defaults should build");
        assert_eq!(set.concept(), Concept::Monitoring);
        assert_eq!(set.variants().len(), 4);
    }
}
