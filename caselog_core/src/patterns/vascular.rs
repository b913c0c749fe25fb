//! Default vascular access pattern table.
//!
//! Covers arterial catheters (A-lines), central venous catheters and
//! pulmonary artery catheters. Central-line patterns double as supporting
//! evidence for a PA catheter, which is floated through a central introducer.

use crate::finding::{Concept, VascularAccess};
use crate::patterns::airway::negation_patterns;
use crate::patterns::{ConceptSetDef, VariantDef};

fn central_line_patterns() -> Vec<String> {
    vec![
        r"\bcentral\s+(venous|line)\b".to_string(),
        r"\bCVC\b".to_string(),
        r"\binternal\s+jugular\b".to_string(),
        r"\bIJ\b.*\b(line|catheter)\b".to_string(),
        r"\bsubclavian\b.*\b(line|catheter)\b".to_string(),
        r"\bfemoral\s+(venous\s+)?(line|catheter)\b".to_string(),
        r"\bcentral\s+access\b".to_string(),
    ]
}

/// Default vascular access pattern set.
#[must_use]
pub fn default_vascular_set() -> ConceptSetDef<VascularAccess> {
    ConceptSetDef {
        concept: Concept::VascularAccess,
        variants: vec![
            VariantDef {
                value: VascularAccess::ArterialCatheter,
                primary: vec![
                    r"\barterial\s+line\b".to_string(),
                    r"\bA-?line\b".to_string(),
                    r"\bart[- ]line\b".to_string(),
                    r"\barterial\s+catheter\b".to_string(),
                    r"\ba\s+line\b".to_string(),
                    r"\bradial\s+(artery|arterial|line)\b".to_string(),
                    r"\bfemoral\s+(artery|arterial|line)\b".to_string(),
                ],
                supporting: vec![],
                negating: negation_patterns(),
            },
            VariantDef {
                value: VascularAccess::CentralVenousCatheter,
                primary: central_line_patterns(),
                supporting: vec![],
                negating: negation_patterns(),
            },
            VariantDef {
                value: VascularAccess::PulmonaryArteryCatheter,
                primary: vec![
                    r"\bpulmonary\s+artery\s+catheter\b".to_string(),
                    r"\bPA\s+catheter\b".to_string(),
                    r"\bSwan[- ]?Ganz\b".to_string(),
                    r"\bPAC\b".to_string(),
                ],
                supporting: central_line_patterns(),
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
    fn default_vascular_set_builds() {
        let set = default_vascular_set()
            .build()
            .expect("defaults should build");
        assert_eq!(set.concept(), Concept::VascularAccess);
        assert_eq!(set.variants().len(), 3);
    }
}
