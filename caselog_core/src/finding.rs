//! Typed findings extracted from clinical free text.
//!
//! Each extraction concept (airway technique, vascular access, monitoring
//! modality) has its own value enum whose `as_str` form is the standardized
//! case-log label used in output cells and form-code lookups.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A clinical classification axis handled by the finding extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Concept {
    /// Airway management technique.
    Airway,
    /// Specialized vascular access.
    VascularAccess,
    /// Specialized monitoring modality.
    Monitoring,
}

impl Concept {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Airway => "airway",
            Self::VascularAccess => "vascular_access",
            Self::Monitoring => "monitoring",
        }
    }
}

/// Airway management techniques recognized by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AirwayManagement {
    /// Oral endotracheal tube.
    OralEtt,
    /// Nasal endotracheal tube.
    NasalEtt,
    /// Direct laryngoscopy (Miller/Macintosh blades).
    DirectLaryngoscope,
    /// Video-assisted laryngoscopy (Glidescope, C-MAC, McGrath).
    VideoLaryngoscope,
    /// Supraglottic device (LMA, i-gel, Air-Q).
    SupraglotticAirway,
    /// Flexible bronchoscopic (fiberoptic) intubation.
    FlexibleBronchoscopic,
    /// Face-mask ventilation.
    Mask,
    /// Difficult airway encounter.
    DifficultAirway,
}

impl AirwayManagement {
    /// Standardized case-log label for this technique.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OralEtt => "Oral ETT",
            Self::NasalEtt => "Nasal ETT",
            Self::DirectLaryngoscope => "Laryngoscope - Direct",
            Self::VideoLaryngoscope => "Laryngoscope - Indirect",
            Self::SupraglotticAirway => "Supraglottic Airway",
            Self::FlexibleBronchoscopic => "Flexible Bronchoscopic",
            Self::Mask => "Mask",
            Self::DifficultAirway => "Difficult Airway",
        }
    }
}

impl FromStr for AirwayManagement {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Oral ETT" => Ok(Self::OralEtt),
            "Nasal ETT" => Ok(Self::NasalEtt),
            "Laryngoscope - Direct" => Ok(Self::DirectLaryngoscope),
            "Laryngoscope - Indirect" => Ok(Self::VideoLaryngoscope),
            "Supraglottic Airway" => Ok(Self::SupraglotticAirway),
            "Flexible Bronchoscopic" => Ok(Self::FlexibleBronchoscopic),
            "Mask" => Ok(Self::Mask),
            "Difficult Airway" => Ok(Self::DifficultAirway),
            _ => Err("unknown airway management label"),
        }
    }
}

/// Specialized vascular access devices recognized by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VascularAccess {
    /// Arterial catheter (A-line).
    ArterialCatheter,
    /// Central venous catheter (IJ, subclavian, femoral).
    CentralVenousCatheter,
    /// Pulmonary artery catheter (Swan-Ganz).
    PulmonaryArteryCatheter,
}

impl VascularAccess {
    /// Standardized case-log label for this device.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ArterialCatheter => "Arterial Catheter",
            Self::CentralVenousCatheter => "Central Venous Catheter",
            Self::PulmonaryArteryCatheter => "Pulmonary Artery Catheter",
        }
    }
}

impl FromStr for VascularAccess {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Arterial Catheter" => Ok(Self::ArterialCatheter),
            "Central Venous Catheter" => Ok(Self::CentralVenousCatheter),
            "Pulmonary Artery Catheter" => Ok(Self::PulmonaryArteryCatheter),
            _ => Err("unknown vascular access label"),
        }
    }
}

/// Specialized monitoring modalities recognized by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitoringTechnique {
    /// Transesophageal echocardiography.
    Tee,
    /// Electrophysiologic monitoring (SSEP, MEP, EMG, EEG).
    ElectrophysiologicMon,
    /// Cerebrospinal fluid drain (lumbar/spinal drain).
    CsfDrain,
    /// Invasive neurological monitoring (ICP, ventriculostomy, EVD).
    InvasiveNeuroMon,
}

impl MonitoringTechnique {
    /// Standardized case-log label for this modality.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tee => "Transesophageal Echo (TEE)",
            Self::ElectrophysiologicMon => "Electrophysiologic monitoring (SSEP, MEP, EMG, EEG)",
            Self::CsfDrain => "CSF Drain",
            Self::InvasiveNeuroMon => "Invasive Neuro Monitoring",
        }
    }
}

impl FromStr for MonitoringTechnique {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Transesophageal Echo (TEE)" => Ok(Self::Tee),
            "Electrophysiologic monitoring (SSEP, MEP, EMG, EEG)" => {
                Ok(Self::ElectrophysiologicMon)
            }
            "CSF Drain" => Ok(Self::CsfDrain),
            "Invasive Neuro Monitoring" => Ok(Self::InvasiveNeuroMon),
            _ => Err("unknown monitoring label"),
        }
    }
}

/// One classified observation for a concept, with confidence and evidence.
///
/// Findings are immutable once produced. Multiple findings with different
/// values may coexist for the same concept (e.g., both an oral ETT and a
/// video laryngoscope on one case).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding<V> {
    /// The classified value (a concept enum variant).
    pub value: V,

    /// Confidence score in [0.0, 1.0].
    pub confidence: f64,

    /// Matched text with surrounding context.
    pub evidence: String,

    /// Name of the source field the text came from.
    pub source_field: String,
}

impl<V: Copy> Finding<V> {
    /// Whether this finding falls below the given review threshold.
    #[must_use]
    pub fn needs_review(&self, threshold: f64) -> bool {
        self.confidence < threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn airway_label_round_trip() {
        for value in [
            AirwayManagement::OralEtt,
            AirwayManagement::NasalEtt,
            AirwayManagement::DirectLaryngoscope,
            AirwayManagement::VideoLaryngoscope,
            AirwayManagement::SupraglotticAirway,
            AirwayManagement::FlexibleBronchoscopic,
            AirwayManagement::Mask,
            AirwayManagement::DifficultAirway,
        ] {
            assert_eq!(AirwayManagement::from_str(value.as_str()), Ok(value));
        }
    }

    #[test]
    fn video_laryngoscope_uses_indirect_label() {
        assert_eq!(
            AirwayManagement::VideoLaryngoscope.as_str(),
            "Laryngoscope - Indirect"
        );
    }

    #[test]
    fn unknown_label_is_rejected() {
        assert!(AirwayManagement::from_str("Cricothyrotomy").is_err());
        assert!(VascularAccess::from_str("PICC").is_err());
    }

    #[test]
    fn needs_review_compares_against_threshold() {
        let finding = Finding {
            value: VascularAccess::ArterialCatheter,
            confidence: 0.2,
            evidence: "arterial line placed".to_string(),
            source_field: "procedure_notes".to_string(),
        };
        assert!(finding.needs_review(0.5));
        assert!(!finding.needs_review(0.1));
    }
}
