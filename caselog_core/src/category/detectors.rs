//! Secondary classifiers layered on the category rule engine.
//!
//! Each detector is a pure function of the procedure/service text. They
//! answer one narrow question each: surgical approach, intracerebral
//! pathology, cardiopulmonary bypass, and cesarean delivery.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Keywords indicating an endovascular/percutaneous approach.
const ENDOVASCULAR_KEYWORDS: &[&str] = &[
    "ENDOVASCULAR",
    "PERCUTANEOUS",
    "CATHETER",
    "STENT",
    "COIL",
    "COILING",
    "EMBOLIZATION",
    "EMBOLIZE",
    "ANGIOPLASTY",
    "ANGIOGRAM",
    "ANGIOGRAPHY",
    "THROMBECTOMY",
    "EVAR",
    "TEVAR",
    "FEVAR",
    "PTA",
    "INTERVENTION",
    "ENDOGRAFT",
];

/// Keywords indicating an open surgical approach.
const OPEN_KEYWORDS: &[&str] = &[
    "OPEN",
    "CRANIOTOMY",
    "CRANIECTOMY",
    "CLIPPING",
    "BYPASS",
    "GRAFT",
    "ENDARTERECTOMY",
    "CEA",
    "REPAIR",
    "RESECTION",
    "EXCISION",
    "DECOMPRESSION",
    "LAPAROTOMY",
    "THORACOTOMY",
    "STERNOTOMY",
];

/// Keywords indicating vascular intracerebral pathology.
const VASCULAR_PATHOLOGY_KEYWORDS: &[&str] = &[
    "ANEURYSM",
    "AVM",
    "ARTERIOVENOUS",
    "VASCULAR MALFORMATION",
    "HEMORRHAGE",
    "BLEED",
    "BLEEDING",
    "HEMATOMA",
    "STROKE",
    "ISCHEMIA",
    "CAVERNOMA",
    "CAVERNOUS MALFORMATION",
];

/// Keywords indicating nonvascular intracerebral pathology.
const NONVASCULAR_PATHOLOGY_KEYWORDS: &[&str] = &[
    "TUMOR",
    "MASS",
    "LESION",
    "CYST",
    "ABSCESS",
    "GLIOMA",
    "MENINGIOMA",
    "NEOPLASM",
    "CANCER",
    "EPILEPSY",
    "SEIZURE",
    "HYDROCEPHALUS",
    "SHUNT",
];

/// Explicit off-pump documentation. Checked before the with-CPB keywords so
/// "OFF PUMP" never reads as "PUMP".
const WITHOUT_CPB_KEYWORDS: &[&str] = &[
    "OFF PUMP",
    "OFF-PUMP",
    "OPCAB",
    "WITHOUT BYPASS",
    "WITHOUT CPB",
    "NO BYPASS",
    "NO CPB",
];

/// Explicit bypass documentation.
const WITH_CPB_KEYWORDS: &[&str] = &[
    "CARDIOPULMONARY BYPASS",
    "CPB",
    "ON PUMP",
    "ON-PUMP",
    "BYPASS",
];

/// Catheter-based cardiac procedures, which default to no bypass when the
/// documentation is silent.
const CATHETER_CARDIAC_KEYWORDS: &[&str] = &[
    "TAVR",
    "TAVI",
    "TRANSCATHETER",
    "PERCUTANEOUS",
    "MITRACLIP",
    "WATCHMAN",
    "ABLATION",
    "CATH",
];

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Surgical approach of a procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Approach {
    Endovascular,
    Open,
    Unknown,
}

impl Approach {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Endovascular => "endovascular",
            Self::Open => "open",
            Self::Unknown => "unknown",
        }
    }
}

/// Outcome of approach detection, with the contested flag set when both
/// keyword families matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApproachDetection {
    pub approach: Approach,
    pub contested: bool,
}

/// Detect the surgical approach from procedure text.
///
/// When both endovascular and open keywords are present, endovascular wins
/// (its terminology is the more specific) and `contested` is set so the
/// caller can attach an audit warning.
#[must_use]
pub fn detect_approach(text: &str) -> ApproachDetection {
    let upper = text.to_uppercase();
    let endovascular = contains_any(&upper, ENDOVASCULAR_KEYWORDS);
    let open = contains_any(&upper, OPEN_KEYWORDS);

    match (endovascular, open) {
        (true, true) => ApproachDetection {
            approach: Approach::Endovascular,
            contested: true,
        },
        (true, false) => ApproachDetection {
            approach: Approach::Endovascular,
            contested: false,
        },
        (false, true) => ApproachDetection {
            approach: Approach::Open,
            contested: false,
        },
        (false, false) => ApproachDetection {
            approach: Approach::Unknown,
            contested: false,
        },
    }
}

/// Pathology class of an intracerebral procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pathology {
    Vascular,
    Nonvascular,
    Unknown,
}

impl Pathology {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vascular => "vascular",
            Self::Nonvascular => "nonvascular",
            Self::Unknown => "unknown",
        }
    }
}

/// Outcome of pathology detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathologyDetection {
    pub pathology: Pathology,
    pub contested: bool,
}

/// Detect vascular vs nonvascular intracerebral pathology.
///
/// Same tie-break policy as [`detect_approach`]: when both families match,
/// the vascular family wins with the contested flag set.
#[must_use]
pub fn detect_intracerebral_pathology(text: &str) -> PathologyDetection {
    let upper = text.to_uppercase();
    let vascular = contains_any(&upper, VASCULAR_PATHOLOGY_KEYWORDS);
    let nonvascular = contains_any(&upper, NONVASCULAR_PATHOLOGY_KEYWORDS);

    match (vascular, nonvascular) {
        (true, true) => PathologyDetection {
            pathology: Pathology::Vascular,
            contested: true,
        },
        (true, false) => PathologyDetection {
            pathology: Pathology::Vascular,
            contested: false,
        },
        (false, true) => PathologyDetection {
            pathology: Pathology::Nonvascular,
            contested: false,
        },
        (false, false) => PathologyDetection {
            pathology: Pathology::Unknown,
            contested: false,
        },
    }
}

/// Cardiopulmonary bypass status of a cardiac procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CpbStatus {
    WithCpb,
    WithoutCpb,
}

/// Detect explicitly documented bypass status, if any.
#[must_use]
pub fn detect_cpb(text: &str) -> Option<CpbStatus> {
    let upper = text.to_uppercase();
    if contains_any(&upper, WITHOUT_CPB_KEYWORDS) {
        return Some(CpbStatus::WithoutCpb);
    }
    if contains_any(&upper, WITH_CPB_KEYWORDS) {
        return Some(CpbStatus::WithCpb);
    }
    None
}

/// Default bypass status when nothing explicit is documented: catheter-based
/// cardiac procedures run without bypass, traditional open ones with it.
#[must_use]
pub fn cardiac_cpb_default(text: &str) -> CpbStatus {
    let upper = text.to_uppercase();
    if contains_any(&upper, CATHETER_CARDIAC_KEYWORDS) {
        CpbStatus::WithoutCpb
    } else {
        CpbStatus::WithCpb
    }
}

#[expect(clippy::expect_used, reason = "fixed pattern is known to compile")]
static CESAREAN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bC[\s-]?SECTION\b|\bCESAREAN\b").expect("cesarean pattern compiles")
});

/// Whether the text documents a cesarean delivery.
///
/// Word-boundary and hyphen/space-insensitive: matches CESAREAN, C-SECTION
/// and C SECTION, but not e.g. RESECTION or SUBSECTION.
#[must_use]
pub fn is_cesarean(text: &str) -> bool {
    CESAREAN_RE.is_match(text)
}
