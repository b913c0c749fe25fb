//! Anesthesia type standardization.
//!
//! Source systems describe the anesthetic in free-ish text ("General
//! Endotracheal", "MAC with sedation"). An ordered keyword table maps those
//! onto the standardized types; the first matching rule wins. No match is
//! not an error: `map` returns `None` and the caller decides whether to warn
//! or pass the raw value through.

use serde::{Deserialize, Serialize};

/// Standardized anesthesia types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnesthesiaType {
    /// Combined spinal-epidural.
    Cse,
    Epidural,
    Spinal,
    PeripheralNerveBlock,
    /// Monitored anesthesia care / sedation.
    Mac,
    GeneralAnesthesia,
}

impl AnesthesiaType {
    /// Standardized case-log label for this type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cse => "CSE",
            Self::Epidural => "Epidural",
            Self::Spinal => "Spinal",
            Self::PeripheralNerveBlock => "Peripheral nerve block",
            Self::Mac => "MAC",
            Self::GeneralAnesthesia => "GA",
        }
    }
}

/// One mapping rule: any pattern found in the uppercased input selects the
/// standardized type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnesthesiaRule {
    /// Uppercase keywords matched as substrings.
    pub patterns: Vec<String>,

    /// Standardized type selected on match.
    pub anesthesia_type: AnesthesiaType,
}

/// Default mapping rules. CSE precedes epidural and spinal so the combined
/// technique is not claimed by either component.
#[must_use]
pub fn default_anesthesia_rules() -> Vec<AnesthesiaRule> {
    let rule = |patterns: &[&str], anesthesia_type| AnesthesiaRule {
        patterns: patterns.iter().map(ToString::to_string).collect(),
        anesthesia_type,
    };

    vec![
        rule(&["CSE"], AnesthesiaType::Cse),
        rule(&["EPIDURAL"], AnesthesiaType::Epidural),
        rule(&["SPINAL"], AnesthesiaType::Spinal),
        rule(&["BLOCK", "PNB"], AnesthesiaType::PeripheralNerveBlock),
        rule(&["MAC", "SEDATION"], AnesthesiaType::Mac),
        // An endotracheal tube implies a general anesthetic
        rule(&["GENERAL", "ENDOTRACHEAL"], AnesthesiaType::GeneralAnesthesia),
    ]
}

/// First-match-wins mapper over ordered anesthesia rules.
#[derive(Debug, Clone)]
pub struct AnesthesiaMapper {
    rules: Vec<AnesthesiaRule>,
}

impl AnesthesiaMapper {
    /// Create a mapper from an ordered rule list.
    #[must_use]
    pub const fn new(rules: Vec<AnesthesiaRule>) -> Self {
        Self { rules }
    }

    /// Create a mapper with the default rules.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(default_anesthesia_rules())
    }

    /// Map a raw anesthesia type string to a standardized type.
    ///
    /// Returns `None` (the unmapped sentinel) when no rule matches or the
    /// input is empty; never fails.
    #[must_use]
    pub fn map(&self, raw_type: &str) -> Option<AnesthesiaType> {
        let upper = raw_type.trim().to_uppercase();
        if upper.is_empty() {
            return None;
        }

        self.rules
            .iter()
            .find(|rule| rule.patterns.iter().any(|p| upper.contains(p.as_str())))
            .map(|rule| rule.anesthesia_type)
    }
}

impl Default for AnesthesiaMapper {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_map_to_standard_types() {
        let mapper = AnesthesiaMapper::with_defaults();
        assert_eq!(mapper.map("General Endotracheal"), Some(AnesthesiaType::GeneralAnesthesia));
        assert_eq!(mapper.map("MAC with sedation"), Some(AnesthesiaType::Mac));
        assert_eq!(mapper.map("labor epidural"), Some(AnesthesiaType::Epidural));
        assert_eq!(mapper.map("spinal"), Some(AnesthesiaType::Spinal));
        assert_eq!(
            mapper.map("femoral nerve block"),
            Some(AnesthesiaType::PeripheralNerveBlock)
        );
    }

    #[test]
    fn cse_outranks_its_components() {
        let mapper = AnesthesiaMapper::with_defaults();
        assert_eq!(mapper.map("CSE"), Some(AnesthesiaType::Cse));
        // A combined technique names both components but maps to CSE.
        assert_eq!(
            mapper.map("CSE (combined spinal epidural)"),
            Some(AnesthesiaType::Cse)
        );
    }

    #[test]
    fn unmapped_inputs_return_the_sentinel() {
        let mapper = AnesthesiaMapper::with_defaults();
        assert_eq!(mapper.map("hypnosis"), None);
        assert_eq!(mapper.map(""), None);
        assert_eq!(mapper.map("   "), None);
    }
}
