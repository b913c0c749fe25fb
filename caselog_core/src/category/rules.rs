//! Default procedure categorization rules.
//!
//! Rules are evaluated in declaration order and the first match wins, so
//! more specific rules must precede general ones. To change categorization,
//! edit keywords in place, insert a rule at the desired priority position,
//! or add `exclude_keywords` to prevent false matches. The integration
//! suite pins the exact order so silent reordering shows up as a test
//! failure.

use crate::category::{BaseCategory, CategoryRule};

fn rule(keywords: &[&str], exclude: &[&str], category: BaseCategory) -> CategoryRule {
    CategoryRule {
        keywords: keywords.iter().map(ToString::to_string).collect(),
        exclude_keywords: exclude.iter().map(ToString::to_string).collect(),
        category,
    }
}

/// Default category rule list.
#[must_use]
pub fn default_rules() -> Vec<CategoryRule> {
    vec![
        // Cardiac procedures, including transplants and catheter-based work
        rule(
            &[
                "CARDIAC",
                "CARDSURG",
                "CARDIOTHORACIC",
                "CARDVASC",
                "CABG",
                "CORONARY ARTERY BYPASS",
                "VALVE REPLACEMENT",
                "VALVE REPAIR",
                "AORTIC VALVE",
                "MITRAL VALVE",
                "TRICUSPID VALVE",
                "PULMONARY VALVE",
                "AVR",
                "MVR",
                "TVR",
                "MAZE PROCEDURE",
                "ATRIAL SEPTAL DEFECT",
                "ASD REPAIR",
                "VSD REPAIR",
                "VENTRICULAR SEPTAL DEFECT",
                "HEART TRANSPLANT",
                "CARDIAC TRANSPLANT",
                "LUNG TRANSPLANT",
                "TAVR",
                "TAVI",
                "LVAD",
                "ECMO",
                "INTRACARDIAC",
                "VENTRICULAR ASSIST DEVICE",
            ],
            &[],
            BaseCategory::Cardiac,
        ),
        // Intracerebral/neurosurgery, excluding spine procedures
        rule(
            &["NEURO"],
            &[
                "SPINE",
                "SPINAL",
                "VERTEBR",
                "INTERBODY",
                "ARTHRODESIS",
                "LAMINECTOMY",
                "LAMINOTOMY",
                "DISCECTOMY",
                "FUSION",
            ],
            BaseCategory::Intracerebral,
        ),
        // Intrathoracic non-cardiac, excluding cardiac thoracic cases
        rule(
            &["THOR"],
            &["CARD"],
            BaseCategory::IntrathoracicNonCardiac,
        ),
        // Major vascular procedures
        rule(
            &["VASC", "VASCSURG", "ANGIOGRAPHY", "ANGIOGRAM"],
            &[],
            BaseCategory::MajorVessels,
        ),
        // Obstetric deliveries; the delivery detector splits cesarean from
        // vaginal afterwards
        rule(
            &[
                "OBSTET",
                "OB/GYN",
                "OBGYN",
                "CESAREAN",
                "C-SECTION",
                "C SECTION",
                "DELIVERY",
                "LABOR AND DELIVERY",
                "LABOR EPIDURAL",
                "L&D",
            ],
            &[],
            BaseCategory::Obstetric,
        ),
        // Non-cardiac transplants have no dedicated category
        rule(&["TRANSPLANT"], &[], BaseCategory::Other),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_order_is_pinned() {
        let rules = default_rules();
        let order: Vec<BaseCategory> = rules.iter().map(|r| r.category).collect();
        assert_eq!(
            order,
            vec![
                BaseCategory::Cardiac,
                BaseCategory::Intracerebral,
                BaseCategory::IntrathoracicNonCardiac,
                BaseCategory::MajorVessels,
                BaseCategory::Obstetric,
                BaseCategory::Other,
            ]
        );
    }

    #[test]
    fn neuro_rule_excludes_spine_work() {
        let rules = default_rules();
        let neuro = &rules[1];
        assert!(neuro.keywords.contains(&"NEURO".to_string()));
        assert!(neuro.exclude_keywords.contains(&"LAMINECTOMY".to_string()));
    }
}
