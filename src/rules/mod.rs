//! Built-in accessibility rules
//!
//! Rules are grouped by family. Each family exposes `rules()` returning its
//! rules in the order they are registered.

mod bounding;
mod naming;
mod patterns;
mod relationships;
mod structure;

use crate::catalog::{Catalog, CatalogBuilder, CatalogError};
use crate::condition::Condition;
use crate::rule::Rule;
use crate::types::{ControlType, PropertyId};

pub use structure::{
    content_view_tree_item, control_view_list, control_view_menu_bar, control_view_tab,
    control_view_tree,
};

/// Control types a user interacts with directly
pub const INTERACTIVE_TYPES: &[ControlType] = &[
    ControlType::Button,
    ControlType::CheckBox,
    ControlType::ComboBox,
    ControlType::Edit,
    ControlType::Hyperlink,
    ControlType::ListItem,
    ControlType::MenuItem,
    ControlType::RadioButton,
    ControlType::Slider,
    ControlType::SplitButton,
    ControlType::TabItem,
    ControlType::TreeItem,
];

/// Interactive control element
pub(crate) fn interactive() -> Condition {
    Condition::control_type_in(INTERACTIVE_TYPES)
        & !Condition::equals(PropertyId::IsControlElement, false)
}

/// Not reported as offscreen (an absent flag counts as on screen)
pub(crate) fn on_screen() -> Condition {
    !Condition::is_true(PropertyId::IsOffscreen)
}

/// Every built-in rule, in registration order
pub fn builtin_rules() -> Vec<Rule> {
    let mut rules = Vec::new();
    rules.extend(patterns::rules());
    rules.extend(naming::rules());
    rules.extend(bounding::rules());
    rules.extend(structure::rules());
    rules.extend(relationships::rules());
    rules
}

/// Catalog holding every built-in rule
pub fn builtin_catalog() -> Result<Catalog, CatalogError> {
    let mut builder = CatalogBuilder::new();
    builder.register_all(builtin_rules())?;
    log::debug!("Built-in catalog has {} rules", builder.len());
    Ok(builder.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleCategory;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_catalog_registers() {
        let catalog = builtin_catalog().unwrap();
        assert_eq!(catalog.len(), builtin_rules().len());
        assert!(catalog.get("ButtonShouldHavePatterns").is_some());
        assert!(catalog.get("BoundingRectangleOnWPFTextParent").is_some());
        assert!(catalog.get("ContentViewTreeItemStructure").is_some());
    }

    #[test]
    fn test_builtin_ids_unique() {
        let rules = builtin_rules();
        let ids: HashSet<_> = rules.iter().map(|r| r.id().to_string()).collect();
        assert_eq!(ids.len(), rules.len());
    }

    #[test]
    fn test_every_category_used() {
        let rules = builtin_rules();
        for category in RuleCategory::ALL {
            assert!(
                rules.iter().any(|r| r.info().category == category),
                "no rule in category {}",
                category
            );
        }
    }

    #[test]
    fn test_family_order() {
        let catalog = builtin_catalog().unwrap();
        let first = catalog.iter().next().unwrap();
        assert_eq!(first.id(), "ButtonShouldHavePatterns");
        assert!(
            catalog.position("NameNotNull").unwrap()
                < catalog.position("BoundingRectangleNotNull").unwrap()
        );
    }
}
