//! Parent, ancestor and sibling rules

use crate::condition::Condition;
use crate::element::Element;
use crate::rule::{Evaluation, Outcome, Rule, RuleCategory, Standard};
use crate::types::{ControlType, PropertyId};

/// Control types that must report their orientation
const ORIENTED_TYPES: &[ControlType] = &[
    ControlType::ScrollBar,
    ControlType::Slider,
    ControlType::Separator,
    ControlType::ToolBar,
    ControlType::Tab,
];

fn same_name_and_type(a: &Element<'_>, b: &Element<'_>) -> bool {
    a.control_type() == b.control_type() && a.name().is_some() && a.name() == b.name()
}

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::check(
            "TreeItemWithinTree",
            Condition::control_type(ControlType::TreeItem),
            Outcome::Fail,
            |e| Ok(e.nearest_ancestor_of_type(ControlType::Tree).is_some()),
        )
        .with_description("A tree item must have a Tree ancestor.")
        .with_how_to_fix("Place '{name}' inside a Tree control.")
        .with_standard(Standard::InfoAndRelationships)
        .with_category(RuleCategory::Relationships),

        Rule::check(
            "ListItemParentIsList",
            Condition::control_type(ControlType::ListItem),
            Outcome::Fail,
            |e| {
                Ok(e.parent().is_some_and(|p| {
                    matches!(
                        p.control_type(),
                        ControlType::List | ControlType::Group | ControlType::ComboBox
                    )
                }))
            },
        )
        .with_description("The parent of a list item must be a List, Group or ComboBox.")
        .with_how_to_fix("Move '{name}' under a List element.")
        .with_standard(Standard::InfoAndRelationships)
        .with_category(RuleCategory::Relationships),

        Rule::new(
            "SiblingUniqueAndFocusable",
            Condition::is_true(PropertyId::IsKeyboardFocusable)
                & Condition::not_blank(PropertyId::Name)
                & Condition::on_any_sibling(Condition::is_true(PropertyId::IsKeyboardFocusable)),
            |e| {
                let duplicates = e
                    .siblings()
                    .filter(|s| s.bool_property(PropertyId::IsKeyboardFocusable) == Some(true))
                    .filter(|s| same_name_and_type(e, s))
                    .count();
                if duplicates == 0 {
                    Ok(Evaluation::pass())
                } else {
                    Ok(Evaluation::fail(format!(
                        "{} shares its name and control type with {} focusable sibling(s)",
                        e.glimpse(),
                        duplicates
                    )))
                }
            },
        )
        .with_description(
            "Focusable siblings must not share the same Name and control type.",
        )
        .with_how_to_fix("Give each {control_type} among its siblings a distinct Name.")
        .with_standard(Standard::NameRoleValue)
        .with_category(RuleCategory::Relationships)
        .with_property(PropertyId::Name),

        Rule::check(
            "ParentChildShouldNotHaveSameNameAndType",
            Condition::not_blank(PropertyId::Name)
                & Condition::on_parent(Condition::not_blank(PropertyId::Name)),
            Outcome::Fail,
            |e| Ok(!e.parent().is_some_and(|p| same_name_and_type(e, &p))),
        )
        .with_description("An element must not have the same Name and control type as its parent.")
        .with_how_to_fix("Rename '{name}' or remove the redundant wrapper element.")
        .with_standard(Standard::InfoAndRelationships)
        .with_category(RuleCategory::Relationships)
        .with_property(PropertyId::Name),

        Rule::check(
            "OrientationPropertyExists",
            Condition::control_type_in(ORIENTED_TYPES),
            Outcome::Fail,
            |e| Ok(e.property(PropertyId::Orientation).is_some()),
        )
        .with_description("Scroll bars, sliders, separators, tool bars and tabs must expose Orientation.")
        .with_how_to_fix("Report whether the {control_type} is horizontal or vertical.")
        .with_standard(Standard::InfoAndRelationships)
        .with_category(RuleCategory::Structure)
        .with_property(PropertyId::Orientation),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementData, ElementTree};

    fn rule(id: &str) -> Rule {
        rules().into_iter().find(|r| r.id() == id).unwrap()
    }

    #[test]
    fn test_tree_item_within_tree() {
        let rule = rule("TreeItemWithinTree");
        let tree = ElementTree::from_root(
            ElementData::new(ControlType::Tree).with_child(
                ElementData::new(ControlType::Group)
                    .with_child(ElementData::new(ControlType::TreeItem)),
            ),
        );
        let item = tree.root().descendants().last().unwrap();
        assert_eq!(rule.evaluate(&item).outcome, Outcome::Pass);

        let orphan = ElementTree::from_root(ElementData::new(ControlType::TreeItem));
        assert_eq!(rule.evaluate(&orphan.root()).outcome, Outcome::Fail);
    }

    #[test]
    fn test_list_item_parent() {
        let rule = rule("ListItemParentIsList");
        let tree = ElementTree::from_root(
            ElementData::new(ControlType::Pane)
                .with_child(ElementData::new(ControlType::ListItem))
                .with_child(
                    ElementData::new(ControlType::List)
                        .with_child(ElementData::new(ControlType::ListItem)),
                ),
        );
        let items: Vec<_> = tree
            .iter()
            .filter(|e| e.control_type() == ControlType::ListItem)
            .collect();
        assert_eq!(rule.evaluate(&items[0]).outcome, Outcome::Fail);
        assert_eq!(rule.evaluate(&items[1]).outcome, Outcome::Pass);
    }

    #[test]
    fn test_sibling_unique() {
        let rule = rule("SiblingUniqueAndFocusable");
        let button = |name: &str| ElementData::new(ControlType::Button).with_name(name).focusable();
        let tree = ElementTree::from_root(
            ElementData::new(ControlType::Pane)
                .with_child(button("Save"))
                .with_child(button("Save"))
                .with_child(button("Cancel")),
        );
        let buttons: Vec<_> = tree.root().children().collect();
        assert!(rule.is_applicable(&buttons[0]));
        assert_eq!(rule.evaluate(&buttons[0]).outcome, Outcome::Fail);
        assert_eq!(rule.evaluate(&buttons[1]).outcome, Outcome::Fail);
        assert_eq!(rule.evaluate(&buttons[2]).outcome, Outcome::Pass);
    }

    #[test]
    fn test_parent_child_same_name() {
        let rule = rule("ParentChildShouldNotHaveSameNameAndType");
        let tree = ElementTree::from_root(
            ElementData::new(ControlType::Group)
                .with_name("Options")
                .with_child(ElementData::new(ControlType::Group).with_name("Options"))
                .with_child(ElementData::new(ControlType::Text).with_name("Options")),
        );
        let children: Vec<_> = tree.root().children().collect();
        assert!(rule.is_applicable(&children[0]));
        assert_eq!(rule.evaluate(&children[0]).outcome, Outcome::Fail);
        assert_eq!(rule.evaluate(&children[1]).outcome, Outcome::Pass);
    }

    #[test]
    fn test_orientation() {
        let rule = rule("OrientationPropertyExists");
        let bar = ElementTree::from_root(ElementData::new(ControlType::ScrollBar));
        assert_eq!(rule.evaluate(&bar.root()).outcome, Outcome::Fail);
        let bar = ElementTree::from_root(
            ElementData::new(ControlType::ScrollBar).with_property(PropertyId::Orientation, 1),
        );
        assert_eq!(rule.evaluate(&bar.root()).outcome, Outcome::Pass);
    }
}
