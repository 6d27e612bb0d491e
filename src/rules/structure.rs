//! Control view and content view structure rules
//!
//! Each structure is a [`Condition`] describing the expected shape around an
//! element. Rules report the rendered condition in their description so
//! `explain` shows exactly what is checked.

use crate::condition::{Comparison, Condition};
use crate::rule::{Evaluation, Outcome, Rule, RuleCategory, Standard};
use crate::types::ControlType;

fn children_within(types: &[ControlType]) -> Condition {
    Condition::on_all_children(Condition::control_type_in(types))
}

/// Content view of a tree item: sits in a tree, holds only item content
pub fn content_view_tree_item() -> Condition {
    Condition::on_parent(Condition::control_type_in(&[
        ControlType::Tree,
        ControlType::TreeItem,
        ControlType::Group,
    ])) & children_within(&[
        ControlType::TreeItem,
        ControlType::Text,
        ControlType::Image,
        ControlType::CheckBox,
        ControlType::Edit,
        ControlType::Group,
    ])
}

/// Control view of a tree: tree items, optionally grouped and scrollable
pub fn control_view_tree() -> Condition {
    children_within(&[
        ControlType::TreeItem,
        ControlType::Group,
        ControlType::ScrollBar,
        ControlType::Header,
    ])
}

/// Control view of a list: at least one item when not empty
pub fn control_view_list() -> Condition {
    let items = [
        ControlType::ListItem,
        ControlType::DataItem,
        ControlType::Group,
    ];
    let mut allowed = items.to_vec();
    allowed.extend([ControlType::ScrollBar, ControlType::Header]);

    children_within(&allowed)
        & (Condition::no_children() | Condition::on_any_child(Condition::control_type_in(&items)))
}

/// Control view of a menu bar: menu items and separators only
pub fn control_view_menu_bar() -> Condition {
    children_within(&[ControlType::MenuItem, ControlType::Separator])
}

/// Control view of a tab: one or more tab items plus scroll buttons
pub fn control_view_tab() -> Condition {
    Condition::child_count(Comparison::Gt, 0)
        & Condition::on_any_child(Condition::control_type(ControlType::TabItem))
        & children_within(&[
            ControlType::TabItem,
            ControlType::Button,
            ControlType::ScrollBar,
            ControlType::Pane,
        ])
}

fn structure_rule(
    id: &str,
    control_type: ControlType,
    structure: Condition,
    otherwise: Outcome,
) -> Rule {
    let description = format!(
        "A {} element must match the structure {}.",
        control_type, structure
    );
    let how_to_fix = format!(
        "Rearrange the children of the {} so the structure is {}.",
        control_type, structure
    );

    Rule::new(id, Condition::control_type(control_type), move |e| {
        Ok(Evaluation::pass_or(
            structure.matches(e),
            otherwise,
            format!("{} does not match the expected structure", e.glimpse()),
        ))
    })
    .with_description(&description)
    .with_how_to_fix(&how_to_fix)
    .with_standard(Standard::InfoAndRelationships)
    .with_category(RuleCategory::Structure)
}

pub fn rules() -> Vec<Rule> {
    vec![
        // content view shape is advisory
        structure_rule(
            "ContentViewTreeItemStructure",
            ControlType::TreeItem,
            content_view_tree_item(),
            Outcome::Note,
        ),
        structure_rule(
            "ControlViewTreeStructure",
            ControlType::Tree,
            control_view_tree(),
            Outcome::Fail,
        ),
        structure_rule(
            "ControlViewListStructure",
            ControlType::List,
            control_view_list(),
            Outcome::Fail,
        ),
        structure_rule(
            "ControlViewMenuBarStructure",
            ControlType::MenuBar,
            control_view_menu_bar(),
            Outcome::Fail,
        ),
        structure_rule(
            "ControlViewTabStructure",
            ControlType::Tab,
            control_view_tab(),
            Outcome::Fail,
        ),
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
    fn test_tree_item_content_view() {
        let rule = rule("ContentViewTreeItemStructure");
        let tree = ElementTree::from_root(
            ElementData::new(ControlType::Tree)
                .with_child(
                    ElementData::new(ControlType::TreeItem)
                        .with_child(ElementData::new(ControlType::Text)),
                )
                .with_child(
                    ElementData::new(ControlType::TreeItem)
                        .with_child(ElementData::new(ControlType::Button)),
                ),
        );
        let items: Vec<_> = tree.root().children().collect();
        assert_eq!(rule.evaluate(&items[0]).outcome, Outcome::Pass);
        assert_eq!(rule.evaluate(&items[1]).outcome, Outcome::Note);
    }

    #[test]
    fn test_orphan_tree_item_is_note() {
        let rule = rule("ContentViewTreeItemStructure");
        let tree = ElementTree::from_root(
            ElementData::new(ControlType::Pane).with_child(ElementData::new(ControlType::TreeItem)),
        );
        let item = tree.root().children().next().unwrap();
        assert_eq!(rule.evaluate(&item).outcome, Outcome::Note);
    }

    #[test]
    fn test_list_structure() {
        let rule = rule("ControlViewListStructure");
        let good = ElementTree::from_root(
            ElementData::new(ControlType::List)
                .with_child(ElementData::new(ControlType::ListItem))
                .with_child(ElementData::new(ControlType::ScrollBar)),
        );
        assert_eq!(rule.evaluate(&good.root()).outcome, Outcome::Pass);

        let scrollbar_only = ElementTree::from_root(
            ElementData::new(ControlType::List).with_child(ElementData::new(ControlType::ScrollBar)),
        );
        assert_eq!(rule.evaluate(&scrollbar_only.root()).outcome, Outcome::Fail);

        let empty = ElementTree::from_root(ElementData::new(ControlType::List));
        assert_eq!(rule.evaluate(&empty.root()).outcome, Outcome::Pass);
    }

    #[test]
    fn test_menu_bar_and_tab() {
        let menu = ElementTree::from_root(
            ElementData::new(ControlType::MenuBar)
                .with_child(ElementData::new(ControlType::MenuItem))
                .with_child(ElementData::new(ControlType::Edit)),
        );
        assert_eq!(
            rule("ControlViewMenuBarStructure").evaluate(&menu.root()).outcome,
            Outcome::Fail
        );

        let tab = ElementTree::from_root(
            ElementData::new(ControlType::Tab).with_child(ElementData::new(ControlType::TabItem)),
        );
        assert_eq!(
            rule("ControlViewTabStructure").evaluate(&tab.root()).outcome,
            Outcome::Pass
        );
        let empty_tab = ElementTree::from_root(ElementData::new(ControlType::Tab));
        assert_eq!(
            rule("ControlViewTabStructure").evaluate(&empty_tab.root()).outcome,
            Outcome::Fail
        );
    }

    #[test]
    fn test_tree_structure() {
        let rule = rule("ControlViewTreeStructure");
        let tree = ElementTree::from_root(
            ElementData::new(ControlType::Tree).with_child(ElementData::new(ControlType::Button)),
        );
        let eval = rule.evaluate(&tree.root());
        assert_eq!(eval.outcome, Outcome::Fail);
        assert_eq!(eval.messages, vec!["Tree does not match the expected structure".to_string()]);
    }

    #[test]
    fn test_description_shows_structure() {
        let rule = rule("ControlViewMenuBarStructure");
        assert!(rule
            .info()
            .description
            .contains("allChildren(ControlType in [MenuItem, Separator])"));
    }
}
