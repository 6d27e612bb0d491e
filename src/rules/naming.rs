//! Accessible name rules

use super::interactive;
use crate::condition::Condition;
use crate::rule::{Evaluation, Outcome, Rule, RuleCategory, Standard};
use crate::types::{ControlType, PropertyId};

/// Longest name screen readers announce comfortably
pub const MAX_NAME_LENGTH: usize = 512;

/// Control types whose name may legitimately repeat the type
const GENERIC_TYPES: &[ControlType] = &[
    ControlType::Custom,
    ControlType::Document,
    ControlType::Group,
    ControlType::Pane,
    ControlType::Text,
    ControlType::Window,
];

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::check("NameNotNull", interactive(), Outcome::Fail, |e| {
            Ok(e.property(PropertyId::Name).is_some())
        })
        .with_description("An interactive element must expose a Name property.")
        .with_how_to_fix("Give the {control_type} an accessible name, for example from its visible label.")
        .with_standard(Standard::NameRoleValue)
        .with_category(RuleCategory::Naming)
        .with_property(PropertyId::Name),

        Rule::check(
            "NameNotEmpty",
            interactive() & Condition::exists(PropertyId::Name),
            Outcome::Fail,
            |e| Ok(!e.require_str(PropertyId::Name)?.trim().is_empty()),
        )
        .with_description("The Name of an interactive element must not be empty or whitespace.")
        .with_how_to_fix("Set a descriptive Name on the {control_type}.")
        .with_standard(Standard::NameRoleValue)
        .with_category(RuleCategory::Naming)
        .with_property(PropertyId::Name),

        Rule::new(
            "NameExcludesControlType",
            Condition::not_blank(PropertyId::Name) & !Condition::control_type_in(GENERIC_TYPES),
            |e| {
                let name = e.require_str(PropertyId::Name)?.to_lowercase();
                let control_type = e
                    .string_property(PropertyId::LocalizedControlType)
                    .map(str::to_lowercase)
                    .unwrap_or_else(|| e.control_type().name().to_lowercase());

                if name.split_whitespace().any(|word| word == control_type) {
                    Ok(Evaluation::fail(format!(
                        "Name '{}' repeats the control type '{}'",
                        name, control_type
                    )))
                } else {
                    Ok(Evaluation::pass())
                }
            },
        )
        .with_description("The Name must not include the element's control type.")
        .with_how_to_fix("Remove '{control_type}' from the Name; screen readers already announce it.")
        .with_standard(Standard::NameRoleValue)
        .with_category(RuleCategory::Naming)
        .with_property(PropertyId::Name),

        Rule::new(
            "NameReasonableLength",
            Condition::not_blank(PropertyId::Name),
            |e| {
                let length = e.require_str(PropertyId::Name)?.chars().count();
                Ok(Evaluation::pass_or(
                    length <= MAX_NAME_LENGTH,
                    Outcome::Fail,
                    format!("Name has {} characters, limit is {}", length, MAX_NAME_LENGTH),
                ))
            },
        )
        .with_description("The Name must be no longer than 512 characters.")
        .with_how_to_fix("Shorten the Name and move long text to HelpText or a described-by element.")
        .with_standard(Standard::NameRoleValue)
        .with_category(RuleCategory::Naming)
        .with_property(PropertyId::Name),

        Rule::check(
            "LocalizedControlTypeNotEmpty",
            Condition::is_true(PropertyId::IsControlElement)
                & Condition::exists(PropertyId::LocalizedControlType),
            Outcome::Fail,
            |e| {
                Ok(!e
                    .require_str(PropertyId::LocalizedControlType)?
                    .trim()
                    .is_empty())
            },
        )
        .with_description("The LocalizedControlType of a control element must not be empty.")
        .with_how_to_fix("Provide a localized control type string for the {control_type}.")
        .with_standard(Standard::NameRoleValue)
        .with_category(RuleCategory::Naming)
        .with_property(PropertyId::LocalizedControlType),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementData, ElementTree};
    use crate::types::Value;

    fn rule(id: &str) -> Rule {
        rules().into_iter().find(|r| r.id() == id).unwrap()
    }

    fn outcome(rule: &Rule, data: ElementData) -> Option<Outcome> {
        let tree = ElementTree::from_root(data);
        let root = tree.root();
        rule.is_applicable(&root).then(|| rule.evaluate(&root).outcome)
    }

    #[test]
    fn test_name_not_null() {
        let rule = rule("NameNotNull");
        assert_eq!(
            outcome(&rule, ElementData::new(ControlType::Button).with_name("OK")),
            Some(Outcome::Pass)
        );
        assert_eq!(outcome(&rule, ElementData::new(ControlType::Button)), Some(Outcome::Fail));
        assert_eq!(outcome(&rule, ElementData::new(ControlType::Pane)), None);
        assert_eq!(
            outcome(
                &rule,
                ElementData::new(ControlType::Button)
                    .with_property(PropertyId::IsControlElement, false)
            ),
            None
        );
    }

    #[test]
    fn test_name_not_empty() {
        let rule = rule("NameNotEmpty");
        assert_eq!(
            outcome(&rule, ElementData::new(ControlType::Edit).with_name("  ")),
            Some(Outcome::Fail)
        );
        assert_eq!(
            outcome(&rule, ElementData::new(ControlType::Edit).with_name("Search")),
            Some(Outcome::Pass)
        );
        // absent name is NameNotNull's concern
        assert_eq!(outcome(&rule, ElementData::new(ControlType::Edit)), None);
    }

    #[test]
    fn test_name_wrong_type_is_error() {
        let rule = rule("NameNotEmpty");
        let data = ElementData::new(ControlType::Edit).with_property(PropertyId::Name, Value::Int(3));
        assert_eq!(outcome(&rule, data), Some(Outcome::Error));
    }

    #[test]
    fn test_name_excludes_control_type() {
        let rule = rule("NameExcludesControlType");
        assert_eq!(
            outcome(&rule, ElementData::new(ControlType::Button).with_name("OK button")),
            Some(Outcome::Fail)
        );
        assert_eq!(
            outcome(&rule, ElementData::new(ControlType::Button).with_name("Buttons of doom")),
            Some(Outcome::Pass)
        );
        assert_eq!(
            outcome(
                &rule,
                ElementData::new(ControlType::Button)
                    .with_name("Submit knop")
                    .with_property(PropertyId::LocalizedControlType, "knop")
            ),
            Some(Outcome::Fail)
        );
        assert_eq!(
            outcome(&rule, ElementData::new(ControlType::Pane).with_name("Main pane")),
            None
        );
    }

    #[test]
    fn test_name_reasonable_length() {
        let rule = rule("NameReasonableLength");
        let long = "x".repeat(MAX_NAME_LENGTH + 1);
        assert_eq!(
            outcome(&rule, ElementData::new(ControlType::Text).with_name(&long)),
            Some(Outcome::Fail)
        );
        let ok = "x".repeat(MAX_NAME_LENGTH);
        assert_eq!(
            outcome(&rule, ElementData::new(ControlType::Text).with_name(&ok)),
            Some(Outcome::Pass)
        );
    }

    #[test]
    fn test_localized_control_type() {
        let rule = rule("LocalizedControlTypeNotEmpty");
        let base = || ElementData::new(ControlType::Button).with_property(PropertyId::IsControlElement, true);
        assert_eq!(
            outcome(&rule, base().with_property(PropertyId::LocalizedControlType, "")),
            Some(Outcome::Fail)
        );
        assert_eq!(
            outcome(&rule, base().with_property(PropertyId::LocalizedControlType, "button")),
            Some(Outcome::Pass)
        );
    }
}
