//! Control pattern rules

use crate::condition::Condition;
use crate::rule::{Evaluation, Outcome, Rule, RuleCategory, Standard};
use crate::types::{ControlType, PatternId};

/// Rule requiring `control_type` to support at least one of `patterns`
fn requires_any(
    id: &str,
    control_type: ControlType,
    patterns: &'static [PatternId],
    otherwise: Outcome,
) -> Rule {
    let names: Vec<&str> = patterns.iter().map(|p| p.name()).collect();
    let names = names.join(" or ");
    let missing = format!("{} does not support {}", control_type, names);

    Rule::new(id, Condition::control_type(control_type), move |e| {
        let ok = patterns.iter().any(|p| e.has_pattern(*p));
        Ok(Evaluation::pass_or(ok, otherwise, missing.as_str()))
    })
    .with_description(&format!(
        "A {} element must support the {} pattern.",
        control_type, names
    ))
    .with_how_to_fix(&format!(
        "Implement the {} pattern on '{{name}}' so assistive technology can operate it.",
        names
    ))
    .with_standard(Standard::NameRoleValue)
    .with_category(RuleCategory::Patterns)
}

pub fn rules() -> Vec<Rule> {
    vec![
        requires_any(
            "ButtonShouldHavePatterns",
            ControlType::Button,
            &[PatternId::Invoke, PatternId::Toggle, PatternId::ExpandCollapse],
            Outcome::Fail,
        ),

        Rule::check(
            "ButtonInvokeAndTogglePatterns",
            Condition::control_type(ControlType::Button) & Condition::has_pattern(PatternId::Invoke),
            Outcome::Fail,
            |e| Ok(!e.has_pattern(PatternId::Toggle)),
        )
        .with_description("A button must not support both the Invoke and Toggle patterns.")
        .with_how_to_fix(
            "Remove either Invoke or Toggle; use a toggle button when the control keeps a state.",
        )
        .with_standard(Standard::NameRoleValue)
        .with_category(RuleCategory::Patterns),

        requires_any(
            "HyperlinkShouldSupportInvoke",
            ControlType::Hyperlink,
            &[PatternId::Invoke],
            Outcome::Fail,
        ),

        requires_any(
            "CheckBoxShouldSupportToggle",
            ControlType::CheckBox,
            &[PatternId::Toggle],
            Outcome::Fail,
        ),

        requires_any(
            "ComboBoxShouldSupportExpandCollapse",
            ControlType::ComboBox,
            &[PatternId::ExpandCollapse],
            Outcome::Fail,
        ),

        requires_any(
            "ListItemShouldSupportSelectionItem",
            ControlType::ListItem,
            &[PatternId::SelectionItem],
            Outcome::Fail,
        ),

        // indeterminate progress bars legitimately skip RangeValue
        requires_any(
            "ProgressBarShouldSupportRangeValue",
            ControlType::ProgressBar,
            &[PatternId::RangeValue],
            Outcome::Note,
        ),

        requires_any(
            "EditSupportsValueOrText",
            ControlType::Edit,
            &[PatternId::Value, PatternId::Text],
            Outcome::Fail,
        ),
    ]
}
