//! Rule definition and evaluation

use crate::condition::Condition;
use crate::element::Element;
use crate::types::PropertyId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Rule category for grouping related rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Accessible name and localized control type
    Naming,
    /// Bounding rectangle sanity
    Geometry,
    /// Control patterns a control type is expected to support
    #[default]
    Patterns,
    /// Shape of the control and content views
    Structure,
    /// Parent, sibling and ancestor expectations
    Relationships,
}

impl RuleCategory {
    pub const ALL: [RuleCategory; 5] = [
        RuleCategory::Naming,
        RuleCategory::Geometry,
        RuleCategory::Patterns,
        RuleCategory::Structure,
        RuleCategory::Relationships,
    ];
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::Naming => write!(f, "naming"),
            RuleCategory::Geometry => write!(f, "geometry"),
            RuleCategory::Patterns => write!(f, "patterns"),
            RuleCategory::Structure => write!(f, "structure"),
            RuleCategory::Relationships => write!(f, "relationships"),
        }
    }
}

impl std::str::FromStr for RuleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "naming" | "name" => Ok(RuleCategory::Naming),
            "geometry" | "bounding" => Ok(RuleCategory::Geometry),
            "patterns" | "pattern" => Ok(RuleCategory::Patterns),
            "structure" => Ok(RuleCategory::Structure),
            "relationships" | "relationship" => Ok(RuleCategory::Relationships),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// Accessibility criterion a rule checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Standard {
    /// WCAG 1.1.1
    NonTextContent,
    /// WCAG 1.3.1
    #[default]
    InfoAndRelationships,
    /// WCAG 2.1.1
    Keyboard,
    /// WCAG 2.4.3
    FocusOrder,
    /// WCAG 2.4.6
    HeadingsAndLabels,
    /// WCAG 4.1.2
    NameRoleValue,
}

impl Standard {
    pub const ALL: [Standard; 6] = [
        Standard::NonTextContent,
        Standard::InfoAndRelationships,
        Standard::Keyboard,
        Standard::FocusOrder,
        Standard::HeadingsAndLabels,
        Standard::NameRoleValue,
    ];

    /// WCAG success criterion number
    pub fn criterion(self) -> &'static str {
        match self {
            Standard::NonTextContent => "1.1.1",
            Standard::InfoAndRelationships => "1.3.1",
            Standard::Keyboard => "2.1.1",
            Standard::FocusOrder => "2.4.3",
            Standard::HeadingsAndLabels => "2.4.6",
            Standard::NameRoleValue => "4.1.2",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Standard::NonTextContent => "Non-text Content",
            Standard::InfoAndRelationships => "Info and Relationships",
            Standard::Keyboard => "Keyboard",
            Standard::FocusOrder => "Focus Order",
            Standard::HeadingsAndLabels => "Headings and Labels",
            Standard::NameRoleValue => "Name, Role, Value",
        }
    }
}

impl fmt::Display for Standard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WCAG {} {}", self.criterion(), self.title())
    }
}

impl std::str::FromStr for Standard {
    type Err = String;

    /// Accepts a criterion number ("4.1.2") or a kebab-case name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Standard::ALL
            .into_iter()
            .find(|st| {
                st.criterion() == needle
                    || st.title().to_lowercase().replace([',', ' '], "-").replace("--", "-")
                        == needle
            })
            .ok_or_else(|| format!("Unknown standard: {}", s))
    }
}

/// Result of evaluating one rule on one element, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    NotApplicable,
    Pass,
    /// Needs a human to confirm
    Note,
    /// The rule could not decide, usually because data was missing
    Error,
    Fail,
}

impl Outcome {
    pub const ALL: [Outcome; 5] = [
        Outcome::NotApplicable,
        Outcome::Pass,
        Outcome::Note,
        Outcome::Error,
        Outcome::Fail,
    ];
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::NotApplicable => write!(f, "not applicable"),
            Outcome::Pass => write!(f, "pass"),
            Outcome::Note => write!(f, "note"),
            Outcome::Error => write!(f, "error"),
            Outcome::Fail => write!(f, "fail"),
        }
    }
}

/// Outcome plus optional explanatory messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
}

impl Evaluation {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            messages: Vec::new(),
        }
    }

    pub fn pass() -> Self {
        Self::new(Outcome::Pass)
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::new(Outcome::Fail).with_message(message)
    }

    pub fn note(message: impl Into<String>) -> Self {
        Self::new(Outcome::Note).with_message(message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Outcome::Error).with_message(message)
    }

    pub fn not_applicable() -> Self {
        Self::new(Outcome::NotApplicable)
    }

    /// Pass when `ok`, otherwise `otherwise`
    pub fn pass_or(ok: bool, otherwise: Outcome, message: impl Into<String>) -> Self {
        if ok {
            Self::pass()
        } else {
            Self::new(otherwise).with_message(message)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }
}

/// Data an evaluation function needed but the element does not carry
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MissingData {
    #[error("Property {0} is not available")]
    Absent(PropertyId),

    #[error("Property {id} is not a {expected}")]
    WrongType {
        id: PropertyId,
        expected: &'static str,
    },
}

impl From<MissingData> for Evaluation {
    fn from(missing: MissingData) -> Self {
        Evaluation::error(missing.to_string())
    }
}

/// Descriptive metadata of a rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleInfo {
    /// Unique rule identifier (e.g., "ButtonShouldHavePatterns")
    pub id: String,

    /// Description template
    #[serde(default)]
    pub description: String,

    /// How-to-fix template
    #[serde(default)]
    pub how_to_fix: String,

    #[serde(default)]
    pub standard: Standard,

    #[serde(default)]
    pub category: RuleCategory,

    /// Property the rule is mostly about, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<PropertyId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_url: Option<String>,
}

impl RuleInfo {
    /// Check the required text fields are filled in
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.id.trim().is_empty() {
            return Err("id is empty");
        }
        if self.description.trim().is_empty() {
            return Err("description is empty");
        }
        if self.how_to_fix.trim().is_empty() {
            return Err("how-to-fix is empty");
        }
        Ok(())
    }
}

/// Evaluation function of a rule
pub type EvaluateFn = dyn Fn(&Element<'_>) -> Result<Evaluation, MissingData> + Send + Sync;

/// An accessibility rule: metadata, an applicability condition and an
/// evaluation function
pub struct Rule {
    info: RuleInfo,
    condition: Condition,
    evaluate: Box<EvaluateFn>,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("info", &self.info)
            .field("condition", &self.condition.to_string())
            .finish_non_exhaustive()
    }
}

impl Rule {
    /// Create a rule with its applicability condition and evaluation function
    pub fn new<F>(id: &str, condition: Condition, evaluate: F) -> Self
    where
        F: Fn(&Element<'_>) -> Result<Evaluation, MissingData> + Send + Sync + 'static,
    {
        Self {
            info: RuleInfo {
                id: id.to_string(),
                ..RuleInfo::default()
            },
            condition,
            evaluate: Box::new(evaluate),
        }
    }

    /// Rule whose outcome is `Pass` when `check` holds and `otherwise` when not
    pub fn check<F>(id: &str, condition: Condition, otherwise: Outcome, check: F) -> Self
    where
        F: Fn(&Element<'_>) -> Result<bool, MissingData> + Send + Sync + 'static,
    {
        Self::new(id, condition, move |e| {
            let ok = check(e)?;
            Ok(if ok {
                Evaluation::pass()
            } else {
                Evaluation::new(otherwise)
            })
        })
    }

    /// Set the description template
    pub fn with_description(mut self, description: &str) -> Self {
        self.info.description = description.to_string();
        self
    }

    /// Set the how-to-fix template
    pub fn with_how_to_fix(mut self, how_to_fix: &str) -> Self {
        self.info.how_to_fix = how_to_fix.to_string();
        self
    }

    pub fn with_standard(mut self, standard: Standard) -> Self {
        self.info.standard = standard;
        self
    }

    pub fn with_category(mut self, category: RuleCategory) -> Self {
        self.info.category = category;
        self
    }

    pub fn with_property(mut self, property: PropertyId) -> Self {
        self.info.property = Some(property);
        self
    }

    /// Set documentation URL
    pub fn with_help_url(mut self, url: &str) -> Self {
        self.info.help_url = Some(url.to_string());
        self
    }

    pub fn id(&self) -> &str {
        &self.info.id
    }

    pub fn info(&self) -> &RuleInfo {
        &self.info
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    pub fn is_applicable(&self, element: &Element<'_>) -> bool {
        self.condition.matches(element)
    }

    /// Run the evaluation function. Missing data becomes an `Error` outcome.
    pub fn evaluate(&self, element: &Element<'_>) -> Evaluation {
        (self.evaluate)(element).unwrap_or_else(Evaluation::from)
    }
}

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder regex is valid")
});

/// Replace `{key}` placeholders with values from `params`.
/// Unknown placeholders are left as they are.
pub fn render_template(template: &str, params: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures<'_>| {
            let key = &caps[1];
            params
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
