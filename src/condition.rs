//! Condition algebra over elements
//!
//! A [`Condition`] is an immutable predicate tree. Leaves test a property,
//! the pattern set or the child count of an element; inner nodes combine
//! conditions with boolean logic or move the subject to a related element
//! (parent, nearest matching ancestor, children, descendants, siblings).
//!
//! Relations only walk the arena toward the root or toward the leaves, and a
//! condition tree is finite, so evaluation always terminates.
//!
//! ```
//! use a11y_scan::condition::Condition;
//! use a11y_scan::types::{ControlType, PatternId};
//!
//! let clickable_button = Condition::control_type(ControlType::Button)
//!     & Condition::any_pattern(&[PatternId::Invoke, PatternId::Toggle]);
//! assert!(clickable_button.validate().is_ok());
//! ```

use crate::element::Element;
use crate::types::{ControlType, PatternId, PropertyId, Value};
use regex::Regex;
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use thiserror::Error;

/// Maximum nesting depth accepted by [`Condition::validate`]
pub const MAX_CONDITION_DEPTH: usize = 64;

/// Malformed condition, detected before first use
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConditionError {
    #[error("Invalid regex '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },

    #[error("Empty value set for property {0}")]
    EmptyValueSet(PropertyId),

    #[error("Empty pattern set")]
    EmptyPatternSet,

    #[error("Zero bitmask for property {0}")]
    ZeroMask(PropertyId),

    #[error("Descendant search depth must be at least 1")]
    ZeroSearchDepth,

    #[error("Condition nesting exceeds {0} levels")]
    TooDeep(usize),
}

/// Numeric comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Comparison {
    pub fn test<T: PartialOrd>(self, lhs: T, rhs: T) -> bool {
        match self {
            Comparison::Lt => lhs < rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Gt => lhs > rhs,
            Comparison::Ge => lhs >= rhs,
            Comparison::Eq => lhs == rhs,
            Comparison::Ne => lhs != rhs,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
            Comparison::Eq => "==",
            Comparison::Ne => "!=",
        }
    }
}

/// Test applied to a present property value
#[derive(Debug, Clone)]
pub enum ValueTest {
    /// Property is present
    Exists,
    Equals(Value),
    NotEquals(Value),
    OneOf(Vec<Value>),
    /// Integer comparison against a literal
    Compare(Comparison, i64),
    /// Every bit of the mask is set
    BitsSet(i64),
    /// String matches the regex
    Matches(Regex),
    /// String contains a non-whitespace character
    NotBlank,
}

impl ValueTest {
    fn matches(&self, value: &Value) -> bool {
        match self {
            ValueTest::Exists => true,
            ValueTest::Equals(expected) => value == expected,
            ValueTest::NotEquals(expected) => value != expected,
            ValueTest::OneOf(values) => values.contains(value),
            ValueTest::Compare(op, rhs) => value.as_int().is_some_and(|lhs| op.test(lhs, *rhs)),
            ValueTest::BitsSet(mask) => value.as_int().is_some_and(|v| v & mask == *mask),
            ValueTest::Matches(re) => value.as_str().is_some_and(|s| re.is_match(s)),
            ValueTest::NotBlank => value.as_str().is_some_and(|s| !s.trim().is_empty()),
        }
    }
}

/// Test on the supported pattern set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternTest {
    Has(PatternId),
    AnyOf(Vec<PatternId>),
    AllOf(Vec<PatternId>),
}

impl PatternTest {
    fn matches(&self, element: &Element<'_>) -> bool {
        match self {
            PatternTest::Has(p) => element.has_pattern(*p),
            PatternTest::AnyOf(ps) => ps.iter().any(|p| element.has_pattern(*p)),
            PatternTest::AllOf(ps) => ps.iter().all(|p| element.has_pattern(*p)),
        }
    }
}

/// Element the inner condition of a relational condition is applied to
#[derive(Debug, Clone)]
pub enum Relation {
    Parent,
    /// Nearest ancestor satisfying the predicate
    NearestAncestor(Box<Condition>),
    AnyChild,
    AllChildren,
    /// `None` searches the whole subtree
    AnyDescendant { max_depth: Option<usize> },
    AnySibling,
}

/// Composable predicate over elements
#[derive(Debug, Clone)]
pub enum Condition {
    Constant(bool),
    Property { id: PropertyId, test: ValueTest },
    Pattern(PatternTest),
    ChildCount(Comparison, usize),
    Not(Box<Condition>),
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Related {
        relation: Relation,
        inner: Box<Condition>,
    },
}

impl Condition {
    pub fn always() -> Self {
        Condition::Constant(true)
    }

    pub fn never() -> Self {
        Condition::Constant(false)
    }

    pub fn property(id: PropertyId, test: ValueTest) -> Self {
        Condition::Property { id, test }
    }

    pub fn exists(id: PropertyId) -> Self {
        Self::property(id, ValueTest::Exists)
    }

    pub fn equals(id: PropertyId, value: impl Into<Value>) -> Self {
        Self::property(id, ValueTest::Equals(value.into()))
    }

    /// Present and different from `value`. An absent property never matches.
    pub fn not_equals(id: PropertyId, value: impl Into<Value>) -> Self {
        Self::property(id, ValueTest::NotEquals(value.into()))
    }

    pub fn one_of(id: PropertyId, values: Vec<Value>) -> Self {
        Self::property(id, ValueTest::OneOf(values))
    }

    pub fn compare(id: PropertyId, op: Comparison, value: i64) -> Self {
        Self::property(id, ValueTest::Compare(op, value))
    }

    pub fn bits_set(id: PropertyId, mask: i64) -> Self {
        Self::property(id, ValueTest::BitsSet(mask))
    }

    /// String property matching `pattern`; the regex is compiled here
    pub fn property_matches(id: PropertyId, pattern: &str) -> Result<Self, ConditionError> {
        let re = Regex::new(pattern).map_err(|e| ConditionError::InvalidRegex {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::property(id, ValueTest::Matches(re)))
    }

    pub fn not_blank(id: PropertyId) -> Self {
        Self::property(id, ValueTest::NotBlank)
    }

    /// Boolean property equal to `true`
    pub fn is_true(id: PropertyId) -> Self {
        Self::equals(id, true)
    }

    pub fn control_type(control_type: ControlType) -> Self {
        Self::equals(PropertyId::ControlType, control_type)
    }

    pub fn control_type_in(types: &[ControlType]) -> Self {
        Self::one_of(
            PropertyId::ControlType,
            types.iter().copied().map(Value::ControlType).collect(),
        )
    }

    pub fn has_pattern(pattern: PatternId) -> Self {
        Condition::Pattern(PatternTest::Has(pattern))
    }

    pub fn any_pattern(patterns: &[PatternId]) -> Self {
        Condition::Pattern(PatternTest::AnyOf(patterns.to_vec()))
    }

    pub fn all_patterns(patterns: &[PatternId]) -> Self {
        Condition::Pattern(PatternTest::AllOf(patterns.to_vec()))
    }

    pub fn child_count(op: Comparison, count: usize) -> Self {
        Condition::ChildCount(op, count)
    }

    pub fn no_children() -> Self {
        Self::child_count(Comparison::Eq, 0)
    }

    /// Conjunction; empty is vacuously true
    pub fn and(conditions: Vec<Condition>) -> Self {
        Condition::And(conditions)
    }

    /// Disjunction; empty is vacuously false
    pub fn or(conditions: Vec<Condition>) -> Self {
        Condition::Or(conditions)
    }

    pub fn negate(condition: Condition) -> Self {
        Condition::Not(Box::new(condition))
    }

    fn related(relation: Relation, inner: Condition) -> Self {
        Condition::Related {
            relation,
            inner: Box::new(inner),
        }
    }

    /// `inner` on the parent; false at the root
    pub fn on_parent(inner: Condition) -> Self {
        Self::related(Relation::Parent, inner)
    }

    /// `inner` on the nearest ancestor satisfying `predicate`; false if none
    pub fn on_nearest_ancestor(predicate: Condition, inner: Condition) -> Self {
        Self::related(Relation::NearestAncestor(Box::new(predicate)), inner)
    }

    /// Some direct child satisfies `inner`; false without children
    pub fn on_any_child(inner: Condition) -> Self {
        Self::related(Relation::AnyChild, inner)
    }

    /// Every direct child satisfies `inner`; true without children
    pub fn on_all_children(inner: Condition) -> Self {
        Self::related(Relation::AllChildren, inner)
    }

    /// Some descendant anywhere in the subtree satisfies `inner`; false on a leaf
    pub fn on_any_descendant(inner: Condition) -> Self {
        Self::related(Relation::AnyDescendant { max_depth: None }, inner)
    }

    /// Some descendant at most `max_depth` levels below satisfies `inner`
    pub fn on_any_descendant_within(max_depth: usize, inner: Condition) -> Self {
        Self::related(
            Relation::AnyDescendant {
                max_depth: Some(max_depth),
            },
            inner,
        )
    }

    /// Some other child of the parent satisfies `inner`; false at the root
    pub fn on_any_sibling(inner: Condition) -> Self {
        Self::related(Relation::AnySibling, inner)
    }

    /// Evaluate against an element
    pub fn matches(&self, element: &Element<'_>) -> bool {
        match self {
            Condition::Constant(b) => *b,
            Condition::Property { id, test } => {
                if *id == PropertyId::ControlType {
                    return test.matches(&Value::ControlType(element.control_type()));
                }
                element.property(*id).is_some_and(|v| test.matches(v))
            }
            Condition::Pattern(test) => test.matches(element),
            Condition::ChildCount(op, count) => op.test(element.child_count(), *count),
            Condition::Not(inner) => !inner.matches(element),
            Condition::And(conditions) => conditions.iter().all(|c| c.matches(element)),
            Condition::Or(conditions) => conditions.iter().any(|c| c.matches(element)),
            Condition::Related { relation, inner } => match relation {
                Relation::Parent => element.parent().is_some_and(|p| inner.matches(&p)),
                Relation::NearestAncestor(predicate) => element
                    .ancestors()
                    .find(|a| predicate.matches(a))
                    .is_some_and(|a| inner.matches(&a)),
                Relation::AnyChild => element.children().any(|c| inner.matches(&c)),
                Relation::AllChildren => element.children().all(|c| inner.matches(&c)),
                Relation::AnyDescendant { max_depth } => {
                    any_descendant(element, inner, *max_depth)
                }
                Relation::AnySibling => element.siblings().any(|s| inner.matches(&s)),
            },
        }
    }

    /// Check the condition is well formed
    pub fn validate(&self) -> Result<(), ConditionError> {
        self.validate_at(1)
    }

    fn validate_at(&self, depth: usize) -> Result<(), ConditionError> {
        if depth > MAX_CONDITION_DEPTH {
            return Err(ConditionError::TooDeep(MAX_CONDITION_DEPTH));
        }

        match self {
            Condition::Constant(_) | Condition::ChildCount(..) => Ok(()),
            Condition::Property { id, test } => match test {
                ValueTest::OneOf(values) if values.is_empty() => {
                    Err(ConditionError::EmptyValueSet(*id))
                }
                ValueTest::BitsSet(0) => Err(ConditionError::ZeroMask(*id)),
                _ => Ok(()),
            },
            Condition::Pattern(test) => match test {
                PatternTest::AnyOf(ps) | PatternTest::AllOf(ps) if ps.is_empty() => {
                    Err(ConditionError::EmptyPatternSet)
                }
                _ => Ok(()),
            },
            Condition::Not(inner) => inner.validate_at(depth + 1),
            Condition::And(conditions) | Condition::Or(conditions) => conditions
                .iter()
                .try_for_each(|c| c.validate_at(depth + 1)),
            Condition::Related { relation, inner } => {
                match relation {
                    Relation::NearestAncestor(predicate) => predicate.validate_at(depth + 1)?,
                    Relation::AnyDescendant { max_depth: Some(0) } => {
                        return Err(ConditionError::ZeroSearchDepth)
                    }
                    _ => {}
                }
                inner.validate_at(depth + 1)
            }
        }
    }
}

/// Depth-first search below `element`, at most `max_depth` levels down
fn any_descendant(element: &Element<'_>, inner: &Condition, max_depth: Option<usize>) -> bool {
    let mut stack: Vec<(Element<'_>, usize)> = element.children().map(|c| (c, 1)).collect();

    while let Some((current, level)) = stack.pop() {
        if inner.matches(&current) {
            return true;
        }
        if max_depth.map_or(true, |max| level < max) {
            stack.extend(current.children().map(|c| (c, level + 1)));
        }
    }

    false
}

impl BitAnd for Condition {
    type Output = Condition;

    fn bitand(self, rhs: Condition) -> Condition {
        let mut conditions = match self {
            Condition::And(v) => v,
            other => vec![other],
        };
        match rhs {
            Condition::And(v) => conditions.extend(v),
            other => conditions.push(other),
        }
        Condition::And(conditions)
    }
}

impl BitOr for Condition {
    type Output = Condition;

    fn bitor(self, rhs: Condition) -> Condition {
        let mut conditions = match self {
            Condition::Or(v) => v,
            other => vec![other],
        };
        match rhs {
            Condition::Or(v) => conditions.extend(v),
            other => conditions.push(other),
        }
        Condition::Or(conditions)
    }
}

impl Not for Condition {
    type Output = Condition;

    fn not(self) -> Condition {
        Condition::negate(self)
    }
}

fn join(f: &mut fmt::Formatter<'_>, conditions: &[Condition], op: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, c) in conditions.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", op)?;
        }
        write!(f, "{}", c)?;
    }
    write!(f, ")")
}

fn pattern_list(patterns: &[PatternId]) -> String {
    patterns
        .iter()
        .map(|p| p.name())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Constant(b) => write!(f, "{}", b),
            Condition::Property { id, test } => match test {
                ValueTest::Exists => write!(f, "{} exists", id),
                ValueTest::Equals(v) => write!(f, "{} == {}", id, v),
                ValueTest::NotEquals(v) => write!(f, "{} != {}", id, v),
                ValueTest::OneOf(vs) => {
                    let parts: Vec<String> = vs.iter().map(|v| v.to_string()).collect();
                    write!(f, "{} in [{}]", id, parts.join(", "))
                }
                ValueTest::Compare(op, n) => write!(f, "{} {} {}", id, op.symbol(), n),
                ValueTest::BitsSet(mask) => write!(f, "{} & {:#x}", id, mask),
                ValueTest::Matches(re) => write!(f, "{} =~ /{}/", id, re.as_str()),
                ValueTest::NotBlank => write!(f, "{} not blank", id),
            },
            Condition::Pattern(test) => match test {
                PatternTest::Has(p) => write!(f, "has {}", p),
                PatternTest::AnyOf(ps) => write!(f, "has any of [{}]", pattern_list(ps)),
                PatternTest::AllOf(ps) => write!(f, "has all of [{}]", pattern_list(ps)),
            },
            Condition::ChildCount(op, n) => write!(f, "children {} {}", op.symbol(), n),
            Condition::Not(inner) => write!(f, "!{}", inner),
            Condition::And(cs) if cs.is_empty() => write!(f, "true"),
            Condition::Or(cs) if cs.is_empty() => write!(f, "false"),
            Condition::And(cs) => join(f, cs, "&&"),
            Condition::Or(cs) => join(f, cs, "||"),
            Condition::Related { relation, inner } => match relation {
                Relation::Parent => write!(f, "parent({})", inner),
                Relation::NearestAncestor(p) => {
                    write!(f, "nearestAncestor({}; {})", p, inner)
                }
                Relation::AnyChild => write!(f, "anyChild({})", inner),
                Relation::AllChildren => write!(f, "allChildren({})", inner),
                Relation::AnyDescendant { max_depth: None } => {
                    write!(f, "anyDescendant({})", inner)
                }
                Relation::AnyDescendant {
                    max_depth: Some(depth),
                } => write!(f, "anyDescendant[{}]({})", depth, inner),
                Relation::AnySibling => write!(f, "anySibling({})", inner),
            },
        }
    }
}
