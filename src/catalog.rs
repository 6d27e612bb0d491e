//! Rule catalog
//!
//! Rules are registered once through a [`CatalogBuilder`], checked for
//! duplicate ids, malformed conditions and missing metadata, then frozen into
//! a [`Catalog`]. Queries always return rules in registration order.

use crate::condition::ConditionError;
use crate::element::Element;
use crate::rule::Rule;
use std::collections::HashMap;
use thiserror::Error;

/// Error while registering a rule
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Rule '{0}' is already registered")]
    DuplicateRuleId(String),

    #[error("Rule '{id}' has a malformed condition: {source}")]
    MalformedCondition {
        id: String,
        #[source]
        source: ConditionError,
    },

    #[error("Rule '{id}' has invalid metadata: {reason}")]
    InvalidMetadata { id: String, reason: String },
}

/// Collects rules before the catalog is frozen
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    rules: Vec<Rule>,
    index: HashMap<String, usize>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule after it is the last one in order
    pub fn register(&mut self, rule: Rule) -> Result<&mut Self, CatalogError> {
        let id = rule.id().to_string();

        rule.info()
            .validate()
            .map_err(|reason| CatalogError::InvalidMetadata {
                id: id.clone(),
                reason: reason.to_string(),
            })?;

        if self.index.contains_key(&id) {
            return Err(CatalogError::DuplicateRuleId(id));
        }

        rule.condition()
            .validate()
            .map_err(|source| CatalogError::MalformedCondition {
                id: id.clone(),
                source,
            })?;

        log::debug!("Registered rule {}", id);
        self.index.insert(id, self.rules.len());
        self.rules.push(rule);
        Ok(self)
    }

    /// Register several rules, stopping at the first error
    pub fn register_all(
        &mut self,
        rules: impl IntoIterator<Item = Rule>,
    ) -> Result<&mut Self, CatalogError> {
        for rule in rules {
            self.register(rule)?;
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Freeze the catalog
    pub fn finalize(self) -> Catalog {
        Catalog {
            rules: self.rules,
            index: self.index,
        }
    }
}

/// Immutable set of rules, shareable across threads
#[derive(Debug)]
pub struct Catalog {
    rules: Vec<Rule>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Rules whose applicability condition holds, in registration order
    pub fn applicable_rules(&self, element: &Element<'_>) -> Vec<&Rule> {
        self.rules
            .iter()
            .filter(|r| r.is_applicable(element))
            .collect()
    }

    pub fn applicable_rule_ids(&self, element: &Element<'_>) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|r| r.is_applicable(element))
            .map(Rule::id)
            .collect()
    }

    /// Get a rule by id (exact match)
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.index.get(id).map(|&i| &self.rules[i])
    }

    /// Position of a rule in registration order
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
