//! a11y-scan - Accessibility rule evaluation engine
//!
//! Evaluates a catalog of accessibility rules over a captured UI element tree.
//!
//! # Architecture
//!
//! ```text
//! ElementTree -> Condition -> Rule -> Catalog -> Scanner -> ScanReport
//! ```
//!
//! Each rule pairs an applicability [`Condition`] with an evaluation function.
//! The [`Scanner`] walks a subtree in pre-order, asks the [`Catalog`] which
//! rules apply to each element and collects one [`ScanResult`] per evaluation.
//!
//! # Example
//!
//! ```
//! use a11y_scan::element::{ElementData, ElementTree};
//! use a11y_scan::rules::builtin_catalog;
//! use a11y_scan::types::{ControlType, PatternId};
//! use a11y_scan::{Outcome, Scanner};
//!
//! let tree = ElementTree::from_root(
//!     ElementData::new(ControlType::Button)
//!         .with_name("OK")
//!         .with_pattern(PatternId::Invoke),
//! );
//! let catalog = builtin_catalog().unwrap();
//! let report = Scanner::new(&catalog).scan(tree.root()).unwrap();
//!
//! let button = report
//!     .results
//!     .iter()
//!     .find(|r| r.rule_id == "ButtonShouldHavePatterns")
//!     .unwrap();
//! assert_eq!(button.outcome, Outcome::Pass);
//! ```

pub mod catalog;
pub mod condition;
pub mod config;
pub mod element;
pub mod output;
pub mod report;
pub mod rule;
pub mod rules;
pub mod scan;
pub mod types;

// Re-export main types
pub use catalog::{Catalog, CatalogBuilder, CatalogError};
pub use condition::{Condition, ConditionError};
pub use config::Config;
pub use element::{Element, ElementData, ElementId, ElementTree, TreeBuilder, TreeError};
pub use output::{JsonFormatter, OutputFormatter, TextFormatter};
pub use report::{RuleTiming, ScanReport, ScanResult};
pub use rule::{Evaluation, MissingData, Outcome, Rule, RuleCategory, RuleInfo, Standard};
pub use scan::{CancellationToken, ScanError, Scanner};
pub use types::{ControlType, PatternId, PropertyId, Rect, Value};
