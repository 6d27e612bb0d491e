//! Integration tests for a11y-scan

use a11y_scan::{
    condition::Condition,
    config::Config,
    element::{ElementData, ElementTree},
    output::{JsonFormatter, OutputFormatter, TextFormatter},
    rule::{Evaluation, Outcome, Rule, RuleCategory},
    rules::builtin_catalog,
    types::{ControlType, PatternId, PropertyId, Rect},
    CancellationToken, Catalog, CatalogBuilder, CatalogError, ScanError, ScanReport, Scanner,
};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn scan(catalog: &Catalog, tree: &ElementTree) -> ScanReport {
    Scanner::new(catalog).sequential().scan(tree.root()).unwrap()
}

fn outcome_of(report: &ScanReport, rule_id: &str) -> Option<Outcome> {
    report
        .results
        .iter()
        .find(|r| r.rule_id == rule_id)
        .map(|r| r.outcome)
}

fn button(patterns: &[PatternId]) -> ElementTree {
    ElementTree::from_root(
        ElementData::new(ControlType::Button)
            .with_name("Save")
            .with_patterns(patterns),
    )
}

fn simple_rule(id: &str, condition: Condition) -> Rule {
    Rule::new(id, condition, |_| Ok(Evaluation::pass()))
        .with_description("Test rule")
        .with_how_to_fix("Nothing to fix")
}

#[test]
fn test_button_patterns_scenarios() {
    let catalog = builtin_catalog().unwrap();

    let cases: [(&[PatternId], Outcome); 4] = [
        (&[PatternId::Invoke], Outcome::Pass),
        (&[], Outcome::Fail),
        (&[PatternId::ExpandCollapse], Outcome::Pass),
        (&[PatternId::Toggle, PatternId::Invoke], Outcome::Pass),
    ];

    for (patterns, expected) in cases {
        let report = scan(&catalog, &button(patterns));
        assert_eq!(
            outcome_of(&report, "ButtonShouldHavePatterns"),
            Some(expected),
            "patterns {:?}",
            patterns
        );
    }

    let report = scan(&catalog, &button(&[]));
    let failure = report.failures().next().unwrap();
    assert_eq!(failure.rule_id, "ButtonShouldHavePatterns");
    assert_eq!(
        failure.messages,
        vec!["Button does not support Invoke or Toggle or ExpandCollapse".to_string()]
    );
}

#[test]
fn test_invoke_and_toggle_reported_separately() {
    let catalog = builtin_catalog().unwrap();
    let report = scan(&catalog, &button(&[PatternId::Toggle, PatternId::Invoke]));
    assert_eq!(
        outcome_of(&report, "ButtonInvokeAndTogglePatterns"),
        Some(Outcome::Fail)
    );
}

#[test]
fn test_tree_structure_scenario() {
    let catalog = builtin_catalog().unwrap();
    let tree = ElementTree::from_root(
        ElementData::new(ControlType::Tree).with_child(
            ElementData::new(ControlType::TreeItem)
                .with_name("Documents")
                .with_child(ElementData::new(ControlType::Text).with_name("Documents")),
        ),
    );
    let report = scan(&catalog, &tree);

    let elements: Vec<_> = tree.iter().collect();
    let item = elements[1].id();
    let for_item = |rule_id: &str| {
        report
            .results_for(item)
            .find(|r| r.rule_id == rule_id)
            .map(|r| r.outcome)
    };

    assert_eq!(for_item("ContentViewTreeItemStructure"), Some(Outcome::Pass));
    assert_eq!(for_item("TreeItemWithinTree"), Some(Outcome::Pass));
    assert_eq!(
        outcome_of(&report, "ControlViewTreeStructure"),
        Some(Outcome::Pass)
    );

    // tree rules never apply to the text leaf
    let text = elements[2].id();
    assert!(report
        .results_for(text)
        .all(|r| !r.rule_id.starts_with("ControlViewTree")));
}

#[test]
fn test_content_view_note_for_unexpected_child() {
    let catalog = builtin_catalog().unwrap();
    let tree = ElementTree::from_root(
        ElementData::new(ControlType::Tree).with_child(
            ElementData::new(ControlType::TreeItem)
                .with_name("Documents")
                .with_child(ElementData::new(ControlType::Slider)),
        ),
    );
    let report = scan(&catalog, &tree);
    assert_eq!(
        outcome_of(&report, "ContentViewTreeItemStructure"),
        Some(Outcome::Note)
    );
    let item = tree.iter().nth(1).unwrap().id();
    assert_eq!(report.element_status(item), Some(Outcome::Note));
}

#[test]
fn test_wpf_text_parent_rectangle() {
    let catalog = builtin_catalog().unwrap();
    let wpf_text = |rect: Option<Rect>| {
        let mut text = ElementData::new(ControlType::Text);
        if let Some(rect) = rect {
            text = text.with_rect(rect);
        }
        ElementTree::from_root(
            ElementData::new(ControlType::Pane)
                .with_property(PropertyId::FrameworkId, "WPF")
                .with_child(text),
        )
    };

    let report = scan(&catalog, &wpf_text(Some(Rect::new(0, 0, 2, 2))));
    assert_eq!(
        outcome_of(&report, "BoundingRectangleOnWPFTextParent"),
        Some(Outcome::Pass)
    );

    let report = scan(&catalog, &wpf_text(None));
    let outcome = outcome_of(&report, "BoundingRectangleOnWPFTextParent").unwrap();
    assert_ne!(outcome, Outcome::Pass);
}

#[test]
fn test_catalog_order_is_stable() {
    let mut builder = CatalogBuilder::new();
    builder
        .register(simple_rule("R1", Condition::always()))
        .unwrap()
        .register(simple_rule("R2", Condition::control_type(ControlType::Button)))
        .unwrap()
        .register(simple_rule("R3", Condition::always()))
        .unwrap();
    let catalog = builder.finalize();

    let tree = button(&[]);
    let root = tree.root();
    for _ in 0..3 {
        assert_eq!(catalog.applicable_rule_ids(&root), vec!["R1", "R2", "R3"]);
    }

    let report = scan(&catalog, &tree);
    let ids: Vec<_> = report.results.iter().map(|r| r.rule_id.as_str()).collect();
    assert_eq!(ids, vec!["R1", "R2", "R3"]);
}

#[test]
fn test_duplicate_rule_rejected() {
    let mut builder = CatalogBuilder::new();
    builder.register(simple_rule("R1", Condition::always())).unwrap();
    let err = builder
        .register(simple_rule("R1", Condition::never()))
        .unwrap_err();
    assert_eq!(err, CatalogError::DuplicateRuleId("R1".to_string()));
}

#[test]
fn test_applicability_gate() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut builder = CatalogBuilder::new();
    builder
        .register(
            Rule::new("CountButtons", Condition::control_type(ControlType::Button), move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Evaluation::pass())
            })
            .with_description("Counts evaluations")
            .with_how_to_fix("Nothing to fix"),
        )
        .unwrap();
    let catalog = builder.finalize();

    let tree = ElementTree::from_root(
        ElementData::new(ControlType::Window)
            .with_child(ElementData::new(ControlType::Button))
            .with_child(ElementData::new(ControlType::Text))
            .with_child(ElementData::new(ControlType::Button)),
    );
    let report = Scanner::new(&catalog).scan(tree.root()).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.elements_visited, 4);
}

#[test]
fn test_fault_isolation() {
    let mut builder = CatalogBuilder::new();
    builder
        .register(
            Rule::new("Explodes", Condition::control_type(ControlType::Button), |e| {
                if e.name() == Some("bad") {
                    panic!("cannot evaluate");
                }
                Ok(Evaluation::pass())
            })
            .with_description("Panics on one element")
            .with_how_to_fix("Nothing to fix"),
        )
        .unwrap()
        .register(simple_rule("Steady", Condition::always()))
        .unwrap();
    let catalog = builder.finalize();

    let tree = ElementTree::from_root(
        ElementData::new(ControlType::Window)
            .with_child(ElementData::new(ControlType::Button).with_name("bad"))
            .with_child(ElementData::new(ControlType::Button).with_name("good")),
    );
    let report = Scanner::new(&catalog).scan(tree.root()).unwrap();

    let exploded: Vec<_> = report
        .results
        .iter()
        .filter(|r| r.rule_id == "Explodes")
        .map(|r| r.outcome)
        .collect();
    assert_eq!(exploded, vec![Outcome::Error, Outcome::Pass]);
    assert_eq!(report.error_count, 1);
    assert!(report
        .results
        .iter()
        .filter(|r| r.rule_id == "Steady")
        .all(|r| r.outcome == Outcome::Pass));
}

fn dialog() -> ElementTree {
    ElementTree::from_root(
        ElementData::new(ControlType::Window)
            .with_name("Settings")
            .with_property(PropertyId::IsControlElement, true)
            .with_rect(Rect::from_size(0, 0, 400, 300))
            .with_child(
                ElementData::new(ControlType::List)
                    .with_property(PropertyId::IsControlElement, true)
                    .with_rect(Rect::from_size(10, 10, 200, 200))
                    .with_child(
                        ElementData::new(ControlType::ListItem)
                            .with_name("General")
                            .with_pattern(PatternId::SelectionItem),
                    )
                    .with_child(ElementData::new(ControlType::ListItem).with_name("")),
            )
            .with_child(
                ElementData::new(ControlType::Button)
                    .with_name("OK button")
                    .with_property(PropertyId::IsControlElement, true)
                    .with_rect(Rect::from_size(500, 10, 80, 24)),
            )
            .with_child(ElementData::new(ControlType::Tab)),
    )
}

#[test]
fn test_scan_is_deterministic() {
    let catalog = builtin_catalog().unwrap();
    let tree = dialog();
    let first = scan(&catalog, &tree);
    let second = scan(&catalog, &tree);
    assert_eq!(first.results, second.results);
    assert!(first.has_failures());
    assert_eq!(first.exit_code(), 2);
}

#[test]
fn test_parallel_scan_matches_sequential() {
    let catalog = builtin_catalog().unwrap();
    let tree = dialog();
    let sequential = scan(&catalog, &tree);

    let mut config = Config::default();
    config.engine.jobs = 4;
    let parallel = Scanner::new(&catalog)
        .with_config(config)
        .scan(tree.root())
        .unwrap();

    assert_eq!(sequential.results, parallel.results);
    assert_eq!(sequential.fail_count, parallel.fail_count);
}

#[test]
fn test_cancellation() {
    let catalog = builtin_catalog().unwrap();
    let tree = dialog();
    let token = CancellationToken::new();
    let scanner = Scanner::new(&catalog).with_cancellation(token.clone());

    assert!(scanner.scan(tree.root()).is_ok());
    token.cancel();
    assert_eq!(scanner.scan(tree.root()).unwrap_err(), ScanError::Cancelled);
}

#[test]
fn test_preset_limits_rules() {
    let catalog = builtin_catalog().unwrap();
    let tree = dialog();
    let config = Config::preset("minimal").unwrap();
    let report = Scanner::new(&catalog)
        .with_config(config)
        .scan(tree.root())
        .unwrap();

    for result in &report.results {
        let category = catalog.get(&result.rule_id).unwrap().info().category;
        assert!(matches!(category, RuleCategory::Naming | RuleCategory::Patterns));
    }
    assert!(outcome_of(&report, "ControlViewTabStructure").is_none());
}

#[test]
fn test_report_formatting() {
    let catalog = builtin_catalog().unwrap();
    let tree = dialog();
    let mut report = scan(&catalog, &tree);

    let tab = tree.iter().last().unwrap().id();
    assert!(report.assign_tracking_id("ControlViewTabStructure", tab, "BUG-42"));

    let text = TextFormatter::new().without_color().format(&report);
    assert!(text.contains("fail ControlViewTabStructure"));
    assert!(text.contains("tracked as BUG-42"));
    assert!(text.contains("6 elements scanned"));

    let json: serde_json::Value =
        serde_json::from_str(&JsonFormatter::new().format(&report)).unwrap();
    assert_eq!(json["summary"]["elements_visited"], 6);
    assert_eq!(
        json["summary"]["fail_count"].as_u64().unwrap() as usize,
        report.fail_count
    );
}
