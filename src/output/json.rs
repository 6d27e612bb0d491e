//! JSON output formatter

use super::OutputFormatter;
use crate::report::{ScanReport, ScanResult};
use crate::rule::Outcome;
use serde::Serialize;

/// JSON formatter for machine-readable output
#[derive(Default)]
pub struct JsonFormatter {
    /// Pretty print with indentation
    pub pretty: bool,

    /// Also emit passing and not-applicable results
    pub verbose: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable pretty printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    fn render<T: Serialize>(&self, value: &T) -> String {
        if self.pretty {
            serde_json::to_string_pretty(value).unwrap_or_default()
        } else {
            serde_json::to_string(value).unwrap_or_default()
        }
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    results: Vec<&'a ScanResult>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonSummary {
    elements_visited: usize,
    pass_count: usize,
    fail_count: usize,
    note_count: usize,
    error_count: usize,
    not_applicable_count: usize,
    duration_ms: u128,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &ScanReport) -> String {
        let results = report
            .results
            .iter()
            .filter(|r| self.verbose || !matches!(r.outcome, Outcome::Pass | Outcome::NotApplicable))
            .collect();

        let output = JsonOutput {
            results,
            summary: JsonSummary {
                elements_visited: report.elements_visited,
                pass_count: report.pass_count,
                fail_count: report.fail_count,
                note_count: report.note_count,
                error_count: report.error_count,
                not_applicable_count: report.not_applicable_count,
                duration_ms: report.duration.as_millis(),
            },
        };

        self.render(&output)
    }

    fn format_result(&self, result: &ScanResult) -> String {
        self.render(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementData, ElementTree};
    use crate::rule::Evaluation;
    use crate::types::ControlType;
    use std::time::Duration;

    fn report() -> ScanReport {
        let tree = ElementTree::from_root(ElementData::new(ControlType::Button).with_name("OK"));
        let mut report = ScanReport {
            elements_visited: 1,
            ..ScanReport::default()
        };
        report.record(
            ScanResult::new("NameNotNull", &tree.root(), Evaluation::pass()),
            Duration::ZERO,
        );
        report.record(
            ScanResult::new("ButtonShouldHavePatterns", &tree.root(), Evaluation::fail("no Invoke")),
            Duration::ZERO,
        );
        report
    }

    #[test]
    fn test_json_format_result() {
        let formatter = JsonFormatter::new();
        let report = report();
        let output = formatter.format_result(&report.results[1]);
        assert!(output.contains("\"rule_id\":\"ButtonShouldHavePatterns\""));
        assert!(output.contains("\"outcome\":\"fail\""));
        assert!(output.contains("\"messages\":[\"no Invoke\"]"));
    }

    #[test]
    fn test_json_format_report() {
        let formatter = JsonFormatter::new();
        let value: serde_json::Value = serde_json::from_str(&formatter.format(&report())).unwrap();
        assert_eq!(value["results"].as_array().unwrap().len(), 1);
        assert_eq!(value["summary"]["fail_count"], 1);
        assert_eq!(value["summary"]["pass_count"], 1);

        let verbose = JsonFormatter::new().verbose();
        let value: serde_json::Value = serde_json::from_str(&verbose.format(&report())).unwrap();
        assert_eq!(value["results"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_json_pretty() {
        let formatter = JsonFormatter::new().pretty();
        let output = formatter.format(&report());
        assert!(output.contains('\n'));
    }
}
