//! Human-readable text output formatter

use super::OutputFormatter;
use crate::report::{ScanReport, ScanResult};
use crate::rule::Outcome;
use colored::*;

/// Text formatter, results grouped per element
pub struct TextFormatter {
    /// Enable colored output
    pub colored: bool,

    /// Also list passing and not-applicable results
    pub verbose: bool,

    /// Show evaluation messages
    pub show_messages: bool,

    /// Show statistics
    pub show_stats: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            colored: true,
            verbose: false,
            show_messages: true,
            show_stats: true,
        }
    }
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable colors
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    /// Include passing results
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    fn outcome_str(&self, outcome: Outcome) -> ColoredString {
        let s = format!("{}", outcome);
        if !self.colored {
            return s.normal();
        }
        match outcome {
            Outcome::Fail => s.red().bold(),
            Outcome::Error => s.magenta().bold(),
            Outcome::Note => s.yellow(),
            Outcome::Pass => s.green(),
            Outcome::NotApplicable => s.dimmed(),
        }
    }

    fn shown(&self, result: &ScanResult) -> bool {
        self.verbose || !matches!(result.outcome, Outcome::Pass | Outcome::NotApplicable)
    }

    fn paint(&self, s: String, f: impl Fn(&str) -> ColoredString) -> String {
        if self.colored {
            f(&s).to_string()
        } else {
            s
        }
    }

    fn plural(count: usize, one: &str, many: &str) -> String {
        format!("{} {}", count, if count == 1 { one } else { many })
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &ScanReport) -> String {
        let mut output = String::new();

        // results arrive grouped by element in pre-order
        let mut current = None;
        for result in report.results.iter().filter(|r| self.shown(r)) {
            if current != Some(result.element_id) {
                if current.is_some() {
                    output.push('\n');
                }
                current = Some(result.element_id);
                let header = format!("{} [{}]", result.element, result.element_id);
                output.push_str(&self.paint(header, |s| s.underline()));
                output.push('\n');
            }
            output.push_str(&self.format_result(result));
        }

        if self.show_stats {
            if current.is_some() {
                output.push('\n');
            }
            output.push_str(&format!(
                "\n{} scanned",
                Self::plural(report.elements_visited, "element", "elements")
            ));

            let mut counts = Vec::new();
            if report.fail_count > 0 {
                let s = Self::plural(report.fail_count, "failure", "failures");
                counts.push(self.paint(s, |s| s.red()));
            }
            if report.error_count > 0 {
                let s = Self::plural(report.error_count, "error", "errors");
                counts.push(self.paint(s, |s| s.magenta()));
            }
            if report.note_count > 0 {
                let s = Self::plural(report.note_count, "note", "notes");
                counts.push(self.paint(s, |s| s.yellow()));
            }
            if report.pass_count > 0 {
                let s = format!("{} passed", report.pass_count);
                counts.push(self.paint(s, |s| s.green()));
            }

            if !counts.is_empty() {
                output.push_str(&format!(": {}", counts.join(", ")));
            }
            output.push('\n');

            output.push_str(&format!(
                "Finished in {:.2}s\n",
                report.duration.as_secs_f64()
            ));
        }

        output
    }

    fn format_result(&self, result: &ScanResult) -> String {
        let mut output = format!(
            "  {} {}\n",
            self.outcome_str(result.outcome),
            self.paint(result.rule_id.clone(), |s| s.cyan())
        );

        if self.show_messages {
            for message in &result.messages {
                output.push_str(&format!(
                    "    {} {}\n",
                    self.paint("=".to_string(), |s| s.blue()),
                    message
                ));
            }
        }

        if let Some(tracking_id) = &result.tracking_id {
            output.push_str(&format!("    = tracked as {}\n", tracking_id));
        }

        output
    }
}
