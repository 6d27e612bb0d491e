//! Scan results and aggregated report

use crate::element::{Element, ElementId};
use crate::rule::{Evaluation, Outcome};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Outcome of one rule on one element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub rule_id: String,
    pub element_id: ElementId,
    /// Short label of the element, e.g. `Button 'OK'`
    #[serde(default)]
    pub element: String,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
    /// Identifier assigned downstream (e.g. a filed bug); never read by the scanner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
}

impl ScanResult {
    pub fn new(rule_id: &str, element: &Element<'_>, evaluation: Evaluation) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            element_id: element.id(),
            element: element.glimpse(),
            outcome: evaluation.outcome,
            messages: evaluation.messages,
            tracking_id: None,
        }
    }
}

/// Per-rule timing statistics
#[derive(Debug, Clone, Default)]
pub struct RuleTiming {
    /// Rule ID
    pub rule_id: String,
    /// Total time spent evaluating this rule
    pub total_time: Duration,
    /// Number of times the rule was evaluated
    pub evaluation_count: usize,
    /// Number of `Fail` outcomes
    pub failure_count: usize,
}

impl RuleTiming {
    pub fn new(rule_id: &str) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            ..Default::default()
        }
    }

    /// Average time per evaluation
    pub fn avg_time(&self) -> Duration {
        match u32::try_from(self.evaluation_count) {
            Ok(0) => Duration::ZERO,
            Ok(count) => self.total_time / count,
            Err(_) => self.total_time.div_f64(self.evaluation_count as f64),
        }
    }
}

/// Result of a scan
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Results in element pre-order, then catalog order
    pub results: Vec<ScanResult>,

    /// Elements visited
    pub elements_visited: usize,

    pub pass_count: usize,
    pub fail_count: usize,
    pub note_count: usize,
    pub error_count: usize,
    pub not_applicable_count: usize,

    /// Processing duration
    pub duration: Duration,

    /// Per-rule timing statistics (rule_id -> timing)
    pub rule_timings: HashMap<String, RuleTiming>,
}

impl ScanReport {
    /// Append a result and account for it
    pub fn record(&mut self, result: ScanResult, elapsed: Duration) {
        let timing = self
            .rule_timings
            .entry(result.rule_id.clone())
            .or_insert_with(|| RuleTiming::new(&result.rule_id));
        timing.total_time += elapsed;
        timing.evaluation_count += 1;
        if result.outcome == Outcome::Fail {
            timing.failure_count += 1;
        }

        *self.counter(result.outcome) += 1;
        self.results.push(result);
    }

    fn counter(&mut self, outcome: Outcome) -> &mut usize {
        match outcome {
            Outcome::Pass => &mut self.pass_count,
            Outcome::Fail => &mut self.fail_count,
            Outcome::Note => &mut self.note_count,
            Outcome::Error => &mut self.error_count,
            Outcome::NotApplicable => &mut self.not_applicable_count,
        }
    }

    /// Number of results with `outcome`
    pub fn count(&self, outcome: Outcome) -> usize {
        match outcome {
            Outcome::Pass => self.pass_count,
            Outcome::Fail => self.fail_count,
            Outcome::Note => self.note_count,
            Outcome::Error => self.error_count,
            Outcome::NotApplicable => self.not_applicable_count,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScanResult> {
        self.results.iter().filter(|r| r.outcome == Outcome::Fail)
    }

    /// Results for one element, in catalog order
    pub fn results_for(&self, element: ElementId) -> impl Iterator<Item = &ScanResult> {
        self.results.iter().filter(move |r| r.element_id == element)
    }

    /// Worst outcome recorded for an element
    pub fn element_status(&self, element: ElementId) -> Option<Outcome> {
        self.results_for(element).map(|r| r.outcome).max()
    }

    /// Worst outcome per element
    pub fn element_statuses(&self) -> BTreeMap<ElementId, Outcome> {
        let mut statuses: BTreeMap<ElementId, Outcome> = BTreeMap::new();
        for r in &self.results {
            statuses
                .entry(r.element_id)
                .and_modify(|o| *o = (*o).max(r.outcome))
                .or_insert(r.outcome);
        }
        statuses
    }

    pub fn has_failures(&self) -> bool {
        self.fail_count > 0
    }

    /// Check if the report is clean (no failures, notes or errors)
    pub fn is_clean(&self) -> bool {
        self.fail_count == 0 && self.note_count == 0 && self.error_count == 0
    }

    /// Get exit code (0 = clean, 1 = notes or errors, 2 = failures)
    pub fn exit_code(&self) -> i32 {
        if self.fail_count > 0 {
            2
        } else if self.note_count > 0 || self.error_count > 0 {
            1
        } else {
            0
        }
    }

    /// Attach a tracking id to the result of `rule_id` on `element`.
    /// Returns false if there is no such result.
    pub fn assign_tracking_id(&mut self, rule_id: &str, element: ElementId, tracking_id: &str) -> bool {
        match self
            .results
            .iter_mut()
            .find(|r| r.rule_id == rule_id && r.element_id == element)
        {
            Some(result) => {
                result.tracking_id = Some(tracking_id.to_string());
                true
            }
            None => false,
        }
    }

    /// Merge another report into this one
    pub fn merge(&mut self, other: ScanReport) {
        self.results.extend(other.results);
        self.elements_visited += other.elements_visited;
        self.pass_count += other.pass_count;
        self.fail_count += other.fail_count;
        self.note_count += other.note_count;
        self.error_count += other.error_count;
        self.not_applicable_count += other.not_applicable_count;
        self.duration += other.duration;

        for (rule_id, timing) in other.rule_timings {
            let entry = self
                .rule_timings
                .entry(rule_id)
                .or_insert_with(|| RuleTiming::new(&timing.rule_id));
            entry.total_time += timing.total_time;
            entry.evaluation_count += timing.evaluation_count;
            entry.failure_count += timing.failure_count;
        }
    }

    /// Get rule timings sorted by total time (descending)
    pub fn sorted_timings(&self) -> Vec<&RuleTiming> {
        let mut timings: Vec<_> = self.rule_timings.values().collect();
        timings.sort_by(|a, b| {
            b.total_time
                .cmp(&a.total_time)
                .then_with(|| a.rule_id.cmp(&b.rule_id))
        });
        timings
    }

    /// Format timing statistics as a string
    pub fn format_timings(&self) -> String {
        let timings = self.sorted_timings();

        if timings.is_empty() {
            return "No timing data available".to_string();
        }

        let mut output = String::new();
        output.push_str("Rule Timing Statistics:\n");
        output.push_str(&format!(
            "{:<44} {:>12} {:>12} {:>10} {:>10}\n",
            "Rule ID", "Total", "Avg", "Evals", "Failures"
        ));
        output.push_str(&"-".repeat(92));
        output.push('\n');

        for timing in timings {
            let total_ms = timing.total_time.as_secs_f64() * 1000.0;
            let avg_us = timing.avg_time().as_secs_f64() * 1_000_000.0;

            output.push_str(&format!(
                "{:<44} {:>10.2}ms {:>10.2}µs {:>10} {:>10}\n",
                timing.rule_id, total_ms, avg_us, timing.evaluation_count, timing.failure_count
            ));
        }

        output
    }
}
