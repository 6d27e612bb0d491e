//! Scan driver
//!
//! Visits every element of a subtree in pre-order and evaluates each
//! applicable, enabled rule on it. Elements can be evaluated on a rayon pool;
//! results are always reassembled in pre-order, then catalog order.

use crate::catalog::Catalog;
use crate::config::Config;
use crate::element::Element;
use crate::report::{ScanReport, ScanResult};
use crate::rule::{Evaluation, Rule};
use rayon::prelude::*;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Scan failure
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    #[error("Scan was cancelled")]
    Cancelled,

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),
}

/// Cooperative cancellation flag shared between a scan and its caller
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; the scan stops before its next element
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

type Visit = Vec<(ScanResult, Duration)>;

/// Runs a catalog over element trees
pub struct Scanner<'c> {
    catalog: &'c Catalog,
    config: Config,
    cancel: CancellationToken,
}

impl<'c> Scanner<'c> {
    /// Create a scanner with the default configuration
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            config: Config::default(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Evaluate elements one at a time on the calling thread
    pub fn sequential(mut self) -> Self {
        self.config.engine.parallel = false;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that cancels scans run by this scanner
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Scan the subtree rooted at `root`
    pub fn scan(&self, root: Element<'_>) -> Result<ScanReport, ScanError> {
        let start = Instant::now();

        let rules: Vec<&Rule> = self
            .catalog
            .iter()
            .filter(|r| self.config.is_rule_enabled(r.info()))
            .collect();

        let elements: Vec<Element<'_>> = std::iter::once(root).chain(root.descendants()).collect();

        log::info!(
            "Scanning {} elements with {} of {} rules",
            elements.len(),
            rules.len(),
            self.catalog.len()
        );

        let visits: Vec<Visit> = if self.config.engine.parallel && elements.len() > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.engine.threads())
                .build()
                .map_err(|e| ScanError::ThreadPool(e.to_string()))?;

            pool.install(|| {
                elements
                    .par_iter()
                    .map(|e| self.visit(e, &rules))
                    .collect::<Result<_, _>>()
            })?
        } else {
            elements
                .iter()
                .map(|e| self.visit(e, &rules))
                .collect::<Result<_, _>>()?
        };

        let mut report = ScanReport {
            elements_visited: elements.len(),
            ..ScanReport::default()
        };
        for (result, elapsed) in visits.into_iter().flatten() {
            report.record(result, elapsed);
        }
        report.duration = start.elapsed();

        log::debug!(
            "Scan finished in {:?}: {} results, {} failures",
            report.duration,
            report.results.len(),
            report.fail_count
        );

        Ok(report)
    }

    /// Evaluate every applicable rule on one element
    fn visit(&self, element: &Element<'_>, rules: &[&Rule]) -> Result<Visit, ScanError> {
        if self.cancel.is_cancelled() {
            log::info!("Scan cancelled before element {}", element.id());
            return Err(ScanError::Cancelled);
        }

        let mut results = Vec::new();
        for rule in rules {
            if !rule.is_applicable(element) {
                continue;
            }

            let start = Instant::now();
            let evaluation = match catch_unwind(AssertUnwindSafe(|| rule.evaluate(element))) {
                Ok(evaluation) => evaluation,
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    log::warn!(
                        "Rule {} panicked on {}: {}",
                        rule.id(),
                        element.glimpse(),
                        message
                    );
                    Evaluation::error(format!("Rule panicked: {}", message))
                }
            };
            let elapsed = start.elapsed();

            results.push((ScanResult::new(rule.id(), element, evaluation), elapsed));
        }

        Ok(results)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
