//! Output formatters for scan reports

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::config::{ColorMode, OutputConfig, OutputFormat};
use crate::report::{ScanReport, ScanResult};
use std::io::IsTerminal;

/// Output formatter trait
pub trait OutputFormatter: Send + Sync {
    /// Format the entire scan report
    fn format(&self, report: &ScanReport) -> String;

    /// Format a single result
    fn format_result(&self, result: &ScanResult) -> String;
}

/// Formatter selected by the output configuration
pub fn formatter_for(config: &OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => {
            let colored = match config.color {
                ColorMode::Always => true,
                ColorMode::Never => false,
                ColorMode::Auto => std::io::stdout().is_terminal(),
            };
            let mut formatter = TextFormatter::new();
            formatter.colored = colored;
            formatter.verbose = config.verbose;
            formatter.show_stats = config.statistics;
            Box::new(formatter)
        }
        OutputFormat::Json => Box::new(JsonFormatter {
            pretty: true,
            verbose: config.verbose,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementData, ElementTree};
    use crate::rule::Evaluation;
    use crate::types::ControlType;
    use std::time::Duration;

    #[test]
    fn test_formatter_for_config() {
        let tree = ElementTree::from_root(ElementData::new(ControlType::Button).with_name("OK"));
        let mut report = ScanReport {
            elements_visited: 1,
            ..ScanReport::default()
        };
        report.record(
            ScanResult::new("ButtonShouldHavePatterns", &tree.root(), Evaluation::fail("missing")),
            Duration::ZERO,
        );

        let mut config = OutputConfig {
            color: ColorMode::Never,
            ..OutputConfig::default()
        };
        let text = formatter_for(&config).format(&report);
        assert!(text.contains("fail ButtonShouldHavePatterns"));

        config.format = OutputFormat::Json;
        let json = formatter_for(&config).format(&report);
        assert!(json.starts_with('{'));
        assert!(json.contains("\"fail_count\": 1"));
    }
}
