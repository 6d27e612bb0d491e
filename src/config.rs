//! Configuration system for the scanner
//!
//! Reads configuration from:
//! - `.a11yrc.yaml` / `.a11yrc.yml` / `.a11yrc.json` (project-level)
//! - the same names in the home directory (user-level)

use crate::rule::{RuleCategory, RuleInfo};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file names, in lookup order
pub const CONFIG_FILE_NAMES: [&str; 3] = [".a11yrc.yaml", ".a11yrc.yml", ".a11yrc.json"];

/// Maximum depth of `extends` chains
const MAX_DEPTH: usize = 10;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Evaluate elements in parallel
    pub parallel: bool,

    /// Number of worker threads (0 = number of CPUs)
    pub jobs: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            jobs: 0,
        }
    }
}

impl EngineConfig {
    /// Worker threads to use
    pub fn threads(&self) -> usize {
        if self.jobs > 0 {
            self.jobs
        } else {
            num_cpus::get()
        }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,

    /// Color mode
    pub color: ColorMode,

    /// Include passing and not-applicable results
    pub verbose: bool,

    /// Show statistics
    pub statistics: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: ColorMode::Auto,
            verbose: false,
            statistics: true,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Color mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Rule selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Disabled rules
    pub disabled: Vec<String>,

    /// Enabled rules (empty = all)
    pub enabled: Vec<String>,

    /// Select rules by id prefix (e.g., "Name" selects all Name* rules)
    pub extend: Vec<String>,

    /// Ignore rules by id prefix (e.g., "BoundingRectangle")
    pub ignore: Vec<String>,

    /// Rule categories to run (empty = all)
    pub categories: Vec<RuleCategory>,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Presets or config files this one builds on
    pub extends: Vec<String>,

    /// Engine settings
    pub engine: EngineConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Rule configuration
    pub rules: RulesConfig,
}

impl Config {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Names accepted by [`Config::preset`]
    pub const PRESETS: [&'static str; 3] = ["recommended", "strict", "minimal"];

    /// Get a preset configuration by name
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "recommended" => Some(Self::preset_recommended()),
            "strict" => Some(Self::preset_strict()),
            "minimal" => Some(Self::preset_minimal()),
            _ => None,
        }
    }

    /// Recommended preset - everything except advisory structure checks
    fn preset_recommended() -> Self {
        let mut config = Self::default();
        config.rules.categories = vec![
            RuleCategory::Naming,
            RuleCategory::Patterns,
            RuleCategory::Geometry,
            RuleCategory::Relationships,
        ];
        config
    }

    /// Strict preset - all categories, verbose output
    fn preset_strict() -> Self {
        let mut config = Self::default();
        config.rules.categories = RuleCategory::ALL.to_vec();
        config.output.verbose = true;
        config
    }

    /// Minimal preset - names and patterns only
    fn preset_minimal() -> Self {
        let mut config = Self::default();
        config.rules.categories = vec![RuleCategory::Naming, RuleCategory::Patterns];
        config
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_depth(path, 0)
    }

    /// Load with recursion depth limit (to prevent infinite loops)
    fn load_with_depth(path: &Path, depth: usize) -> Result<Self, ConfigError> {
        if depth >= MAX_DEPTH {
            return Err(ConfigError::Invalid(
                "Maximum config inheritance depth exceeded".to_string(),
            ));
        }

        log::debug!("Loading config {}", path.display());
        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let mut config: Self = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "Unknown config file format: {}",
                    ext
                )))
            }
        };

        if !config.extends.is_empty() {
            let base_dir = path.parent().unwrap_or(Path::new("."));
            let mut base_config = Self::default();

            for extend in &config.extends {
                let extended = match Self::preset(extend) {
                    Some(preset) => preset,
                    None => {
                        let extend_path = if Path::new(extend).is_absolute() {
                            PathBuf::from(extend)
                        } else {
                            base_dir.join(extend)
                        };
                        Self::load_with_depth(&extend_path, depth + 1)?
                    }
                };
                base_config.merge(extended);
            }

            // the current file wins over everything it extends
            base_config.merge(config);
            config = base_config;
        }

        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Self) {
        // extends are not inherited

        if other.engine.jobs != 0 {
            self.engine.jobs = other.engine.jobs;
        }
        self.engine.parallel = other.engine.parallel;

        if other.output.format != OutputFormat::Text {
            self.output.format = other.output.format;
        }
        if other.output.verbose {
            self.output.verbose = true;
        }
        if other.output.color != ColorMode::Auto {
            self.output.color = other.output.color;
        }
        self.output.statistics = other.output.statistics;

        self.rules.disabled.extend(other.rules.disabled);
        if !other.rules.enabled.is_empty() {
            self.rules.enabled = other.rules.enabled;
        }
        self.rules.extend.extend(other.rules.extend);
        self.rules.ignore.extend(other.rules.ignore);
        if !other.rules.categories.is_empty() {
            self.rules.categories = other.rules.categories;
        }
    }

    /// First config file found in `dir`, if any
    pub fn find_in(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir()?;
        let found = Self::find_in(&cwd).or_else(|| dirs::home_dir().and_then(|h| Self::find_in(&h)));

        match found {
            Some(path) => {
                log::debug!("Found config file {}", path.display());
                Self::load(&path)
            }
            None => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Merge CLI arguments into configuration
    pub fn merge_cli(
        &mut self,
        format: Option<OutputFormat>,
        verbose: Option<bool>,
        jobs: Option<usize>,
        disabled_rules: Option<Vec<String>>,
        enabled_rules: Option<Vec<String>>,
    ) {
        if let Some(f) = format {
            self.output.format = f;
        }
        if let Some(v) = verbose {
            self.output.verbose = v;
        }
        if let Some(j) = jobs {
            self.engine.jobs = j;
        }
        if let Some(disabled) = disabled_rules {
            self.rules.disabled.extend(disabled);
        }
        if let Some(enabled) = enabled_rules {
            self.rules.enabled = enabled;
        }
    }

    /// Add prefixes to extend (select rules by prefix)
    pub fn add_extend_prefixes(&mut self, prefixes: Vec<String>) {
        self.rules.extend.extend(prefixes);
    }

    /// Add prefixes to ignore
    pub fn add_ignore_prefixes(&mut self, prefixes: Vec<String>) {
        self.rules.ignore.extend(prefixes);
    }

    /// Check if a rule is enabled
    pub fn is_rule_enabled(&self, rule: &RuleInfo) -> bool {
        if !self.rules.categories.is_empty() && !self.rules.categories.contains(&rule.category) {
            return false;
        }
        self.is_rule_id_enabled(&rule.id)
    }

    /// Check the id-based filters only
    pub fn is_rule_id_enabled(&self, rule_id: &str) -> bool {
        if self.rules.disabled.iter().any(|d| d == rule_id) {
            return false;
        }

        if self.matches_ignore_prefix(rule_id) {
            return false;
        }

        if !self.rules.enabled.is_empty() {
            return self.rules.enabled.iter().any(|e| e == rule_id);
        }

        self.matches_extend_prefix(rule_id)
    }

    /// Check if a rule matches any prefix in the extend list
    pub fn matches_extend_prefix(&self, rule_id: &str) -> bool {
        if self.rules.extend.is_empty() {
            return true;
        }
        let rule_upper = rule_id.to_uppercase();
        self.rules
            .extend
            .iter()
            .any(|prefix| rule_upper.starts_with(&prefix.to_uppercase()))
    }

    /// Check if a rule matches any prefix in the ignore list
    pub fn matches_ignore_prefix(&self, rule_id: &str) -> bool {
        let rule_upper = rule_id.to_uppercase();
        self.rules
            .ignore
            .iter()
            .any(|prefix| rule_upper.starts_with(&prefix.to_uppercase()))
    }
}
