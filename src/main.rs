//! a11y-scan CLI - accessibility rule catalog tooling
//!
//! Lists and explains the built-in rules and writes starter configuration.

use a11y_scan::config::Config;
use a11y_scan::rule::{render_template, Rule, RuleCategory, Standard};
use a11y_scan::rules::builtin_catalog;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "a11y-scan",
    version,
    about = "Accessibility rule engine",
    long_about = "Evaluates a catalog of accessibility rules over captured UI element trees."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in rules
    Rules {
        /// Only rules of this category (naming, geometry, patterns, structure, relationships)
        #[arg(long)]
        category: Option<String>,

        /// Only rules checking this criterion (e.g. 4.1.2 or name-role-value)
        #[arg(long)]
        standard: Option<String>,
    },
    /// Show detailed information about a rule
    Explain {
        /// Rule ID to explain
        rule_id: String,
    },
    /// Initialize a configuration file
    Init {
        /// Preset to use (recommended, strict, minimal)
        #[arg(long, default_value = "recommended")]
        preset: String,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        output_format: InitFormat,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InitFormat {
    Yaml,
    Json,
}

/// Placeholder values used when showing templates outside a scan
const SAMPLE_PARAMS: [(&str, &str); 2] = [("control_type", "element"), ("name", "<name>")];

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Config::load_default().context("Failed to load config"),
    }
}

/// Helper function to print a rule in a consistent format
fn print_rule(rule: &Rule, enabled: bool, verbose: bool) {
    let info = rule.info();
    let marker = if enabled {
        "".normal()
    } else {
        " [disabled]".yellow()
    };

    println!(
        "    {} ({}){}",
        info.id.cyan(),
        info.standard.criterion(),
        marker
    );
    if verbose {
        println!("      {}", render_template(&info.description, &SAMPLE_PARAMS));
    }
}

fn handle_rules(cli: &Cli, category: Option<&str>, standard: Option<&str>) -> Result<()> {
    let category: Option<RuleCategory> = category
        .map(str::parse)
        .transpose()
        .map_err(anyhow::Error::msg)?;
    let standard: Option<Standard> = standard
        .map(str::parse)
        .transpose()
        .map_err(anyhow::Error::msg)?;

    let mut config = load_config(cli)?;
    config.merge_cli(None, cli.verbose.then_some(true), None, None, None);
    let catalog = builtin_catalog()?;

    let mut shown = 0;
    for cat in RuleCategory::ALL {
        if category.is_some_and(|c| c != cat) {
            continue;
        }

        let rules: Vec<&Rule> = catalog
            .iter()
            .filter(|r| r.info().category == cat)
            .filter(|r| standard.map_or(true, |s| r.info().standard == s))
            .collect();
        if rules.is_empty() {
            continue;
        }

        println!("  {}", cat.to_string().bold());
        for rule in rules {
            print_rule(rule, config.is_rule_enabled(rule.info()), config.output.verbose);
            shown += 1;
        }
        println!();
    }

    println!("{} of {} rules", shown, catalog.len());
    Ok(())
}

/// Print detailed rule explanation
fn explain_rule(rule: &Rule) {
    let info = rule.info();

    println!("{}", "Rule Details".bold());
    println!();
    println!("  {}: {}", "ID".bold(), info.id.cyan());
    println!("  {}: {}", "Category".bold(), info.category);
    println!("  {}: {}", "Standard".bold(), info.standard);

    if let Some(property) = info.property {
        println!("  {}: {} ({})", "Property".bold(), property, property.id());
    }

    println!();
    println!("  {}", "Applies to".bold());
    println!("  {}", rule.condition());

    println!();
    println!("  {}", "Description".bold());
    println!("  {}", render_template(&info.description, &SAMPLE_PARAMS));

    println!();
    println!("  {}", "How to fix".bold());
    println!("  {}", render_template(&info.how_to_fix, &SAMPLE_PARAMS));

    if let Some(url) = &info.help_url {
        println!();
        println!("  {}: {}", "Documentation".bold(), url.blue());
    }
}

fn handle_explain(rule_id: &str) -> Result<()> {
    let catalog = builtin_catalog()?;

    if let Some(rule) = catalog.get(rule_id) {
        explain_rule(rule);
        return Ok(());
    }

    let needle = rule_id.to_lowercase();
    let similar: Vec<&str> = catalog
        .iter()
        .map(Rule::id)
        .filter(|id| id.to_lowercase().contains(&needle))
        .collect();
    if !similar.is_empty() {
        eprintln!("Did you mean: {}", similar.join(", ").cyan());
    }
    eprintln!("Use {} to see all available rules", "a11y-scan rules".cyan());
    bail!("Rule '{}' not found", rule_id)
}

fn handle_init(preset: &str, output_format: InitFormat) -> Result<()> {
    let Some(config) = Config::preset(preset) else {
        bail!(
            "Unknown preset '{}'. Available: {}",
            preset,
            Config::PRESETS.join(", ")
        );
    };

    let filename = match output_format {
        InitFormat::Json => ".a11yrc.json",
        InitFormat::Yaml => ".a11yrc.yaml",
    };

    if Path::new(filename).exists() {
        bail!("{} already exists. Remove it first to reinitialize.", filename);
    }

    let content = match output_format {
        InitFormat::Json => serde_json::to_string_pretty(&config)?,
        InitFormat::Yaml => format!(
            "# a11y-scan configuration\n# Generated with: a11y-scan init --preset {}\n\n{}",
            preset,
            serde_yaml::to_string(&config)?
        ),
    };

    std::fs::write(filename, content).with_context(|| format!("Failed to write {}", filename))?;

    println!("{} Created {}", "success".green().bold(), filename);
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Rules { category, standard } => {
            handle_rules(cli, category.as_deref(), standard.as_deref())
        }
        Commands::Explain { rule_id } => handle_explain(rule_id),
        Commands::Init {
            preset,
            output_format,
        } => handle_init(preset, *output_format),
    }
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(&cli) {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}
