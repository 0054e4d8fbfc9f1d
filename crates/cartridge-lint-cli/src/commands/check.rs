//! Check command implementation.

use anyhow::{anyhow, Context, Result};
use cartridge_lint_core::{Analyzer, Config, ProjectRuleBox, RuleBox, Severity};
use cartridge_lint_rules::{all_project_rules, all_rules, Preset};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Flags of the check command.
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Preset name from `--preset`.
    pub preset: Option<String>,
    /// Comma-separated rule names or codes; overrides the preset.
    pub rules: Option<String>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
    /// Severity threshold from `--fail-on`.
    pub fail_on: Option<String>,
}

/// Runs the check command.
pub fn run(path: &Path, options: CheckOptions, source: &ConfigSource) -> Result<()> {
    let config = source.load()?;

    let fail_on: Severity = options
        .fail_on
        .as_deref()
        .or(config.fail_on.as_deref())
        .unwrap_or("error")
        .parse()
        .context("Invalid --fail-on")?;

    let (rules, project_rules) = match options.rules {
        Some(filter) => {
            let names: Vec<&str> = filter.split(',').map(str::trim).collect();
            filter_rules(&names, &config)
        }
        None => {
            let preset = resolve_preset(options.preset.as_deref(), &config)?;
            tracing::debug!("Using preset {}", preset.name());
            (preset.rules(&config), preset.project_rules(&config))
        }
    };

    let mut builder = Analyzer::builder()
        .root(path)
        .config(config)
        .excludes(options.exclude);
    for rule in rules {
        builder = builder.rule_box(rule);
    }
    for rule in project_rules {
        builder = builder.project_rule_box(rule);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!("Auditing {:?} with {} rules", path, analyzer.rule_count());

    let mut result = analyzer.analyze().context("Audit failed")?;

    super::output::print(&mut result, options.format)?;

    if result.has_failures_at(fail_on) {
        std::process::exit(1);
    }

    Ok(())
}

/// Flag first, then `preset` from the config, then recommended.
fn resolve_preset(flag: Option<&str>, config: &Config) -> Result<Preset> {
    flag.or(config.preset.as_deref())
        .map_or(Ok(Preset::Recommended), |name| {
            name.parse::<Preset>().map_err(|e| anyhow!(e))
        })
}

/// Picks rules by name or code, across both rule kinds.
fn filter_rules(names: &[&str], config: &Config) -> (Vec<RuleBox>, Vec<ProjectRuleBox>) {
    let selected = |name: &str, code: &str| names.iter().any(|n| *n == name || *n == code);

    let rules: Vec<RuleBox> = all_rules(config)
        .into_iter()
        .filter(|r| selected(r.name(), r.code()))
        .collect();
    let project_rules: Vec<ProjectRuleBox> = all_project_rules(config)
        .into_iter()
        .filter(|r| selected(r.name(), r.code()))
        .collect();

    for name in names {
        let known = rules.iter().any(|r| r.name() == *name || r.code() == *name)
            || project_rules
                .iter()
                .any(|r| r.name() == *name || r.code() == *name);
        if !known {
            tracing::warn!("Unknown rule: {}", name);
        }
    }

    (rules, project_rules)
}
