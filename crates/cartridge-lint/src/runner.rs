//! Internal runner for `check!()` macro integration.
//!
//! This module is `#[doc(hidden)]` and not part of the public API.
//! It is called by the generated test function from `cartridge_lint::check!()`.

use cartridge_lint_core::{Analyzer, Config, Severity, CARTRIDGES_DIR};
use cartridge_lint_rules::Preset;
use std::path::{Path, PathBuf};

/// Config file names to search for, in priority order.
const CONFIG_CANDIDATES: &[&str] = &["cartridge-lint.toml", ".cartridge-lint.toml"];

/// Arguments of a `check!()` invocation.
#[derive(Debug, Default, Clone, Copy)]
pub struct CheckArgs {
    /// Preset name.
    pub preset: Option<&'static str>,
    /// Config path, relative to the project root.
    pub config: Option<&'static str>,
    /// Lowest failing severity.
    pub fail_on: Option<&'static str>,
}

/// Runs the audit as part of `cargo test`.
///
/// # Panics
///
/// Panics with the formatted report if rules at or above `fail_on` found
/// violations, or if the audit cannot run at all.
pub fn run_check(args: &CheckArgs) {
    let root = find_project_root();
    if let Some(report) = audit(&root, args) {
        panic!("{report}");
    }
}

/// Runs the audit at `root`, returning the failure report if any.
fn audit(root: &Path, args: &CheckArgs) -> Option<String> {
    let content = read_config_content(root, args.config);
    let config = parse_config(&content);

    let preset = resolve_preset(args.preset, &config);
    let fail_on = resolve_fail_on(args.fail_on, &config);

    let mut builder = Analyzer::builder().root(root.join(&config.project.root));
    for rule in preset.rules(&config) {
        builder = builder.rule_box(rule);
    }
    for rule in preset.project_rules(&config) {
        builder = builder.project_rule_box(rule);
    }

    let analyzer = builder.config(config).build().unwrap_or_else(|e| {
        panic!("cartridge-lint: failed to build analyzer: {e}");
    });

    let mut result = analyzer.analyze().unwrap_or_else(|e| {
        panic!("cartridge-lint: audit failed: {e}");
    });

    if !result.has_failures_at(fail_on) {
        return None;
    }
    Some(
        result
            .format_test_report(fail_on)
            .unwrap_or_else(|e| panic!("cartridge-lint: failed to format report: {e}")),
    )
}

/// Reads the raw TOML content from the config file.
///
/// Returns an empty string if no config file is found.
fn read_config_content(root: &Path, explicit_path: Option<&str>) -> String {
    if let Some(path) = explicit_path {
        let full_path = if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            root.join(path)
        };
        return std::fs::read_to_string(&full_path).unwrap_or_else(|e| {
            panic!(
                "cartridge-lint: failed to read config from {}: {e}",
                full_path.display()
            );
        });
    }

    for candidate in CONFIG_CANDIDATES {
        let path = root.join(candidate);
        if path.exists() {
            return std::fs::read_to_string(&path).unwrap_or_else(|e| {
                panic!(
                    "cartridge-lint: failed to read config from {}: {e}",
                    path.display()
                );
            });
        }
    }

    String::new()
}

fn parse_config(content: &str) -> Config {
    if content.is_empty() {
        return Config::default();
    }
    Config::parse(content).unwrap_or_else(|e| {
        panic!("cartridge-lint: failed to parse config: {e}");
    })
}

/// Finds the project root, starting from `CARGO_MANIFEST_DIR`.
fn find_project_root() -> PathBuf {
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let manifest_path = PathBuf::from(manifest_dir);
        return find_root_from(&manifest_path).unwrap_or(manifest_path);
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Closest ancestor of `start` holding a config file or a `cartridges/` directory.
fn find_root_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| {
            CONFIG_CANDIDATES.iter().any(|name| dir.join(name).is_file())
                || dir.join(CARTRIDGES_DIR).is_dir()
        })
        .map(Path::to_path_buf)
}

/// Resolves the effective preset from macro arg > config > default.
fn resolve_preset(macro_arg: Option<&str>, config: &Config) -> Preset {
    let name = macro_arg
        .or(config.preset.as_deref())
        .unwrap_or("recommended");

    name.parse().unwrap_or_else(|_| {
        panic!("cartridge-lint: unknown preset `{name}`. Valid presets: recommended, strict, minimal")
    })
}

/// Resolves the effective `fail_on` severity from macro arg > config > default.
fn resolve_fail_on(macro_arg: Option<&str>, config: &Config) -> Severity {
    let name = macro_arg.or(config.fail_on.as_deref()).unwrap_or("error");
    name.parse()
        .unwrap_or_else(|e| panic!("cartridge-lint: {e}"))
}
