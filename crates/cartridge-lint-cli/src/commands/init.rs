//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# cartridge-lint configuration

# preset = "recommended"   # recommended, strict or minimal
# fail_on = "error"        # error, warning or info

[project]
# Root of the cartridge repository (default: current directory)
# root = "."

# Released cartridge version, YY.N.N
cartridge_version = "26.1.0"

# Versions the cartridge claims to support
platform_version = "21.2"
compatibility_mode = "19.10"
sfra_version = "5.3.0"
sitegen_version = "105.0.0"

# Leave *changes cartridges out of the scan
exclude_changes_cartridges = true

[analyzer]
# File or directory names (or * patterns) to skip
exclude = ["static"]

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.no-px-sizes]
enabled = true
# severity = "error"
max_px = 5

[rules.job-metadata]
site_id = "RefArch"

# [rules.guide-availability]
# min_length = 100
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("cartridge-lint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created cartridge-lint.toml");
    println!("\nNext steps:");
    println!("  1. Set the versions under [project]");
    println!("  2. Run: cartridge-lint check");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartridge_lint_core::Config;

    #[test]
    fn default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.project.cartridge_version.as_deref(), Some("26.1.0"));
        assert_eq!(config.analyzer.exclude, vec!["static".to_string()]);
        assert_eq!(config.rule("no-px-sizes").unwrap().get_int("max_px", 0), 5);
        assert_eq!(
            config.rule("job-metadata").unwrap().get_str("site_id"),
            Some("RefArch")
        );
    }
}
