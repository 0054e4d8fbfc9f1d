//! List rules command implementation.

use cartridge_lint_core::Config;
use cartridge_lint_rules::{all_project_rules, all_rules};

/// Runs the list-rules command.
pub fn run() {
    let config = Config::default();

    println!("Per-file rules:\n");
    println!("{:<10} {:<32} Description", "Code", "Name");
    println!("{}", "-".repeat(90));
    for rule in all_rules(&config) {
        println!(
            "{:<10} {:<32} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
    }

    println!("\nProject rules:\n");
    println!("{:<10} {:<32} Description", "Code", "Name");
    println!("{}", "-".repeat(90));
    for rule in all_project_rules(&config) {
        println!(
            "{:<10} {:<32} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
    }

    println!("\nPresets:");
    println!("  recommended  - CL001-CL019, CL100, CL101, CL107 (default)");
    println!("  strict       - All rules, documentation included; style warnings become errors");
    println!("  minimal      - CL001, CL003, CL004, CL005, CL007 (for gradual adoption)");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  cartridge-lint check --rules no-todo,no-important");
    println!("  cartridge-lint check --rules CL011,CL012,CL102");
}
