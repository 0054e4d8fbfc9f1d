//! Shared output formatting for audit results.

use anyhow::Result;
use cartridge_lint_core::{AuditResult, Severity};

use crate::OutputFormat;

/// Print audit results in the specified format.
pub fn print(result: &mut AuditResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => print_json(result),
        OutputFormat::Compact => print_compact(result),
    }
}

fn severity_indicator(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warning => "\x1b[33mwarning\x1b[0m",
        Severity::Info => "\x1b[34minfo\x1b[0m",
    }
}

fn print_text(result: &mut AuditResult) -> Result<()> {
    for report in &mut result.reports {
        if report.passed() {
            continue;
        }
        println!(
            "{} {} {}",
            report.code,
            report.rule,
            severity_indicator(report.severity)
        );
        println!("{}", report.session.report()?);
    }

    let (errors, warnings, infos) = result.count_by_severity();
    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) over {} rule(s) and {} file(s)\x1b[0m",
        summary_color,
        errors,
        warnings,
        infos,
        result.reports.len(),
        result.files_checked
    );
    Ok(())
}

fn print_json(result: &mut AuditResult) -> Result<()> {
    for report in &mut result.reports {
        report.session.resolve_rows()?;
    }
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &mut AuditResult) -> Result<()> {
    for line in compact_lines(result)? {
        println!("{line}");
    }
    Ok(())
}

/// `path:row: severity [code] text`, one line per violation.
fn compact_lines(result: &mut AuditResult) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for report in &mut result.reports {
        report.session.resolve_rows()?;
        for audit in report.session.failed_audits() {
            for violation in audit.violations() {
                lines.push(format!(
                    "{}:{}: {} [{}] {}",
                    audit.file().path().display(),
                    violation.row().unwrap_or(1),
                    report.severity,
                    report.code,
                    violation.display_text(true),
                ));
            }
        }
    }
    Ok(lines)
}
