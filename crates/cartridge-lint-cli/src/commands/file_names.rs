//! File-names command: lists templates and scripts, marking names that
//! break the casing convention for manual review.

#![allow(clippy::unwrap_used)]

use anyhow::{Context, Result};
use cartridge_lint_core::{cartridge_of, Corpus, FileQuery, Generation, CARTRIDGES_DIR};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt::Write as _;
use std::path::Path;

use crate::config_resolver::ConfigSource;

/// Name of the written listing.
pub const OUTPUT_FILE: &str = "fileNames.txt";

/// Column the attention arrow pads up to.
const ROW_MAX_LENGTH: usize = 130;

/// Directory names never listed.
const SKIPPED: &[&str] = &["sg_changes", "client", "static"];

lazy_static! {
    static ref CAMEL_CASE: Regex = Regex::new(r"^[a-z]+([A-Z]+[a-z]+)+\.[a-z]+$").unwrap();
    static ref PASCAL_CASE: Regex = Regex::new(r"^([A-Z]+[a-z]+)+\.[a-z]+$").unwrap();
}

/// Runs the file-names command.
pub fn run(path: &Path, output: &Path, source: &ConfigSource) -> Result<()> {
    let config = source.load()?;
    let corpus = Corpus::open(
        path,
        config.project.exclude_changes_cartridges,
        &config.analyzer.exclude,
    )
    .context("Failed to open project")?;

    let listing = list(&corpus)?;

    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let target = output.join(OUTPUT_FILE);
    std::fs::write(&target, listing)
        .with_context(|| format!("Unable to write file names to {}", target.display()))?;

    println!("Wrote {}", target.display());
    Ok(())
}

/// One line per `.isml`/`.js` file, relative to `cartridges/`.
fn list(corpus: &Corpus) -> Result<String> {
    let query = FileQuery::new(CARTRIDGES_DIR)
        .extensions(".isml|.js")
        .exclude(SKIPPED.iter().copied());

    let mut out = String::new();
    for file in corpus.files(&query)? {
        let relative = corpus.relative(file.path());
        if cartridge_of(&relative).map(Generation::classify) == Some(Generation::Pipelines) {
            continue;
        }
        let listed = relative
            .strip_prefix(CARTRIDGES_DIR)
            .map_or(relative.as_str(), |r| r.trim_start_matches('/'));
        let _ = writeln!(out, "{listed}{}", attention_mark(&relative));
    }
    Ok(out)
}

fn is_valid_name(relative: &str) -> bool {
    let name = relative.rsplit('/').next().unwrap_or(relative);
    if relative.contains("/controllers/") {
        return PASCAL_CASE.is_match(name);
    }
    if relative.contains("controllers") && relative.contains("/templates/") {
        return true;
    }
    CAMEL_CASE.is_match(name)
}

fn attention_mark(relative: &str) -> String {
    if is_valid_name(relative) {
        return String::new();
    }
    let arrow = match ROW_MAX_LENGTH.checked_sub(relative.len()) {
        Some(room) if room > 2 => room,
        _ => 10,
    };
    format!(" <{}NEEDS CHECK", "-".repeat(arrow - 1))
}
