//! Integration tests for the `cartridge_lint::check!()` macro.
//!
//! The generated test audits the fixture project named by the config and
//! must pass: macro expansion, config load, analysis.

cartridge_lint::check!(
    preset = "minimal",
    config = "tests/fixtures/cartridge-lint.toml",
);
