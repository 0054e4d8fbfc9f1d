//! File selections shared by several rules.

use cartridge_lint_core::{FileQuery, Generation};

/// Server-side scripts: `.js` and `.ds` outside client and static code.
#[must_use]
pub fn server_scripts() -> FileQuery {
    FileQuery::cartridges()
        .extensions(".js|.ds")
        .exclude(["static", "client"])
}

/// Browser scripts.
#[must_use]
pub fn client_scripts() -> FileQuery {
    FileQuery::cartridges()
        .extensions(".js")
        .include(["client/default/js", "js/pages", "static"])
}

/// Stylesheets.
#[must_use]
pub fn styles() -> FileQuery {
    FileQuery::cartridges().extensions(".scss|.css")
}

/// ISML templates.
#[must_use]
pub fn templates() -> FileQuery {
    FileQuery::cartridges().extensions(".isml")
}

/// Model scripts.
#[must_use]
pub fn models() -> FileQuery {
    FileQuery::cartridges()
        .extensions(".js|.ds")
        .include(["/models/"])
}

/// Controllers of cartridges of `generation`.
#[must_use]
pub fn controllers(generation: Generation) -> FileQuery {
    FileQuery::cartridges()
        .extensions(".js|.ds")
        .include(["/controllers/"])
        .generation(generation)
}

/// Unit tests.
#[must_use]
pub fn unit_tests() -> FileQuery {
    FileQuery::new("test/unit").extensions(".js")
}

/// Integration tests.
#[must_use]
pub fn integration_tests() -> FileQuery {
    FileQuery::new("test/integration").extensions(".js")
}
