//! Management page rendering.
//!
//! The page is one big form: every row input is position-suffixed
//! (`keyword_<i>`, `target_*_<i>`), the add/delete buttons are the
//! structural signals, and the hidden `revision` field carries the snapshot
//! the operator is editing. Submissions land on `POST /save` as one batch.

use askama::Template;
use replybot_core::document::{ConfigDocument, Target};

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardPage<'a> {
    keywords: &'a [String],
    targets: &'a [Target],
    primary_template: &'a str,
    alternate_template: &'a str,
    revision: u64,
}

/// Render the management page from a document snapshot.
pub fn render(doc: &ConfigDocument) -> askama::Result<String> {
    DashboardPage {
        keywords: &doc.keywords,
        targets: &doc.targets,
        primary_template: &doc.primary_template,
        alternate_template: &doc.alternate_template,
        revision: doc.revision,
    }
    .render()
}
