// Page integration module.
// Reads repository identity from the page and injects the LOC trigger and panel.

pub mod dom;
pub mod events;
pub mod integration;
pub mod widgets;

use reqwest::Url;

use crate::error::{GhlocError, Result};
use crate::locator::{PageHints, RepositoryLocator};

pub use dom::{Document, Element, NodeId};
pub use events::{EventBus, PageEvent, PageHandler};
pub use integration::PageIntegration;
pub use widgets::{attach_trigger, panel_text, render_panel};

/// Container the trigger is appended to.
pub const FILE_NAVIGATION_CLASS: &str = "file-navigation";
/// Breadcrumb showing the current file or directory path.
pub const BLOB_PATH_ID: &str = "blob-path";
/// Active branch selector.
pub const BRANCH_SELECTOR_ID: &str = "branch-select-menu";
/// Repository microdata attribute.
pub const ITEMPROP: &str = "itemprop";

/// Injected toggle.
pub const TRIGGER_ID: &str = "_ghloc-btn";
/// Injected LOC panel.
pub const PANEL_ID: &str = "_ghloc-dropdown";
/// Link to the companion statistics page.
pub const STATS_LINK_ID: &str = "_ghloc-stats-link";

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Collect the DOM values the resolver prefers over the URL.
/// Missing elements leave the corresponding hint empty.
pub fn page_hints(doc: &Document) -> PageHints {
    let path = doc
        .get_element_by_id(BLOB_PATH_ID)
        .and_then(|node| non_empty(doc.text_content(node)));
    let branch = doc
        .get_element_by_id(BRANCH_SELECTOR_ID)
        .and_then(|node| non_empty(doc.text_content(node)));

    let author = doc
        .query_attribute(ITEMPROP, "author")
        .and_then(|node| non_empty(doc.text_content(node)));
    let name = doc
        .query_attribute(ITEMPROP, "name")
        .and_then(|node| non_empty(doc.text_content(node)));
    let repository = author.zip(name);

    PageHints {
        path,
        branch,
        repository,
    }
}

/// Resolve the repository shown by `doc`.
pub fn locate(doc: &Document) -> Option<RepositoryLocator> {
    crate::locator::resolve(doc.location(), &page_hints(doc))
}

/// Build the page model of a repository code view.
///
/// The page has a file-navigation container, plus a branch selector and a
/// path breadcrumb when those values are known.
pub fn repository_page(location: &str, branch: Option<&str>, path: Option<&str>) -> Document {
    let mut doc = Document::new(location);
    let body = doc.body();

    let nav = doc.add(body, "div");
    doc.add_class(nav, FILE_NAVIGATION_CLASS);

    if let Some(branch) = branch {
        let selector = doc.add(nav, "summary");
        doc.set_id(selector, BRANCH_SELECTOR_ID);
        let label = doc.add(selector, "span");
        doc.add_class(label, "css-truncate-target");
        doc.set_text(label, branch);
    }

    if let Some(path) = path {
        let crumbs = doc.add(nav, "div");
        doc.set_id(crumbs, BLOB_PATH_ID);
        doc.set_text(crumbs, path);
    }

    doc
}

/// Link to the statistics page: `<base>/<owner>/<name>?branch=..&path=[..]`.
pub fn stats_link(base: &str, locator: &RepositoryLocator) -> Result<String> {
    let raw = format!(
        "{}/{}/{}",
        base.trim_end_matches('/'),
        locator.owner,
        locator.name
    );
    let mut url =
        Url::parse(&raw).map_err(|e| GhlocError::Config(format!("invalid stats_url: {}", e)))?;

    let mut params = Vec::new();
    if let Some(branch) = &locator.branch {
        params.push(("branch", branch.clone()));
    }
    if !locator.path_segments.is_empty() {
        params.push(("path", serde_json::to_string(&locator.path_segments)?));
    }
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }

    Ok(url.to_string())
}
