// Injected page elements.
// The "Show LOC" trigger and the LOC panel, plus a plain-text rendering of the panel.

use crate::breakdown::LocBreakdown;

use super::dom::{Document, NodeId};
use super::{FILE_NAVIGATION_CLASS, PANEL_ID, STATS_LINK_ID, TRIGGER_ID};

const COUNTER_CLASS: &str = "Counter";
const LANGUAGE_CLASS: &str = "text-bold";

/// Append the trigger to the file-navigation container.
///
/// Returns false when the trigger already exists or the page has no
/// container.
pub fn attach_trigger(doc: &mut Document) -> bool {
    if doc.get_element_by_id(TRIGGER_ID).is_some() {
        return false;
    }
    let Some(container) = doc.query_class(FILE_NAVIGATION_CLASS) else {
        return false;
    };

    let details = doc.create_element("details");
    doc.add_class(details, "details-overlay details-reset position-relative d-block");

    let summary = doc.add(details, "summary");
    doc.set_attribute(summary, "role", "button");
    doc.add_class(summary, "btn ml-2");

    let label = doc.add(summary, "span");
    doc.add_class(label, "d-none d-md-flex flex-items-center");
    doc.set_text(label, "Show LOC");

    let caret = doc.add(label, "span");
    doc.add_class(caret, "dropdown-caret ml-1");

    doc.set_id(details, TRIGGER_ID);
    doc.append_child(container, details);
    true
}

/// Render the LOC panel for `node` under the trigger.
///
/// Returns the panel, or `None` when it already exists or there is no
/// trigger to hang it from.
pub fn render_panel(
    doc: &mut Document,
    node: &LocBreakdown,
    stats_link: Option<&str>,
) -> Option<NodeId> {
    if doc.get_element_by_id(PANEL_ID).is_some() {
        return None;
    }
    let trigger = doc.get_element_by_id(TRIGGER_ID)?;

    let wrapper = doc.create_element("div");
    doc.add_class(wrapper, "position-relative");

    let panel = doc.add(wrapper, "div");
    doc.set_id(panel, PANEL_ID);
    doc.add_class(panel, "dropdown-menu dropdown-menu-sw px-3 py-2");

    let heading = doc.add(panel, "h2");
    doc.add_class(heading, "h4 mb-1");
    doc.set_text(heading, " Lines of Code ");

    let counter = doc.add(heading, "span");
    doc.add_class(counter, COUNTER_CLASS);
    doc.set_text(counter, &node.total_lines.to_string());

    let list = doc.add(panel, "ul");
    doc.add_class(list, "list-style-none");

    for (language, lines) in node.languages() {
        let item = doc.add(list, "li");
        doc.add_class(item, "d-inline-block mr-3 text-small");

        let label = doc.add(item, "span");
        doc.add_class(label, "color-fg-default mr-1");
        doc.add_class(label, LANGUAGE_CLASS);
        doc.set_text(label, language);

        let value = doc.add(item, "span");
        doc.set_text(value, &lines.to_string());
    }

    if let Some(href) = stats_link {
        let link = doc.add(panel, "a");
        doc.set_id(link, STATS_LINK_ID);
        doc.set_attribute(link, "href", href);
        doc.set_attribute(link, "target", "_blank");
        doc.set_text(link, "More stats");
    }

    doc.append_child(trigger, wrapper);
    Some(panel)
}

/// Plain-text view of the rendered panel, read back from the page.
pub fn panel_text(doc: &Document) -> Option<String> {
    let panel = doc.get_element_by_id(PANEL_ID)?;

    let total = doc
        .find_in(panel, |e| e.has_class(COUNTER_CLASS))
        .map(|n| doc.text_content(n))
        .unwrap_or_default();
    let mut out = format!("Lines of Code: {}\n", total);

    let items: Vec<(String, String)> = doc
        .descendants(panel)
        .into_iter()
        .filter(|n| doc.element(*n).tag == "li")
        .filter_map(|item| {
            let children = &doc.element(item).children;
            let label = children.first()?;
            let value = children.get(1)?;
            Some((doc.text_content(*label), doc.text_content(*value)))
        })
        .collect();

    let width = items.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    for (label, value) in &items {
        out.push_str(&format!("  {:<width$}  {:>10}\n", label, value, width = width));
    }

    if let Some(href) = doc
        .get_element_by_id(STATS_LINK_ID)
        .and_then(|n| doc.element(n).attribute("href"))
    {
        out.push_str(&format!("More stats: {}\n", href));
    }

    Some(out)
}
