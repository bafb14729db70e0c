// In-memory page model.
// An element arena with id lookup, class/attribute queries and text content.

use std::collections::{BTreeMap, HashMap};

/// Handle to an element in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
    pub children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Element {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// A page: its location plus an element tree rooted at `body`.
///
/// Elements are created detached and become part of the page once appended
/// under the body. Elements are never removed.
#[derive(Debug, Clone)]
pub struct Document {
    location: String,
    nodes: Vec<Element>,
    /// First attached element for each id.
    ids: HashMap<String, NodeId>,
    body: NodeId,
}

impl Document {
    pub fn new(location: impl Into<String>) -> Self {
        let body = Element {
            tag: "body".to_string(),
            ..Default::default()
        };
        Self {
            location: location.into(),
            nodes: vec![body],
            ids: HashMap::new(),
            body: NodeId(0),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Client-side navigation: the URL changes, the tree stays.
    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn element(&self, node: NodeId) -> &Element {
        &self.nodes[node.0]
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Element {
            tag: tag.to_string(),
            ..Default::default()
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Create an element and append it to `parent`.
    pub fn add(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let node = self.create_element(tag);
        self.append_child(parent, node);
        node
    }

    pub fn set_id(&mut self, node: NodeId, id: &str) {
        self.nodes[node.0].id = Some(id.to_string());
        if self.is_attached(node) {
            self.ids.entry(id.to_string()).or_insert(node);
        }
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        for class in class.split_whitespace() {
            if !self.nodes[node.0].has_class(class) {
                self.nodes[node.0].classes.push(class.to_string());
            }
        }
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.nodes[node.0]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.nodes[node.0].text = text.to_string();
    }

    /// Append a detached `child` under `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.nodes[child.0].parent.is_some() || child == self.body {
            return;
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        if self.is_attached(parent) {
            self.register_ids(child);
        }
    }

    fn register_ids(&mut self, node: NodeId) {
        if let Some(id) = self.nodes[node.0].id.clone() {
            self.ids.entry(id).or_insert(node);
        }
        let children = self.nodes[node.0].children.clone();
        for child in children {
            self.register_ids(child);
        }
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == self.body {
                return true;
            }
            current = self.nodes[n.0].parent;
        }
        false
    }

    /// Attached element with the given id.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    /// Number of attached elements carrying `id`.
    pub fn count_with_id(&self, id: &str) -> usize {
        self.descendants(self.body)
            .into_iter()
            .filter(|n| self.element(*n).id.as_deref() == Some(id))
            .count()
    }

    /// `root` and everything below it, in document order.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.element(node).children.iter().rev().copied());
        }
        out
    }

    /// First element under `root` matching `pred`, in document order.
    pub fn find_in(&self, root: NodeId, pred: impl Fn(&Element) -> bool) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|n| pred(self.element(*n)))
    }

    /// First attached element with `class`.
    pub fn query_class(&self, class: &str) -> Option<NodeId> {
        self.find_in(self.body, |e| e.has_class(class))
    }

    /// First attached element whose attribute `name` equals `value`.
    pub fn query_attribute(&self, name: &str, value: &str) -> Option<NodeId> {
        self.find_in(self.body, |e| e.attribute(name) == Some(value))
    }

    /// Own text followed by the text of all descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        self.descendants(node)
            .into_iter()
            .map(|n| self.element(n).text.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_lookup_only_for_attached() {
        let mut doc = Document::new("/o/r");
        let detached = doc.create_element("div");
        doc.set_id(detached, "x");
        assert_eq!(doc.get_element_by_id("x"), None);

        let body = doc.body();
        doc.append_child(body, detached);
        assert_eq!(doc.get_element_by_id("x"), Some(detached));
    }

    #[test]
    fn test_subtree_ids_registered_on_append() {
        let mut doc = Document::new("/o/r");
        let wrapper = doc.create_element("div");
        let inner = doc.add(wrapper, "span");
        doc.set_id(inner, "inner");
        assert_eq!(doc.get_element_by_id("inner"), None);

        let body = doc.body();
        doc.append_child(body, wrapper);
        assert_eq!(doc.get_element_by_id("inner"), Some(inner));
    }

    #[test]
    fn test_first_id_wins() {
        let mut doc = Document::new("/o/r");
        let body = doc.body();
        let first = doc.add(body, "div");
        doc.set_id(first, "dup");
        let second = doc.add(body, "div");
        doc.set_id(second, "dup");

        assert_eq!(doc.get_element_by_id("dup"), Some(first));
        assert_eq!(doc.count_with_id("dup"), 2);
    }

    #[test]
    fn test_queries_and_text() {
        let mut doc = Document::new("/o/r");
        let body = doc.body();
        let nav = doc.add(body, "nav");
        doc.add_class(nav, "file-navigation  d-flex");
        let a = doc.add(nav, "span");
        doc.set_text(a, "repo");
        let b = doc.add(nav, "span");
        doc.set_text(b, " / src");
        doc.set_attribute(b, "itemprop", "name");

        assert_eq!(doc.query_class("file-navigation"), Some(nav));
        assert_eq!(doc.query_class("d-flex"), Some(nav));
        assert_eq!(doc.query_attribute("itemprop", "name"), Some(b));
        assert_eq!(doc.text_content(nav), "repo / src");
        assert_eq!(doc.element(nav).classes.len(), 2);
    }

    #[test]
    fn test_append_is_single_parent() {
        let mut doc = Document::new("/o/r");
        let body = doc.body();
        let a = doc.add(body, "div");
        let b = doc.add(body, "div");
        let child = doc.add(a, "span");
        doc.append_child(b, child);

        assert_eq!(doc.element(a).children, vec![child]);
        assert!(doc.element(b).children.is_empty());
    }
}
