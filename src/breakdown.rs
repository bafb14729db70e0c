// LOC breakdown tree returned by the remote service.
// Validates untrusted JSON at the boundary and walks the tree by path segments.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GhlocError, Result};

/// Lines of code for a repository, directory or file.
///
/// The root node is the repository; each child is a subdirectory or file keyed
/// by its path segment. On the wire the fields are `loc`, `locByLangs` and
/// `children`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocBreakdown {
    #[serde(rename = "loc")]
    pub total_lines: u64,
    #[serde(rename = "locByLangs", default)]
    pub lines_by_language: BTreeMap<String, u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<BTreeMap<String, LocBreakdown>>,
}

/// Shape accepted from the service before normalization.
#[derive(Debug, Deserialize)]
struct RawBreakdown {
    loc: Option<u64>,
    #[serde(rename = "locByLangs")]
    loc_by_langs: Option<BTreeMap<String, u64>>,
    children: Option<BTreeMap<String, RawBreakdown>>,
}

impl RawBreakdown {
    fn normalize(self, at: &mut Vec<String>) -> Result<LocBreakdown> {
        let lines_by_language = self.loc_by_langs.unwrap_or_default();
        let total_lines = match self.loc {
            Some(loc) => loc,
            None => lines_by_language
                .values()
                .try_fold(0u64, |sum, lines| sum.checked_add(*lines))
                .ok_or_else(|| {
                    GhlocError::InvalidBreakdown(format!(
                        "language totals overflow under /{}",
                        at.join("/")
                    ))
                })?,
        };

        let children = match self.children {
            Some(raw_children) => {
                let mut children = BTreeMap::new();
                for (name, raw) in raw_children {
                    if name.is_empty() || name.contains('/') {
                        return Err(GhlocError::InvalidBreakdown(format!(
                            "bad child name {:?} under /{}",
                            name,
                            at.join("/")
                        )));
                    }
                    at.push(name.clone());
                    let child = raw.normalize(at)?;
                    at.pop();
                    children.insert(name, child);
                }
                Some(children)
            }
            None => None,
        };

        Ok(LocBreakdown {
            total_lines,
            lines_by_language,
            children,
        })
    }
}

impl LocBreakdown {
    /// Parse and validate a breakdown received from the LOC service.
    ///
    /// Counts must be non-negative integers. A missing `loc` is filled from the
    /// language counts and a missing `locByLangs` is treated as empty. Child
    /// names must be non-empty single path segments.
    pub fn from_service_json(body: &str) -> Result<Self> {
        let raw: RawBreakdown = serde_json::from_str(body)?;
        raw.normalize(&mut Vec::new())
    }

    /// Get a direct child by path segment.
    pub fn child(&self, segment: &str) -> Option<&LocBreakdown> {
        self.children.as_ref()?.get(segment)
    }

    /// Whether this node has no children (a file, or an untracked directory).
    pub fn is_leaf(&self) -> bool {
        self.children.as_ref().is_none_or(|c| c.is_empty())
    }

    /// Walk down the tree following `path`.
    pub fn descend(&self, path: &[String]) -> Result<&LocBreakdown> {
        let mut node = self;
        for (depth, segment) in path.iter().enumerate() {
            node = node
                .child(segment)
                .ok_or_else(|| GhlocError::path_not_found(&path[..=depth]))?;
        }
        Ok(node)
    }

    /// Languages ordered by line count (descending), then by name.
    pub fn languages(&self) -> Vec<(&str, u64)> {
        let mut langs: Vec<(&str, u64)> = self
            .lines_by_language
            .iter()
            .map(|(name, lines)| (name.as_str(), *lines))
            .collect();
        langs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        langs
    }

    /// Children ordered by total lines (descending), then by name.
    pub fn sorted_children(&self) -> Vec<(&str, &LocBreakdown)> {
        let mut children: Vec<(&str, &LocBreakdown)> = self
            .children
            .iter()
            .flatten()
            .map(|(name, node)| (name.as_str(), node))
            .collect();
        children.sort_by(|a, b| {
            b.1.total_lines
                .cmp(&a.1.total_lines)
                .then_with(|| a.0.cmp(b.0))
        });
        children
    }

    /// Share of this node's total that `lines` represents, in percent.
    pub fn percent_of(&self, lines: u64) -> f64 {
        if self.total_lines == 0 {
            0.0
        } else {
            lines as f64 * 100.0 / self.total_lines as f64
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_tree() -> LocBreakdown {
    LocBreakdown::from_service_json(
        r#"{
            "loc": 100,
            "locByLangs": {"TS": 100},
            "children": {
                "src": {
                    "loc": 100,
                    "locByLangs": {"TS": 100},
                    "children": {
                        "index.ts": {"loc": 40, "locByLangs": {"TS": 40}},
                        "util.ts": {"loc": 60, "locByLangs": {"TS": 60}}
                    }
                }
            }
        }"#,
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_descend_to_file() {
        let tree = sample_tree();
        let node = tree.descend(&path(&["src", "index.ts"])).unwrap();
        assert_eq!(node.total_lines, 40);
        assert_eq!(node.lines_by_language.get("TS"), Some(&40));
        assert!(node.is_leaf());
    }

    #[test]
    fn test_descend_empty_path_is_root() {
        let tree = sample_tree();
        let node = tree.descend(&[]).unwrap();
        assert_eq!(node, &tree);
    }

    #[test]
    fn test_descend_missing_path() {
        let tree = sample_tree();
        match tree.descend(&path(&["docs"])) {
            Err(GhlocError::PathNotFound { path }) => assert_eq!(path, "docs"),
            other => panic!("expected PathNotFound, got {:?}", other),
        }

        match tree.descend(&path(&["src", "index.ts", "deeper"])) {
            Err(GhlocError::PathNotFound { path }) => assert_eq!(path, "src/index.ts/deeper"),
            other => panic!("expected PathNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_loc_is_summed() {
        let tree =
            LocBreakdown::from_service_json(r#"{"locByLangs": {"Rust": 30, "TOML": 5}}"#).unwrap();
        assert_eq!(tree.total_lines, 35);
        assert!(tree.children.is_none());
    }

    #[test]
    fn test_missing_loc_overflow_is_rejected() {
        let result = LocBreakdown::from_service_json(
            r#"{"locByLangs": {"A": 18446744073709551615, "B": 1}}"#,
        );
        assert!(matches!(result, Err(GhlocError::InvalidBreakdown(_))));
    }

    #[test]
    fn test_missing_langs_is_empty() {
        let tree = LocBreakdown::from_service_json(r#"{"loc": 12}"#).unwrap();
        assert_eq!(tree.total_lines, 12);
        assert!(tree.lines_by_language.is_empty());
    }

    #[test]
    fn test_rejects_negative_counts() {
        let result = LocBreakdown::from_service_json(r#"{"loc": -1, "locByLangs": {}}"#);
        assert!(matches!(result, Err(GhlocError::Json(_))));

        let result = LocBreakdown::from_service_json(r#"{"loc": 1, "locByLangs": {"C": 1.5}}"#);
        assert!(matches!(result, Err(GhlocError::Json(_))));
    }

    #[test]
    fn test_rejects_bad_child_names() {
        let result = LocBreakdown::from_service_json(
            r#"{"loc": 1, "locByLangs": {}, "children": {"a": {"loc": 1, "children": {"x/y": {"loc": 1}}}}}"#,
        );
        match result {
            Err(GhlocError::InvalidBreakdown(msg)) => assert!(msg.contains("/a")),
            other => panic!("expected InvalidBreakdown, got {:?}", other),
        }

        let result = LocBreakdown::from_service_json(r#"{"loc": 1, "children": {"": {"loc": 1}}}"#);
        assert!(matches!(result, Err(GhlocError::InvalidBreakdown(_))));
    }

    #[test]
    fn test_languages_sorted_by_lines() {
        let tree = LocBreakdown::from_service_json(
            r#"{"loc": 60, "locByLangs": {"Go": 10, "C": 25, "Ada": 25}}"#,
        )
        .unwrap();
        assert_eq!(tree.languages(), vec![("Ada", 25), ("C", 25), ("Go", 10)]);
    }

    #[test]
    fn test_sorted_children_and_percent() {
        let tree = sample_tree();
        let src = tree.child("src").unwrap();
        let names: Vec<&str> = src.sorted_children().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["util.ts", "index.ts"]);
        assert_eq!(src.percent_of(40), 40.0);
        assert_eq!(LocBreakdown::default().percent_of(10), 0.0);
    }
}
