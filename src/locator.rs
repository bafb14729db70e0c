// Repository identity resolution.
// Turns a page URL plus DOM hints into the owner/name/branch/path being viewed.

use std::fmt;
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use reqwest::Url;

/// Account names: alphanumerics and single inner hyphens.
static OWNER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9](?:-?[A-Za-z0-9])*$").expect("valid owner regex"));

/// Repository names.
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("valid name regex"));

/// Top-level site routes that look like `/<owner>/<name>` but are not repositories.
const RESERVED_OWNERS: &[&str] = &[
    "about",
    "apps",
    "codespaces",
    "collections",
    "contact",
    "dashboard",
    "enterprise",
    "explore",
    "features",
    "issues",
    "login",
    "marketplace",
    "new",
    "notifications",
    "orgs",
    "organizations",
    "pricing",
    "pulls",
    "search",
    "settings",
    "sponsors",
    "topics",
    "trending",
    "users",
];

/// Kind of code view the URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    /// Directory listing (`/tree/`).
    Tree,
    /// Single file (`/blob/`).
    Blob,
}

impl ViewKind {
    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "tree" => Some(ViewKind::Tree),
            "blob" => Some(ViewKind::Blob),
            _ => None,
        }
    }
}

/// What is being viewed: repository, branch and sub-path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    pub owner: String,
    pub name: String,
    pub branch: Option<String>,
    pub view: Option<ViewKind>,
    /// Non-empty path segments below the repository root.
    pub path_segments: Vec<String>,
}

impl RepositoryLocator {
    /// Locator for a repository root with no branch.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            branch: None,
            view: None,
            path_segments: Vec::new(),
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn with_path<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path_segments = segments.into_iter().map(Into::into).collect();
        self
    }

    /// `owner/name`.
    pub fn repo(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Cache key: `owner/name` plus `/branch` when known. Paths are not part of it.
    pub fn cache_key(&self) -> CacheKey {
        let mut key = self.repo();
        if let Some(branch) = &self.branch {
            key.push('/');
            key.push_str(branch);
        }
        CacheKey(key)
    }
}

/// Storage and request key for one repository/branch breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(key: impl Into<String>) -> Self {
        CacheKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Values read from the page that take precedence over the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageHints {
    /// Text of the current-path breadcrumb, e.g. `Hello-World / lib / a.rs`.
    pub path: Option<String>,
    /// Active branch from the branch selector.
    pub branch: Option<String>,
    /// `(owner, name)` from repository microdata.
    pub repository: Option<(String, String)>,
}

/// Path component of an absolute URL or of an already-bare path. Query and
/// fragment are dropped.
pub fn url_path(location: &str) -> String {
    if let Ok(url) = Url::parse(location) {
        return url.path().to_string();
    }
    let end = location.find(['?', '#']).unwrap_or(location.len());
    location[..end].to_string()
}

fn split_segments(path: &str) -> Vec<String> {
    path.split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Segments of the location's path, percent-decoded.
fn location_segments(location: &str) -> Vec<String> {
    split_segments(&url_path(location))
        .into_iter()
        .map(|segment| percent_decode_str(&segment).decode_utf8_lossy().into_owned())
        .collect()
}

/// Resolve the repository being viewed at `location`.
///
/// Returns `None` when the location is not a repository page.
pub fn resolve(location: &str, hints: &PageHints) -> Option<RepositoryLocator> {
    let segments = location_segments(location);
    if segments.len() < 2 {
        return None;
    }

    let owner = segments[0].as_str();
    let name = segments[1].strip_suffix(".git").unwrap_or(&segments[1]);
    if RESERVED_OWNERS.contains(&owner.to_ascii_lowercase().as_str())
        || !OWNER_RE.is_match(owner)
        || !NAME_RE.is_match(name)
    {
        return None;
    }

    let mut locator = RepositoryLocator::new(owner, name);

    let view = segments.get(2).and_then(|s| ViewKind::from_segment(s));
    if let Some(view) = view {
        let rest = &segments[3..];
        if rest.is_empty() {
            return None;
        }
        locator.view = Some(view);

        let dom_branch = hints
            .branch
            .as_deref()
            .map(split_segments)
            .filter(|b| !b.is_empty() && rest.starts_with(b));
        match dom_branch {
            Some(branch) => {
                locator.branch = Some(branch.join("/"));
                locator.path_segments = rest[branch.len()..].to_vec();
            }
            None => {
                locator.branch = Some(rest[0].clone());
                locator.path_segments = rest[1..].to_vec();
            }
        }
    }

    if locator.branch.is_none() {
        locator.branch = hints
            .branch
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_string);
    }

    if let Some((owner, name)) = &hints.repository {
        if !owner.trim().is_empty() && !name.trim().is_empty() {
            locator.owner = owner.trim().to_string();
            locator.name = name.trim().to_string();
        }
    }

    if let Some(text) = &hints.path {
        let mut dom_path = split_segments(text);
        if dom_path.first().is_some_and(|first| first == &locator.name) {
            dom_path.remove(0);
        }
        locator.path_segments = dom_path;
    }

    Some(locator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_hints() -> PageHints {
        PageHints::default()
    }

    #[test]
    fn test_tree_view() {
        let locator = resolve("/octocat/Hello-World/tree/main/lib", &no_hints()).unwrap();
        assert_eq!(locator.owner, "octocat");
        assert_eq!(locator.name, "Hello-World");
        assert_eq!(locator.branch.as_deref(), Some("main"));
        assert_eq!(locator.view, Some(ViewKind::Tree));
        assert_eq!(locator.path_segments, vec!["lib".to_string()]);
    }

    #[test]
    fn test_repository_root() {
        let locator = resolve("https://github.com/octocat/Hello-World", &no_hints()).unwrap();
        assert_eq!(locator, RepositoryLocator::new("octocat", "Hello-World"));
        assert_eq!(locator.cache_key().as_str(), "octocat/Hello-World");
    }

    #[test]
    fn test_blob_view_with_query_and_trailing_slash() {
        let locator = resolve(
            "https://github.com/rust-lang/rust/blob/master/src/lib.rs?plain=1#L10",
            &no_hints(),
        )
        .unwrap();
        assert_eq!(locator.view, Some(ViewKind::Blob));
        assert_eq!(locator.branch.as_deref(), Some("master"));
        assert_eq!(locator.path_segments, vec!["src", "lib.rs"]);

        let locator = resolve("/a/b/tree/dev//x/", &no_hints()).unwrap();
        assert_eq!(locator.path_segments, vec!["x"]);
        assert_eq!(locator.cache_key().as_str(), "a/b/dev");
    }

    #[test]
    fn test_encoded_segments_are_decoded() {
        let absolute =
            resolve("https://github.com/o/r/tree/main/my%20dir/日本.rs", &no_hints()).unwrap();
        assert_eq!(absolute.path_segments, vec!["my dir", "日本.rs"]);

        let bare = resolve("/o/r/tree/main/my dir/日本.rs", &no_hints()).unwrap();
        assert_eq!(bare.path_segments, absolute.path_segments);

        let branch = resolve("/o/r/tree/release%2Fv1", &no_hints()).unwrap();
        assert_eq!(branch.branch.as_deref(), Some("release/v1"));
    }

    #[test]
    fn test_not_a_repository() {
        assert!(resolve("/", &no_hints()).is_none());
        assert!(resolve("/octocat", &no_hints()).is_none());
        assert!(resolve("/settings/profile", &no_hints()).is_none());
        assert!(resolve("/orgs/rust-lang/repositories", &no_hints()).is_none());
        assert!(resolve("/bad--owner/repo", &no_hints()).is_none());
        assert!(resolve("/octocat/Hello-World/tree", &no_hints()).is_none());
    }

    #[test]
    fn test_non_code_view_has_no_path() {
        let locator = resolve("/octocat/Hello-World/issues/12", &no_hints()).unwrap();
        assert_eq!(locator.branch, None);
        assert_eq!(locator.view, None);
        assert!(locator.path_segments.is_empty());
    }

    #[test]
    fn test_git_suffix_dropped() {
        let locator = resolve("/octocat/Hello-World.git", &no_hints()).unwrap();
        assert_eq!(locator.name, "Hello-World");
    }

    #[test]
    fn test_dom_branch_with_slash() {
        let hints = PageHints {
            branch: Some("feature/login".to_string()),
            ..Default::default()
        };
        let locator = resolve("/o/r/tree/feature/login/src/auth", &hints).unwrap();
        assert_eq!(locator.branch.as_deref(), Some("feature/login"));
        assert_eq!(locator.path_segments, vec!["src", "auth"]);
        assert_eq!(locator.cache_key().as_str(), "o/r/feature/login");
    }

    #[test]
    fn test_dom_branch_not_matching_url_is_ignored_for_tree_views() {
        let hints = PageHints {
            branch: Some("develop".to_string()),
            ..Default::default()
        };
        let locator = resolve("/o/r/tree/main/src", &hints).unwrap();
        assert_eq!(locator.branch.as_deref(), Some("main"));
        assert_eq!(locator.path_segments, vec!["src"]);
    }

    #[test]
    fn test_dom_branch_fills_root_view() {
        let hints = PageHints {
            branch: Some(" main ".to_string()),
            ..Default::default()
        };
        let locator = resolve("/o/r", &hints).unwrap();
        assert_eq!(locator.branch.as_deref(), Some("main"));
        assert_eq!(locator.cache_key().as_str(), "o/r/main");
    }

    #[test]
    fn test_dom_path_preferred() {
        let hints = PageHints {
            path: Some("r / lib / nested dir / mod.rs".to_string()),
            ..Default::default()
        };
        let locator = resolve("/o/r/blob/main/lib/nested%20dir/mod.rs", &hints).unwrap();
        assert_eq!(locator.path_segments, vec!["lib", "nested dir", "mod.rs"]);
    }

    #[test]
    fn test_microdata_overrides_owner_and_name() {
        let hints = PageHints {
            repository: Some(("OctoCat".to_string(), "hello-world".to_string())),
            ..Default::default()
        };
        let locator = resolve("/octocat/Hello-World/tree/main", &hints).unwrap();
        assert_eq!(locator.repo(), "OctoCat/hello-world");
        assert!(locator.path_segments.is_empty());
    }

    #[test]
    fn test_cache_key_isolation() {
        let plain = RepositoryLocator::new("a", "b");
        let branched = plain.clone().with_branch("main");
        assert_ne!(plain.cache_key(), branched.cache_key());

        let with_path = branched.clone().with_path(["src"]);
        assert_eq!(with_path.cache_key(), branched.cache_key());
    }
}
