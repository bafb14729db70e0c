// Navigation state management.
// Navigation stack and breadcrumb trail for drilling into the LOC tree.

/// A node in the navigation breadcrumb trail.
#[derive(Debug, Clone)]
pub struct BreadcrumbNode {
    /// Display label for the breadcrumb.
    pub label: String,
    /// The view level this node represents.
    pub level: ViewLevel,
}

/// One level of the LOC tree being viewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewLevel {
    /// Repository root
    Repository { repo: String },
    /// Directory or file below the root
    Entry { name: String },
}

impl ViewLevel {
    /// Create a breadcrumb node for this view level.
    pub fn to_breadcrumb(&self) -> BreadcrumbNode {
        let label = match self {
            ViewLevel::Repository { repo } => repo.clone(),
            ViewLevel::Entry { name } => name.clone(),
        };
        BreadcrumbNode {
            label,
            level: self.clone(),
        }
    }
}

/// Navigation stack from the repository root down to the current entry.
#[derive(Debug, Clone)]
pub struct NavigationStack {
    /// Stack of view levels (bottom = root, top = current)
    stack: Vec<ViewLevel>,
}

impl NavigationStack {
    /// Create a new navigation stack at a repository root.
    pub fn new(repo: impl Into<String>) -> Self {
        Self {
            stack: vec![ViewLevel::Repository { repo: repo.into() }],
        }
    }

    /// Drill down into a child entry.
    pub fn push(&mut self, name: impl Into<String>) {
        self.stack.push(ViewLevel::Entry { name: name.into() });
    }

    /// Pop the current view level (go back). Returns false if at root.
    pub fn pop(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    /// Check if we can go back (not at root).
    pub fn can_go_back(&self) -> bool {
        self.stack.len() > 1
    }

    /// Path segments from the root to the current entry.
    pub fn path(&self) -> Vec<String> {
        self.stack
            .iter()
            .filter_map(|level| match level {
                ViewLevel::Entry { name } => Some(name.clone()),
                ViewLevel::Repository { .. } => None,
            })
            .collect()
    }

    /// Get the breadcrumb trail.
    pub fn breadcrumbs(&self) -> Vec<BreadcrumbNode> {
        self.stack
            .iter()
            .map(|level| level.to_breadcrumb())
            .collect()
    }

    /// Reset to root level.
    pub fn reset(&mut self) {
        self.stack.truncate(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_stack() {
        let mut nav = NavigationStack::new("octocat/Hello-World");

        assert!(!nav.can_go_back());
        assert!(nav.path().is_empty());

        nav.push("src");
        nav.push("index.ts");
        assert!(nav.can_go_back());
        assert_eq!(nav.path(), vec!["src", "index.ts"]);
        assert_eq!(
            nav.breadcrumbs()[2].level,
            ViewLevel::Entry {
                name: "index.ts".to_string()
            }
        );

        assert!(nav.pop());
        assert!(nav.pop());
        assert!(!nav.pop());
        assert!(!nav.can_go_back());
    }

    #[test]
    fn test_breadcrumbs_and_reset() {
        let mut nav = NavigationStack::new("octocat/Hello-World");
        nav.push("lib");

        let breadcrumbs = nav.breadcrumbs();
        assert_eq!(breadcrumbs.len(), 2);
        assert_eq!(breadcrumbs[0].label, "octocat/Hello-World");
        assert_eq!(breadcrumbs[1].label, "lib");

        nav.reset();
        assert!(nav.path().is_empty());
        assert_eq!(nav.breadcrumbs().len(), 1);
    }
}
