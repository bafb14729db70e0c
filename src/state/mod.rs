// State management module.
// Handles tree navigation, loading state and the activity console for the TUI.

pub mod console;
pub mod navigation;
pub mod tree;

pub use console::{ConsoleLevel, ConsoleState};
pub use navigation::BreadcrumbNode;
pub use tree::{LoadingState, TreeState};
