// Console tab state.
// Activity log of loads, cache hits and failures shown inside the TUI.

use chrono::{DateTime, Utc};
use ratatui::widgets::ListState;

/// Oldest messages are dropped past this many.
pub const MAX_MESSAGES: usize = 500;

/// Console message level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Info,
    Warn,
    Error,
}

/// A console message for the activity log.
#[derive(Debug, Clone)]
pub struct ConsoleMessage {
    pub level: ConsoleLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ConsoleMessage {
    fn new(level: ConsoleLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ConsoleState {
    pub messages: Vec<ConsoleMessage>,
    /// Warnings and errors not yet seen (for the tab badge).
    pub unread: usize,
    pub list_state: ListState,
}

impl ConsoleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ConsoleMessage::new(ConsoleLevel::Info, message));
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.unread += 1;
        self.push(ConsoleMessage::new(ConsoleLevel::Warn, message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.unread += 1;
        self.push(ConsoleMessage::new(ConsoleLevel::Error, message));
    }

    fn push(&mut self, message: ConsoleMessage) {
        self.messages.push(message);
        if self.messages.len() > MAX_MESSAGES {
            let excess = self.messages.len() - MAX_MESSAGES;
            self.messages.drain(..excess);
            self.unread = self.unread.min(MAX_MESSAGES);
        }
        // Newest is shown first
        self.list_state.select(Some(0));
    }

    pub fn mark_read(&mut self) {
        self.unread = 0;
    }

    pub fn select_prev(&mut self) {
        if let Some(i) = self.list_state.selected() {
            self.list_state.select(Some(i.saturating_sub(1)));
        }
    }

    pub fn select_next(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        let last = self.messages.len() - 1;
        let i = self.list_state.selected().map_or(0, |i| (i + 1).min(last));
        self.list_state.select(Some(i));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unread_counts_problems_only() {
        let mut console = ConsoleState::new();
        console.info("Loaded o/r");
        assert_eq!(console.unread, 0);

        console.warn("stale");
        console.error("boom");
        assert_eq!(console.unread, 2);
        assert_eq!(console.messages[2].level, ConsoleLevel::Error);

        console.mark_read();
        assert_eq!(console.unread, 0);
    }

    #[test]
    fn test_history_is_capped() {
        let mut console = ConsoleState::new();
        for i in 0..MAX_MESSAGES + 20 {
            console.error(format!("failure {}", i));
        }
        assert_eq!(console.messages.len(), MAX_MESSAGES);
        assert_eq!(console.messages[0].message, "failure 20");
        assert_eq!(console.unread, MAX_MESSAGES);
        assert_eq!(console.list_state.selected(), Some(0));
    }

    #[test]
    fn test_selection_bounds() {
        let mut console = ConsoleState::new();
        console.select_next();
        assert_eq!(console.list_state.selected(), None);

        console.info("a");
        console.info("b");
        assert_eq!(console.list_state.selected(), Some(0));
        console.select_next();
        console.select_next();
        assert_eq!(console.list_state.selected(), Some(1));
        console.select_prev();
        console.select_prev();
        assert_eq!(console.list_state.selected(), Some(0));
    }
}
