// App state and main event loop.
// Manages tabs, tree navigation, branch switching and background LOC loads.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::{debug, info};

use ghloc::{AppContext, CacheKey, LocBreakdown, RepositoryLocator};

use crate::state::{ConsoleState, TreeState};
use crate::ui;

const BRANCH_HISTORY_LIMIT: usize = 10;

/// Active tab in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Files,
    Languages,
    Console,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Files, Tab::Languages, Tab::Console];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Files => "Files",
            Tab::Languages => "Languages",
            Tab::Console => "Console",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Files => Tab::Languages,
            Tab::Languages => Tab::Console,
            Tab::Console => Tab::Files,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Tab::Files => Tab::Console,
            Tab::Languages => Tab::Files,
            Tab::Console => Tab::Languages,
        }
    }
}

/// Result of a background load, tagged with the key it was requested for.
#[derive(Debug)]
pub struct LoadOutcome {
    pub key: CacheKey,
    pub result: Result<LocBreakdown, String>,
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Branch switch prompt.
#[derive(Debug, Clone, Default)]
pub struct BranchPrompt {
    pub input: String,
    pub history_selection: Option<usize>,
}

/// Main application state.
pub struct App {
    ctx: Arc<AppContext>,
    /// Repository, branch and initial path being browsed.
    pub locator: RepositoryLocator,
    pub active_tab: Tab,
    pub tree: TreeState,
    pub console: ConsoleState,
    pub branch_prompt: Option<BranchPrompt>,
    /// Recently viewed branches, most recent first.
    pub branch_history: Vec<String>,
    pub show_help: bool,
    pub should_quit: bool,
    outcomes_tx: mpsc::UnboundedSender<LoadOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<LoadOutcome>,
}

impl App {
    pub fn new(ctx: Arc<AppContext>, locator: RepositoryLocator) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        let branch_history = locator.branch.iter().cloned().collect();
        Self {
            ctx,
            tree: TreeState::new(locator.repo()),
            locator,
            active_tab: Tab::default(),
            console: ConsoleState::new(),
            branch_prompt: None,
            branch_history,
            show_help: false,
            should_quit: false,
            outcomes_tx,
            outcomes_rx,
        }
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        self.request_load();
        while !self.should_quit {
            self.drain_outcomes();
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Start loading the breakdown for the current locator in the background.
    ///
    /// A load that is still running when the view changes is not cancelled;
    /// it finishes, fills the cache, and its result is ignored.
    pub fn request_load(&mut self) {
        self.spawn_load(false);
    }

    /// Fetch the current locator from the service, bypassing the cache.
    pub fn refresh(&mut self) {
        self.spawn_load(true);
    }

    fn spawn_load(&mut self, bypass_cache: bool) {
        let key = self.locator.cache_key();
        self.tree.set_loading();
        if bypass_cache {
            self.console.info(format!("Refetching {}", key));
        } else {
            self.console.info(format!("Loading {}", key));
        }

        let ctx = self.ctx.clone();
        let tx = self.outcomes_tx.clone();
        tokio::spawn(async move {
            let result = if bypass_cache {
                ctx.client().fetch(&key).await
            } else {
                ctx.locs(&key).await
            };
            let result = result.map_err(|e| e.to_string());
            let fetched_at = match &result {
                Ok(_) => ctx
                    .cache()
                    .read(&key)
                    .await
                    .and_then(|entry| DateTime::from_timestamp_millis(entry.fetched_at_millis)),
                Err(_) => None,
            };
            // The receiver only goes away on exit
            let _ = tx.send(LoadOutcome {
                key,
                result,
                fetched_at,
            });
        });
    }

    /// Apply every finished load.
    pub fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.outcomes_rx.try_recv() {
            self.apply_outcome(outcome);
        }
    }

    /// Apply a finished load if it is for the key currently being viewed.
    pub fn apply_outcome(&mut self, outcome: LoadOutcome) {
        let current = self.locator.cache_key();
        if outcome.key != current {
            debug!(stale = %outcome.key, %current, "Ignoring load for previous view");
            return;
        }

        match outcome.result {
            Ok(root) => {
                info!(key = %current, total = root.total_lines, "LOC breakdown loaded");
                self.console
                    .info(format!("Loaded {} ({} lines)", current, root.total_lines));
                if let Err(e) =
                    self.tree
                        .set_loaded(root, outcome.fetched_at, &self.locator.path_segments)
                {
                    self.console.warn(e.to_string());
                }
            }
            Err(e) => {
                self.console.error(format!("{}: {}", current, e));
                self.tree.set_error(e);
            }
        }
    }

    /// Browse another branch of the same repository, keeping the current path.
    pub fn switch_branch(&mut self, branch: &str) {
        let branch = branch.trim();
        let branch = (!branch.is_empty()).then(|| branch.to_string());
        if branch == self.locator.branch {
            return;
        }

        self.locator.path_segments = self.tree.nav.path();
        self.locator.branch = branch.clone();
        if let Some(branch) = branch {
            self.branch_history.retain(|b| b != &branch);
            self.branch_history.insert(0, branch);
            self.branch_history.truncate(BRANCH_HISTORY_LIMIT);
        }

        self.tree = TreeState::new(self.locator.repo());
        self.request_load();
    }

    /// Link to the statistics page for the current position.
    pub fn stats_link(&self) -> Option<String> {
        let locator = self.locator.clone().with_path(self.tree.nav.path());
        self.ctx.stats_link(&locator).ok()
    }

    /// Handle keyboard and other events.
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.branch_prompt.is_some() {
            self.handle_prompt_key(key);
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Tab => self.set_tab(self.active_tab.next()),
            KeyCode::BackTab => self.set_tab(self.active_tab.prev()),
            KeyCode::Char('1') => self.set_tab(Tab::Files),
            KeyCode::Char('2') => self.set_tab(Tab::Languages),
            KeyCode::Char('3') => self.set_tab(Tab::Console),
            KeyCode::Up | KeyCode::Char('k') => match self.active_tab {
                Tab::Console => self.console.select_prev(),
                _ => self.tree.select_prev(),
            },
            KeyCode::Down | KeyCode::Char('j') => match self.active_tab {
                Tab::Console => self.console.select_next(),
                _ => self.tree.select_next(),
            },
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
                if self.active_tab == Tab::Files {
                    let entered_file = self.tree.enter_selected().map(|node| node.is_leaf());
                    if entered_file == Some(true) {
                        self.set_tab(Tab::Languages);
                    }
                }
            }
            KeyCode::Esc | KeyCode::Left | KeyCode::Backspace | KeyCode::Char('h') => {
                if self.active_tab != Tab::Console {
                    self.tree.go_back();
                }
            }
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('b') => {
                self.branch_prompt = Some(BranchPrompt {
                    input: self.locator.branch.clone().unwrap_or_default(),
                    history_selection: None,
                });
            }
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.branch_prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.branch_prompt = None,
            KeyCode::Enter => {
                let branch = prompt.input.clone();
                self.branch_prompt = None;
                self.switch_branch(&branch);
            }
            KeyCode::Backspace => {
                prompt.input.pop();
                prompt.history_selection = None;
            }
            KeyCode::Up | KeyCode::Down if !self.branch_history.is_empty() => {
                let last = self.branch_history.len() - 1;
                let next = match (prompt.history_selection, key.code) {
                    (None, _) => 0,
                    (Some(i), KeyCode::Up) => i.saturating_sub(1),
                    (Some(i), _) => (i + 1).min(last),
                };
                prompt.history_selection = Some(next);
                prompt.input = self.branch_history[next].clone();
            }
            KeyCode::Char(c) => {
                prompt.input.push(c);
                prompt.history_selection = None;
            }
            _ => {}
        }
    }

    fn set_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        if tab == Tab::Console {
            self.console.mark_read();
        }
    }
}
