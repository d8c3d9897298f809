/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::collections::HashSet;
use std::io;

use crossterm::event::Event;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use crushmap::FetchError;
use crushmap::FetchState;
use crushmap::Forest;
use crushmap::HealthClient;
use crushmap::NotificationSet;
use crushmap::Poller;
use crushmap::SelectionState;
use crushmap::build_forest;
use crushmap::config::PollArgs;
use crushmap::config::interval_label;
use crushmap::snapshot::FullHealth;
use crushmap::snapshot::MinimalHealth;
use crushmap::snapshot::Summary;
use crushmap::summary::HealthColor;
use crushmap::summary::block_health_color;
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::model::Cursor;
use crate::model::VisibleRows;
use crate::render::ui;
use crate::theme::Theme;
use crate::theme::ThemeName;
use crate::tree::collect_parent_ids;
use crate::tree::flatten_forest;

/// Shown while the minimal health endpoint cannot be reached.
pub(crate) const HEALTH_UNREACHABLE: &str = "health-unreachable";
/// Shown while the cluster reports anything other than `HEALTH_OK`.
pub(crate) const HEALTH_WARN: &str = "health-warn";

/// Rows moved by PageUp/PageDown.
const PAGE: usize = 10;

/// Result of handling a key event.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum KeyResult {
    /// Nothing changed.
    None,
    /// The cursor moved.
    Moved,
    /// A node was selected or the selection was cleared.
    SelectionChanged,
    /// Expand/collapse state changed.
    ViewChanged,
}

/// Runtime state for the TUI.
///
/// `App` owns the last successfully built forest, the user's
/// expand/collapse and selection state, and the latest navigation bar
/// data. Snapshots are applied through [`FetchState`] ordering, so a
/// late response never replaces a fresher one.
pub(crate) struct App {
    /// Base URL of the management API, for the header.
    pub(crate) base_url: String,
    pub(crate) should_quit: bool,

    /// Forest currently on screen. Replaced only by a newer snapshot
    /// that built cleanly.
    pub(crate) forest: Forest,
    /// Source ids the user collapsed. Everything else is expanded.
    pub(crate) collapsed: HashSet<i64>,
    /// Navigation cursor over visible rows; the row under it is the
    /// active row.
    pub(crate) cursor: Cursor,
    pub(crate) tree_scroll_offset: usize,
    /// Updated before every draw.
    pub(crate) tree_viewport_height: usize,
    pub(crate) selection: SelectionState,

    /// Ordering of applied topology results; the value is the node
    /// count of the applied snapshot.
    pub(crate) topology: FetchState<usize>,
    pub(crate) health: FetchState<MinimalHealth>,
    pub(crate) summary: FetchState<Summary>,
    pub(crate) notifications: NotificationSet,

    /// Last topology fetch or build error, shown in the header.
    pub(crate) error: Option<String>,
    /// Human-readable refresh interval (e.g. "5s").
    pub(crate) refresh_interval_label: String,

    pub(crate) theme: Theme,
    pub(crate) theme_name: ThemeName,
}

impl App {
    pub(crate) fn new(base_url: &str, theme_name: ThemeName) -> Self {
        Self {
            base_url: base_url.to_string(),
            should_quit: false,
            forest: Forest::default(),
            collapsed: HashSet::new(),
            cursor: Cursor::new(0),
            tree_scroll_offset: 0,
            tree_viewport_height: 20,
            selection: SelectionState::default(),
            topology: FetchState::Unknown,
            health: FetchState::Unknown,
            summary: FetchState::Unknown,
            notifications: NotificationSet::new(),
            error: None,
            refresh_interval_label: String::new(),
            theme: Theme::new(theme_name),
            theme_name,
        }
    }

    /// Rows currently on screen, top to bottom.
    pub(crate) fn visible_rows(&self) -> VisibleRows<'_> {
        VisibleRows::new(flatten_forest(&self.forest.roots, &self.collapsed))
    }

    /// Node count of the applied topology, if any.
    pub(crate) fn node_count(&self) -> Option<usize> {
        self.topology.value().copied()
    }

    pub(crate) fn block_color(&self) -> Option<HealthColor> {
        block_health_color(self.summary.value())
    }

    /// Apply a topology fetch result tagged with `seq`.
    ///
    /// A result older than the one already applied is dropped. A
    /// fetch or build failure is reported in the header and leaves the
    /// current forest on screen.
    pub(crate) fn apply_topology(&mut self, seq: u64, result: Result<FullHealth, FetchError>) {
        let built = result.map_err(|e| e.to_string()).and_then(|health| {
            build_forest(health.nodes()).map_err(|e| format!("invalid topology: {}", e))
        });
        let incoming = FetchState::from_result(seq, built);
        if !incoming.supersedes(&self.topology) {
            tracing::debug!(seq, "discarding stale topology snapshot");
            return;
        }
        match incoming {
            FetchState::Ready { seq, value: forest } => {
                let nodes = forest.index.len();
                tracing::debug!(seq, nodes, "applying topology snapshot");
                self.topology = FetchState::Ready { seq, value: nodes };
                self.error = None;
                self.set_forest(forest);
            }
            FetchState::Error { seq, msg } => {
                tracing::warn!(seq, error = %msg, "topology refresh failed");
                self.error = Some(msg.clone());
                self.topology = FetchState::Error { seq, msg };
            }
            FetchState::Unknown => {}
        }
    }

    /// Apply a minimal health result and update the notifications it
    /// drives.
    pub(crate) fn apply_health(&mut self, seq: u64, result: Result<MinimalHealth, FetchError>) {
        if let Err(e) = &result {
            tracing::warn!(seq, error = %e, "minimal health fetch failed");
        }
        if !self.health.apply(FetchState::from_result(seq, result)) {
            tracing::debug!(seq, "discarding stale health result");
            return;
        }
        match &self.health {
            FetchState::Ready { value, .. } => {
                self.notifications.set_active(HEALTH_UNREACHABLE, false);
                self.notifications.set_active(HEALTH_WARN, !value.is_ok());
            }
            FetchState::Error { .. } => {
                self.notifications.set_active(HEALTH_UNREACHABLE, true);
            }
            FetchState::Unknown => {}
        }
    }

    pub(crate) fn apply_summary(&mut self, seq: u64, result: Result<Summary, FetchError>) {
        if let Err(e) = &result {
            tracing::warn!(seq, error = %e, "summary fetch failed");
        }
        if !self.summary.apply(FetchState::from_result(seq, result)) {
            tracing::debug!(seq, "discarding stale summary");
        }
    }

    /// Swap in a freshly built forest.
    ///
    /// Collapse state is kept for source ids that are still parents,
    /// the cursor follows the previously active node, and the
    /// selection detail is recomputed from the new
    /// index.
    pub(crate) fn set_forest(&mut self, forest: Forest) {
        let prev = self
            .visible_rows()
            .get(&self.cursor)
            .map(|row| row.node.source_id);

        self.forest = forest;
        let parents = collect_parent_ids(&self.forest.roots);
        self.collapsed.retain(|id| parents.contains(id));
        self.selection.refresh(&self.forest.index);

        let rows = self.visible_rows();
        let len = rows.len();
        let restored = prev.and_then(|id| rows.position_of(id));
        self.cursor.update_len(len);
        if let Some(pos) = restored {
            self.cursor.set_pos(pos);
        }
        self.ensure_cursor_visible();
    }

    /// Adjust the scroll offset so the cursor row is on screen.
    pub(crate) fn ensure_cursor_visible(&mut self) {
        let pos = self.cursor.pos();
        if pos < self.tree_scroll_offset {
            self.tree_scroll_offset = pos;
        } else if pos >= self.tree_scroll_offset + self.tree_viewport_height {
            self.tree_scroll_offset = pos.saturating_sub(self.tree_viewport_height.saturating_sub(1));
        }
    }

    fn moved(&mut self, changed: bool) -> KeyResult {
        if changed {
            self.ensure_cursor_visible();
            KeyResult::Moved
        } else {
            KeyResult::None
        }
    }

    fn relayout(&mut self) -> KeyResult {
        let len = self.visible_rows().len();
        self.cursor.update_len(len);
        self.ensure_cursor_visible();
        KeyResult::ViewChanged
    }

    /// Handle a single keypress.
    pub(crate) fn on_key(&mut self, key: KeyEvent) -> KeyResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                KeyResult::None
            }
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                KeyResult::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let changed = self.cursor.move_up();
                self.moved(changed)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let changed = self.cursor.move_down();
                self.moved(changed)
            }
            KeyCode::Home | KeyCode::Char('g') => {
                let changed = self.cursor.home();
                self.moved(changed)
            }
            KeyCode::End | KeyCode::Char('G') => {
                let changed = self.cursor.end();
                self.moved(changed)
            }
            KeyCode::PageDown => {
                let changed = self.cursor.page_down(PAGE);
                self.moved(changed)
            }
            KeyCode::Char('d') if ctrl => {
                let changed = self.cursor.page_down(PAGE);
                self.moved(changed)
            }
            KeyCode::PageUp => {
                let changed = self.cursor.page_up(PAGE);
                self.moved(changed)
            }
            KeyCode::Char('u') if ctrl => {
                let changed = self.cursor.page_up(PAGE);
                self.moved(changed)
            }
            KeyCode::Char('l') if ctrl => {
                self.tree_scroll_offset = self.cursor.pos();
                KeyResult::None
            }
            KeyCode::Enter => {
                // Activate the row under the cursor, then select it.
                let target = self
                    .visible_rows()
                    .get(&self.cursor)
                    .map(|row| row.node.source_id);
                match target {
                    Some(source_id) => {
                        self.selection.select(&self.forest.index, source_id);
                        KeyResult::SelectionChanged
                    }
                    None => KeyResult::None,
                }
            }
            KeyCode::Esc => {
                self.selection.deselect();
                KeyResult::SelectionChanged
            }
            KeyCode::Tab => {
                let target = self
                    .visible_rows()
                    .get(&self.cursor)
                    .filter(|row| row.node.has_children())
                    .and_then(|row| row.node.source_id);
                match target {
                    Some(id) => {
                        if !self.collapsed.remove(&id) {
                            self.collapsed.insert(id);
                        }
                        self.relayout()
                    }
                    None => KeyResult::None,
                }
            }
            KeyCode::Char('c') => {
                self.collapsed = collect_parent_ids(&self.forest.roots);
                self.relayout()
            }
            KeyCode::Char('e') => {
                self.collapsed.clear();
                self.relayout()
            }
            _ => KeyResult::None,
        }
    }
}

/// Drive the main event loop.
///
/// Polls the topology and the navigation bar sources on their own
/// periods, redraws after every event, and handles keys until the
/// user quits. The pollers are dropped on return, which cancels any
/// fetch still in flight.
pub(crate) async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    client: &HealthClient,
    poll: &PollArgs,
    mut app: App,
) -> io::Result<()> {
    app.refresh_interval_label = interval_label(poll.refresh_ms);

    let c = client.clone();
    let mut topology = Poller::spawn(poll.topology_period(), move || {
        let c = c.clone();
        async move { c.full_health().await }
    });
    let c = client.clone();
    let mut health = Poller::spawn(poll.health_period(), move || {
        let c = c.clone();
        async move { c.minimal_health().await }
    });
    let c = client.clone();
    let mut summary = Poller::spawn(poll.health_period(), move || {
        let c = c.clone();
        async move { c.summary().await }
    });
    let mut events = EventStream::new();

    loop {
        // Body height is the terminal minus header (3) and footer (2).
        let terminal_size = terminal.size()?;
        app.tree_viewport_height = terminal_size.height.saturating_sub(5) as usize;

        terminal.draw(|frame| ui(frame, &app))?;

        tokio::select! {
            Some(polled) = topology.next() => app.apply_topology(polled.seq, polled.result),
            Some(polled) = health.next() => app.apply_health(polled.seq, polled.result),
            Some(polled) = summary.next() => app.apply_summary(polled.seq, polled.result),
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        if app.on_key(key) == KeyResult::SelectionChanged {
                            tracing::debug!(selected = ?app.selection.selected(), "selection changed");
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e),
                    None => break,
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
