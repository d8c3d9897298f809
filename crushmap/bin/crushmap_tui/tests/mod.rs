/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Tests that exercise several modules together (App + tree + cursor +
//! snapshot application). Per-module unit tests live in each module's
//! own `#[cfg(test)] mod tests` block.

use clap::Parser;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use crushmap::FetchError;
use crushmap::snapshot::FullHealth;
use crushmap::snapshot::MinimalHealth;
use crushmap::snapshot::Summary;
use crushmap::summary::HealthColor;
use crushmap::topology::NO_NODES_LABEL;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use serde_json::Value;
use serde_json::json;

use super::*;
use crate::app::HEALTH_UNREACHABLE;
use crate::app::HEALTH_WARN;
use crate::app::KeyResult;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn full(nodes: Value) -> Result<FullHealth, FetchError> {
    Ok(serde_json::from_value(json!({"osd_map": {"tree": {"nodes": nodes}}})).unwrap())
}

fn cluster() -> Value {
    json!([
        {"id": -1, "type": "root", "name": "default", "children": [-3, -2]},
        {"id": -2, "type": "host", "name": "node-a", "children": [1, 0]},
        {"id": -3, "type": "host", "name": "node-b", "children": [2]},
        {"id": 0, "type": "osd", "name": "osd.0", "status": "up", "crush_weight": 0.0194},
        {"id": 1, "type": "osd", "name": "osd.1", "status": "up", "crush_weight": 0.0194},
        {"id": 2, "type": "osd", "name": "osd.2", "status": "down", "device_class": "hdd"},
    ])
}

fn minimal(status: &str) -> Result<MinimalHealth, FetchError> {
    Ok(serde_json::from_value(json!({"health": {"status": status}})).unwrap())
}

fn decode_error() -> FetchError {
    FetchError::Decode(serde_json::from_str::<Value>("{").unwrap_err())
}

fn loaded_app() -> App {
    let mut app = App::new("http://mgr:8080", ThemeName::Nord);
    app.apply_topology(0, full(cluster()));
    app
}

fn labels(app: &App) -> Vec<String> {
    app.visible_rows()
        .as_slice()
        .iter()
        .map(|r| r.node.label.clone())
        .collect()
}

fn move_to(app: &mut App, label: &str) {
    app.on_key(key(KeyCode::Home));
    while app
        .visible_rows()
        .get(&app.cursor)
        .is_some_and(|r| r.node.label != label)
    {
        assert_eq!(app.on_key(key(KeyCode::Down)), KeyResult::Moved, "{} not visible", label);
    }
}

// Empty app has no rows and a zero cursor.
#[test]
fn empty_app_all_operations_are_noops() {
    let mut app = App::new("http://mgr:8080", ThemeName::Nord);
    assert_eq!(app.visible_rows().len(), 0);
    assert_eq!(app.on_key(key(KeyCode::Down)), KeyResult::None);
    assert_eq!(app.on_key(key(KeyCode::Tab)), KeyResult::None);
    assert_eq!(app.on_key(key(KeyCode::Enter)), KeyResult::None);
    assert_eq!(app.cursor.pos(), 0);
    assert_eq!(app.node_count(), None);
}

// New data arrives fully expanded.
#[test]
fn snapshot_arrives_fully_expanded() {
    let app = loaded_app();
    assert_eq!(
        labels(&app),
        vec![
            "default (root)",
            "node-b (host)",
            "osd.2 (osd)",
            "node-a (host)",
            "osd.0 (osd)",
            "osd.1 (osd)",
        ]
    );
    assert_eq!(app.node_count(), Some(6));
    assert!(app.error.is_none());
}

// Empty snapshot shows the sentinel, and selecting it clears the detail.
#[test]
fn empty_snapshot_shows_sentinel() {
    let mut app = App::new("http://mgr:8080", ThemeName::Nord);
    app.apply_topology(0, full(json!([])));
    assert_eq!(labels(&app), vec![NO_NODES_LABEL]);
    assert_eq!(app.on_key(key(KeyCode::Enter)), KeyResult::SelectionChanged);
    assert!(app.selection.shown().is_none());
}

// Missing node path is treated like an empty snapshot.
#[test]
fn missing_node_path_shows_sentinel() {
    let mut app = App::new("http://mgr:8080", ThemeName::Nord);
    app.apply_topology(0, Ok(serde_json::from_value(json!({"mon_status": {}})).unwrap()));
    assert_eq!(labels(&app), vec![NO_NODES_LABEL]);
}

// Enter selects the active row; Esc deselects.
#[test]
fn enter_selects_and_escape_deselects() {
    let mut app = loaded_app();
    move_to(&mut app, "osd.2 (osd)");
    assert_eq!(app.on_key(key(KeyCode::Enter)), KeyResult::SelectionChanged);
    let shown = app.selection.shown().unwrap();
    assert_eq!(shown.title, "osd.2 (osd)");
    assert_eq!(shown.detail["id"], json!(2));
    assert_eq!(shown.detail["device_class"], json!("hdd"));
    assert!(!shown.detail.contains_key("status"));

    app.on_key(key(KeyCode::Esc));
    assert!(app.selection.shown().is_none());
    assert_eq!(app.selection.selected(), None);
}

// Tab collapses and re-expands by source id.
#[test]
fn tab_toggles_collapse() {
    let mut app = loaded_app();
    move_to(&mut app, "node-a (host)");
    assert_eq!(app.on_key(key(KeyCode::Tab)), KeyResult::ViewChanged);
    assert_eq!(app.visible_rows().len(), 4);
    assert!(app.collapsed.contains(&-2));

    app.on_key(key(KeyCode::Tab));
    assert_eq!(app.visible_rows().len(), 6);

    // Leaves cannot be collapsed.
    move_to(&mut app, "osd.0 (osd)");
    assert_eq!(app.on_key(key(KeyCode::Tab)), KeyResult::None);
}

// Collapse all, then expand all.
#[test]
fn collapse_all_and_expand_all() {
    let mut app = loaded_app();
    app.on_key(key(KeyCode::End));
    app.on_key(key(KeyCode::Char('c')));
    assert_eq!(labels(&app), vec!["default (root)"]);
    assert_eq!(app.cursor.pos(), 0);

    app.on_key(key(KeyCode::Char('e')));
    assert_eq!(app.visible_rows().len(), 6);
}

// User-collapsed nodes stay collapsed across refresh.
#[test]
fn collapsed_nodes_stay_collapsed_after_refresh() {
    let mut app = loaded_app();
    move_to(&mut app, "node-b (host)");
    app.on_key(key(KeyCode::Tab));

    app.apply_topology(1, full(cluster()));
    assert_eq!(
        labels(&app),
        vec![
            "default (root)",
            "node-b (host)",
            "node-a (host)",
            "osd.0 (osd)",
            "osd.1 (osd)",
        ]
    );
    // Cursor still on the collapsed host.
    let row = app.visible_rows().get(&app.cursor).map(|r| r.node.source_id);
    assert_eq!(row, Some(Some(-3)));
}

// Collapse state for ids that vanished is dropped.
#[test]
fn collapse_state_is_pruned_for_vanished_parents() {
    let mut app = loaded_app();
    move_to(&mut app, "node-b (host)");
    app.on_key(key(KeyCode::Tab));
    app.apply_topology(
        1,
        full(json!([
            {"id": -1, "type": "root", "name": "default", "children": [-2]},
            {"id": -2, "type": "host", "name": "node-a", "children": [0]},
            {"id": 0, "type": "osd", "name": "osd.0", "status": "up"},
        ])),
    );
    assert!(app.collapsed.is_empty());
}

// The cursor follows its node when rows shift.
#[test]
fn cursor_follows_node_across_refresh() {
    let mut app = loaded_app();
    move_to(&mut app, "osd.1 (osd)");
    app.apply_topology(
        1,
        full(json!([
            {"id": -1, "type": "root", "name": "default", "children": [-2]},
            {"id": -2, "type": "host", "name": "node-a", "children": [1, 0]},
            {"id": 0, "type": "osd", "name": "osd.0", "status": "up"},
            {"id": 1, "type": "osd", "name": "osd.1", "status": "up"},
        ])),
    );
    let row = app.visible_rows().get(&app.cursor).map(|r| r.node.label.clone());
    assert_eq!(row.as_deref(), Some("osd.1 (osd)"));
}

// Stale topology results never replace a fresher forest.
#[test]
fn stale_topology_is_discarded() {
    let mut app = loaded_app();
    app.apply_topology(
        3,
        full(json!([{"id": -1, "type": "root", "name": "fresh"}])),
    );
    app.apply_topology(2, full(cluster()));
    assert_eq!(labels(&app), vec!["fresh (root)"]);
    assert_eq!(app.topology.seq(), Some(3));
}

// A failed refresh reports the error and keeps the forest.
#[test]
fn failed_refresh_keeps_previous_forest() {
    let mut app = loaded_app();
    app.apply_topology(1, Err(decode_error()));
    assert!(app.error.as_deref().unwrap().starts_with("parse error"));
    assert_eq!(app.visible_rows().len(), 6);
    assert_eq!(app.node_count(), None);

    app.apply_topology(2, full(cluster()));
    assert!(app.error.is_none());
    assert_eq!(app.node_count(), Some(6));
}

// An invalid snapshot reports the defect and keeps the forest.
#[test]
fn invalid_snapshot_keeps_previous_forest() {
    let mut app = loaded_app();
    app.apply_topology(
        1,
        full(json!([{"id": -1, "type": "root", "name": "default", "children": [7]}])),
    );
    let err = app.error.clone().unwrap();
    assert!(err.contains("invalid topology"));
    assert!(err.contains("-1") && err.contains('7'));
    assert_eq!(app.visible_rows().len(), 6);
}

// Selection detail is recomputed on refresh and kept if the node vanished.
#[test]
fn selection_detail_follows_refresh() {
    let mut app = loaded_app();
    move_to(&mut app, "osd.0 (osd)");
    app.on_key(key(KeyCode::Enter));

    app.apply_topology(
        1,
        full(json!([
            {"id": -1, "type": "root", "name": "default", "children": [0]},
            {"id": 0, "type": "osd", "name": "osd.0", "status": "down", "reweight": 0},
        ])),
    );
    let shown = app.selection.shown().unwrap();
    assert_eq!(shown.detail["reweight"], json!(0));

    app.apply_topology(2, full(json!([{"id": -1, "type": "root", "name": "default"}])));
    let shown = app.selection.shown().unwrap();
    assert_eq!(shown.title, "osd.0 (osd)");
    assert_eq!(shown.detail["reweight"], json!(0));
}

// Health results drive the two notifications.
#[test]
fn health_drives_notifications() {
    let mut app = App::new("http://mgr:8080", ThemeName::Nord);
    app.apply_health(1, minimal("HEALTH_WARN"));
    assert_eq!(app.notifications.names(), [HEALTH_WARN]);

    app.apply_health(2, Err(decode_error()));
    assert_eq!(app.notifications.names(), [HEALTH_WARN, HEALTH_UNREACHABLE]);
    assert_eq!(app.notifications.badge_class(), "top-notification-2");

    // Late success from an older fetch changes nothing.
    app.apply_health(1, minimal("HEALTH_OK"));
    assert_eq!(app.notifications.len(), 2);

    app.apply_health(3, minimal("HEALTH_OK"));
    assert!(app.notifications.is_empty());
}

// The alert count is styled by the badge class.
#[test]
fn badge_class_selects_alert_style() {
    let mut app = App::new("http://mgr:8080", ThemeName::Nord);
    let scheme = &app.theme.scheme;
    assert_eq!(
        scheme.badge_style(&app.notifications.badge_class()),
        scheme.stat_label
    );

    app.apply_health(1, minimal("HEALTH_WARN"));
    let scheme = &app.theme.scheme;
    assert_eq!(
        scheme.badge_style(&app.notifications.badge_class()),
        scheme.health_warn
    );

    app.apply_health(2, Err(decode_error()));
    let scheme = &app.theme.scheme;
    assert_eq!(
        scheme.badge_style(&app.notifications.badge_class()),
        scheme.error.add_modifier(ratatui::style::Modifier::BOLD)
    );
}

// Summary drives the block-storage indicator color.
#[test]
fn summary_drives_block_color() {
    let mut app = App::new("http://mgr:8080", ThemeName::Nord);
    assert_eq!(app.block_color(), None);
    let summary: Summary =
        serde_json::from_value(json!({"rbd_mirroring": {"errors": 0, "warnings": 2}})).unwrap();
    app.apply_summary(1, Ok(summary));
    assert_eq!(app.block_color(), Some(HealthColor::Warning));

    app.apply_summary(2, Err(decode_error()));
    assert_eq!(app.block_color(), None);
}

// Quit keys.
#[test]
fn quit_keys() {
    let mut app = loaded_app();
    app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit);
    // Ctrl-C must not be mistaken for collapse-all.
    assert!(app.collapsed.is_empty());

    let mut app = loaded_app();
    app.on_key(key(KeyCode::Char('q')));
    assert!(app.should_quit);
}

// Scrolling keeps the cursor inside the viewport.
#[test]
fn cursor_stays_visible_when_scrolling() {
    let mut app = loaded_app();
    app.tree_viewport_height = 2;
    app.on_key(key(KeyCode::End));
    assert_eq!(app.cursor.pos(), 5);
    assert_eq!(app.tree_scroll_offset, 4);
    app.on_key(key(KeyCode::Home));
    assert_eq!(app.tree_scroll_offset, 0);
}

// Full frame renders header, tree, detail and error.
#[test]
fn frame_renders_tree_and_header() {
    let mut app = loaded_app();
    app.apply_health(0, minimal("HEALTH_OK"));
    move_to(&mut app, "osd.2 (osd)");
    app.on_key(key(KeyCode::Enter));

    let mut terminal = Terminal::new(TestBackend::new(120, 20)).unwrap();
    terminal.draw(|frame| render::ui(frame, &app)).unwrap();
    let buffer = terminal.backend().buffer();
    let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
    assert!(text.contains("crushmap"));
    assert!(text.contains("HEALTH_OK"));
    assert!(text.contains("node-b (host)"));
    assert!(text.contains("device_class"));

    app.apply_topology(1, Err(decode_error()));
    terminal.draw(|frame| render::ui(frame, &app)).unwrap();
    let text: String = terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect();
    assert!(text.contains("ERROR: parse error"));
    assert!(text.contains("osd.2 (osd)"));
}

// Arguments flatten the shared client and poll options.
#[test]
fn args_parse_with_defaults() {
    let args = Args::try_parse_from(["crushmap_tui", "--addr", "mgr:8443", "--insecure"]).unwrap();
    assert_eq!(args.client.addr, "mgr:8443");
    assert!(args.client.insecure);
    assert_eq!(args.poll.refresh_ms, 5000);
    assert_eq!(args.theme, ThemeName::Nord);
    assert!(args.log_file.is_none());
}
